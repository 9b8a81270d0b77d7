use std::collections::VecDeque;
use std::sync::Arc;

use image::RgbaImage;

/// Immutable full copy of the bitmap at a checkpoint
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySnapshot {
    pixels: Arc<RgbaImage>,
}

impl HistorySnapshot {
    pub fn capture(pixels: &RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels.clone()),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Approximate heap size of the snapshot in bytes
    pub fn memory_size(&self) -> usize {
        self.pixels.as_raw().len()
    }
}

/// Linear undo/redo log of bitmap snapshots with a cursor on the one shown.
///
/// Pushing truncates everything after the cursor. With a depth limit the
/// oldest snapshots are evicted first.
#[derive(Clone, Debug)]
pub struct SnapshotHistory {
    snapshots: VecDeque<HistorySnapshot>,
    cursor: usize,
    max_depth: Option<usize>,
}

impl SnapshotHistory {
    /// History holding a single initial snapshot
    pub fn new(initial: HistorySnapshot, max_depth: Option<usize>) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            max_depth: max_depth.map(|depth| depth.max(1)),
        }
    }

    /// Drop everything and start again from `initial`
    pub fn reset(&mut self, initial: HistorySnapshot) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.cursor = 0;
    }

    /// Keep only the snapshot under the cursor
    pub fn clear(&mut self) {
        if let Some(current) = self.snapshots.remove(self.cursor) {
            self.snapshots.clear();
            self.snapshots.push_back(current);
        }
        self.cursor = 0;
    }

    /// Discard redo states, append, and move the cursor to the new snapshot
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);
        self.cursor = self.snapshots.len() - 1;
        self.prune();
    }

    /// Step back one snapshot. At the oldest one this is a no-op.
    pub fn undo(&mut self) -> &HistorySnapshot {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.current()
    }

    /// Step forward one snapshot. At the newest one this is a no-op.
    pub fn redo(&mut self) -> &HistorySnapshot {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> &HistorySnapshot {
        // The deque is never empty: construction and reset seed one entry,
        // truncation keeps the cursor entry, pruning keeps at least one.
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Total bytes held by all snapshots
    pub fn memory_usage(&self) -> usize {
        self.snapshots.iter().map(HistorySnapshot::memory_size).sum()
    }

    fn prune(&mut self) {
        let Some(max_depth) = self.max_depth else {
            return;
        };
        while self.snapshots.len() > max_depth && self.cursor > 0 {
            self.snapshots.pop_front();
            self.cursor -= 1;
            log::debug!("History full, evicted oldest snapshot");
        }
    }
}

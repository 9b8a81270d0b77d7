//! Non-destructive filters: a closed set of named parameters, each with a
//! declared range, rendered over the bitmap on every pass.

mod pipeline;
mod presets;

pub use pipeline::{render, rotate_about_center};
pub use presets::{FilterPreset, PRESETS};

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Every filter parameter the editor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Brightness,
    Contrast,
    Saturation,
    Blur,
    Rotation,
    Hue,
    Sepia,
    Opacity,
    Grayscale,
    Sharpen,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Saturation,
        FilterKind::Blur,
        FilterKind::Rotation,
        FilterKind::Hue,
        FilterKind::Sepia,
        FilterKind::Opacity,
        FilterKind::Grayscale,
        FilterKind::Sharpen,
    ];

    /// Lower-case name as used by the sliders
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Blur => "blur",
            Self::Rotation => "rotation",
            Self::Hue => "hue",
            Self::Sepia => "sepia",
            Self::Opacity => "opacity",
            Self::Grayscale => "grayscale",
            Self::Sharpen => "sharpen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Valid values for this parameter. Rotation wraps instead of clamping,
    /// so its range is only used for the slider.
    pub fn range(&self) -> RangeInclusive<f32> {
        match self {
            Self::Hue => -180.0..=180.0,
            Self::Rotation => -360.0..=360.0,
            _ => 0.0..=200.0,
        }
    }

    /// Value at which the parameter leaves the image untouched
    pub fn identity(&self) -> f32 {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation | Self::Opacity => 100.0,
            _ => 0.0,
        }
    }

    /// Clamp (or, for rotation, wrap) a value into this parameter's range
    pub fn normalize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.identity();
        }
        match self {
            Self::Rotation => value % 360.0,
            _ => {
                let range = self.range();
                value.clamp(*range.start(), *range.end())
            }
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Current value of every filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur: f32,
    pub rotation: f32,
    pub hue: f32,
    pub sepia: f32,
    pub opacity: f32,
    pub grayscale: f32,
    pub sharpen: f32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            rotation: 0.0,
            hue: 0.0,
            sepia: 0.0,
            opacity: 100.0,
            grayscale: 0.0,
            sharpen: 0.0,
        }
    }
}

impl FilterState {
    pub fn get(&self, kind: FilterKind) -> f32 {
        match kind {
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Saturation => self.saturation,
            FilterKind::Blur => self.blur,
            FilterKind::Rotation => self.rotation,
            FilterKind::Hue => self.hue,
            FilterKind::Sepia => self.sepia,
            FilterKind::Opacity => self.opacity,
            FilterKind::Grayscale => self.grayscale,
            FilterKind::Sharpen => self.sharpen,
        }
    }

    fn slot_mut(&mut self, kind: FilterKind) -> &mut f32 {
        match kind {
            FilterKind::Brightness => &mut self.brightness,
            FilterKind::Contrast => &mut self.contrast,
            FilterKind::Saturation => &mut self.saturation,
            FilterKind::Blur => &mut self.blur,
            FilterKind::Rotation => &mut self.rotation,
            FilterKind::Hue => &mut self.hue,
            FilterKind::Sepia => &mut self.sepia,
            FilterKind::Opacity => &mut self.opacity,
            FilterKind::Grayscale => &mut self.grayscale,
            FilterKind::Sharpen => &mut self.sharpen,
        }
    }

    /// Set a parameter, keeping it inside its declared range.
    /// Returns the value actually stored.
    pub fn set(&mut self, kind: FilterKind, value: f32) -> f32 {
        let value = kind.normalize(value);
        *self.slot_mut(kind) = value;
        value
    }

    /// Overwrite only the parameters the preset names
    pub fn apply_preset(&mut self, preset: &FilterPreset) {
        for &(kind, value) in preset.values {
            self.set(kind, value);
        }
    }

    /// True when rendering with these parameters would not change any pixel
    pub fn is_identity(&self) -> bool {
        FilterKind::ALL
            .iter()
            .all(|&kind| self.get(kind) == kind.identity())
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::identity::UserIdentity;
use super::profile::UserProfile;
use super::settings::UserSettings;
use crate::util::time;

/// How many generations the public feed shows
pub const RECENT_GENERATIONS_LIMIT: usize = 20;

/// Errors that can occur in library operations
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Not signed in")]
    Unauthorized,

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Image generation failed: {0}")]
    Generation(String),

    #[error("Failed to serialize library: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access library file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;

/// A stored prompt and the image it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: Uuid,
    pub prompt: String,
    pub image_url: String,
    pub user_id: String,
    pub collection_id: Option<Uuid>,
    /// Seconds since the UNIX epoch
    pub created_at: u64,
}

/// A user-named group of generations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: u64,
}

/// A collection plus the number of generations filed in it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    #[serde(flatten)]
    pub collection: Collection,
    pub image_count: usize,
}

/// Generations, collections, profiles and per-user settings, kept in one JSON file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryStore {
    /// In insertion order
    generations: Vec<Generation>,
    collections: Vec<Collection>,
    /// Keyed by user id
    settings: HashMap<String, UserSettings>,
    /// Keyed by user id
    profiles: HashMap<String, UserProfile>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the library file. A missing file is an empty library.
    pub fn load(path: &Path) -> LibraryResult<Self> {
        if !path.exists() {
            log::info!("No library at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&text)?;
        log::info!(
            "Loaded library from {} ({} generations, {} collections)",
            path.display(),
            store.generations.len(),
            store.collections.len()
        );
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> LibraryResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        log::info!("Saved library to {}", path.display());
        Ok(())
    }

    // ---- generations -----------------------------------------------------

    /// Persist `{prompt, image_url, user_id}` and return the stored record
    pub fn record_generation(
        &mut self,
        user: &UserIdentity,
        prompt: &str,
        image_url: &str,
    ) -> LibraryResult<Generation> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(LibraryError::InvalidInput("prompt is empty".to_owned()));
        }
        if image_url.trim().is_empty() {
            return Err(LibraryError::InvalidInput("image url is empty".to_owned()));
        }
        let generation = Generation {
            id: Uuid::new_v4(),
            prompt: prompt.to_owned(),
            image_url: image_url.to_owned(),
            user_id: user.id.clone(),
            collection_id: None,
            created_at: time::timestamp_secs(),
        };
        log::debug!("Recorded generation {} for user {}", generation.id, user.id);
        self.generations.push(generation.clone());
        Ok(generation)
    }

    pub fn generation(&self, id: Uuid) -> Option<&Generation> {
        self.generations.iter().find(|g| g.id == id)
    }

    /// Newest generations from every user, at most `limit`
    pub fn recent_generations(&self, limit: usize) -> Vec<&Generation> {
        newest_first(self.generations.iter()).into_iter().take(limit).collect()
    }

    /// Everything the user has generated, newest first
    pub fn user_history(&self, user: &UserIdentity) -> Vec<&Generation> {
        newest_first(self.generations.iter().filter(|g| g.user_id == user.id))
    }

    // ---- collections -----------------------------------------------------

    pub fn create_collection(
        &mut self,
        user: &UserIdentity,
        name: &str,
        description: Option<&str>,
    ) -> LibraryResult<Collection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::InvalidInput("collection name is empty".to_owned()));
        }
        let collection = Collection {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
            user_id: user.id.clone(),
            created_at: time::timestamp_secs(),
        };
        self.collections.push(collection.clone());
        Ok(collection)
    }

    /// The user's collections with how many generations each holds
    pub fn collections_for(&self, user: &UserIdentity) -> Vec<CollectionSummary> {
        self.collections
            .iter()
            .filter(|c| c.user_id == user.id)
            .map(|c| CollectionSummary {
                collection: c.clone(),
                image_count: self
                    .generations
                    .iter()
                    .filter(|g| g.collection_id == Some(c.id))
                    .count(),
            })
            .collect()
    }

    /// File a generation into one of the user's collections, or take it out
    /// with `None`. Both must belong to the user.
    pub fn assign_to_collection(
        &mut self,
        user: &UserIdentity,
        generation_id: Uuid,
        collection_id: Option<Uuid>,
    ) -> LibraryResult<Generation> {
        if let Some(collection_id) = collection_id {
            let owned = self
                .collections
                .iter()
                .any(|c| c.id == collection_id && c.user_id == user.id);
            if !owned {
                return Err(LibraryError::NotFound {
                    kind: "collection",
                    id: collection_id,
                });
            }
        }
        let generation = self
            .generations
            .iter_mut()
            .find(|g| g.id == generation_id && g.user_id == user.id)
            .ok_or(LibraryError::NotFound {
                kind: "generation",
                id: generation_id,
            })?;
        generation.collection_id = collection_id;
        Ok(generation.clone())
    }

    // ---- profile ---------------------------------------------------------

    /// Stored profile; a user who never saved one gets their identity's name
    pub fn profile_for(&self, user: &UserIdentity) -> UserProfile {
        self.profiles.get(&user.id).cloned().unwrap_or_else(|| UserProfile {
            name: user.name.clone(),
            ..UserProfile::default()
        })
    }

    /// Replace the user's profile and return what was stored
    pub fn update_profile(&mut self, user: &UserIdentity, profile: UserProfile) -> UserProfile {
        let profile = profile.normalized();
        self.profiles.insert(user.id.clone(), profile.clone());
        log::debug!("Updated profile for user {}", user.id);
        profile
    }

    // ---- settings --------------------------------------------------------

    /// Stored settings, or the defaults if the user never saved any
    pub fn settings_for(&self, user: &UserIdentity) -> UserSettings {
        self.settings.get(&user.id).cloned().unwrap_or_default()
    }

    pub fn update_settings(&mut self, user: &UserIdentity, settings: UserSettings) -> UserSettings {
        self.settings.insert(user.id.clone(), settings.clone());
        settings
    }
}

/// Sort by creation time, newest first; equal times keep the later insert first
fn newest_first<'a>(generations: impl DoubleEndedIterator<Item = &'a Generation>) -> Vec<&'a Generation> {
    let mut sorted: Vec<&Generation> = generations.rev().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

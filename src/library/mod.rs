//! The image library around the editor: who is signed in, how prompts turn
//! into images, and where generations, collections, profiles and settings are kept.
//!
//! Transport and authentication live outside this crate; they are reached
//! through the [`IdentityProvider`] and [`ImageGenerator`] traits.

mod generation;
mod identity;
mod profile;
mod settings;
mod store;

pub use generation::{GenerationRequest, ImageGenerator, generate_and_store};
pub use identity::{IdentityProvider, StaticIdentity, UserIdentity};
pub use profile::{SocialLinks, UserProfile};
pub use settings::{ImageQuality, Theme, UserSettings};
pub use store::{
    Collection, CollectionSummary, Generation, LibraryError, LibraryResult, LibraryStore,
    RECENT_GENERATIONS_LIMIT,
};

use std::cell::RefCell;

use prompt_canvas::library::{
    GenerationRequest, ImageGenerator, LibraryError, LibraryResult, LibraryStore,
    RECENT_GENERATIONS_LIMIT, SocialLinks, StaticIdentity, Theme, UserIdentity, UserProfile,
    UserSettings, generate_and_store,
};
use uuid::Uuid;

fn alice() -> UserIdentity {
    UserIdentity::new("user-alice", "alice@example.com").with_name("Alice")
}

fn bob() -> UserIdentity {
    UserIdentity::new("user-bob", "bob@example.com")
}

/// Generator returning fixed URLs and remembering what it was asked for
struct FakeGenerator {
    urls: Vec<String>,
    requests: RefCell<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    fn returning(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|url| url.to_string()).collect(),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl ImageGenerator for FakeGenerator {
    fn generate(&self, request: &GenerationRequest) -> LibraryResult<Vec<String>> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.urls.clone())
    }
}

struct FailingGenerator;

impl ImageGenerator for FailingGenerator {
    fn generate(&self, _request: &GenerationRequest) -> LibraryResult<Vec<String>> {
        Err(LibraryError::Generation("model offline".to_owned()))
    }
}

#[test]
fn test_request_defaults() {
    let request = GenerationRequest::new("  a red fox  ").unwrap();
    assert_eq!(request.prompt, "a red fox");
    assert_eq!((request.width, request.height), (768, 768));
    assert_eq!(request.num_outputs, 1);
    assert_eq!(request.num_inference_steps, 50);
    assert_eq!(request.guidance_scale, 7.5);
    assert!(matches!(GenerationRequest::new("   "), Err(LibraryError::InvalidInput(_))));
}

#[test]
fn test_generate_and_store_records_first_image() {
    let generator = FakeGenerator::returning(&["https://img/1.png", "https://img/2.png"]);
    let identity = StaticIdentity::signed_in(alice());
    let mut store = LibraryStore::new();

    let generation = generate_and_store(&generator, &identity, &mut store, "a lighthouse").unwrap();
    assert_eq!(generation.image_url, "https://img/1.png");
    assert_eq!(generation.user_id, "user-alice");
    assert_eq!(generation.collection_id, None);
    assert_eq!(store.generation(generation.id), Some(&generation));
    assert_eq!(generator.requests.borrow()[0].prompt, "a lighthouse");
}

#[test]
fn test_generate_requires_sign_in() {
    let generator = FakeGenerator::returning(&["https://img/1.png"]);
    let mut store = LibraryStore::new();
    let err = generate_and_store(&generator, &StaticIdentity::anonymous(), &mut store, "cat").unwrap_err();
    assert!(matches!(err, LibraryError::Unauthorized));
    assert!(generator.requests.borrow().is_empty());
    assert!(store.recent_generations(RECENT_GENERATIONS_LIMIT).is_empty());
}

#[test]
fn test_generation_failures_store_nothing() {
    let identity = StaticIdentity::signed_in(alice());
    let mut store = LibraryStore::new();

    let err = generate_and_store(&FailingGenerator, &identity, &mut store, "cat").unwrap_err();
    assert!(matches!(err, LibraryError::Generation(_)));

    let empty = FakeGenerator::returning(&[]);
    let err = generate_and_store(&empty, &identity, &mut store, "cat").unwrap_err();
    assert!(matches!(err, LibraryError::Generation(_)));
    assert!(store.user_history(&alice()).is_empty());
}

#[test]
fn test_history_is_per_user_newest_first() {
    let mut store = LibraryStore::new();
    let first = store.record_generation(&alice(), "first", "u1").unwrap();
    store.record_generation(&bob(), "other", "u2").unwrap();
    let second = store.record_generation(&alice(), "second", "u3").unwrap();

    let history: Vec<Uuid> = store.user_history(&alice()).iter().map(|g| g.id).collect();
    assert_eq!(history, vec![second.id, first.id]);
    assert_eq!(store.recent_generations(2).len(), 2);
    assert_eq!(store.recent_generations(10).len(), 3);
}

#[test]
fn test_record_rejects_empty_prompt() {
    let mut store = LibraryStore::new();
    assert!(matches!(
        store.record_generation(&alice(), " ", "u1"),
        Err(LibraryError::InvalidInput(_))
    ));
}

#[test]
fn test_collections_count_their_images() {
    let mut store = LibraryStore::new();
    let travel = store.create_collection(&alice(), "Travel", Some("  trips ")).unwrap();
    let empty = store.create_collection(&alice(), "Empty", None).unwrap();
    store.create_collection(&bob(), "Bob's", None).unwrap();
    assert_eq!(travel.description.as_deref(), Some("trips"));

    let a = store.record_generation(&alice(), "beach", "u1").unwrap();
    let b = store.record_generation(&alice(), "mountain", "u2").unwrap();
    store.assign_to_collection(&alice(), a.id, Some(travel.id)).unwrap();
    store.assign_to_collection(&alice(), b.id, Some(travel.id)).unwrap();

    let summaries = store.collections_for(&alice());
    assert_eq!(summaries.len(), 2);
    let count = |id: Uuid| {
        summaries
            .iter()
            .find(|s| s.collection.id == id)
            .map(|s| s.image_count)
    };
    assert_eq!(count(travel.id), Some(2));
    assert_eq!(count(empty.id), Some(0));

    let moved = store.assign_to_collection(&alice(), b.id, None).unwrap();
    assert_eq!(moved.collection_id, None);
    assert_eq!(store.collections_for(&alice())[0].image_count, 1);
}

#[test]
fn test_assign_checks_ownership() {
    let mut store = LibraryStore::new();
    let bobs = store.create_collection(&bob(), "Bob's", None).unwrap();
    let mine = store.create_collection(&alice(), "Mine", None).unwrap();
    let generation = store.record_generation(&alice(), "tree", "u1").unwrap();

    let err = store
        .assign_to_collection(&alice(), generation.id, Some(bobs.id))
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { kind: "collection", .. }));

    let err = store
        .assign_to_collection(&bob(), generation.id, None)
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { kind: "generation", .. }));

    let err = store
        .assign_to_collection(&alice(), Uuid::new_v4(), Some(mine.id))
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { kind: "generation", .. }));
}

#[test]
fn test_settings_default_until_saved() {
    let mut store = LibraryStore::new();
    let defaults = store.settings_for(&alice());
    assert_eq!(defaults, UserSettings::default());
    assert_eq!(defaults.language, "en");
    assert!(defaults.notifications);
    assert!(!defaults.email_updates);

    let updated = UserSettings {
        theme: Theme::Dark,
        auto_save: false,
        ..defaults
    };
    store.update_settings(&alice(), updated.clone());
    assert_eq!(store.settings_for(&alice()), updated);
    assert_eq!(store.settings_for(&bob()), UserSettings::default());
}

#[test]
fn test_library_survives_save_and_load() {
    let path = std::env::temp_dir().join(format!("prompt-canvas-library-{}.json", Uuid::new_v4()));
    let mut store = LibraryStore::new();
    let collection = store.create_collection(&alice(), "Saved", None).unwrap();
    let generation = store.record_generation(&alice(), "moon", "u1").unwrap();
    store.assign_to_collection(&alice(), generation.id, Some(collection.id)).unwrap();
    store.update_settings(
        &alice(),
        UserSettings {
            language: "de".to_owned(),
            ..UserSettings::default()
        },
    );
    store.update_profile(
        &alice(),
        UserProfile {
            bio: Some("paints moons".to_owned()),
            ..UserProfile::default()
        },
    );
    store.save(&path).unwrap();

    let loaded = LibraryStore::load(&path).unwrap();
    assert_eq!(loaded.user_history(&alice())[0].prompt, "moon");
    assert_eq!(loaded.collections_for(&alice())[0].image_count, 1);
    assert_eq!(loaded.settings_for(&alice()).language, "de");
    assert_eq!(loaded.profile_for(&alice()).bio.as_deref(), Some("paints moons"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_library_file_is_empty() {
    let path = std::env::temp_dir().join(format!("prompt-canvas-missing-{}.json", Uuid::new_v4()));
    let store = LibraryStore::load(&path).unwrap();
    assert!(store.recent_generations(RECENT_GENERATIONS_LIMIT).is_empty());
}

#[test]
fn test_profile_defaults_to_identity_name() {
    let store = LibraryStore::new();
    let profile = store.profile_for(&alice());
    assert_eq!(profile.name.as_deref(), Some("Alice"));
    assert_eq!(profile.bio, None);
    assert_eq!(store.profile_for(&bob()).name, None);
}

#[test]
fn test_update_profile_is_per_user() {
    let mut store = LibraryStore::new();
    let stored = store.update_profile(
        &bob(),
        UserProfile {
            name: Some(" Bob ".to_owned()),
            location: Some("".to_owned()),
            website: Some("https://bob.example".to_owned()),
            social_links: SocialLinks {
                github: Some("bob".to_owned()),
                ..SocialLinks::default()
            },
            ..UserProfile::default()
        },
    );
    assert_eq!(stored.name.as_deref(), Some("Bob"));
    assert_eq!(stored.location, None);
    assert_eq!(store.profile_for(&bob()), stored);
    assert_eq!(store.profile_for(&bob()).social_links.github.as_deref(), Some("bob"));
    assert_eq!(store.profile_for(&alice()).website, None);
}

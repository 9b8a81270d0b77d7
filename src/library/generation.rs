use serde::{Deserialize, Serialize};

use super::identity::IdentityProvider;
use super::store::{Generation, LibraryError, LibraryResult, LibraryStore};

/// Parameters sent to the image-generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub num_outputs: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl GenerationRequest {
    /// A request with the service defaults (768x768, one image, 50 steps)
    pub fn new(prompt: &str) -> LibraryResult<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(LibraryError::InvalidInput("prompt is empty".to_owned()));
        }
        Ok(Self {
            prompt: prompt.to_owned(),
            width: 768,
            height: 768,
            num_outputs: 1,
            num_inference_steps: 50,
            guidance_scale: 7.5,
        })
    }
}

/// The external text-to-image service
pub trait ImageGenerator {
    /// Run the model and return the URLs of the produced images
    fn generate(&self, request: &GenerationRequest) -> LibraryResult<Vec<String>>;
}

/// Generate an image for the signed-in user and record it in the library.
/// Only the first returned image is kept.
pub fn generate_and_store(
    generator: &dyn ImageGenerator,
    identity: &dyn IdentityProvider,
    store: &mut LibraryStore,
    prompt: &str,
) -> LibraryResult<Generation> {
    let user = identity.current_user().ok_or(LibraryError::Unauthorized)?;
    let request = GenerationRequest::new(prompt)?;
    log::info!("Generating image for user {}", user.id);

    let urls = generator.generate(&request).inspect_err(|err| {
        log::error!("Generation failed: {err}");
    })?;
    let image_url = urls
        .into_iter()
        .next()
        .ok_or_else(|| LibraryError::Generation("service returned no images".to_owned()))?;

    store.record_generation(&user, &request.prompt, &image_url)
}

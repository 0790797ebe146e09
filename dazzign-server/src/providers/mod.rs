//! Generation provider backends
//!
//! Two seams: [`ImageBackend`] turns a prompt into a base64 image, and
//! [`SpecBackend`] turns a free-form prompt into a [`DesignSpec`]. Each has
//! a remote implementation (Stability AI, OpenAI) and a credential-free
//! local one (bundled samples, keyword scan). The local pair is the
//! default, so a fresh checkout works without any API keys.

pub mod openai;
pub mod sample;
pub mod stability;

use async_trait::async_trait;
use dazzign_core::DesignSpec;

pub use openai::OpenAiSpecBackend;
pub use sample::{KeywordSpecBackend, SampleImageBackend};
pub use stability::StabilityImageBackend;

/// Errors from a provider call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Parameters for one image generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub seed: u64,
    pub output_format: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, negative_prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: negative_prompt.into(),
            seed: 0,
            output_format: "jpeg".to_string(),
        }
    }
}

/// Produces a base64-encoded image for a generation request
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;

    /// Short name used in logs and metrics labels
    fn name(&self) -> &'static str;
}

/// Extracts structured design attributes from a free-form prompt
#[async_trait]
pub trait SpecBackend: Send + Sync {
    async fn extract(&self, prompt: &str) -> Result<DesignSpec, ProviderError>;

    /// Short name used in logs and metrics labels
    fn name(&self) -> &'static str;
}

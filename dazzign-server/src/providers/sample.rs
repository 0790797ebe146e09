//! Credential-free provider backends
//!
//! These are the defaults: image generation picks from a small set of
//! bundled placeholder images and spec extraction runs the deterministic
//! keyword scanner. Both are fully offline.

use async_trait::async_trait;
use dazzign_core::{extract_spec, DesignSpec};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::samples::SAMPLE_IMAGES;

use super::{GenerationRequest, ImageBackend, ProviderError, SpecBackend};

/// Serves bundled placeholder images in round-robin order
pub struct SampleImageBackend {
    next: AtomicUsize,
}

impl SampleImageBackend {
    pub fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for SampleImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageBackend for SampleImageBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % SAMPLE_IMAGES.len();
        Ok(SAMPLE_IMAGES[index].to_string())
    }

    fn name(&self) -> &'static str {
        "sample"
    }
}

/// Keyword-scan spec extraction, no network calls
pub struct KeywordSpecBackend;

#[async_trait]
impl SpecBackend for KeywordSpecBackend {
    async fn extract(&self, prompt: &str) -> Result<DesignSpec, ProviderError> {
        Ok(extract_spec(prompt))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_backend_cycles_through_images() {
        let backend = SampleImageBackend::new();
        let request = GenerationRequest::new("a black case", "");

        let first = backend.generate(&request).await.unwrap();
        let second = backend.generate(&request).await.unwrap();
        assert_ne!(first, second);

        // Wraps back around after one full cycle
        for _ in 0..SAMPLE_IMAGES.len() - 2 {
            backend.generate(&request).await.unwrap();
        }
        assert_eq!(backend.generate(&request).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_keyword_backend_extracts_attributes() {
        let backend = KeywordSpecBackend;
        let spec = backend
            .extract("a minimalist white cube case with rgb")
            .await
            .unwrap();
        assert_eq!(spec.style, vec!["Minimalist"]);
        assert_eq!(spec.shape, vec!["Cube"]);
        assert_eq!(spec.lighting, vec!["RGB lighting"]);
    }

    #[tokio::test]
    async fn test_keyword_backend_never_fails() {
        let backend = KeywordSpecBackend;
        let spec = backend.extract("").await.unwrap();
        assert!(spec.is_empty());
    }
}

//! Stability AI image backend
//!
//! One multipart POST to the v2beta core endpoint per generation. The
//! response body is the raw image, returned here base64-encoded.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::multipart::Form;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{GenerationRequest, ImageBackend, ProviderError};

const STABILITY_CORE_URL: &str = "https://api.stability.ai/v2beta/stable-image/generate/core";

pub struct StabilityImageBackend {
    client: reqwest::Client,
    api_key: String,
}

impl StabilityImageBackend {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl ImageBackend for StabilityImageBackend {
    #[instrument(skip(self, request), fields(provider = "stability"))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let form = Form::new()
            .text("prompt", request.prompt.clone())
            .text("negative_prompt", request.negative_prompt.clone())
            .text("aspect_ratio", "1:1")
            .text("seed", request.seed.to_string())
            .text("output_format", request.output_format.clone());

        let response = self
            .client
            .post(STABILITY_CORE_URL)
            .bearer_auth(&self.api_key)
            .header("Accept", "image/*")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "stability returned {status}: {body}"
            )));
        }

        // A filtered generation comes back 200 with a finish-reason header
        let finish_reason = response
            .headers()
            .get("finish-reason")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if finish_reason.as_deref() == Some("CONTENT_FILTERED") {
            return Err(ProviderError::Api(
                "generation rejected by content filter".to_string(),
            ));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "empty image body".to_string(),
            ));
        }

        debug!(bytes = bytes.len(), "received generated image");
        Ok(BASE64.encode(&bytes))
    }

    fn name(&self) -> &'static str {
        "stability"
    }
}

//! OpenAI spec extraction backend
//!
//! One chat-completions call per extraction. The system prompt instructs
//! the model to answer with a bare JSON object keyed by design category,
//! which deserializes directly into a [`DesignSpec`].

use async_trait::async_trait;
use dazzign_core::DesignSpec;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

use super::{ProviderError, SpecBackend};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = r#"You are an AI assistant whose job is to extract structured PC case design attributes from a free-form user prompt.

Extract the following attributes as arrays of English strings:

- color: Main and accent colors (e.g., "Black", "Red", "Navy Blue", "Gold").
- style: Design style or theme (e.g., "Minimalist", "Futuristic", "Steampunk").
- shape: Form factor or silhouette (e.g., "Mid-Tower", "Cube", "Spherical", "Open-Frame").
- material: Construction materials (e.g., "Aluminum", "Tempered Glass", "Wood", "Acrylic").
- ventilation: Vent and airflow features (e.g., "Mesh Front", "Side Vents", "Open-Air Design").
- lighting: Lighting setup (e.g., "ARGB Fans", "LED Strips", "Ambient Glow", "No Lighting").
- features: Functional features (e.g., "Water Cooling", "Vertical GPU Mount", "Cable Management").
- environment: Visual setting or background (e.g., "Dark Room", "On a Gaming Desk", "Futuristic Lab").

Rules:
1. Return a single JSON object containing only the keys that were confidently extracted.
2. Each attribute must be an array of strings, even if only one value is extracted.
3. All extracted values must be in English, even if the user input is in another language.
4. If no attribute can be extracted, return an empty JSON object: {}.
5. Do NOT add any explanations or extra text. Output ONLY the JSON object."#;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

pub struct OpenAiSpecBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiSpecBackend {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl SpecBackend for OpenAiSpecBackend {
    #[instrument(skip(self, prompt), fields(provider = "openai", model = %self.model))]
    async fn extract(&self, prompt: &str) -> Result<DesignSpec, ProviderError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "openai returned {status}: {text}"
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ProviderError::InvalidResponse("no choices in response".to_string()))?;

        serde_json::from_str(content).map_err(|e| {
            ProviderError::InvalidResponse(format!("model output is not a spec object: {e}"))
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_content_parses_into_spec() {
        let content = r#"{"style": ["Cyberpunk"], "lighting": ["ARGB Lighting", "Neon"]}"#;
        let spec: DesignSpec = serde_json::from_str(content).unwrap();
        assert_eq!(spec.style, vec!["Cyberpunk"]);
        assert_eq!(spec.lighting, vec!["ARGB Lighting", "Neon"]);
        assert!(spec.color.is_empty());
    }

    #[test]
    fn test_empty_object_is_an_empty_spec() {
        let spec: DesignSpec = serde_json::from_str("{}").unwrap();
        assert!(spec.is_empty());
    }
}

use crate::llm::model::ModelConfig;
use crate::llm::provider::{Completion, CompletionProvider, ProviderError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Google generative-language API provider.
pub struct GeminiProvider {
    api_key: String,
    config: ModelConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, config: ModelConfig) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("api key must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.config.temperature },
        })
    }

    /// concatenates every text part of the first candidate
    pub fn parse_response(json: &Value) -> Result<String, ProviderError> {
        let parts = json
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                let reason = json
                    .pointer("/promptFeedback/blockReason")
                    .and_then(Value::as_str)
                    .map(|r| format!("prompt blocked: {}", r))
                    .unwrap_or_else(|| "missing candidates[0].content.parts".to_string());
                ProviderError::Parse(reason)
            })?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(ProviderError::Parse("candidate contained no text".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    #[tracing::instrument(skip(self, prompt), fields(llm.model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        let resp = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        let text = Self::parse_response(&json)?;
        tracing::debug!("generated {} chars", text.len());

        Ok(Completion {
            text,
            model: self.config.model.clone(),
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

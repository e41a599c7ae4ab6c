use async_trait::async_trait;
use thiserror::Error;

/// errors from a text-completion provider call
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("provider misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.to_string())
    }
}

/// generated text from a successful completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

/// prompt in, text out; any backend honoring this contract can be swapped in
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError>;

    /// human-readable provider name, used in user-facing failure messages
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn complete(&self, _prompt: &str) -> Result<Completion, ProviderError> {
            Ok(Completion {
                text: self.0.to_string(),
                model: "canned".to_string(),
            })
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn test_provider_trait_object() {
        let provider: Box<dyn CompletionProvider> = Box::new(Canned("SELECT 1"));
        let completion = provider.complete("anything").await.unwrap();
        assert_eq!(completion.text, "SELECT 1");
        assert_eq!(provider.name(), "canned");
    }

    #[test]
    fn test_unavailable_error_display() {
        let e = ProviderError::Unavailable("error sending request".to_string());
        assert_eq!(e.to_string(), "provider unavailable: error sending request");
    }

    #[test]
    fn test_status_error_display() {
        let e = ProviderError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(e.to_string(), "provider returned 429: quota exceeded");
    }
}

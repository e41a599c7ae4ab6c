use crate::error::{Result, TuneQueryError};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "spotify.db";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// runtime settings for a question-answering session
#[derive(Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub read_only: bool,
}

impl AppConfig {
    /// a missing credential is fatal before any interaction is served
    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(TuneQueryError::Config(
                    "missing GOOGLE_API_KEY; export it or pass --api-key".to_string(),
                ))
            }
        }

        if self.model.trim().is_empty() {
            return Err(TuneQueryError::Config("model name must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn api_key(&self) -> Result<&str> {
        self.validate()?;
        Ok(self.api_key.as_deref().map(str::trim).unwrap_or_default())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            read_only: false,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("read_only", &self.read_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TuneQueryError::Config(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let config = AppConfig {
            api_key: Some("   ".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_trimmed() {
        let config = AppConfig {
            api_key: Some(" abc123 \n".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.api_key().unwrap(), "abc123");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("secret-key".to_string()),
            ..AppConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, PathBuf::from("spotify.db"));
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(!config.read_only);
    }
}

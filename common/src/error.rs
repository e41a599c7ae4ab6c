use crate::llm::provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuneQueryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("schema load failed: {0}")]
    Schema(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("statement refused: {0}")]
    Refused(String),

    #[error("sample data generation failed: {0}")]
    Seed(String),

    #[error("tracing initialization failed: {0}")]
    Tracing(String),
}

pub type Result<T> = std::result::Result<T, TuneQueryError>;

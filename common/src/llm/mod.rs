pub mod gemini;
pub mod model;
pub mod provider;

pub use gemini::GeminiProvider;
pub use model::ModelConfig;
pub use provider::{Completion, CompletionProvider, ProviderError};

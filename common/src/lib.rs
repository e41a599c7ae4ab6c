pub mod agent;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod seed;
pub mod tracing;

pub use config::AppConfig;
pub use db::Database;
pub use error::{Result, TuneQueryError};
pub use pipeline::{Interaction, Pipeline};

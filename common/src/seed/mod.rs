pub mod generator;

pub use generator::{seed_database, SeedConfig, SeedSummary};

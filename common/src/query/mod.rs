pub mod executor;
pub mod result;

pub use executor::{QueryExecutor, QueryOutcome};
pub use result::{dedupe_column_names, Column, ResultSet, Value};

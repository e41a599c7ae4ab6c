pub mod columns;
pub mod descriptor;

pub use columns::{parse_column_names, ColumnCatalog};
pub use descriptor::{describe_schema, SchemaDescriptor, TableDefinition};

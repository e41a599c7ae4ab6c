use crate::error::{Result, TuneQueryError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

const CATALOG_QUERY: &str = "SELECT name, sql FROM sqlite_master WHERE type='table'";

/// one catalog entry: table name plus its creation statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub sql: String,
}

/// table definitions in the order the catalog reports them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub tables: Vec<TableDefinition>,
}

impl SchemaDescriptor {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// flat text block handed to the language model, one `name: sql` line per table
    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(|t| format!("{}: {}", t.name, t.sql))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[tracing::instrument(skip(conn))]
pub fn describe_schema(conn: &Connection) -> Result<SchemaDescriptor> {
    let mut stmt = conn
        .prepare(CATALOG_QUERY)
        .map_err(|e| TuneQueryError::Schema(format!("cannot read catalog: {}", e)))?;

    let tables = stmt
        .query_map([], |row| {
            Ok(TableDefinition {
                name: row.get(0)?,
                // virtual/shadow tables may report a null definition
                sql: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
        .map_err(|e| TuneQueryError::Schema(format!("cannot read catalog: {}", e)))?;

    tracing::info!(table_count = tables.len(), "schema loaded");
    Ok(SchemaDescriptor::new(tables))
}

use crate::db::Database;
use crate::error::{Result, TuneQueryError};
use crate::query::result::{ResultSet, Value};

/// outcome of running a candidate query; failures are values, never errors
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(ResultSet),
    /// valid query, zero rows; carries the (deduplicated) column names
    Empty(ResultSet),
    Failed(String),
}

impl QueryOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }
}

/// runs candidate SQL text directly against the database
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    database: Database,
}

impl QueryExecutor {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    #[tracing::instrument(skip(self, candidate), fields(sql_length = candidate.len()))]
    pub fn execute(&self, candidate: &str) -> QueryOutcome {
        if candidate.trim().is_empty() {
            return QueryOutcome::Failed("query text is empty".to_string());
        }

        match self.run(candidate) {
            Ok(result) if result.is_empty() => {
                tracing::info!("query returned no rows");
                QueryOutcome::Empty(result)
            }
            Ok(result) => {
                tracing::info!(
                    rows = result.row_count(),
                    columns = result.columns.len(),
                    "query succeeded"
                );
                QueryOutcome::Rows(result)
            }
            Err(e) => {
                let message = match e {
                    // surface the engine's own text
                    TuneQueryError::Database(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                tracing::warn!("query failed: {}", message);
                QueryOutcome::Failed(message)
            }
        }
    }

    fn run(&self, candidate: &str) -> Result<ResultSet> {
        let conn = self.database.connect()?;
        let mut stmt = conn.prepare(candidate)?;

        if self.database.is_read_only() && !stmt.readonly() {
            return Err(TuneQueryError::Refused(
                "read-only mode allows only statements that do not modify the database"
                    .to_string(),
            ));
        }

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = names.len();
        let mut result = ResultSet::with_column_names(&names);

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = (0..column_count)
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            result.push_row(values);
        }

        Ok(result)
    }
}

use crate::agent::QuerySynthesizer;
use crate::db::Database;
use crate::error::{Result, TuneQueryError};
use crate::llm::CompletionProvider;
use crate::query::{QueryExecutor, QueryOutcome, ResultSet};
use crate::schema::{describe_schema, ColumnCatalog, SchemaDescriptor};
use std::sync::Arc;

/// what a single question produced, ready for presentation
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    EmptyQuestion,
    GenerationFailed { provider: String, message: String },
    Answered { sql: String, result: ResultSet },
    NoRows { sql: String, result: ResultSet },
    ExecutionFailed { sql: String, message: String },
}

impl Interaction {
    pub fn sql(&self) -> Option<&str> {
        match self {
            Interaction::Answered { sql, .. }
            | Interaction::NoRows { sql, .. }
            | Interaction::ExecutionFailed { sql, .. } => Some(sql),
            Interaction::EmptyQuestion | Interaction::GenerationFailed { .. } => None,
        }
    }
}

/// Composition root: question -> candidate query -> result.
///
/// The schema is read once in [`Pipeline::load`] and never refreshed; restart
/// the process to pick up schema changes.
pub struct Pipeline {
    schema: SchemaDescriptor,
    catalog: ColumnCatalog,
    synthesizer: QuerySynthesizer,
    executor: QueryExecutor,
}

impl Pipeline {
    /// fails when the schema cannot be read; callers treat that as fatal
    #[tracing::instrument(skip(database, provider), fields(db.path = %database.path().display()))]
    pub async fn load(database: Database, provider: Arc<dyn CompletionProvider>) -> Result<Self> {
        let schema_db = database.clone();
        let schema = tokio::task::spawn_blocking(move || {
            let conn = schema_db.connect().map_err(|e| {
                TuneQueryError::Schema(format!(
                    "database {} is unreachable: {}",
                    schema_db.path().display(),
                    e
                ))
            })?;
            describe_schema(&conn)
        })
        .await
        .map_err(|e| TuneQueryError::Schema(format!("task join error: {}", e)))??;

        if schema.is_empty() {
            tracing::warn!("database has no tables; generated queries will have nothing to ground on");
        }

        Ok(Self::new(schema, QuerySynthesizer::new(provider), QueryExecutor::new(database)))
    }

    pub fn new(schema: SchemaDescriptor, synthesizer: QuerySynthesizer, executor: QueryExecutor) -> Self {
        let catalog = ColumnCatalog::from_schema(&schema);
        Self {
            schema,
            catalog,
            synthesizer,
            executor,
        }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    #[tracing::instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Interaction {
        if question.trim().is_empty() {
            return Interaction::EmptyQuestion;
        }

        let candidate = match self.synthesizer.synthesize(question, &self.schema).await {
            Ok(candidate) => candidate,
            Err(e) => {
                let message = match e {
                    TuneQueryError::Generation(message) => message,
                    other => other.to_string(),
                };
                return Interaction::GenerationFailed {
                    provider: self.synthesizer.provider_name().to_string(),
                    message,
                };
            }
        };

        let unknown = self.catalog.unknown_references(candidate.as_str());
        if !unknown.is_empty() {
            tracing::warn!(references = ?unknown, "candidate query references undeclared tables or columns");
        }

        let sql = candidate.into_inner();
        let executor = self.executor.clone();
        let query = sql.clone();
        let outcome = tokio::task::spawn_blocking(move || executor.execute(&query))
            .await
            .unwrap_or_else(|e| QueryOutcome::Failed(format!("query task failed: {}", e)));

        match outcome {
            QueryOutcome::Rows(result) => Interaction::Answered { sql, result },
            QueryOutcome::Empty(result) => Interaction::NoRows { sql, result },
            QueryOutcome::Failed(message) => Interaction::ExecutionFailed { sql, message },
        }
    }
}

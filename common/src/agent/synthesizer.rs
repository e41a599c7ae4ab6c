use crate::agent::parser::strip_code_fences;
use crate::agent::prompt::build_query_prompt;
use crate::error::{Result, TuneQueryError};
use crate::llm::provider::CompletionProvider;
use crate::schema::SchemaDescriptor;
use std::fmt;
use std::sync::Arc;

/// cleaned model output; still unvalidated SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery(String);

impl CandidateQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CandidateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// turns a question into a candidate query through a completion provider
#[derive(Clone)]
pub struct QuerySynthesizer {
    provider: Arc<dyn CompletionProvider>,
}

impl QuerySynthesizer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// single attempt; provider failures surface as `TuneQueryError::Generation`
    #[tracing::instrument(skip(self, schema), fields(provider = %self.provider.name()))]
    pub async fn synthesize(&self, question: &str, schema: &SchemaDescriptor) -> Result<CandidateQuery> {
        let prompt = build_query_prompt(&schema.render(), question);
        tracing::debug!(prompt_len = prompt.len(), "prompt built");

        let completion = self.provider.complete(&prompt).await.map_err(|e| {
            tracing::warn!("completion failed: {}", e);
            TuneQueryError::Generation(e.to_string())
        })?;

        let sql = strip_code_fences(&completion.text);
        if sql.is_empty() {
            return Err(TuneQueryError::Generation(
                "model returned empty output".to_string(),
            ));
        }

        tracing::info!(model = %completion.model, sql_length = sql.len(), "candidate query generated");
        Ok(CandidateQuery(sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{Completion, ProviderError};
    use crate::schema::TableDefinition;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubProvider {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, prompt: &str) -> std::result::Result<Completion, ProviderError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(Completion {
                    text: text.clone(),
                    model: "stub".to_string(),
                }),
                Err(message) => Err(ProviderError::Unavailable(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(vec![TableDefinition {
            name: "artists".to_string(),
            sql: "CREATE TABLE artists (artist_id INTEGER PRIMARY KEY, name TEXT, country TEXT)".to_string(),
        }])
    }

    #[tokio::test]
    async fn test_synthesize_strips_fences() {
        let provider = Arc::new(StubProvider::ok(
            "```sql\nSELECT name AS artist_name FROM artists WHERE country='USA'\n```",
        ));
        let synthesizer = QuerySynthesizer::new(provider.clone());

        let query = synthesizer
            .synthesize("List all artists from the USA", &schema())
            .await
            .unwrap();

        assert_eq!(
            query.as_str(),
            "SELECT name AS artist_name FROM artists WHERE country='USA'"
        );
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("artists: CREATE TABLE artists"));
        assert!(seen[0].contains("Question: List all artists from the USA"));
    }

    #[tokio::test]
    async fn test_synthesize_provider_failure_is_generation_error() {
        let provider = Arc::new(StubProvider::failing("quota exceeded"));
        let synthesizer = QuerySynthesizer::new(provider.clone());

        let err = synthesizer.synthesize("anything", &schema()).await.unwrap_err();

        assert!(matches!(err, TuneQueryError::Generation(ref m) if m.contains("quota exceeded")));
        // no automatic retry
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_synthesize_empty_output() {
        let synthesizer = QuerySynthesizer::new(Arc::new(StubProvider::ok("```sql\n```")));
        let err = synthesizer.synthesize("anything", &schema()).await.unwrap_err();
        assert!(matches!(err, TuneQueryError::Generation(_)));
    }

    #[tokio::test]
    async fn test_synthesize_passes_keywords_through() {
        let synthesizer = QuerySynthesizer::new(Arc::new(StubProvider::ok("SQL: SELECT 1;")));
        let query = synthesizer.synthesize("one", &schema()).await.unwrap();
        assert_eq!(query.to_string(), "SQL: SELECT 1;");
    }
}

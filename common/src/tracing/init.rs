use crate::error::{Result, TuneQueryError};
use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_sdk::Resource;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct OtelGuard {
    tracer_provider: Option<opentelemetry_sdk::trace::SdkTracerProvider>,
}

impl OtelGuard {
    pub fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            // flush remaining spans on shutdown
            if let Err(e) = provider.shutdown() {
                eprintln!("error shutting down tracer provider: {}", e);
            }
        }
    }
}

const ENABLE_VAR: &str = "TUNEQUERY_ENABLE_TRACING";
const ENDPOINT_VARS: [&str; 2] = ["OTEL_EXPORTER_OTLP_ENDPOINT", "PHOENIX_COLLECTOR_ENDPOINT"];

/// Collector to export spans to, if any.
///
/// Export needs both an opt-in flag (`1`, `true` or `yes`) and a non-empty
/// endpoint; the otlp variable wins over the phoenix one.
fn export_endpoint(enable: Option<&str>, endpoints: &[Option<&str>]) -> Option<String> {
    let enabled = enable
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if !enabled {
        return None;
    }

    endpoints
        .iter()
        .flatten()
        .map(|e| e.trim())
        .find(|e| !e.is_empty())
        .map(str::to_string)
}

fn export_endpoint_from_env() -> Option<String> {
    let enable = env::var(ENABLE_VAR).ok();
    let endpoints: Vec<Option<String>> = ENDPOINT_VARS.iter().map(|v| env::var(v).ok()).collect();
    let endpoints: Vec<Option<&str>> = endpoints.iter().map(|e| e.as_deref()).collect();
    export_endpoint(enable.as_deref(), &endpoints)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

/// console logging on stderr, plus otlp export when enabled and an endpoint is set
pub fn init_tracing(service_name: &str) -> Result<OtelGuard> {
    let endpoint = match export_endpoint_from_env() {
        Some(endpoint) => endpoint,
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init()
                .map_err(|e| TuneQueryError::Tracing(e.to_string()))?;

            tracing::debug!("basic logging initialized (service={})", service_name);

            return Ok(OtelGuard {
                tracer_provider: None,
            });
        }
    };

    use opentelemetry_otlp::WithExportConfig;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| TuneQueryError::Tracing(format!("exporter build failed: {}", e)))?;

    let resource = Resource::builder_empty()
        .with_attribute(KeyValue::new("service.name", service_name.to_string()))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let telemetry =
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()));

    tracing_subscriber::registry()
        .with(telemetry)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter())
        .try_init()
        .map_err(|e| TuneQueryError::Tracing(e.to_string()))?;

    tracing::info!(
        "opentelemetry tracing initialized for {} (endpoint: {})",
        service_name,
        endpoint
    );

    Ok(OtelGuard {
        tracer_provider: Some(provider),
    })
}

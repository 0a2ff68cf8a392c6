//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use super::config::LogFormat;

const DEFAULT_FILTER: &str = "info,sqlx=warn,reqwest=warn";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Returns an error if a global
/// subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    }
}

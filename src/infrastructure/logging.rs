use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter from `RUST_LOG`, falling back to the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},hyper=warn,tower_http=info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fmt_layer<S>(format: &LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

fn build_subscriber(config: &LoggingConfig) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(build_filter(&config.level))
        .with(fmt_layer(&config.format))
}

pub fn init_logging(config: &LoggingConfig) {
    if build_subscriber(config).try_init().is_err() {
        tracing::debug!("Global subscriber already installed");
        return;
    }

    tracing::info!("Logging initialized with level: {}", config.level);
}

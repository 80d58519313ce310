use crate::config::LogFormat;
use crate::error::AppError;
use tracing::debug;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global subscriber. `RUST_LOG` overrides `default_level`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(format: LogFormat, default_level: &str) -> Result<(), AppError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = match format {
        LogFormat::Json => {
            let bunyan = BunyanFormattingLayer::new(env!("CARGO_PKG_NAME").into(), std::io::stderr);
            Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(bunyan)
                .try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr);
            Registry::default().with(env_filter).with(fmt_layer).try_init()
        }
    };

    result.map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;
    debug!("Tracing initialized ({:?})", format);
    Ok(())
}

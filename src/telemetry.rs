use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global fmt subscriber.
///
/// `log_level` (`APP_LOG_LEVEL`) wins; `RUST_LOG` is only consulted when it is
/// unset. actix's `Logger` middleware emits through `log`; the subscriber
/// bridges it.
pub fn init(log_level: Option<&str>) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, warning) = build_filter(log_level, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)?;

    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    Ok(())
}

/// Picks the filter directives. An unparsable `RUST_LOG` falls back to `info`
/// and yields a warning to log once the subscriber is up; an unparsable
/// `APP_LOG_LEVEL` is an error.
pub fn build_filter(
    log_level: Option<&str>,
    rust_log: Option<&str>,
) -> Result<(EnvFilter, Option<String>), TelemetryError> {
    if let Some(level) = log_level {
        let filter = EnvFilter::try_new(level).map_err(|source| TelemetryError::EnvFilter {
            value: level.to_string(),
            source,
        })?;
        return Ok((filter, None));
    }

    if let Some(directives) = rust_log {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(err) => {
                let warning = format!(
                    "ignoring {}='{directives}' ({err}), using '{DEFAULT_FILTER}'",
                    EnvFilter::DEFAULT_ENV
                );
                return Ok((EnvFilter::new(DEFAULT_FILTER), Some(warning)));
            }
        }
    }

    Ok((EnvFilter::new(DEFAULT_FILTER), None))
}

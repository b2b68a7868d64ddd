use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "log filter '{value}' is not a valid EnvFilter directive")
            }
            TelemetryError::Subscriber(err) => {
                write!(f, "unable to install tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Build the filter from an explicit directive. A blank directive means `info`; `RUST_LOG` is
/// only consulted by [`init`].
pub fn resolve_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    let trimmed = directive.trim();
    if trimmed.is_empty() {
        return Ok(EnvFilter::new("info"));
    }

    EnvFilter::try_new(trimmed).map_err(|source| TelemetryError::EnvFilter {
        value: trimmed.to_string(),
        source,
    })
}

/// Install the global fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => resolve_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_module_scoped_directives() {
        let filter = resolve_filter("rfp_engine=debug,warn").expect("directive parses");
        assert!(filter.to_string().contains("rfp_engine=debug"));
    }

    #[test]
    fn blank_directive_defaults_to_info() {
        let filter = resolve_filter("   ").expect("blank falls back");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn rejects_malformed_directives() {
        let err = resolve_filter("rfp_engine=notalevel").expect_err("directive is malformed");
        assert!(matches!(err, TelemetryError::EnvFilter { .. }));
        assert!(err.to_string().contains("rfp_engine=notalevel"));
    }
}

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::{Directive, ParseError};
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
                write!(f, "log filter '{value}' could not be parsed")
            }
            TelemetryError::Subscriber(err) => write!(f, "subscriber already installed: {err}"),
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

/// Transport crates stay at `warn` unless the configured filter names them.
const QUIET_TARGETS: [&str; 2] = ["hyper", "tower"];

/// `RUST_LOG` wins when set; otherwise the configured level is used.
fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let invalid = |source: ParseError| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    };
    let mut filter = EnvFilter::try_new(&config.log_level).map_err(invalid)?;
    for target in QUIET_TARGETS {
        if !config.log_level.contains(target) {
            let directive = format!("{target}=warn")
                .parse::<Directive>()
                .map_err(invalid)?;
            filter = filter.add_directive(directive);
        }
    }
    Ok(filter)
}

/// Installs the global fmt subscriber. Called once by the service binary.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

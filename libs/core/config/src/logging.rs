use crate::{env_or_default, ConfigError, Environment, FromEnv};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Log verbosity, read from `LOG_LEVEL`.
///
/// `RUST_LOG` takes precedence when set, so operators can still use
/// per-module directives without touching `LOG_LEVEL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// The `EnvFilter` directive equivalent to this level.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(ConfigError::ParseError {
                key: "LOG_LEVEL".to_string(),
                details: format!("'{}' is not one of: debug, info, warn, error, off", other),
            }),
        }
    }
}

impl FromEnv for LogLevel {
    fn from_env() -> Result<Self, ConfigError> {
        env_or_default("LOG_LEVEL", "info").parse()
    }
}

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main(), before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware output.
///
/// - **Production**: JSON format (for log aggregation), module targets hidden.
/// - **Development/staging**: pretty-printed, human-readable.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the configured
/// `LOG_LEVEL`. Both formats install `tracing_error::ErrorLayer` so error
/// reports carry span traces.
///
/// Safe to call multiple times; re-initialization is silently skipped
/// (common in tests).
pub fn init_tracing(environment: &Environment, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!("Tracing initialized. Environment: {:?}", environment);
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_info() {
        temp_env::with_var_unset("LOG_LEVEL", || {
            assert_eq!(LogLevel::from_env().unwrap(), LogLevel::Info);
        });
    }

    #[test]
    fn test_log_level_parses_all_levels() {
        let cases = [
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
            ("off", LogLevel::Off),
            ("ERROR", LogLevel::Error),
        ];
        for (raw, expected) in cases {
            temp_env::with_var("LOG_LEVEL", Some(raw), || {
                assert_eq!(LogLevel::from_env().unwrap(), expected);
            });
        }
    }

    #[test]
    fn test_log_level_rejects_unknown() {
        temp_env::with_var("LOG_LEVEL", Some("verbose"), || {
            let err = LogLevel::from_env().unwrap_err();
            assert!(err.to_string().contains("LOG_LEVEL"));
        });
    }

    #[test]
    fn test_init_tracing_multiple_calls() {
        let env = Environment::Development;
        init_tracing(&env, LogLevel::Info);
        init_tracing(&env, LogLevel::Debug);
        init_tracing(&Environment::Production, LogLevel::Error);
    }
}

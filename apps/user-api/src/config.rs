use core_config::cors::CorsConfig;
use core_config::logging::LogLevel;
use core_config::server::ServerConfig;
use core_config::{Environment, FromEnv};

/// Application configuration, composed from the shared config components.
///
/// Reads `HOST`/`PORT`, `LOG_LEVEL`, `CORS_ORIGINS` and `ENVIRONMENT`;
/// every variable has a sensible default.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub log_level: LogLevel,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env()?;
        let server = ServerConfig::from_env()?;
        let log_level = LogLevel::from_env()?;
        let cors = CorsConfig::from_env()?;

        Ok(Self {
            server,
            log_level,
            cors,
            environment,
        })
    }
}

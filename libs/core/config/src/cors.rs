use crate::{env_or_default, ConfigError, FromEnv};

/// CORS allow-list, read from `CORS_ORIGINS` (comma-separated).
///
/// A single `*` entry allows every origin.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

impl CorsConfig {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    pub fn allow_all(&self) -> bool {
        self.origins.iter().any(|o| o == "*")
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allow_all() || self.origins.iter().any(|o| o == origin)
    }
}

impl FromEnv for CorsConfig {
    /// Reads `CORS_ORIGINS` (default: `*`). Entries are trimmed; blank
    /// entries are dropped. An all-blank value is rejected.
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("CORS_ORIGINS", "*");
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ORIGINS".to_string(),
                details: "expected at least one origin or '*'".to_string(),
            });
        }

        Ok(Self { origins })
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec!["*".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_defaults_to_allow_all() {
        temp_env::with_var_unset("CORS_ORIGINS", || {
            let config = CorsConfig::from_env().unwrap();
            assert_eq!(config.origins, vec!["*"]);
            assert!(config.allow_all());
            assert!(config.allows("https://anything.example"));
        });
    }

    #[test]
    fn test_cors_parses_comma_separated_list() {
        temp_env::with_var(
            "CORS_ORIGINS",
            Some("https://app.example.com, http://localhost:3000"),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(
                    config.origins,
                    vec!["https://app.example.com", "http://localhost:3000"]
                );
                assert!(!config.allow_all());
                assert!(config.allows("http://localhost:3000"));
                assert!(!config.allows("https://evil.example.com"));
            },
        );
    }

    #[test]
    fn test_cors_rejects_blank_value() {
        temp_env::with_var("CORS_ORIGINS", Some(" , ,"), || {
            let err = CorsConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("CORS_ORIGINS"));
        });
    }
}

// Database configuration module
// Reads connection settings from DB_* environment variables

use config::{ConfigError, Environment};
use serde::Deserialize;

/// Connection settings for the `PostgreSQL` store
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// May be empty when the server does not require one
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load from the process environment (`DB_HOST`, `DB_PORT`, `DB_USER`,
    /// `DB_PASSWORD`, `DB_NAME`, `DB_MAX_CONNECTIONS`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("DB"))
    }

    /// Load from an explicit environment source
    ///
    /// Empty values count as unset. `user` and `name` are required.
    pub fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(env.ignore_empty(true))
            .set_default("host", "localhost")?
            .set_default("port", 5432)?
            .set_default("password", "")?
            .set_default("max_connections", 5)?
            .build()?;

        for (key, var) in [("user", "DB_USER"), ("name", "DB_NAME")] {
            if settings.get_string(key).map_or(true, |v| v.is_empty()) {
                return Err(ConfigError::Message(format!(
                    "{var} environment variable must be set"
                )));
            }
        }

        settings.try_deserialize()
    }

    /// `host:port` form used in log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix("DB").source(Some(map))
    }

    #[test]
    fn test_defaults_applied() {
        let cfg =
            DatabaseConfig::from_environment(env_of(&[("DB_USER", "app"), ("DB_NAME", "music")]))
                .unwrap();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.address(), "localhost:5432");
    }

    #[test]
    fn test_explicit_values() {
        let cfg = DatabaseConfig::from_environment(env_of(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "music"),
        ]))
        .unwrap();
        assert_eq!(cfg.address(), "db.internal:6543");
        assert_eq!(cfg.password, "secret");
        assert_eq!(cfg.name, "music");
    }

    #[test]
    fn test_missing_user_is_error() {
        let err = DatabaseConfig::from_environment(env_of(&[("DB_NAME", "music")])).unwrap_err();
        assert!(err.to_string().contains("DB_USER"));
    }

    #[test]
    fn test_empty_name_is_error() {
        let err =
            DatabaseConfig::from_environment(env_of(&[("DB_USER", "app"), ("DB_NAME", "")]))
                .unwrap_err();
        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn test_empty_host_falls_back_to_default() {
        let cfg = DatabaseConfig::from_environment(env_of(&[
            ("DB_HOST", ""),
            ("DB_USER", "app"),
            ("DB_NAME", "music"),
        ]))
        .unwrap();
        assert_eq!(cfg.host, "localhost");
    }
}

// Configuration module entry point
// Manages server configuration, database settings, and shared runtime state

mod database;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use database::DatabaseConfig;
pub use state::AppState;
pub use types::{Config, StorageBackend};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; every key has a default
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("ALBUMS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "albums-server/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("storage.backend", "postgres")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-albums-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.readiness_path, "/readyz");
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("albums-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[storage]\nbackend = \"memory\"\n\n[logging]\naccess_log_format = \"json\""
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.logging.access_log_format, "json");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let mut cfg = Config::load_from("definitely-missing-albums-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}

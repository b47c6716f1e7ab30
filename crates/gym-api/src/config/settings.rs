use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
    /// Daily rolling log files are written here when set
    pub directory: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from("config/settings")
    }

    /// Defaults, then the optional settings file, then `GYM__*` env overrides.
    pub fn load_from(file: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8787)?
            .set_default("database.url", "sqlite://gym.db")?
            .set_default("database.pool_max_size", 5)?
            .set_default("database.pool_timeout_seconds", 5)?
            .set_default("logging.level", "info,gym_api=debug")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("GYM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load_from("config/does-not-exist").unwrap();
        assert_eq!(settings.database.pool_max_size, 5);
        assert_eq!(settings.database.pool_timeout_seconds, 5);
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let settings = Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9000,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                pool_max_size: 1,
                pool_timeout_seconds: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                directory: None,
            },
        };

        let addr = settings.socket_addr().unwrap();
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_loopback());
    }
}

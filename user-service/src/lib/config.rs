use std::env;
use std::path::PathBuf;

use auth::KeySource;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub keys: KeysConfig,
    pub token: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Locations of the PEM encoded RSA key pair.
#[derive(Debug, Deserialize, Clone)]
pub struct KeysConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub lifetime_minutes: i64,
    pub leeway_seconds: u32,
}

impl KeysConfig {
    pub fn private_key(&self) -> KeySource {
        KeySource::File(self.private_key_path.clone())
    }

    pub fn public_key(&self) -> KeySource {
        KeySource::File(self.public_key_path.clone())
    }
}

impl TokenConfig {
    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lifetime_minutes)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, KEYS__PRIVATE_KEY_PATH, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("token.lifetime_minutes", auth::DEFAULT_TOKEN_LIFETIME_MINUTES)?
            .set_default("token.leeway_seconds", 0)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: KEYS__PRIVATE_KEY_PATH=/etc/keys/app.rsa overrides keys.private_key_path
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

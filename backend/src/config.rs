//! Application configuration
//!
//! Settings are layered: coded defaults, then an optional per-environment
//! TOML file under `config/`, then `STM`-prefixed environment variables
//! (double underscore as the section separator, e.g. `STM__DATABASE__URL`).
//! Secrets are expected to arrive through the environment layer.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Active environment name (development, production)
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Document-understanding service used for invoice import
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret used to validate bearer tokens
    pub secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Base URL of the document-understanding API
    pub api_endpoint: String,
    pub api_key: String,
    /// Model identifier sent with every extraction request
    pub model: String,
}

impl Config {
    /// Build the layered configuration for the current environment
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("STM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("extraction.model", "gemini-2.5-flash")?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("STM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

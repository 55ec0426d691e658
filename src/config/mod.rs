use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("auth requires AUTH_METADATA_URL or AUTH_SHARED_SECRET")]
    NoVerifierSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Identity-provider trust settings. Values only; the provider itself stays
/// an external collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    /// OIDC discovery document URL; signing keys are fetched from its jwks_uri.
    pub metadata_url: Option<String>,
    /// HS256 shared secret for development and tests, used when no metadata
    /// URL is configured.
    pub shared_secret: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Build the configuration from the process environment. Deployments
    /// construct this once in `main` and pass it down; there is no global
    /// config instance.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("CATALOG_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        // Allow tests or deployments to override port via env
        let port = match env::var("CATALOG_PORT").or_else(|_| env::var("PORT")) {
            Ok(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "CATALOG_PORT",
                value: v,
            })?,
            Err(_) => 8080,
        };

        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10)?;
        let connect_timeout_secs = parse_or("DATABASE_CONNECT_TIMEOUT_SECS", 30)?;

        let issuer = env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;
        let audience =
            env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;
        let metadata_url = env::var("AUTH_METADATA_URL").ok();
        let shared_secret = env::var("AUTH_SHARED_SECRET").ok();
        if metadata_url.is_none() && shared_secret.is_none() {
            return Err(ConfigError::NoVerifierSource);
        }

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
                connect_timeout_secs,
            },
            auth: AuthConfig {
                issuer,
                audience,
                metadata_url,
                shared_secret,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        Err(_) => Ok(default),
    }
}

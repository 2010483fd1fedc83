//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use curio_core::{ReactionCardinality, ReactionKeyScheme, ReactionPolicy};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub reactions: ReactionConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Row store connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// How the current actor is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Random token persisted on the client
    #[default]
    Anonymous,
    /// Signed-in account from the auth provider
    Account,
}

/// Identity settings
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub mode: IdentityMode,
    /// File backing the client key/value store
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// Key the anonymous token is stored under
    #[serde(default = "default_token_key")]
    pub token_key: String,
    /// Secret the auth provider signs access tokens with (account mode)
    pub jwt_secret: Option<String>,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
}

/// Reaction policy settings
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct ReactionConfig {
    #[serde(default)]
    pub cardinality: ReactionCardinality,
    #[serde(default)]
    pub key_scheme: ReactionKeyScheme,
}

impl ReactionConfig {
    #[must_use]
    pub fn policy(&self) -> ReactionPolicy {
        ReactionPolicy::new(self.cardinality, self.key_scheme)
    }
}

// Default value functions
fn default_app_name() -> String {
    "curio".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    1
}

fn default_token_path() -> PathBuf {
    PathBuf::from("./.curio/client-storage.json")
}

fn default_token_key() -> String {
    "curio_user_identifier".to_string()
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let identity_mode = match lookup("IDENTITY_MODE") {
            None => IdentityMode::default(),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "anonymous" => IdentityMode::Anonymous,
                "account" => IdentityMode::Account,
                _ => return Err(ConfigError::InvalidValue("IDENTITY_MODE", value)),
            },
        };

        let jwt_secret = lookup("AUTH_JWT_SECRET").filter(|s| !s.is_empty());
        if identity_mode == IdentityMode::Account && jwt_secret.is_none() {
            return Err(ConfigError::MissingVar("AUTH_JWT_SECRET"));
        }

        let cardinality = match lookup("REACTION_CARDINALITY") {
            None => ReactionCardinality::default(),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REACTION_CARDINALITY", value))?,
        };

        let key_scheme = match lookup("REACTION_KEY_SCHEME") {
            None => ReactionKeyScheme::default(),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REACTION_KEY_SCHEME", value))?,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            identity: IdentityConfig {
                mode: identity_mode,
                token_path: lookup("IDENTITY_TOKEN_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_token_path),
                token_key: lookup("IDENTITY_TOKEN_KEY").unwrap_or_else(default_token_key),
                jwt_secret,
                jwt_audience: lookup("AUTH_JWT_AUDIENCE").unwrap_or_else(default_jwt_audience),
            },
            reactions: ReactionConfig {
                cardinality,
                key_scheme,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

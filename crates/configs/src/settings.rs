use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "PETHUB";
pub const DEFAULT_CONFIG_FILE: &str = "config/pethub.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    pub request_body_limit_bytes: usize,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct MailSettings {
    pub from: String,
    /// HTTP relay endpoint; mail is only logged when unset.
    pub relay_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub root: PathBuf,
    pub url_prefix: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

/// Administrator created at startup by the in-memory backend, which has
/// no seed step. Both credentials or neither.
#[derive(Debug, Deserialize)]
pub struct BootstrapSettings {
    pub admin_name: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<SecretString>,
}

impl BootstrapSettings {
    pub fn admin_credentials(&self) -> Option<(&str, &SecretString)> {
        self.admin_email.as_deref().zip(self.admin_password.as_ref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub mail: MailSettings,
    pub media: MediaSettings,
    pub log: LogSettings,
    pub bootstrap: BootstrapSettings,
}

impl Settings {
    /// Loads `.env`, then reads `DEFAULT_CONFIG_FILE` (if present) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_sources(Some(Path::new(DEFAULT_CONFIG_FILE)), std::env::vars().collect())
    }

    /// Builds settings from an optional file and an explicit environment map.
    pub fn from_sources(
        file: Option<&Path>,
        env: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.request_body_limit_bytes", 4 * 1024 * 1024)?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("mail.from", "no-reply@pethub.local")?
            .set_default("mail.timeout_ms", 5000)?
            .set_default("media.root", "./data/uploads")?
            .set_default("media.url_prefix", "uploads")?
            .set_default("media.max_upload_bytes", 2 * 1024 * 1024)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("bootstrap.admin_name", "PetHub Admin")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.into_iter().collect())),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Invalid(
                "database.url is required for the postgres backend".into(),
            ));
        }
        if self.bootstrap.admin_email.is_some() != self.bootstrap.admin_password.is_some() {
            return Err(ConfigError::Invalid(
                "bootstrap.admin_email and bootstrap.admin_password go together".into(),
            ));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_hours must be positive".into(),
            ));
        }
        Ok(())
    }
}

//! # configs
//!
//! Layered settings: built-in defaults, then an optional TOML file, then
//! `PETHUB__SECTION__KEY` environment variables (after `.env` is loaded).

mod settings;

pub use settings::{
    AuthSettings, BootstrapSettings, ConfigError, DatabaseSettings, LogFormat, LogSettings, MailSettings,
    MediaSettings, ServerSettings, Settings, StorageBackend, DEFAULT_CONFIG_FILE, ENV_PREFIX,
};

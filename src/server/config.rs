//! Configuration management for the RAX notes server
//!
//! Values come from built-in defaults, then an optional `config.toml`, then
//! environment variables prefixed with `RAX_NOTES_` (for example
//! `RAX_NOTES_NOTES_ROOT`). The note size ceiling is fixed and not configurable.

use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use std::path::PathBuf;

use crate::storage::SanitizerOptions;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Directory holding the notes. Must already exist.
    pub notes_root: String,

    /// Hide and refuse dotfiles
    pub hide_dotfiles: bool,

    /// Allow a dotfile as the final segment of a directly addressed note
    pub hidden_leaf_addressable: bool,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Packaged path first, then the development path
        Self::load_from(vec![
            File::with_name("rax-notes/config").required(false),
            File::with_name("config").required(false),
        ])
    }

    /// Load configuration from the given file sources, then the environment.
    pub fn load_from<S>(sources: Vec<S>) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut builder = Config::builder()
            .set_default("bind_address", "localhost")?
            .set_default("port", 8080)?
            .set_default("notes_root", "./notes")?
            .set_default("hide_dotfiles", true)?
            .set_default("hidden_leaf_addressable", false)?;

        for source in sources {
            builder = builder.add_source(source);
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_NOTES").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.notes_root.is_empty() {
            return Err(ConfigError::Message("notes_root cannot be empty".into()));
        }

        Ok(())
    }

    /// Get bind address and port as a listener address
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get notes root as PathBuf
    pub fn notes_root_path(&self) -> PathBuf {
        PathBuf::from(&self.notes_root)
    }

    /// Sanitizer options derived from this configuration
    pub fn sanitizer_options(&self) -> SanitizerOptions {
        SanitizerOptions {
            hide_dotfiles: self.hide_dotfiles,
            hidden_leaf_addressable: self.hidden_leaf_addressable,
            ..SanitizerOptions::default()
        }
    }
}

//! Configuration file loading for the chess CLI.
//!
//! Settings come from an optional TOML file, `chess.toml` in the current
//! directory by default. Every field has a default, so a missing file or an
//! empty one is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// CLI settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name recorded for the white player. Defaults to "White".
    #[serde(default = "default_white_player")]
    pub white_player: String,
    /// Name recorded for the black player. Defaults to "Black".
    #[serde(default = "default_black_player")]
    pub black_player: String,
    /// `tracing` filter directive, used unless `RUST_LOG` is set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Print the board after every accepted command.
    #[serde(default = "default_show_board")]
    pub show_board: bool,
}

fn default_white_player() -> String {
    "White".to_string()
}

fn default_black_player() -> String {
    "Black".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_show_board() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            white_player: default_white_player(),
            black_player: default_black_player(),
            log_filter: default_log_filter(),
            show_board: default_show_board(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, or the defaults if there is no
    /// file there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

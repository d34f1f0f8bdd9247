//! Engine configuration.
//!
//! Settings are read from a TOML file (`chesslens.toml` by convention). Every
//! field has a default, so an absent file or an empty table both yield a
//! working configuration.

use chesslens_core::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The file parsed but holds a value the engine cannot use.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Switches for the optional tactical detectors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TacticsConfig {
    /// Report pins whose pinned piece is a pawn.
    pub include_pawn_pins: bool,
    pub detect_forks: bool,
    pub detect_pawn_structure: bool,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        TacticsConfig {
            include_pawn_pins: true,
            detect_forks: true,
            detect_pawn_structure: true,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of retained history entries, the initial position
    /// included. Defaults to 50.
    pub history_limit: usize,
    /// Piece a pawn becomes when a move request reaching the back rank
    /// names no promotion. Defaults to queen.
    pub default_promotion: PieceKind,
    pub tactics: TacticsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            history_limit: 50,
            default_promotion: PieceKind::Queen,
            tactics: TacticsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed TOML and
    /// [`ConfigError::Invalid`] for values that parse but cannot be used.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, plus the
    /// errors of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Like [`Self::load`], but returns the defaults when the file does not
    /// exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Conventional location: `chesslens.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chesslens.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if !self.default_promotion.is_promotable() {
            return Err(ConfigError::Invalid(format!(
                "default_promotion cannot be {}",
                self.default_promotion
            )));
        }
        Ok(())
    }
}

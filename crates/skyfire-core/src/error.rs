//! Error types for the simulation.
//!
//! Nothing here crosses a tick boundary: spawn-time errors are logged and the
//! spawn skipped, asset errors end the session before it starts.

use std::fmt;

/// Top-level error enum for the SKYFIRE simulation.
#[derive(Debug)]
pub enum SimError {
    /// An enemy archetype name did not match any known archetype.
    UnknownEnemy(String),

    /// A ship name did not match any known ship type.
    UnknownShip(String),

    /// A power-up name did not match any known effect.
    UnknownPowerUp(String),

    /// A sprite sheet required by the simulation is missing or unusable.
    AssetLoad {
        /// Sprite key that failed.
        key: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration value is outside its usable range.
    InvalidConfig {
        /// Dotted path of the field (for logging).
        field: &'static str,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The configuration file could not be read.
    ConfigIo(std::io::Error),

    /// The configuration file is not valid TOML for `GameConfig`.
    ConfigParse(toml::de::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownEnemy(name) => write!(f, "unknown enemy archetype '{}'", name),
            SimError::UnknownShip(name) => write!(f, "unknown ship type '{}'", name),
            SimError::UnknownPowerUp(name) => write!(f, "unknown power-up '{}'", name),
            SimError::AssetLoad { key, reason } => {
                write!(f, "failed to load sprite '{}': {}", key, reason)
            }
            SimError::InvalidConfig { field, expected } => {
                write!(f, "config field '{}' must be {}", field, expected)
            }
            SimError::ConfigIo(err) => write!(f, "failed to read config: {}", err),
            SimError::ConfigParse(err) => write!(f, "failed to parse config: {}", err),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigIo(err) => Some(err),
            SimError::ConfigParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::ConfigIo(err)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::ConfigParse(err)
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

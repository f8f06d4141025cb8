//! Error types.
//!
//! `ConfigError` covers everything that can be wrong with a scenario before
//! it runs. `StateError` describes why a body was frozen during a run; it
//! is reported, never propagated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("body #{index}: {reason}")]
    InvalidBody { index: usize, reason: String },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("net force is not finite")]
    NonFiniteForce,

    #[error("velocity became non-finite")]
    NonFiniteVelocity,

    #[error("position became non-finite")]
    NonFinitePosition,
}

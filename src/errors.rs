// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Graph construction reports [`LeoError::NodeNotFound`] and
//! [`LeoError::CycleDetected`]; a graph run reports at most one
//! [`LeoError::TaskFailure`]. The remaining variants belong to the config
//! and CLI layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeoError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Cycle detected: edge '{from}' -> '{to}' would close a cycle")]
    CycleDetected { from: String, to: String },

    #[error("error executing node {node}: {source}")]
    TaskFailure {
        node: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LeoError {
    /// Name of the node a [`LeoError::TaskFailure`] refers to.
    pub fn failed_node(&self) -> Option<&str> {
        match self {
            LeoError::TaskFailure { node, .. } => Some(node.as_str()),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LeoError>;

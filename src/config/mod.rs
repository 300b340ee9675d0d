// src/config/mod.rs

//! TOML graph definitions.
//!
//! - [`model`]: serde types (`[config]`, `[task.<name>]`).
//! - [`loader`]: read + deserialize, then validate.
//! - [`validate`]: `TryFrom<RawConfigFile> for ConfigFile`.
//! - [`build`]: config → [`crate::dag::Graph`].

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use build::build_graph;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};

// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Graph definition as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// runs = 3
///
/// [task.A]
/// cmd = "echo A"
///
/// [task.B]
/// cmd = "echo B"
/// after = ["A"]
/// ```
///
/// Use [`ConfigFile::try_from`] (or [`crate::config::load_and_validate`]) to
/// obtain a validated [`ConfigFile`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated graph definition.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    /// Construct without validation; callers go through `TryFrom<RawConfigFile>`.
    pub(crate) fn new_unchecked(config: ConfigSection, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { config, task }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// How many times the graph is run. Must be at least 1.
    #[serde(default = "default_runs")]
    pub runs: usize,
}

fn default_runs() -> usize {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            runs: default_runs(),
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to run.
    pub cmd: String,

    /// Tasks that must complete before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Tasks that may only start once this one has completed.
    #[serde(default)]
    pub before: Vec<String>,

    /// Disabled tasks are left out of the graph, together with their edges.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

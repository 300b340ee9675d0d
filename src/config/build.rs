// src/config/build.rs

use tracing::{debug, info};

use crate::config::model::ConfigFile;
use crate::dag::Graph;
use crate::errors::Result;
use crate::exec::shell_task;

/// Turn a validated config into a [`Graph`] of shell-command tasks.
///
/// `after = ["X"]` on task `T` is `succeed(T, X)`; `before = ["X"]` is
/// `precede(T, X)`. Edges touching a disabled task are skipped. A reference
/// to a task that does not exist fails with `NodeNotFound`, and an edge that
/// closes a cycle fails with `CycleDetected`.
pub fn build_graph(cfg: &ConfigFile) -> Result<Graph> {
    let mut graph = Graph::new();

    for (name, task) in cfg.task.iter() {
        if !graph.register_if(name.as_str(), shell_task(name.as_str(), task.cmd.as_str()), task.enabled) {
            info!(task = %name, "task disabled; leaving it out of the graph");
        }
    }

    for (name, task) in cfg.task.iter().filter(|(_, t)| t.enabled) {
        for dep in task.after.iter() {
            if is_disabled(cfg, dep) {
                debug!(task = %name, dep = %dep, "skipping `after` edge to disabled task");
                continue;
            }
            graph.succeed(name, dep)?;
        }

        for dependent in task.before.iter() {
            if is_disabled(cfg, dependent) {
                debug!(task = %name, dependent = %dependent, "skipping `before` edge to disabled task");
                continue;
            }
            graph.precede(name, dependent)?;
        }
    }

    Ok(graph)
}

fn is_disabled(cfg: &ConfigFile, name: &str) -> bool {
    cfg.task.get(name).is_some_and(|t| !t.enabled)
}

// src/lib.rs

//! Declare named, fallible tasks, constrain their order with precedence
//! edges, and run the resulting DAG with as much parallelism as the edges
//! allow.
//!
//! ```no_run
//! # async fn demo() -> leo::errors::Result<()> {
//! use leo::{Executor, Graph};
//!
//! let mut graph = Graph::new();
//! graph.register("fetch", || async { Ok(()) });
//! graph.register("parse", || async { Ok(()) });
//! graph.precede("fetch", "parse")?;
//!
//! let executor = Executor::new(graph);
//! executor.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;

use anyhow::{Result, bail};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{build_graph, load_and_validate};

pub use crate::dag::Graph;
pub use crate::errors::LeoError;
pub use crate::exec::{Executor, Task};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - graph construction (edges from `after` / `before`)
/// - the executor, run `runs` times
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = &args.config;
    let cfg = load_and_validate(config_path)?;
    let graph = build_graph(&cfg)?;

    if args.dry_run {
        print_dry_run(&graph);
        return Ok(());
    }
    if args.dot {
        print!("{}", graph.to_dot());
        return Ok(());
    }

    let runs = match args.runs {
        Some(0) => {
            return Err(LeoError::ConfigError("--runs must be >= 1 (got 0)".to_string()).into());
        }
        Some(runs) => runs,
        None => cfg.config.runs,
    };
    let executor = Executor::new(graph);
    info!(runs, config = %config_path.display(), "executing graph");

    let mut failed = 0usize;
    for attempt in 1..=runs {
        match executor.run().await {
            Ok(()) => info!(attempt, "all tasks executed successfully"),
            Err(err) => {
                failed += 1;
                error!(attempt, error = %err, "graph run failed");
            }
        }
    }

    // Units of a failed run may still be running; let them finish before exit.
    executor.wait_idle().await;

    if failed > 0 {
        bail!("{failed} of {runs} graph runs failed");
    }
    Ok(())
}

/// Print every node and its children without running anything.
fn print_dry_run(graph: &Graph) {
    println!("leo dry-run");
    println!("nodes ({}), edges ({}):", graph.len(), graph.edge_count());
    print!("{}", graph.describe());
}

// src/exec/executor.rs

//! Concurrent, dependency-ordered execution of a [`Graph`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::dag::Graph;
use crate::dag::graph::NodeId;
use crate::errors::{LeoError, Result};

/// Outcome of one dispatched unit, reported back to the run coordinator.
struct Completion {
    node: NodeId,
    outcome: anyhow::Result<()>,
}

/// Runs a graph, as often as asked, with one concurrent unit per ready node.
///
/// Each [`run`](Executor::run) derives fresh in-degree counters from the
/// graph's edges, so runs never share scheduling state.
///
/// Units are fire-and-forget once dispatched: when a run returns early
/// because a node failed, units that were already running keep running to
/// completion in the background. Use [`in_flight`](Executor::in_flight) and
/// [`wait_idle`](Executor::wait_idle) to observe them.
pub struct Executor {
    graph: Graph,
    run_counter: AtomicU64,
    /// Units dispatched by any run of this executor that have not finished.
    in_flight: Arc<watch::Sender<usize>>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("graph", &self.graph)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Take ownership of `graph` and rebuild every parent list from the
    /// children edges.
    pub fn new(mut graph: Graph) -> Self {
        graph.rebuild_parents();
        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "executor built from graph"
        );

        let (in_flight, _) = watch::channel(0usize);
        Self {
            graph,
            run_counter: AtomicU64::new(0),
            in_flight: Arc::new(in_flight),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of units, from any run, that are still executing.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every unit dispatched so far has finished, including units
    /// left behind by a run that returned on a failure.
    pub async fn wait_idle(&self) {
        let mut rx = self.in_flight.subscribe();
        // `self` keeps the sender alive, so this only returns once the count is zero.
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Execute the graph once.
    ///
    /// A node never starts before all of its parents completed successfully;
    /// siblings run concurrently in no particular order. Returns the first
    /// [`LeoError::TaskFailure`] observed, as soon as it is observed. Nodes
    /// downstream of a failed node are never started.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run(&self) -> Result<()> {
        let run_id = self.run_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let span = info_span!("graph_run", run_id, nodes = self.graph.len());
        self.coordinate().instrument(span).await
    }

    /// The single owner of this run's in-degree counters. Units only report
    /// completions over the channel; every decrement happens here.
    async fn coordinate(&self) -> Result<()> {
        let nodes = self.graph.nodes();
        let mut in_degree: Vec<usize> = nodes.iter().map(|n| n.parents.len()).collect();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut pending = 0usize;

        for (idx, remaining) in in_degree.iter().enumerate() {
            if *remaining == 0 {
                self.dispatch(NodeId(idx), &done_tx);
                pending += 1;
            }
        }
        info!(roots = pending, "graph run started");

        while pending > 0 {
            let Some(Completion { node, outcome }) = done_rx.recv().await else {
                return Err(LeoError::Other(anyhow!(
                    "completion channel closed with {pending} units outstanding"
                )));
            };
            pending -= 1;

            let finished = &nodes[node.0];
            if let Err(source) = outcome {
                warn!(node = %finished.name, error = %source, "node failed; ending run");
                return Err(LeoError::TaskFailure {
                    node: finished.name.clone(),
                    source,
                });
            }

            debug!(node = %finished.name, "node completed");
            for child in &finished.children {
                let remaining = &mut in_degree[child.0];
                *remaining -= 1;
                if *remaining == 0 {
                    self.dispatch(*child, &done_tx);
                    pending += 1;
                }
            }
        }

        info!("graph run completed");
        Ok(())
    }

    /// Spawn the unit for one ready node.
    fn dispatch(&self, id: NodeId, done_tx: &mpsc::UnboundedSender<Completion>) {
        let node = &self.graph.nodes()[id.0];
        let task = node.task.clone();
        let done_tx = done_tx.clone();
        let guard = InFlightGuard::enter(&self.in_flight);

        debug!(node = %node.name, "dispatching node");
        let span = info_span!("node", name = %node.name);

        tokio::spawn(
            async move {
                let _guard = guard;

                // Own task for the operation: a panic comes back as a JoinError.
                let outcome = match tokio::spawn(async move { task.invoke().await }.in_current_span()).await {
                    Ok(outcome) => outcome,
                    Err(err) if err.is_panic() => Err(anyhow!("task panicked")),
                    Err(err) => Err(anyhow!("task did not complete: {err}")),
                };

                // The receiver is gone once the run has returned.
                if done_tx.send(Completion { node: id, outcome }).is_err() {
                    debug!("run already finished; completion discarded");
                }
            }
            .instrument(span),
        );
    }
}

/// Counts one unit as in flight for as long as it is alive.
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl InFlightGuard {
    fn enter(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|count| *count += 1);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count -= 1);
    }
}

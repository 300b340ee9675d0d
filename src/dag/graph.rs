// src/dag/graph.rs

use std::collections::HashMap;

use tracing::debug;

use crate::dag::cycle::has_cycle;
use crate::errors::{LeoError, Result};
use crate::exec::Task;

/// Position of a node inside its owning [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// Internal node structure: the task plus its immediate adjacency.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) task: Task,
    /// Nodes that may only start after this one completed (edges out).
    pub(crate) children: Vec<NodeId>,
    /// Nodes pointing at this one. Derived from `children`, see
    /// [`Graph::rebuild_parents`].
    pub(crate) parents: Vec<NodeId>,
}

/// Named tasks plus the precedence edges between them.
///
/// The edge set is acyclic at all times: every insertion re-checks the whole
/// graph and is rolled back if it closes a cycle. Nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes in registration order; a [`NodeId`] indexes this vector.
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asynchronous operation under `name`.
    ///
    /// Returns `false` (and changes nothing) if `name` is already taken.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_task(name, Task::from_async(f))
    }

    /// Register a synchronous operation under `name`. See [`Task::blocking`].
    pub fn register_blocking<F>(&mut self, name: impl Into<String>, f: F) -> bool
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_task(name, Task::blocking(f))
    }

    /// Register a prepared [`Task`] under `name`.
    ///
    /// Re-registering an existing name is a silent no-op: the original task
    /// and all edges touching it are kept.
    pub fn register_task(&mut self, name: impl Into<String>, task: Task) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            debug!(node = %name, "node already registered; keeping the original task");
            return false;
        }

        let id = NodeId(self.nodes.len());
        self.index.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            task,
            children: Vec::new(),
            parents: Vec::new(),
        });
        true
    }

    /// Register `task` only when `condition` holds.
    pub fn register_if(&mut self, name: impl Into<String>, task: Task, condition: bool) -> bool {
        condition && self.register_task(name, task)
    }

    /// Declare that `from` must complete before `to` may start.
    ///
    /// Fails with [`LeoError::NodeNotFound`] if either name is unknown, and
    /// with [`LeoError::CycleDetected`] if the edge would close a cycle. In
    /// both cases the edge set is left exactly as it was.
    pub fn precede(&mut self, from: &str, to: &str) -> Result<()> {
        let from_id = self.lookup(from)?;
        let to_id = self.lookup(to)?;

        self.nodes[from_id.0].children.push(to_id);
        self.nodes[to_id.0].parents.push(from_id);

        if has_cycle(&self.nodes) {
            self.nodes[from_id.0].children.pop();
            self.nodes[to_id.0].parents.pop();
            debug!(from, to, "edge rejected; it would close a cycle");
            return Err(LeoError::CycleDetected {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        debug!(from, to, "edge added");
        Ok(())
    }

    /// `to` succeeds `from`: the same edge as `precede(to, from)`.
    pub fn succeed(&mut self, from: &str, to: &str) -> Result<()> {
        self.precede(to, from)
    }

    /// Recompute every node's parent list from the children lists.
    pub(crate) fn rebuild_parents(&mut self) {
        for node in self.nodes.iter_mut() {
            node.parents.clear();
        }

        let edges: Vec<(NodeId, NodeId)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(idx, node)| node.children.iter().map(move |child| (NodeId(idx), *child)))
            .collect();

        for (parent, child) in edges {
            self.nodes[child.0].parents.push(parent);
        }
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn lookup(&self, name: &str) -> Result<NodeId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| LeoError::NodeNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of precedence edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// All node names, in registration order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    /// Immediate children of `name` (nodes it precedes), in insertion order.
    pub fn children_of(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.index.get(name)?;
        Some(self.names_of(&self.nodes[id.0].children))
    }

    /// Immediate parents of `name` (nodes that precede it).
    pub fn parents_of(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.index.get(name)?;
        Some(self.names_of(&self.nodes[id.0].parents))
    }

    /// Every edge as a `(from, to)` pair, node by node in registration order.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.children
                    .iter()
                    .map(move |child| (node.name.clone(), self.nodes[child.0].name.clone()))
            })
            .collect()
    }

    fn names_of(&self, ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|id| self.nodes[id.0].name.as_str()).collect()
    }
}

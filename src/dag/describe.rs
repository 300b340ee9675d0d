// src/dag/describe.rs

//! Diagnostic renderings of a [`Graph`]. Nothing here is used by the executor.

use std::fmt;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dag::Graph;

impl Graph {
    /// One line per node, `name -> child, child`, in registration order.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Render the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let nodes = self.nodes();
        let mut graph: DiGraph<&str, &str> = DiGraph::with_capacity(nodes.len(), self.edge_count());

        let indices: Vec<NodeIndex> = nodes
            .iter()
            .map(|node| graph.add_node(node.name.as_str()))
            .collect();

        for (idx, node) in nodes.iter().enumerate() {
            for child in &node.children {
                graph.add_edge(indices[idx], indices[child.0], "");
            }
        }

        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.node_names() {
            write!(f, "{name} ->")?;
            let children = self.children_of(name).unwrap_or_default();
            if !children.is_empty() {
                write!(f, " {}", children.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

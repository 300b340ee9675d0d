// src/dag/mod.rs

//! Task graph representation.
//!
//! - [`graph`] holds the named nodes and their precedence edges, and rejects
//!   any edge that would make the graph cyclic.
//! - [`cycle`] is the depth-first cycle check run on every insertion.
//! - [`describe`] renders a graph for humans (plain listing, Graphviz DOT).

pub mod cycle;
pub mod describe;
pub mod graph;

pub use graph::Graph;

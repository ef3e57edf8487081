//! The in-process graph store and spreading activation
//!: a typed multigraph over memory-unit ids kept
//! separate from the durable SQLite-backed `EntityLink`/`Edge` tables, fed
//! by ingest and read by the graph and temporal retrieval strategies.

pub mod activation;
pub mod manager;

pub use activation::{spread, ActivatedNode, ActivationParams};
pub use manager::{GraphManager, IndexedGraph, Neighbor};

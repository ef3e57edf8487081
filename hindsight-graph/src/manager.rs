//! `GraphManager`: an `Arc<RwLock<..>>`-wrapped typed multigraph over
//! memory-unit ids. There is **no DAG enforcement**: the edge model allows
//! cycles (A->B->C->A via shared entities).

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use hindsight_core::errors::GraphError;
use hindsight_core::{CausalKind, Edge, LinkType};

/// The indexed graph: node weights are memory-unit ids, edge weights are
/// full `Edge` records (so weight/link_type/causal_kind survive a lookup).
#[derive(Default)]
pub struct IndexedGraph {
    graph: StableDiGraph<String, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    fn ensure_node(&mut self, unit_id: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(unit_id) {
            return *idx;
        }
        let idx = self.graph.add_node(unit_id.to_string());
        self.index.insert(unit_id.to_string(), idx);
        idx
    }

    fn node(&self, unit_id: &str) -> Option<NodeIndex> {
        self.index.get(unit_id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// A neighbour discovered via `neighbors`.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub dst: String,
    pub link_type: LinkType,
    pub weight: f64,
    pub causal_kind: Option<CausalKind>,
}

impl Neighbor {
    /// Mirrors `Edge::boost`.
    pub fn boost(&self) -> f64 {
        match (self.link_type, self.causal_kind) {
            (LinkType::Causal, Some(kind)) => kind.boost(),
            _ => 1.0,
        }
    }

    /// Mirrors `Edge::effective_weight`.
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.boost()
    }
}

/// Thread-safe wrapper around `IndexedGraph`.
pub struct GraphManager {
    inner: Arc<RwLock<IndexedGraph>>,
}

impl GraphManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexedGraph::default())),
        }
    }

    /// Add an edge. Both endpoints are created as nodes if absent; the
    /// caller is responsible for ensuring the memory units themselves are
    /// already persisted, the graph only needs node identities to hang
    /// edges off.
    ///
    /// Bidirectional link types (entity, semantic) are stored as a
    /// symmetric pair of directed edges.
    pub fn add_edge(&self, edge: Edge) -> Result<(), GraphError> {
        let mut g = self.write()?;
        let src_idx = g.ensure_node(&edge.src);
        let dst_idx = g.ensure_node(&edge.dst);
        let reverse = edge.is_bidirectional();
        g.graph.add_edge(src_idx, dst_idx, edge.clone());
        if reverse {
            let mirrored = Edge {
                src: edge.dst.clone(),
                dst: edge.src.clone(),
                link_type: edge.link_type,
                weight: edge.weight,
                causal_kind: edge.causal_kind,
            };
            g.graph.add_edge(dst_idx, src_idx, mirrored);
        }
        Ok(())
    }

    /// Insert a single directed edge exactly as given, with no
    /// bidirectional auto-mirroring. Used to replay edges already read back
    /// from durable storage, where both directions of a bidirectional link
    /// are already separate rows — mirroring them again here would leave
    /// parallel duplicate edges in the graph.
    pub fn load_edge(&self, edge: Edge) -> Result<(), GraphError> {
        let mut g = self.write()?;
        let src_idx = g.ensure_node(&edge.src);
        let dst_idx = g.ensure_node(&edge.dst);
        g.graph.add_edge(src_idx, dst_idx, edge);
        Ok(())
    }

    /// All outgoing edges from `unit_id`, optionally filtered by link
    /// type.
    pub fn neighbors(
        &self,
        unit_id: &str,
        link_types: Option<&[LinkType]>,
    ) -> Result<Vec<Neighbor>, GraphError> {
        let g = self.read()?;
        let Some(idx) = g.node(unit_id) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for edge_ref in g.graph.edges_directed(idx, Direction::Outgoing) {
            let edge = edge_ref.weight();
            if let Some(types) = link_types {
                if !types.contains(&edge.link_type) {
                    continue;
                }
            }
            out.push(Neighbor {
                dst: edge.dst.clone(),
                link_type: edge.link_type,
                weight: edge.weight,
                causal_kind: edge.causal_kind,
            });
        }
        Ok(out)
    }

    /// Remove every edge touching `unit_id` (both directions), used when a
    /// memory unit is deleted: deleting either endpoint deletes the edge.
    pub fn remove_edges_for(&self, unit_id: &str) -> Result<usize, GraphError> {
        let mut g = self.write()?;
        let Some(idx) = g.node(unit_id) else {
            return Ok(0);
        };
        let edge_ids: Vec<_> = g
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(g.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        let removed = edge_ids.len();
        for id in edge_ids {
            g.graph.remove_edge(id);
        }
        g.graph.remove_node(idx);
        g.index.remove(unit_id);
        Ok(removed)
    }

    pub fn node_count(&self) -> Result<usize, GraphError> {
        Ok(self.read()?.node_count())
    }

    pub fn edge_count(&self) -> Result<usize, GraphError> {
        Ok(self.read()?.edge_count())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexedGraph>, GraphError> {
        self.inner
            .read()
            .map_err(|e| GraphError::Concurrency(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexedGraph>, GraphError> {
        self.inner
            .write()
            .map_err(|e| GraphError::Concurrency(e.to_string()))
    }
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GraphManager {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

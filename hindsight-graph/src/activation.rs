//! Spreading activation over the typed multigraph. Shared by the plain graph strategy and the restricted,
//! time-windowed pass the temporal strategy runs on its own seed set.
//!
//! Cycles (A->B->C->A via shared entities) are handled naturally by
//! tracking accumulated activation per node rather than a visited/
//! unvisited boolean: a node keeps summing
//! arriving contributions from every edge until it is popped off the
//! frontier and its own outgoing edges are expanded, at which point its
//! activation is locked in for the result.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::manager::GraphManager;

#[derive(Debug, Clone, Copy)]
pub struct ActivationParams {
    pub max_hops: u32,
    pub decay: f64,
    /// Max number of nodes the pass may finalise.
    pub budget: usize,
    /// Priority-queue floor below which spreading stops.
    pub min_activation: f64,
}

#[derive(Debug, Clone)]
pub struct ActivatedNode {
    pub id: String,
    pub activation: f64,
    pub hop: u32,
}

/// Priority-queue entry. `activation` is a snapshot taken when pushed;
/// popped entries are checked against the live accumulator and discarded
/// if stale (the node received more activation since this entry was
/// pushed — lazy decrease-key).
struct Entry {
    id: String,
    activation: f64,
    hop: u32,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.activation == other.activation && self.hop == other.hop && self.id == other.id
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// Higher activation first; ties broken by lower hop, then
    /// lexicographically smaller id — the same order the final result
    /// uses, so pop order and output order agree.
    fn cmp(&self, other: &Self) -> Ordering {
        self.activation
            .total_cmp(&other.activation)
            .then_with(|| other.hop.cmp(&self.hop))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Run spreading activation starting from `seeds` (initial activation =
/// similarity, hop 0). `retain` gates which neighbours may receive
/// activation at all — the graph strategy passes `|_| true`; the temporal
/// strategy passes a closure checking the broadened-interval overlap.
pub fn spread(
    graph: &GraphManager,
    seeds: &[(String, f64)],
    params: ActivationParams,
    retain: impl Fn(&str) -> bool,
) -> Vec<ActivatedNode> {
    let mut accumulated: HashMap<String, f64> = HashMap::new();
    let mut hop_of: HashMap<String, u32> = HashMap::new();
    let mut finalized: HashSet<String> = HashSet::new();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();

    for (id, similarity) in seeds {
        accumulated.insert(id.clone(), *similarity);
        hop_of.insert(id.clone(), 0);
        heap.push(Entry {
            id: id.clone(),
            activation: *similarity,
            hop: 0,
        });
    }

    let mut result = Vec::new();

    while let Some(entry) = heap.pop() {
        if finalized.contains(&entry.id) {
            continue;
        }
        let current = *accumulated.get(&entry.id).unwrap_or(&0.0);
        if (entry.activation - current).abs() > f64::EPSILON {
            // Stale entry: the node's accumulator moved since this was
            // pushed. Skip; the up-to-date entry is (or will be) in the
            // heap too.
            continue;
        }
        if current < params.min_activation {
            break;
        }
        if result.len() >= params.budget {
            break;
        }

        finalized.insert(entry.id.clone());
        result.push(ActivatedNode {
            id: entry.id.clone(),
            activation: current,
            hop: entry.hop,
        });

        if entry.hop >= params.max_hops {
            continue;
        }

        let neighbors = match graph.neighbors(&entry.id, None) {
            Ok(n) => n,
            Err(_) => continue,
        };
        for neighbor in neighbors {
            if finalized.contains(&neighbor.dst) {
                continue;
            }
            if !retain(&neighbor.dst) {
                continue;
            }
            let boost = neighbor.boost();
            let contribution = current * params.decay * neighbor.effective_weight();
            // Open Question #3: clamp each edge's own
            // contribution at its boost value, not the final summed
            // activation.
            let clamped = contribution.min(boost);

            let next_hop = entry.hop + 1;
            let existing_hop = hop_of.get(&neighbor.dst).copied();
            let new_hop = match existing_hop {
                Some(h) => h.min(next_hop),
                None => next_hop,
            };
            hop_of.insert(neighbor.dst.clone(), new_hop);

            let updated = accumulated.get(&neighbor.dst).copied().unwrap_or(0.0) + clamped;
            accumulated.insert(neighbor.dst.clone(), updated);
            heap.push(Entry {
                id: neighbor.dst.clone(),
                activation: updated,
                hop: new_hop,
            });
        }
    }

    // Final ranking: activation descending, ties
    // by hop ascending, then id lexicographically.
    result.sort_by(|a, b| {
        b.activation
            .total_cmp(&a.activation)
            .then_with(|| a.hop.cmp(&b.hop))
            .then_with(|| a.id.cmp(&b.id))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::{CausalKind, Edge, LinkType};

    fn params() -> ActivationParams {
        ActivationParams {
            max_hops: 5,
            decay: 0.8,
            budget: 100,
            min_activation: 0.05,
        }
    }

    #[test]
    fn seeds_are_included_in_result() {
        let g = GraphManager::new();
        let result = spread(&g, &[("a".into(), 0.9)], params(), |_| true);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a");
        assert_eq!(result[0].hop, 0);
    }

    #[test]
    fn activation_propagates_with_decay() {
        let g = GraphManager::new();
        g.add_edge(Edge::new("a".into(), "b".into(), LinkType::Semantic, 0.8, None).unwrap())
            .unwrap();
        let result = spread(&g, &[("a".into(), 1.0)], params(), |_| true);
        let b = result.iter().find(|n| n.id == "b").unwrap();
        // contribution = 1.0 * 0.8 (decay) * 0.8 (weight) = 0.64
        assert!((b.activation - 0.64).abs() < 1e-9);
        assert_eq!(b.hop, 1);
    }

    #[test]
    fn causal_boost_amplifies_contribution() {
        let g = GraphManager::new();
        g.add_edge(
            Edge::new(
                "a".into(),
                "b".into(),
                LinkType::Causal,
                1.0,
                Some(CausalKind::Causes),
            )
            .unwrap(),
        )
        .unwrap();
        let result = spread(&g, &[("a".into(), 1.0)], params(), |_| true);
        let b = result.iter().find(|n| n.id == "b").unwrap();
        // effective_weight = 1.0 * 2.0 = 2.0; contribution = 1*0.8*2.0=1.6,
        // clamped to the edge's own boost (2.0) -> stays 1.6.
        assert!((b.activation - 1.6).abs() < 1e-9);
    }

    #[test]
    fn terminates_on_cyclic_graph() {
        let g = GraphManager::new();
        g.add_edge(Edge::new("a".into(), "b".into(), LinkType::Entity, 1.0, None).unwrap())
            .unwrap();
        g.add_edge(Edge::new("b".into(), "c".into(), LinkType::Entity, 1.0, None).unwrap())
            .unwrap();
        g.add_edge(Edge::new("c".into(), "a".into(), LinkType::Entity, 1.0, None).unwrap())
            .unwrap();
        let result = spread(&g, &[("a".into(), 1.0)], params(), |_| true);
        assert!(result.len() <= 3);
        assert!(!result.is_empty());
    }

    #[test]
    fn respects_node_budget() {
        let g = GraphManager::new();
        for i in 0..10 {
            g.add_edge(
                Edge::new(format!("n{i}"), format!("n{}", i + 1), LinkType::Entity, 1.0, None)
                    .unwrap(),
            )
            .unwrap();
        }
        let tight = ActivationParams {
            max_hops: 10,
            decay: 0.99,
            budget: 3,
            min_activation: 0.0,
        };
        let result = spread(&g, &[("n0".into(), 1.0)], tight, |_| true);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn retain_predicate_blocks_propagation() {
        let g = GraphManager::new();
        g.add_edge(Edge::new("a".into(), "b".into(), LinkType::Semantic, 0.8, None).unwrap())
            .unwrap();
        let result = spread(&g, &[("a".into(), 1.0)], params(), |id| id != "b");
        assert!(result.iter().all(|n| n.id != "b"));
    }
}

//! Reciprocal Rank Fusion: given K ranked id lists and a
//! constant `k`, a unit's fused score is `sum(1 / (k + rank_i(u)))` over
//! the lists containing it. Absent from a list contributes zero.

use std::collections::HashMap;

/// Fuse `lists` (each a ranked sequence of unit ids, best first) into one
/// ranking. Output is sorted by fused score descending; ties are broken
/// by the best single-list rank, then by id. Stable under
/// permutation of the input lists themselves (summation is commutative).
pub fn fuse(lists: &[Vec<String>], k: u32) -> Vec<(String, f64)> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut best_rank: HashMap<String, usize> = HashMap::new();

    for list in lists {
        for (idx, id) in list.iter().enumerate() {
            let rank = idx + 1;
            *scores.entry(id.clone()).or_insert(0.0) += 1.0 / (k as f64 + rank as f64);
            best_rank
                .entry(id.clone())
                .and_modify(|r| *r = (*r).min(rank))
                .or_insert(rank);
        }
    }

    let mut fused: Vec<(String, f64)> = scores.into_iter().collect();
    fused.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| best_rank[&a.0].cmp(&best_rank[&b.0]))
            .then_with(|| a.0.cmp(&b.0))
    });
    fused
}

//! Cross-encoder reranking step. Fails open:
//! a timeout or model error leaves the RRF ordering untouched and raises
//! the `rerank_unavailable` warning rather than failing the call.

use std::time::Duration;

use hindsight_core::MemoryUnit;
use hindsight_embeddings::{CrossEncoderReranker, RerankCandidate};

pub struct RerankOutcome {
    /// Units re-sorted by cross-encoder score descending, or left in their
    /// incoming (RRF) order if reranking was unavailable.
    pub ranked: Vec<(MemoryUnit, f64)>,
    pub unavailable: bool,
}

/// `ranked` arrives in RRF order, paired with its RRF score as the
/// fallback weight if reranking fails.
pub async fn rerank(
    reranker: &dyn CrossEncoderReranker,
    query: &str,
    ranked: Vec<(MemoryUnit, f64)>,
    deadline: Duration,
) -> RerankOutcome {
    if ranked.is_empty() {
        return RerankOutcome { ranked, unavailable: false };
    }

    let candidates: Vec<RerankCandidate> = ranked
        .iter()
        .map(|(unit, _)| RerankCandidate {
            text: unit.text.clone(),
            occurred_start: unit.occurred_start,
            occurred_end: unit.occurred_end,
        })
        .collect();

    match tokio::time::timeout(deadline, reranker.score(query, &candidates)).await {
        Ok(Ok(scores)) if scores.len() == ranked.len() => {
            let mut combined: Vec<(MemoryUnit, f64)> = ranked
                .into_iter()
                .zip(scores)
                .map(|((unit, _), score)| (unit, score as f64))
                .collect();
            combined.sort_by(|a, b| b.1.total_cmp(&a.1));
            RerankOutcome { ranked: combined, unavailable: false }
        }
        _ => RerankOutcome { ranked, unavailable: true },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hindsight_core::errors::EmbeddingError;
    use hindsight_core::{BankId, FactType, EMBEDDING_DIM};

    struct AlwaysFailsReranker;
    #[async_trait]
    impl CrossEncoderReranker for AlwaysFailsReranker {
        async fn score(&self, _query: &str, _candidates: &[RerankCandidate]) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Inference("no model loaded".into()))
        }
    }

    struct SlowReranker;
    #[async_trait]
    impl CrossEncoderReranker for SlowReranker {
        async fn score(&self, _query: &str, candidates: &[RerankCandidate]) -> Result<Vec<f32>, EmbeddingError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec![0.0; candidates.len()])
        }
    }

    fn unit(id: &str, text: &str) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new("b1"),
            text.into(),
            vec![0.1; EMBEDDING_DIM],
            None,
            None,
            chrono::Utc::now(),
            None,
            FactType::World,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failure_leaves_rrf_order_and_sets_unavailable() {
        let reranker = AlwaysFailsReranker;
        let ranked = vec![(unit("a", "first"), 0.9), (unit("b", "second"), 0.5)];
        let outcome = rerank(&reranker, "query", ranked, Duration::from_millis(800)).await;
        assert!(outcome.unavailable);
        assert_eq!(outcome.ranked[0].0.id, "a");
    }

    #[tokio::test]
    async fn timeout_leaves_rrf_order_and_sets_unavailable() {
        let reranker = SlowReranker;
        let ranked = vec![(unit("a", "first"), 0.9), (unit("b", "second"), 0.5)];
        let outcome = rerank(&reranker, "query", ranked, Duration::from_millis(5)).await;
        assert!(outcome.unavailable);
        assert_eq!(outcome.ranked[0].0.id, "a");
    }

    #[tokio::test]
    async fn empty_input_is_not_a_failure() {
        let reranker = AlwaysFailsReranker;
        let outcome = rerank(&reranker, "query", Vec::new(), Duration::from_millis(800)).await;
        assert!(!outcome.unavailable);
        assert!(outcome.ranked.is_empty());
    }
}

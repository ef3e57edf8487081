//! Budget-truncation scenario: ten equally-sized matched units, a budget
//! that only fits three, greedy selection in rank order.

mod support;

use std::sync::Arc;

use hindsight::{RecallBudget, RecallQuery, RetainQuery};

use support::{build_engine, fact_batch, FixedTokenizer, ScriptedExtractor};

#[tokio::test]
async fn truncates_to_the_highest_ranked_prefix_fitting_the_budget() {
    let query_terms = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliett"];

    // Unit i shares the first (10 - i) query terms, so lexical-overlap
    // rerank score is strictly decreasing and tie-free: unit 0 shares all
    // ten terms, unit 9 shares just one.
    let mut batches = Vec::with_capacity(10);
    for i in 0..10usize {
        let shared = 10 - i;
        let text = query_terms[..shared].join(" ");
        batches.push(fact_batch(vec![support::fact(&text)]));
    }
    let extractor = ScriptedExtractor::new(batches);
    // A fixed 100-token count per unit, independent of its (short) text,
    // so the budget arithmetic below is exact.
    let engine = build_engine(extractor, Arc::new(FixedTokenizer(100)));

    for i in 0..10 {
        let shared = 10 - i;
        let text = query_terms[..shared].join(" ");
        engine.retain(RetainQuery::new("b1", text)).await.unwrap();
    }

    let mut query = RecallQuery::new("b1", query_terms.join(" "));
    query.budget = RecallBudget::High;
    query.max_tokens = Some(350);
    let response = engine.recall(query).await.unwrap();

    assert_eq!(response.results.len(), 3, "results: {:?}", response.results.iter().map(|r| &r.text).collect::<Vec<_>>());
    // Rank order: unit 0 (all ten terms) first, descending overlap after.
    assert_eq!(response.results[0].text, query_terms.join(" "));
    let overlap_len = |t: &str| t.split_whitespace().count();
    assert!(overlap_len(&response.results[0].text) >= overlap_len(&response.results[1].text));
    assert!(overlap_len(&response.results[1].text) >= overlap_len(&response.results[2].text));
}

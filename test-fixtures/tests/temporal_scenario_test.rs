//! Temporal-filter scenario: a query carrying a recognisable time
//! expression only returns facts whose `occurred` interval falls inside
//! the parsed window, end-to-end through the full engine rather than the
//! temporal parser or strategy in isolation.

mod support;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hindsight::{CrossEncoderReranker, LexicalOverlapReranker, RecallQuery, RetainQuery, TiktokenTokenizer, Tokenizer};
use hindsight_core::errors::IngestError;
use hindsight_ingest::extraction::{ExtractedFact, ExtractionBatch, LlmExtractor};

use support::{build_custom_engine, NeverAskedOracle};

/// One fact per call, carrying an occurred-date the generic
/// `ScriptedExtractor` fixture doesn't thread through.
struct DatedExtractor(std::sync::Mutex<std::collections::VecDeque<(String, DateTime<Utc>)>>);

impl DatedExtractor {
    fn new(entries: Vec<(&str, DateTime<Utc>)>) -> Self {
        Self(std::sync::Mutex::new(entries.into_iter().map(|(t, d)| (t.to_string(), d)).collect()))
    }
}

impl LlmExtractor for DatedExtractor {
    async fn extract(&self, _content: &str, _context: Option<&str>) -> Result<ExtractionBatch, IngestError> {
        let (text, occurred) = self.0.lock().unwrap().pop_front().expect("script exhausted");
        Ok(ExtractionBatch {
            facts: vec![ExtractedFact {
                text,
                fact_type: hindsight_core::FactType::World,
                confidence_score: None,
                occurred_start: Some(occurred),
                occurred_end: Some(occurred),
                entity_mentions: Vec::new(),
            }],
            causal_hints: Vec::new(),
        })
    }
}

#[tokio::test]
async fn query_with_a_time_expression_only_returns_facts_in_that_window() {
    let yosemite = Utc.with_ymd_and_hms(2023, 6, 15, 0, 0, 0).unwrap();
    let seattle = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let extractor = DatedExtractor::new(vec![("Went to Yosemite", yosemite), ("Moved to Seattle", seattle)]);

    let tokenizer: Arc<dyn Tokenizer> = Arc::new(TiktokenTokenizer::new());
    let reranker: Arc<dyn CrossEncoderReranker> = Arc::new(LexicalOverlapReranker::new());
    let engine = build_custom_engine(extractor, NeverAskedOracle, tokenizer, reranker);

    engine.retain(RetainQuery::new("b1", "Went to Yosemite")).await.unwrap();
    engine.retain(RetainQuery::new("b1", "Moved to Seattle")).await.unwrap();

    let mut query = RecallQuery::new("b1", "What did I do last June?");
    query.now = Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap());
    query.max_tokens = Some(2000);
    let response = engine.recall(query).await.unwrap();

    let texts: Vec<&str> = response.results.iter().map(|r| r.text.as_str()).collect();
    assert!(texts.contains(&"Went to Yosemite"), "expected Yosemite in {texts:?}");
    assert!(!texts.contains(&"Moved to Seattle"), "Seattle should not appear in {texts:?}");
}

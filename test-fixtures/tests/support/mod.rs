//! Shared wiring for the whole-stack integration tests: a scripted
//! extractor standing in for the out-of-scope LLM extraction prompt, a
//! disambiguation oracle that panics if ever consulted (none of these
//! scenarios need it), and a no-op observation synthesizer for tests that
//! only care about recall.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use hindsight::{
    CrossEncoderReranker, DeterministicStubEmbeddingClient, Entity, EntityType, HindsightConfig, HindsightEngine,
    LexicalOverlapReranker, MemoryUnit, NoopReinforcer, StorageEngine, Tokenizer,
};
use hindsight_core::errors::{HindsightError, IngestError};
use hindsight_executor::ObservationSynthesizer;
use hindsight_ingest::entities::DisambiguationOracle;
use hindsight_ingest::extraction::{CausalHint, EntityMention, ExtractedFact, ExtractionBatch, LlmExtractor};

/// Replays a fixed script of extraction batches, one per `retain()` call,
/// in call order. Standing in for the LLM extraction prompt, whose design
/// is out of scope for the retrieval core.
pub struct ScriptedExtractor {
    batches: Mutex<VecDeque<ExtractionBatch>>,
}

impl ScriptedExtractor {
    pub fn new(batches: Vec<ExtractionBatch>) -> Self {
        Self { batches: Mutex::new(batches.into()) }
    }

    /// A single fact with no entity mentions and no causal hints.
    pub fn single(text: &str) -> Self {
        Self::new(vec![fact_batch(vec![fact(text)])])
    }
}

impl LlmExtractor for ScriptedExtractor {
    async fn extract(&self, _content: &str, _context: Option<&str>) -> Result<ExtractionBatch, IngestError> {
        self.batches
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .ok_or_else(|| IngestError::MalformedExtraction("scripted extractor script exhausted".into()))
    }
}

/// Never consulted in these tests: every scenario's entity mentions
/// resolve unambiguously by exact name or stay below the Levenshtein
/// fuzzy-match threshold, so no candidate set ever has more than one
/// plausible match.
pub struct NeverAskedOracle;

#[async_trait]
impl DisambiguationOracle for NeverAskedOracle {
    async fn disambiguate(
        &self,
        _mention: &str,
        _fact_text: &str,
        _candidates: &[Entity],
    ) -> Result<Option<usize>, IngestError> {
        panic!("disambiguation oracle should not be consulted in this scenario")
    }
}

/// Observation synthesis is out of scope for recall-focused scenarios;
/// clears prior observations and writes nothing new.
pub struct NoopSynthesizer;

impl ObservationSynthesizer for NoopSynthesizer {
    async fn synthesize(&self, _entity: &Entity, _source_units: &[MemoryUnit]) -> Result<Vec<String>, HindsightError> {
        Ok(Vec::new())
    }
}

/// A fixed per-unit token count, for budget-truncation scenarios that need
/// an exact, text-independent count rather than a real BPE estimate.
pub struct FixedTokenizer(pub usize);

impl Tokenizer for FixedTokenizer {
    fn count(&self, _text: &str) -> usize {
        self.0
    }
}

pub type TestEngine = HindsightEngine<ScriptedExtractor, NeverAskedOracle, NoopReinforcer>;

/// Wires an in-memory `StorageEngine`, the deterministic stub embedder,
/// the lexical-overlap reranker stand-in, and `tokenizer` into a full
/// `HindsightEngine`, exactly as the facade's own doctest wires a
/// production engine together.
pub fn build_engine(extractor: ScriptedExtractor, tokenizer: Arc<dyn Tokenizer>) -> Arc<TestEngine> {
    let storage = Arc::new(StorageEngine::open_in_memory().expect("in-memory sqlite opens"));
    let embeddings: Arc<dyn hindsight::EmbeddingClient> = Arc::new(DeterministicStubEmbeddingClient::new());
    let reranker: Arc<dyn CrossEncoderReranker> = Arc::new(LexicalOverlapReranker::new());

    Arc::new(
        HindsightEngine::new(
            HindsightConfig::default(),
            storage,
            embeddings,
            reranker,
            tokenizer,
            extractor,
            NeverAskedOracle,
            NoopReinforcer,
            NoopSynthesizer,
        )
        .expect("engine wiring over a fresh in-memory store does not fail"),
    )
}

pub fn build_engine_with_reranker(
    extractor: ScriptedExtractor,
    reranker: Arc<dyn CrossEncoderReranker>,
) -> Arc<TestEngine> {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(hindsight::TiktokenTokenizer::new());
    build_custom_engine(extractor, NeverAskedOracle, tokenizer, reranker)
}

/// Fully general wiring for scenarios that need a non-scripted extractor
/// or a non-default oracle (e.g. one carrying occurred-date metadata the
/// generic `ScriptedExtractor` doesn't thread through).
pub fn build_custom_engine<Ex, Or>(
    extractor: Ex,
    oracle: Or,
    tokenizer: Arc<dyn Tokenizer>,
    reranker: Arc<dyn CrossEncoderReranker>,
) -> Arc<HindsightEngine<Ex, Or, NoopReinforcer>>
where
    Ex: LlmExtractor + Send + Sync + 'static,
    Or: DisambiguationOracle + Send + Sync + 'static,
{
    let storage = Arc::new(StorageEngine::open_in_memory().expect("in-memory sqlite opens"));
    let embeddings: Arc<dyn hindsight::EmbeddingClient> = Arc::new(DeterministicStubEmbeddingClient::new());

    Arc::new(
        HindsightEngine::new(
            HindsightConfig::default(),
            storage,
            embeddings,
            reranker,
            tokenizer,
            extractor,
            oracle,
            NoopReinforcer,
            NoopSynthesizer,
        )
        .expect("engine wiring over a fresh in-memory store does not fail"),
    )
}

pub fn fact(text: &str) -> ExtractedFact {
    ExtractedFact {
        text: text.to_string(),
        fact_type: hindsight_core::FactType::World,
        confidence_score: None,
        occurred_start: None,
        occurred_end: None,
        entity_mentions: Vec::new(),
    }
}

pub fn fact_with_entities(text: &str, mentions: &[(&str, EntityType)]) -> ExtractedFact {
    ExtractedFact {
        entity_mentions: mentions.iter().map(|(name, ty)| EntityMention { name: name.to_string(), entity_type: *ty }).collect(),
        ..fact(text)
    }
}

pub fn fact_batch(facts: Vec<ExtractedFact>) -> ExtractionBatch {
    ExtractionBatch { facts, causal_hints: Vec::new() }
}

pub fn fact_batch_with_causal(facts: Vec<ExtractedFact>, hints: Vec<CausalHint>) -> ExtractionBatch {
    ExtractionBatch { facts, causal_hints: hints }
}

//! `HindsightEngine`: wires storage, the in-process graph, the embedding
//! and reranking clients, the retrieval orchestrator, the ingest
//! pipeline, and the bounded observation-synthesis worker pool into one
//! embeddable surface. The public surface is a plain Rust API; CLI/HTTP/UI
//! bindings are external collaborators, out of scope here.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use hindsight_core::config::{RecallBudget};
use hindsight_core::errors::HindsightError;
use hindsight_core::{BankId, FactType, HindsightConfig};
use hindsight_embeddings::{CrossEncoderReranker, EmbeddingClient};
use hindsight_executor::{CoalescingQueue, Task, TaskHandler, WorkerPool};
use hindsight_executor::{ObservationSynthesizer, ObservationWorker};
use hindsight_graph::GraphManager;
use hindsight_ingest::entities::DisambiguationOracle;
use hindsight_ingest::extraction::LlmExtractor;
use hindsight_ingest::pipeline::{IngestPipeline, OpinionReinforcer, RetainRequest};
use hindsight_storage::StorageEngine;
use hindsight_tokens::Tokenizer;

use crate::wire::{EntityObservation, OperationStatus, RecallResponse, ResultItem, RetainResponse, TraceInfo};

/// A `recall()` call. `bank_id` is a plain `String` at this
/// boundary rather than `BankId`, since this is the facade's outward wire
/// shape; everything below converts to the typed domain model.
#[derive(Debug, Clone)]
pub struct RecallQuery {
    pub bank_id: String,
    pub query: String,
    pub fact_types: Option<Vec<FactType>>,
    pub budget: RecallBudget,
    pub max_tokens: Option<usize>,
    pub include_entities: bool,
    pub max_entity_tokens: Option<usize>,
    pub now: Option<DateTime<Utc>>,
    pub deadline: Option<Duration>,
    pub trace: bool,
}

impl RecallQuery {
    pub fn new(bank_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            bank_id: bank_id.into(),
            query: query.into(),
            fact_types: None,
            budget: RecallBudget::Mid,
            max_tokens: None,
            include_entities: false,
            max_entity_tokens: None,
            now: None,
            deadline: None,
            trace: false,
        }
    }
}

/// A `retain()` call.
#[derive(Debug, Clone)]
pub struct RetainQuery {
    pub bank_id: String,
    pub content: String,
    pub context: Option<String>,
    pub document_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RetainQuery {
    pub fn new(bank_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { bank_id: bank_id.into(), content: content.into(), context: None, document_id: None, timestamp: None }
    }
}

/// Bridges `hindsight_executor::TaskHandler` to an `ObservationWorker`,
/// logging and swallowing failures the same way `retain`'s own
/// best-effort background work does. Holds the same `CoalescingQueue`
/// `retain` enqueues through, so a write that coalesces in while a pass is
/// running triggers an immediate extra pass rather than being dropped.
struct ObservationTaskHandler<Sy: ObservationSynthesizer> {
    worker: ObservationWorker<Sy>,
    coalescing: Arc<CoalescingQueue>,
}

#[async_trait]
impl<Sy> TaskHandler for ObservationTaskHandler<Sy>
where
    Sy: ObservationSynthesizer + Send + Sync + 'static,
{
    async fn handle(&self, task: Task) {
        let Task::ObservationRegenerate { bank_id, entity_id } = task;
        loop {
            if let Err(e) = self.worker.run(&bank_id, &entity_id).await {
                tracing::warn!(%entity_id, error = %e, "observation regeneration failed");
            }
            if !self.coalescing.mark_completed(&bank_id, &entity_id) {
                break;
            }
        }
    }
}

/// The embeddable Hindsight engine. Generic over the
/// three out-of-scope LLM hooks (`Ex`: extraction, `Or`: disambiguation,
/// `Re`: opinion reinforcement) so callers wire in their own model
/// without this crate depending on any particular LLM client.
pub struct HindsightEngine<Ex, Or, Re = hindsight_ingest::pipeline::NoopReinforcer> {
    config: HindsightConfig,
    storage: Arc<StorageEngine>,
    graph: GraphManager,
    embeddings: Arc<dyn EmbeddingClient>,
    reranker: Arc<dyn CrossEncoderReranker>,
    tokenizer: Arc<dyn Tokenizer>,
    executor: Arc<WorkerPool>,
    pipeline: Arc<IngestPipeline<Ex, Or, Re>>,
    operations: DashMap<String, OperationStatus>,
}

impl<Ex, Or, Re> HindsightEngine<Ex, Or, Re>
where
    Ex: LlmExtractor + Send + Sync + 'static,
    Or: DisambiguationOracle + Send + Sync + 'static,
    Re: OpinionReinforcer + Send + Sync + 'static,
{
    /// Wires every subsystem together. `synthesizer` drives the
    /// observation-regeneration worker pool; `extractor`/`oracle`/
    /// `reinforcer` drive `retain`'s pipeline. Replays `storage`'s durable
    /// edges into a fresh in-process graph, so a restart against an
    /// existing bank doesn't lose its multi-hop structure.
    #[allow(clippy::too_many_arguments)]
    pub fn new<Sy>(
        config: HindsightConfig,
        storage: Arc<StorageEngine>,
        embeddings: Arc<dyn EmbeddingClient>,
        reranker: Arc<dyn CrossEncoderReranker>,
        tokenizer: Arc<dyn Tokenizer>,
        extractor: Ex,
        oracle: Or,
        reinforcer: Re,
        synthesizer: Sy,
    ) -> Result<Self, HindsightError>
    where
        Sy: ObservationSynthesizer + Send + Sync + 'static,
    {
        let graph = GraphManager::new();
        for edge in storage.all_edges()? {
            graph.load_edge(edge)?;
        }

        let coalescing = Arc::new(CoalescingQueue::new());
        let worker = ObservationWorker::new(Arc::clone(&storage), Arc::clone(&embeddings), synthesizer);
        let handler: Arc<dyn TaskHandler> =
            Arc::new(ObservationTaskHandler { worker, coalescing: Arc::clone(&coalescing) });
        let executor = Arc::new(WorkerPool::new(&config.executor, handler));

        let pipeline = Arc::new(IngestPipeline::new(
            Arc::clone(&storage),
            graph.clone(),
            Arc::clone(&embeddings),
            Arc::clone(&executor),
            coalescing,
            extractor,
            oracle,
            reinforcer,
        ));

        Ok(Self {
            config,
            storage,
            graph,
            embeddings,
            reranker,
            tokenizer,
            executor,
            pipeline,
            operations: DashMap::new(),
        })
    }

    /// Retrieve memories for `query`.
    pub async fn recall(&self, req: RecallQuery) -> Result<RecallResponse, HindsightError> {
        let bank_id = BankId::new(req.bank_id);
        let fact_types = req.fact_types.unwrap_or_else(FactType::default_search_types);
        let max_tokens = req.max_tokens.unwrap_or(self.config.budget.default_max_tokens);
        let max_entity_tokens = req.max_entity_tokens.unwrap_or(self.config.budget.default_max_entity_tokens);
        let now = req.now.unwrap_or_else(Utc::now);
        let deadline = req.deadline.unwrap_or_else(|| Duration::from_millis(self.config.graph.wall_clock_ms));

        let start = Instant::now();
        let recall_req = hindsight_retrieval::orchestrator::RecallRequest {
            bank_id: &bank_id,
            query: &req.query,
            fact_types: &fact_types,
            budget: req.budget,
            max_tokens,
            include_entities: req.include_entities,
            max_entity_tokens,
            now,
            deadline,
        };

        let outcome = hindsight_retrieval::orchestrator::recall(
            &self.storage,
            &self.graph,
            self.embeddings.as_ref(),
            self.reranker.as_ref(),
            self.tokenizer.as_ref(),
            &self.config.graph,
            &self.config.budget,
            recall_req,
        )
        .await?;

        let results: Vec<ResultItem> =
            outcome.units.into_iter().map(|(unit, weight)| ResultItem::from_unit(unit, weight)).collect();
        let entities = if req.include_entities {
            Some(
                outcome
                    .entities
                    .into_iter()
                    .map(|(entity, observations)| EntityObservation::from_entity(entity, observations))
                    .collect(),
            )
        } else {
            None
        };
        let trace = req.trace.then(|| TraceInfo {
            strategy_result_counts: BTreeMap::new(),
            fused_before_rerank: results.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        });

        Ok(RecallResponse { results, entities, trace, warnings: outcome.warnings })
    }

    /// `retain(..., async=false)`: runs synchronously and
    /// returns the persisted unit ids directly.
    pub async fn retain(&self, req: RetainQuery) -> Result<RetainResponse, HindsightError> {
        let unit_ids = self.run_retain(req).await?;
        Ok(RetainResponse { operation_id: None, unit_ids })
    }

    async fn run_retain(&self, req: RetainQuery) -> Result<Vec<String>, HindsightError> {
        let bank_id = BankId::new(req.bank_id);
        let outcome = self
            .pipeline
            .retain(RetainRequest {
                bank_id: &bank_id,
                content: &req.content,
                context: req.context.as_deref(),
                document_id: req.document_id.as_deref(),
                timestamp: req.timestamp,
            })
            .await?;
        Ok(outcome.unit_ids)
    }

    /// `retain(..., async=true)`: spawns the pipeline and
    /// returns an `operation_id` immediately; poll with
    /// [`Self::operation_status`].
    pub fn retain_async(self: &Arc<Self>, req: RetainQuery) -> RetainResponse
    where
        Ex: 'static,
        Or: 'static,
        Re: 'static,
    {
        let operation_id = uuid::Uuid::new_v4().to_string();
        self.operations.insert(operation_id.clone(), OperationStatus::Pending);

        let engine = Arc::clone(self);
        let id = operation_id.clone();
        tokio::spawn(async move {
            engine.operations.insert(id.clone(), OperationStatus::Running);
            match engine.run_retain(req).await {
                Ok(unit_ids) => {
                    engine.operations.insert(id, OperationStatus::Completed { unit_ids });
                }
                Err(e) => {
                    engine.operations.insert(id, OperationStatus::Failed { error: e.to_string() });
                }
            }
        });

        RetainResponse { operation_id: Some(operation_id), unit_ids: Vec::new() }
    }

    /// Poll the status of a `retain_async` call. `None` if
    /// `operation_id` is unknown (never issued, or evicted — this
    /// in-memory table is not itself persisted; a restart forgets
    /// in-flight operation ids).
    pub fn operation_status(&self, operation_id: &str) -> Option<OperationStatus> {
        self.operations.get(operation_id).map(|entry| entry.clone())
    }
}

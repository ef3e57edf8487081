//! The embedding client and cross-encoder reranker, both ONNX-model-backed via `ort` with deterministic test-only
//! stubs.

pub mod client;
pub mod normalize;
pub mod reranker;

pub use client::{DeterministicStubEmbeddingClient, EmbeddingClient, OrtEmbeddingClient, EMBEDDING_DIM};
pub use normalize::{cosine_similarity, l2_normalize};
pub use reranker::{CrossEncoderReranker, LexicalOverlapReranker, OrtCrossEncoderReranker, RerankCandidate};

//! Domain model, error taxonomy, and configuration for the Hindsight
//! retrieval core.
//!
//! This crate has no I/O and no async runtime dependency: every other
//! `hindsight-*` crate depends on it, never the reverse.

pub mod config;
pub mod errors;
pub mod models;

pub use config::HindsightConfig;
pub use errors::{HindsightError, HindsightResult};
pub use models::{
    BankId, CausalKind, Document, Edge, Entity, EntityLink, EntityType, FactType, LinkType,
    MemoryUnit, EMBEDDING_DIM,
};

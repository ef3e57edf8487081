//! Layered configuration: one sub-config struct per tunable area, each
//! `#[derive(Deserialize)]` with `#[serde(default)]` fields and a matching
//! `impl Default`.

pub mod budget_config;
pub mod embedding_config;
pub mod executor_config;
pub mod graph_config;
pub mod temporal_config;

pub use budget_config::BudgetConfig;
pub use embedding_config::EmbeddingConfig;
pub use executor_config::ExecutorConfig;
pub use graph_config::GraphConfig;
pub use temporal_config::TemporalConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HindsightConfig {
    pub embedding: EmbeddingConfig,
    pub graph: GraphConfig,
    pub budget: BudgetConfig,
    pub executor: ExecutorConfig,
    pub temporal: TemporalConfig,
}

impl HindsightConfig {
    /// Load config from a TOML string, falling back to defaults for
    /// missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

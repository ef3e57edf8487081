use serde::{Deserialize, Serialize};

use super::BankId;

/// An optional grouping of ingested memories by source.
///
/// Upserting a document with the same `id` replaces its memories: the
/// storage layer cascades delete of the prior units and their edges/links
/// before inserting the new ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub bank_id: BankId,
    pub source: Option<String>,
    pub unit_ids: Vec<String>,
}

impl Document {
    pub fn new(id: String, bank_id: BankId, source: Option<String>) -> Self {
        Self {
            id,
            bank_id,
            source,
            unit_ids: Vec::new(),
        }
    }
}

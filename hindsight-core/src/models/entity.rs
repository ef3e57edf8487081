use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::BankId;

/// Entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Org,
    Location,
    Product,
    Concept,
    Other,
}

/// A canonical identity mentioned by one or more memory units.
///
/// Invariant (enforced by the storage layer at insert time, since it
/// requires a cross-bank uniqueness check): no two entities in the same
/// bank share a case-folded `canonical_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub bank_id: BankId,
    pub canonical_name: String,
    pub entity_type: EntityType,
    pub aliases: BTreeSet<String>,
}

impl Entity {
    pub fn new(id: String, bank_id: BankId, canonical_name: String, entity_type: EntityType) -> Self {
        Self {
            id,
            bank_id,
            canonical_name,
            entity_type,
            aliases: BTreeSet::new(),
        }
    }

    /// The case-folded name used for the bank-scoped uniqueness check.
    pub fn folded_name(&self) -> String {
        self.canonical_name.to_lowercase()
    }

    /// True if `name` matches the canonical name or any alias, case-folded.
    pub fn matches_name(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        self.folded_name() == folded || self.aliases.iter().any(|a| a.to_lowercase() == folded)
    }
}

/// M:N link between a `MemoryUnit` and an `Entity`. Owning side is the
/// memory: deleting a memory removes its links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityLink {
    pub unit_id: String,
    pub entity_id: String,
}

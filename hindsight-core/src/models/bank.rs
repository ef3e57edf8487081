use serde::{Deserialize, Serialize};

/// An opaque bank identifier. Scopes every retrieval and write; two banks
/// never share units, entities, or edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(String);

impl BankId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BankId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BankId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

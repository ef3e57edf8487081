use serde::{Deserialize, Serialize};

use crate::errors::HindsightError;

/// The four kinds of relationship between two memory units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Temporal,
    Semantic,
    Entity,
    Causal,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Temporal => "temporal",
            LinkType::Semantic => "semantic",
            LinkType::Entity => "entity",
            LinkType::Causal => "causal",
        }
    }

    /// The weight floor for this link type.
    pub fn min_weight(&self) -> f64 {
        match self {
            LinkType::Entity => 1.0,
            LinkType::Semantic => 0.7,
            LinkType::Temporal => 0.3,
            LinkType::Causal => 0.0,
        }
    }
}

/// The four causal relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CausalKind {
    Causes,
    CausedBy,
    Enables,
    Prevents,
}

impl CausalKind {
    /// The spreading-activation boost multiplier for this causal kind.
    pub fn boost(&self) -> f64 {
        match self {
            CausalKind::Causes | CausalKind::CausedBy => 2.0,
            CausalKind::Enables | CausalKind::Prevents => 1.5,
        }
    }
}

/// A typed, weighted, directed edge between two memory units.
///
/// Invariants enforced by `Edge::new`:
/// - `src != dst`
/// - entity edges carry weight exactly 1.0
/// - semantic edges carry weight >= 0.7
/// - temporal edges carry weight >= 0.3
/// - `causal_kind` is `Some` iff `link_type == Causal`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    pub link_type: LinkType,
    pub weight: f64,
    pub causal_kind: Option<CausalKind>,
}

impl Edge {
    pub fn new(
        src: String,
        dst: String,
        link_type: LinkType,
        weight: f64,
        causal_kind: Option<CausalKind>,
    ) -> Result<Self, HindsightError> {
        if src == dst {
            return Err(HindsightError::Invalid("edge endpoints must be distinct".into()));
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(HindsightError::Invalid(format!(
                "edge weight must be in [0,1], got {weight}"
            )));
        }
        if weight < link_type.min_weight() {
            return Err(HindsightError::Invalid(format!(
                "{:?} edge weight {weight} is below the minimum {}",
                link_type,
                link_type.min_weight()
            )));
        }
        match (link_type, causal_kind) {
            (LinkType::Causal, None) => {
                return Err(HindsightError::Invalid(
                    "causal edges must carry a causal_kind".into(),
                ))
            }
            (LinkType::Causal, Some(_)) => {}
            (_, Some(_)) => {
                return Err(HindsightError::Invalid(
                    "causal_kind is only valid on causal edges".into(),
                ))
            }
            (_, None) => {}
        }
        if link_type == LinkType::Entity && weight != 1.0 {
            return Err(HindsightError::Invalid(
                "entity edges must carry weight exactly 1.0".into(),
            ));
        }
        Ok(Self {
            src,
            dst,
            link_type,
            weight,
            causal_kind,
        })
    }

    /// The spreading-activation boost for this edge:
    /// `boost(causal, causes|caused_by) = 2.0`, `boost(causal,
    /// enables|prevents) = 1.5`, `1.0` otherwise.
    pub fn boost(&self) -> f64 {
        match (self.link_type, self.causal_kind) {
            (LinkType::Causal, Some(kind)) => kind.boost(),
            _ => 1.0,
        }
    }

    /// `weight * boost`, the effective propagation weight used by
    /// spreading activation.
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.boost()
    }

    /// Entity and semantic edges are undirected in practice: they are
    /// always stored as a symmetric pair.
    pub fn is_bidirectional(&self) -> bool {
        matches!(self.link_type, LinkType::Entity | LinkType::Semantic)
    }
}

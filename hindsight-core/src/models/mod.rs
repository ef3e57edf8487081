//! Domain model: `MemoryUnit`, `Entity`, `EntityLink`, `Edge`, `Document`.

pub mod bank;
pub mod document;
pub mod edge;
pub mod entity;
pub mod fact;

pub use bank::BankId;
pub use document::Document;
pub use edge::{CausalKind, Edge, LinkType};
pub use entity::{Entity, EntityLink, EntityType};
pub use fact::{FactType, MemoryUnit};

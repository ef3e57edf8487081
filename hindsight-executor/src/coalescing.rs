//! Coalescing queue keyed by `(bank_id, entity_id)`: at most one observation-regeneration task in flight
//! per entity, and at least one refresh after the latest write that
//! requested one.

use dashmap::DashMap;

use hindsight_core::BankId;

#[derive(Default)]
struct EntryState {
    in_flight: bool,
    pending: bool,
}

pub struct CoalescingQueue {
    states: DashMap<(BankId, String), EntryState>,
}

impl CoalescingQueue {
    pub fn new() -> Self {
        Self { states: DashMap::new() }
    }

    /// Call before submitting a task. Returns `true` if the caller should
    /// actually enqueue one; `false` means a task for this entity is
    /// already in flight and will pick up this write when it re-checks.
    pub fn mark_requested(&self, bank_id: &BankId, entity_id: &str) -> bool {
        let key = (bank_id.clone(), entity_id.to_string());
        let mut entry = self.states.entry(key).or_default();
        if entry.in_flight {
            entry.pending = true;
            false
        } else {
            entry.in_flight = true;
            true
        }
    }

    /// Call after a worker finishes one pass for `(bank_id, entity_id)`.
    /// Returns `true` if a write coalesced in while it ran and the worker
    /// should run one more pass immediately.
    pub fn mark_completed(&self, bank_id: &BankId, entity_id: &str) -> bool {
        let key = (bank_id.clone(), entity_id.to_string());
        let Some(mut entry) = self.states.get_mut(&key) else { return false };
        if entry.pending {
            entry.pending = false;
            true
        } else {
            entry.in_flight = false;
            false
        }
    }
}

impl Default for CoalescingQueue {
    fn default() -> Self {
        Self::new()
    }
}

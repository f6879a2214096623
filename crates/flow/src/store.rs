//! In-memory sender → conversation state map.
//!
//! Single-process and non-durable by design. The one concurrency guarantee
//! callers get: [`ConversationStore::transact`] runs get-or-create, the
//! transition, and the keep/remove decision as one unit per sender id, so two
//! near-simultaneous messages from the same sender cannot interleave.
//! Different senders proceed in parallel on separate map shards.

use std::time::Duration;

use {
    dashmap::{DashMap, mapref::entry::Entry},
    tracing::debug,
};

use crate::state::ConversationState;

/// What to do with the entry after a [`ConversationStore::transact`] closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Remove,
}

/// The conversation store plus a sender → profile-name cache.
#[derive(Debug, Default)]
pub struct ConversationStore {
    states: DashMap<String, ConversationState>,
    names: DashMap<String, String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create: a clone of the sender's state, fresh `Start` if absent.
    pub fn get(&self, sender_id: &str) -> ConversationState {
        self.states
            .entry(sender_id.to_string())
            .or_insert_with(|| ConversationState::new(sender_id))
            .clone()
    }

    /// Overwrite the sender's state.
    pub fn put(&self, state: ConversationState) {
        self.states.insert(state.sender_id.clone(), state);
    }

    /// Remove the sender's state. Removing an absent entry is a no-op.
    pub fn remove(&self, sender_id: &str) {
        self.states.remove(sender_id);
    }

    /// Atomic read-modify-write for one sender.
    ///
    /// The closure runs on the (possibly fresh) state while the entry guard
    /// is held; returning [`Disposition::Remove`] deletes the entry in the
    /// same critical section.
    pub fn transact<R>(
        &self,
        sender_id: &str,
        f: impl FnOnce(&mut ConversationState) -> (R, Disposition),
    ) -> R {
        match self.states.entry(sender_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let (result, disposition) = f(occupied.get_mut());
                if disposition == Disposition::Remove {
                    occupied.remove();
                }
                result
            },
            Entry::Vacant(vacant) => {
                let mut state = ConversationState::new(sender_id);
                let (result, disposition) = f(&mut state);
                if disposition == Disposition::Keep {
                    vacant.insert(state);
                }
                result
            },
        }
    }

    pub fn contains(&self, sender_id: &str) -> bool {
        self.states.contains_key(sender_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    // ── Profile-name cache ──────────────────────────────────────────────────

    /// Remember the WhatsApp profile name seen for a sender.
    pub fn remember_name(&self, sender_id: &str, name: &str) {
        self.names.insert(sender_id.to_string(), name.to_string());
    }

    pub fn cached_name(&self, sender_id: &str) -> Option<String> {
        self.names.get(sender_id).map(|n| n.value().clone())
    }

    // ── Idle eviction ───────────────────────────────────────────────────────

    /// Drop conversations idle beyond `max_idle`. Returns how many were
    /// evicted. The name cache is left intact.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.states.len();
        self.states
            .retain(|_, state| state.last_active.elapsed() <= max_idle);
        let evicted = before.saturating_sub(self.states.len());
        if evicted > 0 {
            debug!(evicted, "evicted idle conversations");
        }
        evicted
    }
}

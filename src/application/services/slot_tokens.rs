use std::collections::HashMap;

use crate::domain::entities::{RequestToken, SlotId};

/// Tracks which request each display slot currently expects.
///
/// Every [`bind`](Self::bind) hands out a fresh token drawn from a single
/// counter, so a token is never reused, even after [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct SlotTokens {
    next: u64,
    current: HashMap<SlotId, RequestToken>,
}

impl SlotTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the slot to a new request, superseding any previous one.
    pub fn bind(&mut self, slot: SlotId) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        self.current.insert(slot, token);
        token
    }

    #[must_use]
    pub fn current(&self, slot: SlotId) -> Option<RequestToken> {
        self.current.get(&slot).copied()
    }

    #[must_use]
    pub fn is_current(&self, slot: SlotId, token: RequestToken) -> bool {
        self.current(slot) == Some(token)
    }

    /// Leaves the slot expecting nothing.
    pub fn invalidate(&mut self, slot: SlotId) -> Option<RequestToken> {
        self.current.remove(&slot)
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

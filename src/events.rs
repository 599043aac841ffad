//! Change notifications
//!
//! Each publisher owns an [`Observers`] list. Consumers subscribe with a
//! callback and must unsubscribe with the returned id when they go away.

use crate::core::types::{Coins, SubscriptionId};
use crate::pet::needs::NeedType;

/// Semantic events delivered to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    NeedCritical(NeedType),
    NeedRecovered(NeedType),
    /// Outcome of a shop purchase as a user-facing message
    PurchaseResult { success: bool, message: String },
    MiniGameEnded { score: u32, reward: Coins, new_best: bool },
}

/// Wallet balance after a durable change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChanged {
    pub balance: Coins,
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered list of subscribed callbacks
pub struct Observers<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self { next_id: 0, callbacks: Vec::new() }
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was never issued or is already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Fire-and-forget delivery in subscription order
    pub fn notify(&mut self, event: &E) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("subscribers", &self.callbacks.len()).finish()
    }
}

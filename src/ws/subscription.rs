//! Per-connection subscription manager.
//!
//! Tracks which entity kinds a WebSocket client is subscribed to and
//! provides server-side change filtering.

use std::collections::BTreeSet;

use crate::domain::EntityKind;

/// Manages the set of kind subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed kinds. If `subscribe_all` is true, this set is ignored.
    kinds: BTreeSet<EntityKind>,
    /// Whether the client subscribes to every kind (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds kinds to the subscription set.
    pub fn subscribe(&mut self, kinds: &[EntityKind], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.kinds.extend(kinds.iter().copied());
    }

    /// Removes kinds from the subscription set. `wildcard` clears the
    /// wildcard flag.
    pub fn unsubscribe(&mut self, kinds: &[EntityKind], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for kind in kinds {
            self.kinds.remove(kind);
        }
    }

    /// Returns `true` if changes of `kind` pass the filter.
    #[must_use]
    pub fn matches(&self, kind: EntityKind) -> bool {
        self.subscribe_all || self.kinds.contains(&kind)
    }

    /// Explicitly subscribed kinds, in kind order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.kinds.iter().copied().collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::notification_models::Notification;

pub type PushSender = mpsc::UnboundedSender<Notification>;

/// One live push connection of a user.
#[derive(Clone)]
pub struct Subscriber {
    pub handle: Uuid,
    pub outbox: PushSender,
}

/// Process-wide map from user id to that user's live push connections.
///
/// Constructed once at startup and injected through `AppState`; tests build
/// isolated instances. Map access goes through DashMap's per-entry locking,
/// so connection tasks may register, unregister and snapshot concurrently.
#[derive(Clone)]
pub struct SubscriberRegistry {
    subscribers: Arc<DashMap<Uuid, Vec<Subscriber>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
        }
    }

    /// Adds a connection for `user_id` and returns its handle.
    pub fn register(&self, user_id: Uuid, outbox: PushSender) -> Uuid {
        let handle = Uuid::new_v4();
        self.subscribers
            .entry(user_id)
            .or_default()
            .push(Subscriber { handle, outbox });
        tracing::info!("User {} subscribed (handle {})", user_id, handle);
        handle
    }

    /// Removes the first subscriber matching `handle`. A no-op when the
    /// handle is already gone: a disconnect may race a failed-send prune,
    /// and whichever runs second must not error.
    pub fn unregister(&self, user_id: Uuid, handle: Uuid) {
        let mut removed = false;
        if let Some(mut entry) = self.subscribers.get_mut(&user_id) {
            if let Some(pos) = entry.iter().position(|s| s.handle == handle) {
                entry.remove(pos);
                removed = true;
            }
        }
        if removed {
            self.subscribers.remove_if(&user_id, |_, subs| subs.is_empty());
            tracing::info!("User {} unsubscribed (handle {})", user_id, handle);
        }
    }

    /// Immutable copy of the user's current subscribers, so delivery can
    /// iterate without holding the live entry.
    pub fn snapshot(&self, user_id: Uuid) -> Vec<Subscriber> {
        self.subscribers
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, user_id: Uuid) -> usize {
        self.subscribers.get(&user_id).map_or(0, |entry| entry.len())
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbox() -> (PushSender, mpsc::UnboundedReceiver<Notification>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_register_and_snapshot() {
        let registry = SubscriberRegistry::new();
        let user_id = Uuid::new_v4();

        let (tx1, _rx1) = outbox();
        let (tx2, _rx2) = outbox();
        let h1 = registry.register(user_id, tx1);
        let h2 = registry.register(user_id, tx2);

        let snapshot = registry.snapshot(user_id);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].handle, h1);
        assert_eq!(snapshot[1].handle, h2);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let user_id = Uuid::new_v4();

        let (tx1, _rx1) = outbox();
        let (tx2, _rx2) = outbox();
        let h1 = registry.register(user_id, tx1);
        registry.register(user_id, tx2);

        registry.unregister(user_id, h1);
        assert_eq!(registry.subscriber_count(user_id), 1);
        registry.unregister(user_id, h1);
        assert_eq!(registry.subscriber_count(user_id), 1);
    }

    #[test]
    fn test_unregister_unknown_user_is_noop() {
        let registry = SubscriberRegistry::new();
        registry.unregister(Uuid::new_v4(), Uuid::new_v4());
    }

    #[test]
    fn test_snapshot_is_decoupled_from_later_registrations() {
        let registry = SubscriberRegistry::new();
        let user_id = Uuid::new_v4();

        let (tx1, _rx1) = outbox();
        registry.register(user_id, tx1);
        let snapshot = registry.snapshot(user_id);

        let (tx2, _rx2) = outbox();
        registry.register(user_id, tx2);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.subscriber_count(user_id), 2);
    }

    #[test]
    fn test_empty_entry_is_dropped() {
        let registry = SubscriberRegistry::new();
        let user_id = Uuid::new_v4();

        let (tx, _rx) = outbox();
        let handle = registry.register(user_id, tx);
        registry.unregister(user_id, handle);

        assert_eq!(registry.subscriber_count(user_id), 0);
        assert!(registry.snapshot(user_id).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let registry = SubscriberRegistry::new();
        let user_id = Uuid::new_v4();

        let mut joins = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            joins.push(tokio::spawn(async move {
                let (tx, _rx) = outbox();
                registry.register(user_id, tx)
            }));
        }
        for join in joins {
            join.await.unwrap();
        }

        assert_eq!(registry.subscriber_count(user_id), 16);
    }
}

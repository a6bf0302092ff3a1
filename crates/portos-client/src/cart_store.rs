//! # Cart Store
//!
//! Drives a [`CartLedger`] around the network call:
//!
//! ```text
//!   lock ─► begin_update / begin_remove ─► unlock
//!                        │
//!                 backend call (.await, no lock held)
//!                        │
//!   lock ─► commit (Ok) / rollback (Err) ─► unlock
//! ```
//!
//! The lock is a plain `std::sync::Mutex`; it is only ever held for the
//! synchronous ledger step, never across an `.await`. There is no retry and
//! no timeout here: a request that never completes leaves its item pending.

use portos_core::{CartLedger, CartLine, CartTotals, Id};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::http::StorefrontClient;

/// The requests the cart store needs from the outside world.
pub trait CartBackend: Send + Sync + 'static {
    fn update_quantity(
        &self,
        item_id: Id,
        quantity: i64,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn remove(&self, item_id: Id) -> impl Future<Output = ClientResult<()>> + Send;

    fn fetch(&self) -> impl Future<Output = ClientResult<Vec<CartLine>>> + Send;
}

impl CartBackend for StorefrontClient {
    async fn update_quantity(&self, item_id: Id, quantity: i64) -> ClientResult<()> {
        self.update_cart_item(item_id, quantity).await
    }

    async fn remove(&self, item_id: Id) -> ClientResult<()> {
        self.remove_cart_item(item_id).await
    }

    async fn fetch(&self) -> ClientResult<Vec<CartLine>> {
        self.cart().await
    }
}

/// How an optimistic mutation ended.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The server accepted the change.
    Applied,
    /// Unknown id, or the item already had a request in flight. Nothing
    /// changed and nothing was sent.
    Ignored,
    /// The server rejected the change and the list was restored.
    RolledBack(ClientError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            MutationOutcome::RolledBack(e) => Some(e),
            _ => None,
        }
    }
}

/// Shared, optimistic view of the cart. Clones share the same ledger.
pub struct CartStore<B> {
    ledger: Arc<Mutex<CartLedger>>,
    backend: Arc<B>,
}

impl<B> Clone for CartStore<B> {
    fn clone(&self) -> Self {
        CartStore {
            ledger: Arc::clone(&self.ledger),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: CartBackend> CartStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_lines(backend, Vec::new())
    }

    pub fn with_lines(backend: B, lines: Vec<CartLine>) -> Self {
        CartStore {
            ledger: Arc::new(Mutex::new(CartLedger::new(lines))),
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // Ledger steps do not panic mid-write; a poisoned ledger is consistent.
    fn lock(&self) -> MutexGuard<'_, CartLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartLedger) -> R,
    {
        f(&self.lock())
    }

    fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartLedger) -> R,
    {
        f(&mut self.lock())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn lines(&self) -> Vec<CartLine> {
        self.with_ledger(|l| l.lines().to_vec())
    }

    pub fn totals(&self) -> CartTotals {
        self.with_ledger(CartLedger::totals)
    }

    pub fn is_pending(&self, item_id: Id) -> bool {
        self.with_ledger(|l| l.is_pending(item_id))
    }

    pub fn can_increment(&self, item_id: Id) -> bool {
        self.with_ledger(|l| l.can_increment(item_id))
    }

    pub fn can_decrement(&self, item_id: Id) -> bool {
        self.with_ledger(|l| l.can_decrement(item_id))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Reloads the cart from the server. In-flight mutations keep their
    /// pending marks and their own snapshots.
    pub async fn refresh(&self) -> ClientResult<()> {
        let lines = self.backend.fetch().await?;
        debug!(lines = lines.len(), "Cart refreshed");
        self.with_ledger_mut(|l| l.replace(lines));
        Ok(())
    }

    /// Sets a quantity, clamped into `[1, max_quantity]`, before the request
    /// is sent. The clamped value is what the server receives.
    pub async fn update_quantity(&self, item_id: Id, requested: i64) -> MutationOutcome {
        let Some(mutation) = self.with_ledger_mut(|l| l.begin_update(item_id, requested)) else {
            debug!(item_id, "Update ignored: unknown or pending item");
            return MutationOutcome::Ignored;
        };
        let quantity = mutation.quantity().unwrap_or(requested);

        match self.backend.update_quantity(item_id, quantity).await {
            Ok(()) => {
                self.with_ledger_mut(|l| l.commit(mutation));
                debug!(item_id, quantity, "Quantity updated");
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!(item_id, quantity, error = %e, "Quantity update failed, rolling back");
                self.with_ledger_mut(|l| l.rollback(mutation));
                MutationOutcome::RolledBack(e)
            }
        }
    }

    pub async fn remove_item(&self, item_id: Id) -> MutationOutcome {
        let Some(mutation) = self.with_ledger_mut(|l| l.begin_remove(item_id)) else {
            debug!(item_id, "Remove ignored: unknown or pending item");
            return MutationOutcome::Ignored;
        };

        match self.backend.remove(item_id).await {
            Ok(()) => {
                self.with_ledger_mut(|l| l.commit(mutation));
                debug!(item_id, "Item removed");
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!(item_id, error = %e, "Remove failed, rolling back");
                self.with_ledger_mut(|l| l.rollback(mutation));
                MutationOutcome::RolledBack(e)
            }
        }
    }

    /// `+1`, or `Ignored` when the control would be disabled.
    pub async fn increment(&self, item_id: Id) -> MutationOutcome {
        let next = self.with_ledger(|l| {
            l.can_increment(item_id)
                .then(|| l.line(item_id).map(|line| line.quantity + 1))
                .flatten()
        });
        match next {
            Some(quantity) => self.update_quantity(item_id, quantity).await,
            None => MutationOutcome::Ignored,
        }
    }

    /// `-1`, or `Ignored` at quantity 1; removal is a separate action.
    pub async fn decrement(&self, item_id: Id) -> MutationOutcome {
        let next = self.with_ledger(|l| {
            l.can_decrement(item_id)
                .then(|| l.line(item_id).map(|line| line.quantity - 1))
                .flatten()
        });
        match next {
            Some(quantity) => self.update_quantity(item_id, quantity).await,
            None => MutationOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portos_core::Money;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Update(Id, i64),
        Remove(Id),
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Mutex<Vec<Call>>,
        fail: AtomicBool,
        gated: bool,
        gates: Mutex<HashMap<Id, Arc<Notify>>>,
        server_lines: Mutex<Vec<CartLine>>,
    }

    impl MockBackend {
        fn failing() -> Self {
            MockBackend {
                fail: AtomicBool::new(true),
                ..Default::default()
            }
        }

        fn gated() -> Self {
            MockBackend {
                gated: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Lets the held request for `item_id` complete.
        fn release(&self, item_id: Id) {
            self.gate(item_id).notify_one();
        }

        fn gate(&self, item_id: Id) -> Arc<Notify> {
            self.gates.lock().unwrap().entry(item_id).or_default().clone()
        }

        async fn respond(&self, item_id: Id, call: Call) -> ClientResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.gated {
                let gate = self.gate(item_id);
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                Err(ClientError::Api {
                    status: 400,
                    message: "Insufficient stock".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl CartBackend for MockBackend {
        async fn update_quantity(&self, item_id: Id, quantity: i64) -> ClientResult<()> {
            self.respond(item_id, Call::Update(item_id, quantity)).await
        }

        async fn remove(&self, item_id: Id) -> ClientResult<()> {
            self.respond(item_id, Call::Remove(item_id)).await
        }

        async fn fetch(&self) -> ClientResult<Vec<CartLine>> {
            Ok(self.server_lines.lock().unwrap().clone())
        }
    }

    fn line(id: Id, quantity: i64, max: i64) -> CartLine {
        CartLine::new(id, id + 100, format!("Part {id}"), Money::from_minor(5_000), quantity, max)
    }

    async fn wait_until_pending<B: CartBackend>(store: &CartStore<B>, item_id: Id) {
        while !store.is_pending(item_id) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_update_is_clamped_and_sent_clamped() {
        let store = CartStore::with_lines(MockBackend::default(), vec![line(1, 2, 5)]);

        assert!(store.update_quantity(1, 10).await.is_applied());
        assert_eq!(store.lines()[0].quantity, 5);
        assert_eq!(store.backend().calls(), vec![Call::Update(1, 5)]);

        assert!(store.update_quantity(1, -3).await.is_applied());
        assert_eq!(store.lines()[0].quantity, 1);
        assert!(!store.is_pending(1));
    }

    #[tokio::test]
    async fn test_rejected_update_rolls_back() {
        let store = CartStore::with_lines(MockBackend::failing(), vec![line(1, 2, 5)]);

        let outcome = store.update_quantity(1, 10).await;
        assert_eq!(outcome.error().unwrap().to_string(), "Insufficient stock");
        assert_eq!(store.lines(), vec![line(1, 2, 5)]);
        assert!(!store.is_pending(1));
    }

    #[tokio::test]
    async fn test_remove_and_failed_remove() {
        let store = CartStore::with_lines(MockBackend::default(), vec![line(1, 2, 5)]);
        assert!(store.remove_item(1).await.is_applied());
        assert!(store.lines().is_empty());

        let store = CartStore::with_lines(MockBackend::failing(), vec![line(1, 2, 5)]);
        assert!(matches!(
            store.remove_item(1).await,
            MutationOutcome::RolledBack(_)
        ));
        assert_eq!(store.lines(), vec![line(1, 2, 5)]);
    }

    #[tokio::test]
    async fn test_unknown_item_is_ignored() {
        let store = CartStore::with_lines(MockBackend::default(), vec![line(1, 2, 5)]);
        assert!(matches!(store.update_quantity(9, 3).await, MutationOutcome::Ignored));
        assert!(matches!(store.remove_item(9).await, MutationOutcome::Ignored));
        assert!(store.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_pending_item_ignores_second_mutation() {
        let store = CartStore::with_lines(MockBackend::gated(), vec![line(1, 2, 5)]);

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.update_quantity(1, 4).await })
        };
        wait_until_pending(&store, 1).await;

        // Optimistic value is visible while the request is in flight.
        assert_eq!(store.lines()[0].quantity, 4);
        assert!(matches!(store.update_quantity(1, 3).await, MutationOutcome::Ignored));
        assert!(matches!(store.remove_item(1).await, MutationOutcome::Ignored));
        assert!(!store.can_increment(1));
        assert!(!store.can_decrement(1));

        store.backend().release(1);
        assert!(first.await.unwrap().is_applied());
        assert_eq!(store.backend().calls(), vec![Call::Update(1, 4)]);
        assert_eq!(store.lines()[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_rollback_restores_whole_list() {
        let backend = MockBackend::gated();
        backend.fail.store(true, Ordering::SeqCst);
        let store = CartStore::with_lines(backend, vec![line(1, 2, 5), line(2, 1, 3)]);

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.update_quantity(1, 3).await })
        };
        wait_until_pending(&store, 1).await;
        // Optimistically remove item 2 while item 1 is in flight. The
        // snapshot taken for item 1 still holds item 2.
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.remove_item(2).await })
        };
        wait_until_pending(&store, 2).await;
        assert_eq!(store.lines().len(), 1);

        store.backend().release(1);
        assert!(matches!(first.await.unwrap(), MutationOutcome::RolledBack(_)));
        assert_eq!(store.lines(), vec![line(1, 2, 5), line(2, 1, 3)]);
        assert!(store.is_pending(2));

        store.backend().release(2);
        let _ = second.await.unwrap();
        assert!(!store.is_pending(2));
    }

    #[tokio::test]
    async fn test_increment_and_decrement_respect_bounds() {
        let store = CartStore::with_lines(MockBackend::default(), vec![line(1, 1, 2)]);

        assert!(matches!(store.decrement(1).await, MutationOutcome::Ignored));
        assert!(store.increment(1).await.is_applied());
        assert_eq!(store.lines()[0].quantity, 2);
        assert!(matches!(store.increment(1).await, MutationOutcome::Ignored));
        assert!(store.decrement(1).await.is_applied());
        assert_eq!(
            store.backend().calls(),
            vec![Call::Update(1, 2), Call::Update(1, 1)]
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_lines() {
        let backend = MockBackend::default();
        *backend.server_lines.lock().unwrap() = vec![line(7, 3, 9)];
        let store = CartStore::new(backend);

        store.refresh().await.unwrap();
        assert_eq!(store.lines(), vec![line(7, 3, 9)]);
        assert_eq!(store.totals().total_quantity, 3);
    }

    #[tokio::test]
    async fn test_client_backend_rolls_back_on_404() {
        let api = crate::testing::MockApi::start().await;
        api.respond_raw("PUT", "/protected/cart/item/1", 200, "");
        let client = api.logged_in_client("tok").await;
        let store = CartStore::with_lines(client, vec![line(1, 2, 5), line(2, 1, 3)]);

        assert!(store.update_quantity(1, 10).await.is_applied());
        assert_eq!(api.requests()[0].body, serde_json::json!({"quantity": 5}));

        let outcome = store.update_quantity(2, 2).await;
        assert_eq!(outcome.error().unwrap().to_string(), "Cart item not found");
        assert_eq!(store.lines()[1].quantity, 1);
    }
}

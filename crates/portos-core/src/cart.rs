//! # Cart Ledger
//!
//! The in-memory cart and the bookkeeping for optimistic mutations.
//!
//! ## Optimistic Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Optimistic Cart Mutation                             │
//! │                                                                         │
//! │  begin_update(id, n)                                                    │
//! │  ├── unknown id or id pending ──► None (no change, no request)         │
//! │  └── otherwise                                                          │
//! │      1. snapshot = lines.clone()                                       │
//! │      2. lines[id].quantity = clamp(n, 1, max_quantity)                 │
//! │      3. pending.insert(id)                                             │
//! │      4. return Mutation { id, kind, snapshot }                         │
//! │                     │                                                   │
//! │          caller sends the request                                       │
//! │                     │                                                   │
//! │         ┌───────────┴───────────┐                                       │
//! │         ▼                       ▼                                       │
//! │   commit(mutation)        rollback(mutation)                            │
//! │   pending.remove(id)      lines = snapshot                              │
//! │                           pending.remove(id)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger never does I/O. `portos-client::cart_store` drives it around
//! the network call and owns the lock.
//!
//! Rollback restores the whole list, not just the failed line. If two
//! different items are in flight and the first one fails, the second item's
//! optimistic change is undone as well even if its request later succeeds;
//! the next `replace` from the server corrects the view.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLine, Id};
use crate::GST_RATE;

// =============================================================================
// Mutation Ticket
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Quantity change; carries the clamped value to send.
    Update { quantity: i64 },
    Remove,
}

/// Proof that an optimistic change was applied.
///
/// Must be handed back to [`CartLedger::commit`] or
/// [`CartLedger::rollback`]; until then the item stays pending.
#[derive(Debug)]
#[must_use = "a mutation leaves its item pending until committed or rolled back"]
pub struct Mutation {
    item_id: Id,
    kind: MutationKind,
    snapshot: Vec<CartLine>,
}

impl Mutation {
    pub fn item_id(&self) -> Id {
        self.item_id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Quantity to persist, for updates.
    pub fn quantity(&self) -> Option<i64> {
        match self.kind {
            MutationKind::Update { quantity } => Some(quantity),
            MutationKind::Remove => None,
        }
    }

    /// The list as it was immediately before the optimistic apply.
    pub fn snapshot(&self) -> &[CartLine] {
        &self.snapshot
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Cart lines plus the set of item ids with a request in flight.
///
/// ## Invariants
/// - Every displayed quantity is in `[1, max_quantity]` after a mutation
/// - At most one outstanding mutation per item id
#[derive(Debug, Clone, Default)]
pub struct CartLedger {
    lines: Vec<CartLine>,
    pending: HashSet<Id>,
}

impl CartLedger {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            pending: HashSet::new(),
        }
    }

    /// Clamps a requested quantity into `[1, max]`.
    ///
    /// The lower bound wins when `max` is below 1 (item out of stock), so a
    /// line never drops to zero through an update; removal is explicit.
    ///
    /// ```rust
    /// use portos_core::cart::CartLedger;
    ///
    /// assert_eq!(CartLedger::clamp_quantity(10, 5), 5);
    /// assert_eq!(CartLedger::clamp_quantity(0, 5), 1);
    /// assert_eq!(CartLedger::clamp_quantity(3, 0), 1);
    /// ```
    pub fn clamp_quantity(requested: i64, max: i64) -> i64 {
        requested.min(max).max(1)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: Id) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_pending(&self, item_id: Id) -> bool {
        self.pending.contains(&item_id)
    }

    /// Pending ids in ascending order.
    pub fn pending_ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.pending.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Replaces the lines with a fresh copy from the server.
    ///
    /// The pending set is left alone; in-flight mutations still commit or
    /// roll back against their own snapshot.
    pub fn replace(&mut self, lines: Vec<CartLine>) {
        self.lines = lines;
    }

    /// Optimistically sets a line's quantity.
    ///
    /// Returns `None`, changing nothing, when the id is unknown or already
    /// pending.
    pub fn begin_update(&mut self, item_id: Id, requested: i64) -> Option<Mutation> {
        if self.pending.contains(&item_id) {
            return None;
        }
        let index = self.lines.iter().position(|l| l.id == item_id)?;

        let snapshot = self.lines.clone();
        let line = &mut self.lines[index];
        let quantity = Self::clamp_quantity(requested, line.max_quantity);
        line.quantity = quantity;
        self.pending.insert(item_id);

        Some(Mutation {
            item_id,
            kind: MutationKind::Update { quantity },
            snapshot,
        })
    }

    /// Optimistically removes a line. Same rules as [`Self::begin_update`].
    pub fn begin_remove(&mut self, item_id: Id) -> Option<Mutation> {
        if self.pending.contains(&item_id) || self.line(item_id).is_none() {
            return None;
        }

        let snapshot = self.lines.clone();
        self.lines.retain(|l| l.id != item_id);
        self.pending.insert(item_id);

        Some(Mutation {
            item_id,
            kind: MutationKind::Remove,
            snapshot,
        })
    }

    /// The server accepted the change.
    pub fn commit(&mut self, mutation: Mutation) {
        self.pending.remove(&mutation.item_id);
    }

    /// The server rejected the change: restore the pre-mutation list.
    pub fn rollback(&mut self, mutation: Mutation) {
        self.pending.remove(&mutation.item_id);
        self.lines = mutation.snapshot;
    }

    /// Whether the `+` control should be enabled.
    pub fn can_increment(&self, item_id: Id) -> bool {
        !self.is_pending(item_id)
            && self
                .line(item_id)
                .is_some_and(|l| l.quantity < l.max_quantity)
    }

    /// Whether the `-` control should be enabled. A line at quantity 1 can
    /// only be removed.
    pub fn can_decrement(&self, item_id: Id) -> bool {
        !self.is_pending(item_id) && self.line(item_id).is_some_and(|l| l.quantity > 1)
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Order summary shown under the cart and on checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub gst: Money,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub shipping: Money,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub total: Money,
}

impl CartTotals {
    /// Totals over `(unit price, quantity)` pairs. GST is charged on the
    /// subtotal; shipping is free.
    pub fn compute(items: impl IntoIterator<Item = (Money, i64)>) -> Self {
        let mut item_count = 0;
        let mut total_quantity = 0;
        let mut subtotal = Money::zero();
        for (price, quantity) in items {
            item_count += 1;
            total_quantity += quantity;
            subtotal += price.multiply_quantity(quantity);
        }
        let gst = subtotal.calculate_tax(GST_RATE);
        let shipping = Money::zero();
        CartTotals {
            item_count,
            total_quantity,
            subtotal,
            gst,
            shipping,
            total: subtotal + gst + shipping,
        }
    }

    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self::compute(lines.iter().map(|l| (l.price, l.quantity)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: Id, quantity: i64, max: i64) -> CartLine {
        CartLine::new(id, id * 10, format!("Part {id}"), Money::from_minor(10_000), quantity, max)
    }

    #[test]
    fn test_update_clamps_to_stock_and_rolls_back() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let before = ledger.lines().to_vec();

        let mutation = ledger.begin_update(1, 10).unwrap();
        assert_eq!(mutation.quantity(), Some(5));
        assert_eq!(ledger.line(1).unwrap().quantity, 5);
        assert!(ledger.is_pending(1));

        ledger.rollback(mutation);
        assert_eq!(ledger.lines(), before.as_slice());
        assert_eq!(ledger.line(1).unwrap().quantity, 2);
        assert!(!ledger.is_pending(1));
    }

    #[test]
    fn test_update_commit_keeps_optimistic_value() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let mutation = ledger.begin_update(1, 3).unwrap();
        ledger.commit(mutation);
        assert_eq!(ledger.line(1).unwrap().quantity, 3);
        assert!(ledger.pending_ids().is_empty());
    }

    #[test]
    fn test_update_clamps_below_one() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let mutation = ledger.begin_update(1, -4).unwrap();
        assert_eq!(ledger.line(1).unwrap().quantity, 1);
        ledger.commit(mutation);
    }

    #[test]
    fn test_quantity_always_within_bounds() {
        for max in 0..6 {
            for requested in -3..12 {
                let mut ledger = CartLedger::new(vec![line(1, 1, max)]);
                let mutation = ledger.begin_update(1, requested).unwrap();
                let q = ledger.line(1).unwrap().quantity;
                assert!(q >= 1);
                assert!(max < 1 || q <= max);
                ledger.commit(mutation);
            }
        }
    }

    #[test]
    fn test_pending_item_is_ignored() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let first = ledger.begin_update(1, 4).unwrap();
        let during = ledger.lines().to_vec();

        assert!(ledger.begin_update(1, 1).is_none());
        assert!(ledger.begin_remove(1).is_none());
        assert_eq!(ledger.lines(), during.as_slice());

        ledger.commit(first);
        assert!(ledger.begin_update(1, 1).is_some());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        assert!(ledger.begin_update(99, 3).is_none());
        assert!(ledger.begin_remove(99).is_none());
        assert!(ledger.pending_ids().is_empty());
        assert_eq!(ledger.line(1).unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_last_item_and_rollback() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let before = ledger.lines().to_vec();

        let mutation = ledger.begin_remove(1).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(mutation.kind(), MutationKind::Remove);

        ledger.rollback(mutation);
        assert_eq!(ledger.lines(), before.as_slice());
    }

    #[test]
    fn test_rollback_restores_whole_list() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5), line(2, 1, 5)]);
        let first = ledger.begin_update(1, 4).unwrap();
        let second = ledger.begin_update(2, 3).unwrap();
        assert_eq!(ledger.pending_ids(), vec![1, 2]);

        ledger.commit(second);
        ledger.rollback(first);

        // Item 2's optimistic change is undone with item 1's snapshot
        assert_eq!(ledger.line(1).unwrap().quantity, 2);
        assert_eq!(ledger.line(2).unwrap().quantity, 1);
        assert!(ledger.pending_ids().is_empty());
    }

    #[test]
    fn test_can_increment_and_decrement() {
        let mut ledger = CartLedger::new(vec![line(1, 1, 3), line(2, 3, 3)]);
        assert!(ledger.can_increment(1));
        assert!(!ledger.can_decrement(1));
        assert!(!ledger.can_increment(2));
        assert!(ledger.can_decrement(2));
        assert!(!ledger.can_increment(99));

        let mutation = ledger.begin_update(2, 2).unwrap();
        assert!(!ledger.can_decrement(2));
        ledger.commit(mutation);
        assert!(ledger.can_decrement(2));
    }

    #[test]
    fn test_totals_with_gst() {
        // 2 × ₹100.00 + 1 × ₹100.00 = ₹300.00, GST 18% = ₹54.00
        let ledger = CartLedger::new(vec![line(1, 2, 5), line(2, 1, 5)]);
        let totals = ledger.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_minor(30_000));
        assert_eq!(totals.gst, Money::from_minor(5_400));
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.total, Money::from_minor(35_400));
    }

    #[test]
    fn test_replace_keeps_pending() {
        let mut ledger = CartLedger::new(vec![line(1, 2, 5)]);
        let mutation = ledger.begin_update(1, 3).unwrap();
        ledger.replace(vec![line(1, 3, 5), line(2, 1, 5)]);
        assert!(ledger.is_pending(1));
        assert_eq!(ledger.len(), 2);
        ledger.commit(mutation);
    }
}

//! # portos-core: Pure Storefront Logic
//!
//! This crate holds everything about the Portos storefront that can be
//! expressed without touching the network: the wire types mirrored from the
//! REST API, form validation, the optimistic cart ledger and the checkout
//! draft.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Portos Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`portos`)                          │   │
//! │  │    products ──► cart ──► checkout ──► orders                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                portos-client (reqwest + session)                │   │
//! │  │    StorefrontClient, SessionStore, CartStore                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ portos-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │CartLedger │  │  address  │  │   │
//! │  │   │  Order    │  │  TaxRate  │  │ Mutation  │  │  register │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO ASYNC                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Product, CartLine, Address, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart ledger with optimistic apply / rollback bookkeeping
//! - [`checkout`] - Checkout draft and order request building
//! - [`validation`] - Client-side form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use portos_core::cart::CartLedger;
//! use portos_core::money::Money;
//! use portos_core::types::CartLine;
//!
//! let line = CartLine::new(1, 42, "LM35 Sensor", Money::from_minor(12_000), 2, 5);
//! let mut ledger = CartLedger::new(vec![line]);
//!
//! // Optimistic apply: the ledger changes before any request is made
//! let mutation = ledger.begin_update(1, 10).expect("item is idle");
//! assert_eq!(ledger.line(1).unwrap().quantity, 5); // clamped to stock
//!
//! // The server rejected the change
//! ledger.rollback(mutation);
//! assert_eq!(ledger.line(1).unwrap().quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLedger, CartTotals, Mutation, MutationKind};
pub use checkout::{CheckoutDraft, CheckoutItem};
pub use error::{CoreError, ValidationError};
pub use money::{Money, TaxRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted by add-to-cart.
///
/// Updates on an existing line are bounded by that line's stock instead.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Image shown when the API returns no thumbnail.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/100/100";

/// GST applied at checkout: 18%.
pub const GST_RATE: TaxRate = TaxRate::from_bps(1800);

/// Default page size for product listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

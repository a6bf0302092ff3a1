//! # portos-client
//!
//! Network and disk side of the Portos storefront.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   front end ──► api::* wrapper ──► validate (portos-core)               │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │               http::execute ──► SessionStore::bearer()                  │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                 reqwest ──► storefront REST API                         │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │          ClientResult<T> ──► ApiResponse<T> (for JSON front ends)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart page goes through [`CartStore`], which applies each change to
//! the local cart first and rolls it back if the server refuses.
//!
//! ```rust,no_run
//! use portos_client::{CartStore, ClientConfig, SessionStore, StorefrontClient};
//!
//! # async fn demo() -> portos_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let session = SessionStore::new(config.session_path(), config.session.ttl_days);
//! session.load().await?;
//!
//! let client = StorefrontClient::new(&config, session)?;
//! let cart = CartStore::new(client);
//! cart.refresh().await?;
//! if let Some(line) = cart.lines().first() {
//!     cart.update_quantity(line.id, line.quantity + 1).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cart_store;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::PlacedOrder;
pub use cart_store::{CartBackend, CartStore, MutationOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{Access, StorefrontClient};
pub use response::ApiResponse;
pub use session::{SessionInfo, SessionStore};

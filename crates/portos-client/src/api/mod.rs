//! # Storefront API Wrappers
//!
//! One `impl StorefrontClient` block per resource. Each wrapper validates its
//! input, builds a [`Request`](crate::http::Request) and hands it to the
//! executor.
//!
//! ```text
//! auth.rs       POST /login, POST /register, logout
//! products.rs   GET /products, GET /product/{id}, POST /protected/product/review
//! cart.rs       /protected/cart, /protected/cart/add, /protected/cart/item/{id}
//! addresses.rs  /protected/profile/addresses[/{id}]
//! orders.rs     /protected/orders
//! ```

mod addresses;
mod auth;
mod cart;
mod orders;
mod products;

pub use orders::PlacedOrder;

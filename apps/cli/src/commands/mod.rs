//! One module per storefront page.

pub mod address;
pub mod auth;
pub mod cart;
pub mod config;
pub mod order;
pub mod product;

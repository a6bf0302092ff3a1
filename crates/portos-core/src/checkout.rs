//! # Checkout Draft
//!
//! What the user is about to buy and where it goes. A draft is built from the
//! cart or from a single product ("buy now"); quantity edits here are local
//! and never touch the server cart.

use serde::{Deserialize, Serialize};

use crate::cart::{CartLedger, CartTotals};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Address, CartLine, Id, OrderLineRequest, PlaceOrder, ProductDetail};

/// One product on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: Id,
    pub name: String,
    pub image: String,
    #[serde(with = "crate::money::serde_major")]
    pub price: Money,
    pub quantity: i64,
    pub max_quantity: i64,
}

impl From<&CartLine> for CheckoutItem {
    fn from(line: &CartLine) -> Self {
        CheckoutItem {
            product_id: line.product_id,
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price,
            quantity: line.quantity,
            max_quantity: line.max_quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDraft {
    items: Vec<CheckoutItem>,
    addresses: Vec<Address>,
    selected_address: Option<Id>,
}

impl CheckoutDraft {
    pub fn from_cart(lines: &[CartLine]) -> Self {
        CheckoutDraft {
            items: lines.iter().map(CheckoutItem::from).collect(),
            ..Default::default()
        }
    }

    /// Draft for a single product bought straight from its detail page.
    pub fn buy_now(product: &ProductDetail, quantity: i64) -> Self {
        let max_quantity = product.stock;
        CheckoutDraft {
            items: vec![CheckoutItem {
                product_id: product.id,
                name: product.name.clone(),
                image: product.image().to_string(),
                price: product.price,
                quantity: CartLedger::clamp_quantity(quantity, max_quantity),
                max_quantity,
            }],
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[CheckoutItem] {
        &self.items
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Loads the user's addresses and selects the first one, unless the
    /// current selection is still among them.
    pub fn set_addresses(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;
        let still_there = self
            .selected_address
            .is_some_and(|id| self.addresses.iter().any(|a| a.id == id));
        if !still_there {
            self.selected_address = self.addresses.first().map(|a| a.id);
        }
    }

    pub fn select_address(&mut self, address_id: Id) -> CoreResult<()> {
        if !self.addresses.iter().any(|a| a.id == address_id) {
            return Err(CoreError::UnknownAddress(address_id));
        }
        self.selected_address = Some(address_id);
        Ok(())
    }

    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address?;
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Drops an address deleted on the server. If it was selected, the first
    /// remaining address takes over.
    pub fn address_deleted(&mut self, address_id: Id) {
        self.addresses.retain(|a| a.id != address_id);
        if self.selected_address == Some(address_id) {
            self.selected_address = self.addresses.first().map(|a| a.id);
        }
    }

    /// Sets an item's quantity, clamped to `[1, max_quantity]`. Returns the
    /// value actually applied, or `None` for a product not in the draft.
    pub fn set_quantity(&mut self, product_id: Id, requested: i64) -> Option<i64> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id)?;
        item.quantity = CartLedger::clamp_quantity(requested, item.max_quantity);
        Some(item.quantity)
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(self.items.iter().map(|i| (i.price, i.quantity)))
    }

    /// Builds the `POST /protected/orders` body.
    pub fn to_order_request(&self) -> CoreResult<PlaceOrder> {
        let address = self
            .selected_address()
            .ok_or(CoreError::NoDeliveryAddress)?;
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        Ok(PlaceOrder {
            address_id: address.id,
            items: self
                .items
                .iter()
                .map(|i| OrderLineRequest {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
        })
    }
}

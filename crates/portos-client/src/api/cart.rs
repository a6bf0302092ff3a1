use portos_core::validation::validate_quantity;
use portos_core::{AddToCart, CartContents, CartLine, Id, QuantityUpdate};
use serde::Deserialize;

use crate::error::ClientResult;
use crate::http::{Access, Request, StorefrontClient};

/// `GET /protected/cart` answers `{items}`; older deployments send the array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CartBody {
    Bare(Vec<CartLine>),
    Wrapped(CartContents),
}

impl StorefrontClient {
    pub async fn cart(&self) -> ClientResult<Vec<CartLine>> {
        let request = Request::get("/protected/cart", Access::Protected)
            .on_failure("Failed to fetch cart");
        Ok(match self.execute::<CartBody>(request).await? {
            CartBody::Bare(items) => items,
            CartBody::Wrapped(contents) => contents.items,
        })
    }

    pub async fn add_to_cart(&self, product_id: Id, quantity: i64) -> ClientResult<()> {
        validate_quantity(quantity)?;

        let request = Request::post("/protected/cart/add", Access::Protected)
            .json(&AddToCart {
                product_id,
                quantity,
            })?
            .on_failure("Failed to add item to cart")
            .on_not_found("Product not found");
        self.execute_ack(request).await
    }

    /// Sets the quantity of cart item `item_id` (not a product id).
    pub async fn update_cart_item(&self, item_id: Id, quantity: i64) -> ClientResult<()> {
        let request = Request::put(format!("/protected/cart/item/{item_id}"), Access::Protected)
            .json(&QuantityUpdate { quantity })?
            .on_failure("Failed to update cart")
            .on_not_found("Cart item not found");
        self.execute_ack(request).await
    }

    pub async fn remove_cart_item(&self, item_id: Id) -> ClientResult<()> {
        let request = Request::delete(format!("/protected/cart/item/{item_id}"), Access::Protected)
            .on_failure("Failed to remove item from cart")
            .on_not_found("Cart item not found");
        self.execute_ack(request).await
    }
}

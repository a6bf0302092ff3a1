use portos_core::{CheckoutDraft, Id, OrderHistory, PlaceOrder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClientResult;
use crate::http::{Access, Request, StorefrontClient};

/// What `POST /protected/orders` tells us about the new order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    #[serde(default, alias = "id", alias = "orderId")]
    pub order_id: Option<Id>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StorefrontClient {
    pub async fn place_order(&self, order: &PlaceOrder) -> ClientResult<PlacedOrder> {
        let request = Request::post("/protected/orders", Access::Protected)
            .json(order)?
            .on_failure("Failed to place order");
        let placed: Option<PlacedOrder> = self.execute(request).await?;
        let placed = placed.unwrap_or_default();
        info!(order_id = ?placed.order_id, lines = order.items.len(), "Order placed");
        Ok(placed)
    }

    /// Places the order a checkout draft describes. An unselected address
    /// or an empty draft fails before anything is sent.
    pub async fn checkout(&self, draft: &CheckoutDraft) -> ClientResult<PlacedOrder> {
        let order = draft.to_order_request()?;
        self.place_order(&order).await
    }

    pub async fn orders(&self) -> ClientResult<OrderHistory> {
        let request = Request::get("/protected/orders", Access::Protected)
            .on_failure("Failed to fetch orders");
        self.execute(request).await
    }
}

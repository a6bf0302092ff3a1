//! Checkout and order history.
//!
//! ```text
//!   cart (or --buy-now product) ──► CheckoutDraft
//!   GET addresses ──────────────────► draft.set_addresses()
//!   --address / default / first ───► draft.select_address()
//!   summary + confirm ──────────────► POST /protected/orders
//! ```

use clap::Args;
use portos_client::{ClientError, PlacedOrder};
use portos_core::{Address, CartTotals, CheckoutDraft, Id, OrderHistory};
use serde::Serialize;

use crate::app::App;
use crate::error::{CliError, CliResult};
use crate::{prompt, render};

#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Delivery address id (default: your default address, else the first)
    #[arg(short, long)]
    pub address: Option<Id>,

    /// Buy a single product instead of the cart
    #[arg(long, value_name = "PRODUCT_ID")]
    pub buy_now: Option<Id>,

    /// Quantity for --buy-now (clamped to stock)
    #[arg(short, long, default_value_t = 1)]
    pub quantity: i64,

    /// Place the order without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct CheckoutResult {
    #[serde(flatten)]
    order: PlacedOrder,
    totals: CartTotals,
}

/// Explicit choice, else the address marked default. `set_addresses` has
/// already fallen back to the first one.
fn pick_address(draft: &mut CheckoutDraft, requested: Option<Id>) -> CliResult<()> {
    let chosen = requested.or_else(|| {
        draft
            .addresses()
            .iter()
            .find(|a| a.is_default)
            .map(|a: &Address| a.id)
    });
    if let Some(id) = chosen {
        draft.select_address(id).map_err(ClientError::from)?;
    }
    Ok(())
}

async fn build_draft(app: &App, args: &CheckoutArgs) -> CliResult<CheckoutDraft> {
    let mut draft = match args.buy_now {
        Some(product_id) => {
            let product = app.client.product(product_id).await?;
            CheckoutDraft::buy_now(&product, args.quantity)
        }
        None => CheckoutDraft::from_cart(&app.client.cart().await?),
    };
    draft.set_addresses(app.client.addresses().await?);
    pick_address(&mut draft, args.address)?;
    Ok(draft)
}

pub async fn checkout(app: &App, args: CheckoutArgs) -> CliResult<()> {
    let draft = match build_draft(app, &args).await {
        Ok(draft) => draft,
        Err(e) => return app.out.emit(Err::<CheckoutResult, _>(e), |_| {}),
    };

    if !app.out.is_json() {
        render::checkout(&app.out, &draft);
        println!();
    }
    // No prompt for an order that cannot be placed.
    if let Err(e) = draft.to_order_request() {
        return app
            .out
            .emit(Err::<CheckoutResult, _>(ClientError::from(e)), |_| {});
    }
    if !args.yes && !app.out.is_json() && !prompt::confirm("Place this order?").await? {
        println!("Order not placed.");
        return Ok(());
    }

    let totals = draft.totals();
    let result = app
        .client
        .checkout(&draft)
        .await
        .map(|order| CheckoutResult { order, totals });
    app.out.emit(result, |placed| match placed.order.order_id {
        Some(id) => println!(
            "Order #{id} placed. Total {}. Track it with `portos orders {id}`.",
            app.out.money(placed.totals.total)
        ),
        None => println!("Order placed. See `portos orders`."),
    })
}

pub async fn orders(app: &App, order_id: Option<Id>) -> CliResult<()> {
    let history = app.client.orders().await;
    let Some(order_id) = order_id else {
        return app
            .out
            .emit(history, |history: &OrderHistory| render::order_history(&app.out, history));
    };

    let result = history.map_err(CliError::from).and_then(|h| {
        h.find(order_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Order #{order_id} not found")).into())
    });
    app.out
        .emit(result, |order| render::order_detail(&app.out, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portos_core::{CartLine, Money};

    fn address(id: Id, is_default: bool) -> Address {
        Address {
            id,
            name: "Asha".into(),
            address: "12 MG Road".into(),
            city: "Pune".into(),
            state: "MH".into(),
            pincode: "411001".into(),
            phone: "9876543210".into(),
            is_default,
        }
    }

    fn draft() -> CheckoutDraft {
        let lines = vec![CartLine::new(11, 1, "LM35", Money::from_minor(12_000), 2, 5)];
        let mut draft = CheckoutDraft::from_cart(&lines);
        draft.set_addresses(vec![address(1, false), address(2, true)]);
        draft
    }

    #[test]
    fn test_pick_prefers_default_address() {
        let mut draft = draft();
        pick_address(&mut draft, None).unwrap();
        assert_eq!(draft.selected_address().map(|a| a.id), Some(2));
    }

    #[test]
    fn test_pick_explicit_address() {
        let mut draft = draft();
        pick_address(&mut draft, Some(1)).unwrap();
        assert_eq!(draft.selected_address().map(|a| a.id), Some(1));

        let err = pick_address(&mut draft, Some(9)).unwrap_err();
        assert_eq!(err.user_message(), "Address not found: 9");
    }
}

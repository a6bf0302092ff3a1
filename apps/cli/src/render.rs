//! Text rendering for the non-JSON output.

use portos_client::SessionInfo;
use portos_core::{
    Address, CartLine, CartTotals, Category, CheckoutDraft, Order, OrderHistory, ProductDetail,
    ProductPage,
};

use crate::output::Output;

const RATING_BAR_WIDTH: usize = 20;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// A fixed-width bar for a percentage; values outside 0..=100 are clamped.
fn rating_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * RATING_BAR_WIDTH as f64)
        .round()
        .clamp(0.0, RATING_BAR_WIDTH as f64) as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(RATING_BAR_WIDTH - filled)
    )
}

pub fn session(info: &SessionInfo) {
    match &info.user {
        Some(user) => println!("Logged in as {}", user.username),
        None => println!("Logged in"),
    }
    println!("Session valid until {}", info.expires_at.format("%Y-%m-%d %H:%M UTC"));
}

pub fn categories(list: &[Category]) {
    for category in list {
        match category.id() {
            Some(id) => println!("{:<12} (id {id})", category.slug()),
            None => println!("{:<12} (all products)", category.slug()),
        }
    }
}

pub fn products(out: &Output, page: &ProductPage) {
    if page.products.is_empty() {
        println!("No products found.");
        return;
    }
    println!("{:>6}  {:<40}  {:>12}  {:>6}  {}", "ID", "NAME", "PRICE", "STOCK", "RATING");
    for product in &page.products {
        let stock = if product.in_stock() {
            product.stock.to_string()
        } else {
            "out".to_string()
        };
        println!(
            "{:>6}  {:<40}  {:>12}  {:>6}  {} ({})",
            product.id,
            truncate(&product.name, 40),
            out.money(product.price),
            stock,
            stars(product.avg_rating),
            product.total_ratings
        );
    }
    println!(
        "\nPage {} of {} ({} products)",
        page.page, page.total_pages, page.total
    );
}

pub fn product_detail(out: &Output, product: &ProductDetail) {
    println!("{} (#{})", product.name, product.id);
    println!("{}", out.money(product.price));
    if product.stock > 0 {
        println!("In stock: {}", product.stock);
    } else {
        println!("Out of stock");
    }
    if let Some(seller) = &product.seller {
        println!("Sold by {} ({:.1}★, {} sales)", seller.name, seller.rating, seller.total_sales);
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
    if !product.attributes.is_empty() {
        println!();
        for attribute in &product.attributes {
            println!("  {:<20} {}", attribute.name, attribute.value);
        }
    }

    if let Some(summary) = &product.review_summary {
        println!(
            "\n{:.1} {}  {} reviews",
            summary.avg_rating,
            stars(summary.avg_rating),
            summary.total_reviews
        );
        for star in (1..=5u8).rev() {
            let pct = summary.percentage(star);
            println!("  {star}★ {} {:>5.1}%", rating_bar(pct), pct);
        }
    }

    for review in &product.recent_reviews {
        let verified = if review.is_verified { " (verified)" } else { "" };
        println!("\n  {}{verified}", stars(f64::from(review.rating)));
        println!("  {}", review.comment);
    }
}

pub fn totals(out: &Output, totals: &CartTotals) {
    println!("{:>24}  {:>12}", "Subtotal", out.money(totals.subtotal));
    println!("{:>24}  {:>12}", "GST (18%)", out.money(totals.gst));
    println!(
        "{:>24}  {:>12}",
        "Shipping",
        if totals.shipping.is_zero() {
            "Free".to_string()
        } else {
            out.money(totals.shipping)
        }
    );
    println!("{:>24}  {:>12}", "Total", out.money(totals.total));
}

/// Cart lines; `pending` items are marked with `*`.
pub fn cart(out: &Output, lines: &[CartLine], pending: &[i64]) {
    if lines.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    println!(
        "{:>6}  {:<36}  {:>9}  {:>12}  {:>12}",
        "ITEM", "PRODUCT", "QTY", "PRICE", "LINE TOTAL"
    );
    for line in lines {
        let marker = if pending.contains(&line.id) { "*" } else { " " };
        println!(
            "{:>5}{marker}  {:<36}  {:>9}  {:>12}  {:>12}",
            line.id,
            truncate(&line.name, 36),
            format!("{}/{}", line.quantity, line.max_quantity),
            out.money(line.price),
            out.money(line.line_total())
        );
    }
    println!();
    totals(out, &CartTotals::from_lines(lines));
}

pub fn addresses(list: &[Address]) {
    if list.is_empty() {
        println!("No saved addresses. Add one with `portos address add`.");
        return;
    }
    for address in list {
        let default = if address.is_default { " [default]" } else { "" };
        println!("{:>4}  {}{default}", address.id, address.one_line());
        println!("      phone {}", address.phone);
    }
}

pub fn checkout(out: &Output, draft: &CheckoutDraft) {
    for item in draft.items() {
        println!(
            "  {} x {:<36} {:>12}",
            item.quantity,
            truncate(&item.name, 36),
            out.money(item.price.multiply_quantity(item.quantity))
        );
    }
    println!();
    totals(out, &draft.totals());
    match draft.selected_address() {
        Some(address) => println!("\nDeliver to: {}", address.one_line()),
        None => println!("\nNo delivery address selected."),
    }
}

pub fn order_history(out: &Output, history: &OrderHistory) {
    if history.orders.is_empty() {
        println!("No orders yet.");
        return;
    }
    println!("{:>8}  {:<12}  {:<11}  {:>5}  {:>12}", "ORDER", "DATE", "STATUS", "ITEMS", "TOTAL");
    for order in &history.orders {
        let date = order
            .placed_on()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8}  {:<12}  {:<11}  {:>5}  {:>12}",
            order.order_id,
            date,
            order.status,
            order.items.len(),
            out.money(order.total_amount)
        );
    }
    if let Some(total) = history.total_amount {
        println!("\nTotal spent: {}", out.money(total));
    }
}

pub fn order_detail(out: &Output, order: &Order) {
    println!("Order #{}  {}", order.order_id, order.status);
    if let Some(date) = order.placed_on() {
        println!("Placed on {}", date.format("%d %b %Y"));
    }

    let timeline = order.status.timeline();
    if timeline.iter().any(|s| s.completed) {
        let track: Vec<String> = timeline
            .iter()
            .map(|stage| {
                let mark = if stage.completed { "●" } else { "○" };
                format!("{mark} {}", stage.status)
            })
            .collect();
        println!("{}", track.join(" ── "));
    }

    println!();
    for item in &order.items {
        let review = match item.rating {
            Some(r) if item.is_reviewed() => format!("  reviewed {}", stars(f64::from(r))),
            _ => String::new(),
        };
        println!(
            "  {} x {:<36} {:>12}{review}",
            item.quantity,
            truncate(&item.product_name, 36),
            out.money(item.line_total())
        );
    }
    println!("\n{:>40} {:>12}", "Total", out.money(order.total_amount));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("LM35", 10), "LM35");
        assert_eq!(truncate("Temperature Sensor", 8), "Tempera…");
    }

    #[test]
    fn test_rating_bar_stays_within_width() {
        assert_eq!(rating_bar(0.0).chars().count(), RATING_BAR_WIDTH);
        assert_eq!(rating_bar(50.0), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(rating_bar(250.0), "█".repeat(RATING_BAR_WIDTH));
        assert_eq!(rating_bar(1e18).chars().count(), RATING_BAR_WIDTH);
        assert_eq!(rating_bar(-40.0), "░".repeat(RATING_BAR_WIDTH));
        assert_eq!(rating_bar(f64::NAN).chars().count(), RATING_BAR_WIDTH);
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4.4), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(9.0), "★★★★★");
    }
}

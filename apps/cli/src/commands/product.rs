//! Catalogue pages: `products`, `categories`, `product`, and `review`.

use clap::Args;
use portos_core::{Category, Id, Money, NewReview, ProductQuery, SortOrder};

use crate::app::App;
use crate::error::CliResult;
use crate::render;

#[derive(Debug, Clone, Args)]
pub struct ProductFilters {
    /// Name contains
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(short, long)]
    pub category: Option<Category>,

    #[arg(long, value_name = "RUPEES")]
    pub min_price: Option<f64>,

    #[arg(long, value_name = "RUPEES")]
    pub max_price: Option<f64>,

    /// Minimum average rating
    #[arg(long)]
    pub rating: Option<f64>,

    /// Only products with stock
    #[arg(long)]
    pub in_stock: bool,

    /// Field to sort by, e.g. `price`
    #[arg(long)]
    pub sort_by: Option<String>,

    #[arg(long, value_name = "asc|desc")]
    pub order: Option<SortOrder>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = portos_core::DEFAULT_PAGE_LIMIT)]
    pub limit: u32,
}

impl ProductFilters {
    pub fn to_query(&self) -> ProductQuery {
        let base = self
            .category
            .map(ProductQuery::for_category)
            .unwrap_or_default();
        ProductQuery {
            name: self.search.clone(),
            min_price: self.min_price.map(Money::from_major_f64),
            max_price: self.max_price.map(Money::from_major_f64),
            avg_rating: self.rating,
            in_stock: self.in_stock.then_some(true),
            sort_by: self.sort_by.clone(),
            sort_order: self.order,
            page: self.page.max(1),
            limit: self.limit.max(1),
            ..base
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReviewArgs {
    /// Order the product was delivered in
    #[arg(long)]
    pub order: Id,

    #[arg(long)]
    pub product: Id,

    /// 1 to 5
    #[arg(short, long)]
    pub rating: u8,

    #[arg(short, long)]
    pub comment: String,
}

pub async fn products(app: &App, filters: &ProductFilters) -> CliResult<()> {
    let result = app.client.products(&filters.to_query()).await;
    app.out.emit(result, |page| render::products(&app.out, page))
}

/// Without a category, lists them. With one, browses it.
pub async fn categories(app: &App, category: Option<Category>, page: u32) -> CliResult<()> {
    let Some(category) = category else {
        return app
            .out
            .emit(Ok::<_, crate::error::CliError>(Category::ALL.to_vec()), |list| {
                render::categories(list)
            });
    };

    let query = ProductQuery {
        page: page.max(1),
        ..ProductQuery::for_category(category)
    };
    let result = app.client.products(&query).await;
    app.out.emit(result, |page| render::products(&app.out, page))
}

pub async fn product(app: &App, id: Id) -> CliResult<()> {
    let result = app.client.product(id).await;
    app.out.emit(result, |detail| render::product_detail(&app.out, detail))
}

pub async fn review(app: &App, args: ReviewArgs) -> CliResult<()> {
    let review = NewReview {
        order_id: args.order,
        product_id: args.product,
        rating: args.rating,
        comment: args.comment,
    };
    let result = app.client.submit_review(&review).await;
    app.out.emit(result, |()| println!("Thanks for your review!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> ProductFilters {
        ProductFilters {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            rating: None,
            in_stock: false,
            sort_by: None,
            order: None,
            page: 1,
            limit: 10,
        }
    }

    #[test]
    fn test_default_filters_are_default_query() {
        assert_eq!(filters().to_query(), ProductQuery::default());
    }

    #[test]
    fn test_filters_to_query() {
        let query = ProductFilters {
            search: Some("lm35".into()),
            category: Some(Category::Sensors),
            min_price: Some(99.5),
            in_stock: true,
            order: Some(SortOrder::Asc),
            page: 0,
            ..filters()
        }
        .to_query();

        assert_eq!(query.categories, vec![1]);
        assert_eq!(query.min_price, Some(Money::from_minor(9_950)));
        assert_eq!(query.in_stock, Some(true));
        assert_eq!(query.page, 1);
    }
}

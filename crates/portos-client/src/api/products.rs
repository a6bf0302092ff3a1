use portos_core::validation::{validate_price_range, validate_review, validate_search_query};
use portos_core::{Id, NewReview, ProductDetail, ProductPage, ProductQuery};

use crate::error::ClientResult;
use crate::http::{Access, Request, StorefrontClient};

impl StorefrontClient {
    /// One page of the catalogue, filtered by `query`.
    pub async fn products(&self, query: &ProductQuery) -> ClientResult<ProductPage> {
        if let Some(name) = &query.name {
            validate_search_query(name)?;
        }
        validate_price_range(query.min_price, query.max_price)?;

        let request = Request::get("/products", Access::Public)
            .query(query.to_pairs())
            .on_failure("Failed to fetch products");
        self.execute(request).await
    }

    pub async fn product(&self, product_id: Id) -> ClientResult<ProductDetail> {
        let request = Request::get(format!("/product/{product_id}"), Access::Public)
            .on_failure("Failed to fetch product details")
            .on_not_found("Product not found");
        self.execute(request).await
    }

    /// Reviews a product from a delivered order.
    pub async fn submit_review(&self, review: &NewReview) -> ClientResult<()> {
        validate_review(review)?;

        let request = Request::post("/protected/product/review", Access::Protected)
            .json(review)?
            .on_failure("Failed to submit review");
        self.execute_ack(request).await
    }
}

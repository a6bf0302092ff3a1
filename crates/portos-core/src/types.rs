//! # Storefront Types
//!
//! Records mirrored from the storefront REST API.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront Records                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (cart item) │   │  order_id       │       │
//! │  │  price (Money)  │──►│  product_id     │──►│  status         │       │
//! │  │  stock          │   │  max_quantity   │   │  items[]        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Address      │   │     Review      │   │  ProductQuery   │       │
//! │  │  pincode/phone  │   │  rating 1..=5   │   │  → query pairs  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Records are created on fetch, held while a command runs, then dropped.
//! Nothing here is persisted; the only persisted state is the auth token,
//! which lives in `portos-client`.
//!
//! The API is not always consistent about field names (`address` vs
//! `address_line1`, `price` vs `unit_price`, numeric vs string pincodes), so
//! deserializers accept both spellings and serializers emit one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::PLACEHOLDER_IMAGE;

/// Server-assigned numeric identifier.
pub type Id = i64;

// =============================================================================
// Category
// =============================================================================

/// The fixed category catalogue shown on the categories page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Category {
    Suggested,
    Sensors,
    Transistors,
    Connectors,
    Rectifiers,
    Diodes,
    Displays,
    Cables,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Suggested,
        Category::Sensors,
        Category::Transistors,
        Category::Connectors,
        Category::Rectifiers,
        Category::Diodes,
        Category::Displays,
        Category::Cables,
    ];

    /// Server category id. `Suggested` has none and lists everything.
    pub const fn id(&self) -> Option<Id> {
        match self {
            Category::Suggested => None,
            Category::Sensors => Some(1),
            Category::Transistors => Some(2),
            Category::Connectors => Some(3),
            Category::Rectifiers => Some(4),
            Category::Diodes => Some(5),
            Category::Displays => Some(6),
            Category::Cables => Some(7),
        }
    }

    /// Ids to send as `categories[]`.
    pub fn filter_ids(&self) -> Vec<Id> {
        self.id().into_iter().collect()
    }

    pub const fn slug(&self) -> &'static str {
        match self {
            Category::Suggested => "suggested",
            Category::Sensors => "sensors",
            Category::Transistors => "transistors",
            Category::Connectors => "connectors",
            Category::Rectifiers => "rectifiers",
            Category::Diodes => "diodes",
            Category::Displays => "displays",
            Category::Cables => "cables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts `sensors`, `/sensors` or `Sensors`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().trim_start_matches('/').to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.slug() == slug)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product as it appears in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_ratings: i64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Thumbnail, or the placeholder image when the API has none.
    pub fn image(&self) -> &str {
        image_or_placeholder(self.thumbnail_url.as_deref())
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// One page of `GET /products`.
///
/// The endpoint answers either with a bare array or with
/// `{products, total, page, totalPages}`; both decode into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductPageWire")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductPageWire {
    Bare(Vec<Product>),
    Paged {
        #[serde(default)]
        products: Vec<Product>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
    },
}

impl From<ProductPageWire> for ProductPage {
    fn from(wire: ProductPageWire) -> Self {
        match wire {
            ProductPageWire::Bare(products) => ProductPage {
                total: products.len() as u64,
                page: 1,
                total_pages: 1,
                products,
            },
            ProductPageWire::Paged {
                products,
                total,
                page,
                total_pages,
            } => ProductPage {
                total: total.unwrap_or(products.len() as u64),
                page: page.unwrap_or(1),
                total_pages: total_pages.unwrap_or(1),
                products,
            },
        }
    }
}

impl ProductPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Seller {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_sales: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Review counts per star, keyed `"1"`..`"5"` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatingDistribution {
    #[serde(rename = "1", default)]
    pub one: u32,
    #[serde(rename = "2", default)]
    pub two: u32,
    #[serde(rename = "3", default)]
    pub three: u32,
    #[serde(rename = "4", default)]
    pub four: u32,
    #[serde(rename = "5", default)]
    pub five: u32,
}

impl RatingDistribution {
    pub fn count(&self, star: u8) -> u32 {
        match star {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 0,
        }
    }

    /// Share of `total` reviews with this star, 0 when there are none.
    pub fn percentage(&self, star: u8, total: u32) -> f64 {
        if total == 0 {
            return 0.0;
        }
        f64::from(self.count(star)) * 100.0 / f64::from(total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReviewSummary {
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub rating_distribution: RatingDistribution,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ReviewSummary {
    pub fn percentage(&self, star: u8) -> f64 {
        self.rating_distribution
            .percentage(star, self.total_reviews)
    }
}

/// Response of `GET /product/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetail {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub seller: Option<Seller>,
    #[serde(default)]
    pub categories: Vec<Id>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub review_summary: Option<ReviewSummary>,
    #[serde(default)]
    pub recent_reviews: Vec<Review>,
}

impl ProductDetail {
    pub fn image(&self) -> &str {
        image_or_placeholder(self.thumbnail_url.as_deref())
    }
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Review {
    pub id: Id,
    pub user_id: Id,
    pub product_id: Id,
    #[serde(default)]
    pub order_id: Option<Id>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub date: Option<String>,
}

/// Body of `POST /protected/product/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReview {
    pub order_id: Id,
    pub product_id: Id,
    pub rating: u8,
    pub comment: String,
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the cart.
///
/// `id` is the cart item id used in `/protected/cart/item/{id}`, not the
/// product id. `max_quantity` arrives as `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub id: Id,
    pub product_id: Id,
    pub name: String,
    #[serde(
        rename = "thumbnail_url",
        default = "placeholder_image",
        deserialize_with = "image_url"
    )]
    pub image: String,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub price: Money,
    pub quantity: i64,
    #[serde(rename = "stock")]
    pub max_quantity: i64,
}

impl CartLine {
    pub fn new(
        id: Id,
        product_id: Id,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
        max_quantity: i64,
    ) -> Self {
        Self {
            id,
            product_id,
            name: name.into(),
            image: PLACEHOLDER_IMAGE.to_string(),
            price,
            quantity,
            max_quantity,
        }
    }

    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// Response of `GET /protected/cart`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContents {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// Body of `POST /protected/cart/add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddToCart {
    pub product_id: Id,
    pub quantity: i64,
}

/// Body of `PUT /protected/cart/item/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    pub id: Id,
    pub name: String,
    #[serde(alias = "address_line1")]
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "postal_code", deserialize_with = "string_or_number")]
    pub pincode: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    #[serde(rename = "isDefault", alias = "is_default", default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line rendering for lists and the checkout summary.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {} - {}",
            self.name, self.address, self.city, self.state, self.pincode
        )
    }
}

/// Body of `POST /protected/profile/addresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

/// Body of `PUT /protected/profile/addresses/{id}`. Absent fields are left
/// unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddressPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "isDefault", skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        *self == AddressPatch::default()
    }

    /// The address as it would look after this patch.
    pub fn applied_to(&self, current: &Address) -> NewAddress {
        NewAddress {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            address: self
                .address
                .clone()
                .unwrap_or_else(|| current.address.clone()),
            city: self.city.clone().unwrap_or_else(|| current.city.clone()),
            state: self.state.clone().unwrap_or_else(|| current.state.clone()),
            pincode: self
                .pincode
                .clone()
                .unwrap_or_else(|| current.pincode.clone()),
            phone: self.phone.clone().unwrap_or_else(|| current.phone.clone()),
            is_default: self.is_default.unwrap_or(current.is_default),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order lifecycle status.
///
/// Parsed case-insensitively. Anything the client does not know is kept
/// verbatim in `Unknown` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
    Unknown(String),
}

/// Stages shown on the order tracking timeline, in order.
pub const TIMELINE_STAGES: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Packed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

/// One row of the tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStage {
    pub status: OrderStatus,
    pub completed: bool,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Position on the timeline, `None` for statuses that are not stages.
    pub fn stage_index(&self) -> Option<usize> {
        TIMELINE_STAGES.iter().position(|s| s == self)
    }

    /// Tracking timeline: a stage is completed when it is at or before the
    /// current status. Off-timeline statuses complete nothing.
    pub fn timeline(&self) -> Vec<TimelineStage> {
        let current = self.stage_index();
        TIMELINE_STAGES
            .iter()
            .enumerate()
            .map(|(index, stage)| TimelineStage {
                status: stage.clone(),
                completed: current.is_some_and(|c| index <= c),
            })
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "packed" => OrderStatus::Packed,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" | "canceled" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(s.to_string()),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrderStatus::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub order_id: Option<Id>,
    pub product_id: Id,
    pub quantity: i64,
    #[serde(alias = "unit_price", with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Rating the buyer already left for this item, if any.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub review_comment: Option<String>,
}

impl OrderItem {
    pub fn image(&self) -> &str {
        image_or_placeholder(self.thumbnail_url.as_deref())
    }

    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    pub fn is_reviewed(&self) -> bool {
        self.rating.is_some_and(|r| r > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub order_id: Id,
    #[serde(default)]
    pub customer_id: Option<Id>,
    #[serde(default)]
    pub address_id: Option<Id>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[ts(type = "string")]
    pub status: OrderStatus,
    #[serde(with = "crate::money::serde_major")]
    #[ts(type = "number")]
    pub total_amount: Money,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Order {
    /// Calendar date the order was placed, if the server sent a parsable one.
    pub fn placed_on(&self) -> Option<NaiveDate> {
        self.order_date
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(parse_date)
    }
}

/// Response of `GET /protected/orders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHistory {
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, with = "crate::money::serde_major::option")]
    pub total_amount: Option<Money>,
}

impl OrderHistory {
    pub fn find(&self, order_id: Id) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }
}

/// One line of `POST /protected/orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub product_id: Id,
    pub quantity: i64,
}

/// Body of `POST /protected/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlaceOrder {
    pub address_id: Id,
    pub items: Vec<OrderLineRequest>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[serde(default)]
    pub id: Option<Id>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `POST /login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Product Query
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("sort order must be asc or desc, got {other:?}")),
        }
    }
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub avg_rating: Option<f64>,
    pub categories: Vec<Id>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            name: None,
            min_price: None,
            max_price: None,
            avg_rating: None,
            categories: Vec::new(),
            in_stock: None,
            sort_by: None,
            sort_order: None,
            page: 1,
            limit: crate::DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ProductQuery {
    /// Query restricted to one catalogue category.
    pub fn for_category(category: Category) -> Self {
        Self {
            categories: category.filter_ids(),
            ..Self::default()
        }
    }

    /// Renders the query string pairs. Unset filters are omitted; page and
    /// limit are always sent. Categories repeat as `categories[]`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_major_f64().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_major_f64().to_string()));
        }
        if let Some(rating) = self.avg_rating {
            pairs.push(("avg_rating", rating.to_string()));
        }
        for id in &self.categories {
            pairs.push(("categories[]", id.to_string()));
        }
        if let Some(in_stock) = self.in_stock {
            pairs.push(("in_stock", in_stock.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sort_order", order.as_str().to_string()));
        }
        pairs.push(("page", self.page.max(1).to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn image_or_placeholder(url: Option<&str>) -> &str {
    match url {
        Some(u) if !u.trim().is_empty() => u,
        _ => PLACEHOLDER_IMAGE,
    }
}

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

fn image_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let url = Option::<String>::deserialize(deserializer)?;
    Ok(image_or_placeholder(url.as_deref()).to_string())
}

/// Pincodes and phone numbers arrive as strings from some endpoints and as
/// numbers from others.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Parses `2024-03-01T10:00:00Z` or a bare `2024-03-01`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_mapping() {
        assert_eq!(Category::Suggested.filter_ids(), Vec::<Id>::new());
        assert_eq!(Category::Sensors.id(), Some(1));
        assert_eq!(Category::Cables.id(), Some(7));
        assert_eq!("/diodes".parse::<Category>(), Ok(Category::Diodes));
        assert_eq!("Displays".parse::<Category>(), Ok(Category::Displays));
        assert!("resistors".parse::<Category>().is_err());
    }

    #[test]
    fn test_product_page_accepts_bare_array() {
        let page: ProductPage = serde_json::from_value(json!([
            {"id": 1, "name": "LM35", "price": 120.5, "stock": 4}
        ]))
        .unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total, 1);
        assert_eq!(page.products[0].price, Money::from_minor(12050));
        assert_eq!(page.products[0].image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_product_page_accepts_paged_object() {
        let page: ProductPage = serde_json::from_value(json!({
            "products": [{"id": 2, "name": "BC547", "price": 3, "thumbnail_url": "/t.png"}],
            "total": 31,
            "page": 2,
            "totalPages": 4
        }))
        .unwrap();
        assert_eq!(page.total, 31);
        assert_eq!(page.page, 2);
        assert!(page.has_next());
        assert_eq!(page.products[0].image(), "/t.png");
    }

    #[test]
    fn test_cart_line_from_wire() {
        let line: CartLine = serde_json::from_value(json!({
            "id": 11,
            "product_id": 42,
            "name": "LM35 Sensor",
            "thumbnail_url": null,
            "price": 120,
            "stock": 5,
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(line.max_quantity, 5);
        assert_eq!(line.image, PLACEHOLDER_IMAGE);
        assert_eq!(line.line_total(), Money::from_minor(24000));
    }

    #[test]
    fn test_address_accepts_both_spellings() {
        let a: Address = serde_json::from_value(json!({
            "id": 1, "name": "Asha", "address": "12 MG Road", "city": "Pune",
            "state": "MH", "pincode": 411001, "phone": "9876543210", "isDefault": true
        }))
        .unwrap();
        assert_eq!(a.pincode, "411001");
        assert!(a.is_default);

        let b: Address = serde_json::from_value(json!({
            "id": 2, "name": "Ravi", "address_line1": "4 Park St", "city": "Kolkata",
            "state": "WB", "postal_code": "700016", "phone": 9123456780_i64, "is_default": false
        }))
        .unwrap();
        assert_eq!(b.address, "4 Park St");
        assert_eq!(b.phone, "9123456780");

        let out = serde_json::to_value(&a).unwrap();
        assert_eq!(out["isDefault"], json!(true));
    }

    #[test]
    fn test_address_patch_serializes_only_set_fields() {
        let patch = AddressPatch {
            city: Some("Mumbai".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"city": "Mumbai"}));
        assert!(!patch.is_empty());
        assert!(AddressPatch::default().is_empty());
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!(OrderStatus::from("Shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::from("canceled"), OrderStatus::Cancelled);
        assert_eq!(
            OrderStatus::from("on-hold"),
            OrderStatus::Unknown("on-hold".into())
        );
    }

    #[test]
    fn test_timeline_marks_stages_up_to_current() {
        let done: Vec<bool> = OrderStatus::Shipped
            .timeline()
            .iter()
            .map(|s| s.completed)
            .collect();
        assert_eq!(done, vec![true, true, true, false]);

        let done: Vec<bool> = OrderStatus::Pending
            .timeline()
            .iter()
            .map(|s| s.completed)
            .collect();
        assert_eq!(done, vec![true, false, false, false]);
    }

    #[test]
    fn test_timeline_for_off_stage_status_is_empty() {
        assert!(OrderStatus::Processing
            .timeline()
            .iter()
            .all(|s| !s.completed));
        assert!(OrderStatus::Cancelled
            .timeline()
            .iter()
            .all(|s| !s.completed));
    }

    #[test]
    fn test_order_history_decodes_unit_price() {
        let history: OrderHistory = serde_json::from_value(json!({
            "user_id": 3,
            "total_amount": 480.0,
            "orders": [{
                "order_id": 77,
                "order_date": "2024-03-01T10:00:00Z",
                "status": "PACKED",
                "total_amount": 480,
                "items": [{"product_id": 42, "quantity": 4, "unit_price": 120, "product_name": "LM35"}]
            }]
        }))
        .unwrap();
        let order = history.find(77).unwrap();
        assert_eq!(order.status, OrderStatus::Packed);
        assert_eq!(order.items[0].line_total(), Money::from_minor(48000));
        assert_eq!(
            order.placed_on(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(history.total_amount, Some(Money::from_minor(48000)));
    }

    #[test]
    fn test_rating_distribution_percentage() {
        let summary: ReviewSummary = serde_json::from_value(json!({
            "avg_rating": 4.2,
            "total_reviews": 4,
            "rating_distribution": {"1": 0, "2": 0, "3": 1, "4": 1, "5": 2}
        }))
        .unwrap();
        assert_eq!(summary.percentage(5), 50.0);
        assert_eq!(summary.percentage(1), 0.0);
        assert_eq!(RatingDistribution::default().percentage(5, 0), 0.0);
    }

    #[test]
    fn test_product_query_pairs() {
        let query = ProductQuery {
            name: Some("  lm35 ".into()),
            min_price: Some(Money::from_minor(10000)),
            categories: vec![1, 5],
            in_stock: Some(true),
            sort_order: Some(SortOrder::Desc),
            ..ProductQuery::default()
        };
        let pairs = query.to_pairs();
        assert!(pairs.contains(&("name", "lm35".to_string())));
        assert!(pairs.contains(&("min_price", "100".to_string())));
        assert_eq!(
            pairs.iter().filter(|(k, _)| *k == "categories[]").count(),
            2
        );
        assert!(pairs.contains(&("page", "1".to_string())));
        assert!(pairs.contains(&("limit", "10".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "max_price"));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials {
            username: "asha".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}

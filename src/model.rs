// Core structs: upstream KeyCRM records and the derived feed offer.
use serde::Deserialize;
use thiserror::Error;

/// Currency the feed is priced in; the marketplace expects a single
/// currency declared at rate 1.
pub const HOME_CURRENCY: &str = "UAH";

/// One name/value pair from an offer's raw property list. Names are not
/// guaranteed unique across the list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferAttributes {
    pub currency_code: Option<String>,
}

/// Catalog-level product an offer may be nested under.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub vendor_name: Option<String>,
    pub article: Option<String>,
    pub category_id: Option<i64>,
}

/// Sellable SKU-level record from `GET /offers?include=product`.
///
/// Every field the API may omit is optional or defaulted; per-record
/// defects are absorbed downstream, never surfaced as errors.
#[derive(Debug, Clone, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
    pub article: Option<String>,
    pub vendor_code: Option<String>,
    pub code: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    pub product: Option<Product>,
    pub attributes: Option<OfferAttributes>,
}

/// One row from `GET /offers/stocks`. Rows without an offer id are
/// dropped by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct StockLevel {
    pub offer_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
}

/// One row from `GET /products/categories`. Rows missing id or name are
/// dropped by the loader, not stored with a placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Fully joined offer record the assembler emits from: offer + product
/// fields with stock quantity substituted, deduplicated properties, and
/// both resolved article values.
#[derive(Debug, Clone)]
pub struct ReconciledOffer {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub vendor: String,
    pub price: f64,
    pub currency: String,
    pub quantity: i64,
    /// Present only when the id exists in the fetched category map.
    pub category_id: Option<i64>,
    pub picture: Option<String>,
    /// Deduplicated name/value pairs, first-occurrence order, last value
    /// wins per name.
    pub properties: Vec<(String, String)>,
    pub color: String,
    pub size: String,
    /// Marketplace grouping key, shared by all size variants of the same
    /// product + color.
    pub grouping_article: String,
    /// Original size-specific stock-keeping code from the CRM.
    pub crm_sku: String,
}

/// Errors from the KeyCRM API client. A non-success page status is not
/// represented here: it truncates the resource instead of failing the
/// request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

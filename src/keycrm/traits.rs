use crate::model::{ApiError, Offer};
use std::collections::HashMap;

/// Read-side of the commerce API: one load per paginated resource.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// All offers with nested product data, in upstream order.
    async fn load_offers(&self) -> Result<Vec<Offer>, ApiError>;

    /// Offer id → stock quantity. Authoritative over the offer's own
    /// quantity field.
    async fn load_stocks(&self) -> Result<HashMap<i64, i64>, ApiError>;

    /// Category id → display name. Flat; no hierarchy.
    async fn load_categories(&self) -> Result<HashMap<i64, String>, ApiError>;
}

use crate::config::AppConfig;
use crate::keycrm::traits::CatalogSource;
use crate::model::{ApiError, Category, Offer, StockLevel};

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tokio::time::{Duration, sleep};
use tracing::warn;

/// Pause between consecutive page requests, a courtesy to the API rate
/// limiter rather than a correctness requirement.
const PAGE_DELAY: Duration = Duration::from_millis(100);

/// Envelope every KeyCRM list endpoint wraps its records in.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Page<T> {
    #[serde(default)]
    data: Vec<T>,
}

pub struct KeyCrmClient {
    client: Client,
    base_url: String,
    token: String,
    page_size: usize,
}

impl KeyCrmClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            // A zero page size would never terminate the walk below.
            page_size: config.page_size.max(1),
        }
    }

    /// Walks `page=1..` of a list endpoint, accumulating `data` records
    /// until an empty or short page. A non-success status stops the walk
    /// and keeps what was already fetched; transport and decode failures
    /// propagate instead.
    async fn fetch_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[
                    ("page", page.to_string()),
                    ("limit", self.page_size.to_string()),
                ])
                .query(extra_query)
                .send()
                .await?;

            if !response.status().is_success() {
                warn!(
                    path,
                    page,
                    status = %response.status(),
                    "page request failed, keeping records fetched so far"
                );
                break;
            }

            let body = response.text().await?;
            let parsed: Page<T> = serde_json::from_str(&body)?;
            let count = parsed.data.len();
            records.extend(parsed.data);

            if count < self.page_size {
                break;
            }
            page += 1;
            sleep(PAGE_DELAY).await;
        }

        Ok(records)
    }
}

#[async_trait::async_trait]
impl CatalogSource for KeyCrmClient {
    async fn load_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.fetch_pages("offers", &[("include", "product")]).await
    }

    async fn load_stocks(&self) -> Result<HashMap<i64, i64>, ApiError> {
        let levels: Vec<StockLevel> = self.fetch_pages("offers/stocks", &[]).await?;
        let mut stocks = HashMap::new();
        for level in levels {
            if let Some(offer_id) = level.offer_id {
                stocks.insert(offer_id, level.quantity);
            }
        }
        Ok(stocks)
    }

    async fn load_categories(&self) -> Result<HashMap<i64, String>, ApiError> {
        let rows: Vec<Category> = self.fetch_pages("products/categories", &[]).await?;
        let mut categories = HashMap::new();
        for row in rows {
            if let (Some(id), Some(name)) = (row.id, row.name) {
                if !name.trim().is_empty() {
                    categories.insert(id, name);
                }
            }
        }
        Ok(categories)
    }
}

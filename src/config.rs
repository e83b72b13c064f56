use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;

const DEFAULT_API_URL: &str = "https://openapi.keycrm.app/v1";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_ARTICLE_PREFIX: &str = "ZNM";

/// Shop metadata emitted once per document.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_shop_name")]
    pub name: String,
    #[serde(default = "default_shop_name")]
    pub company: String,
    #[serde(default = "default_shop_url")]
    pub url: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: default_shop_name(),
            company: default_shop_name(),
            url: default_shop_url(),
        }
    }
}

/// One entry of the grouping-article override table: all size variants of
/// `product_id` in `color` group under `article`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleOverride {
    pub product_id: i64,
    pub color: String,
    pub article: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default = "default_article_prefix")]
    pub article_prefix: String,
    #[serde(default)]
    pub article_overrides: Vec<ArticleOverride>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            bind_addr: default_bind_addr(),
            page_size: default_page_size(),
            shop: ShopConfig::default(),
            article_prefix: default_article_prefix(),
            article_overrides: Vec::new(),
        }
    }
}

/// Loads configuration from a JSON file, then applies environment
/// overrides (`KEYCRM_API_URL`, `KEYCRM_API_KEY`, `BIND_ADDR`). A missing
/// file is not an error: the service can boot from defaults plus env.
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config: AppConfig = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)?,
        Err(err) if err.kind() == ErrorKind::NotFound => AppConfig::default(),
        Err(err) => return Err(err.into()),
    };

    if let Ok(url) = env::var("KEYCRM_API_URL") {
        config.api_url = url;
    }
    if let Ok(token) = env::var("KEYCRM_API_KEY") {
        config.api_token = token;
    }
    if let Ok(addr) = env::var("BIND_ADDR") {
        config.bind_addr = addr;
    }

    Ok(config)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_article_prefix() -> String {
    DEFAULT_ARTICLE_PREFIX.to_string()
}

fn default_shop_name() -> String {
    "Znana Mama".to_string()
}

fn default_shop_url() -> String {
    "https://yourshop.ua".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.article_prefix, DEFAULT_ARTICLE_PREFIX);
        assert_eq!(config.shop.name, "Znana Mama");
        assert!(config.article_overrides.is_empty());
        assert!(config.api_token.is_empty());
    }

    #[test]
    fn overrides_table_parses() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "api_token": "secret",
                "page_size": 10,
                "shop": {"name": "Shop", "company": "Shop LLC", "url": "https://shop.ua"},
                "article_overrides": [
                    {"product_id": 123, "color": "Чорний", "article": "ZN-507"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.shop.company, "Shop LLC");
        assert_eq!(config.article_overrides.len(), 1);
        assert_eq!(config.article_overrides[0].product_id, 123);
        assert_eq!(config.article_overrides[0].article, "ZN-507");
    }
}

// Article resolution: the two SKU-like values every emitted offer carries.
use crate::config::ArticleOverride;
use crate::model::Offer;
use std::collections::HashMap;

/// Resolves the marketplace grouping article and the original CRM SKU for
/// each offer.
///
/// The override table and prefix are injected at construction; the
/// resolver holds no process-wide state.
pub struct ArticleResolver {
    overrides: HashMap<(i64, String), String>,
    prefix: String,
}

impl ArticleResolver {
    pub fn new(prefix: impl Into<String>, overrides: &[ArticleOverride]) -> Self {
        let overrides = overrides
            .iter()
            .map(|o| ((o.product_id, o.color.clone()), o.article.clone()))
            .collect();
        Self {
            overrides,
            prefix: prefix.into(),
        }
    }

    /// Returns `(grouping_article, crm_sku)` for one offer. `color` and
    /// `size` are the already-reconciled property values including their
    /// locale fallbacks.
    pub fn resolve(&self, offer: &Offer, color: &str, size: &str) -> (String, String) {
        let crm_sku = self.crm_sku(offer);
        let grouping = self.grouping_article(offer, color, size, &crm_sku);
        (grouping, crm_sku)
    }

    /// Original stock-keeping code, evaluated over an explicit candidate
    /// order: `sku`, `article`, `vendor_code`, `code`, then the offer id.
    /// First non-blank value wins.
    pub fn crm_sku(&self, offer: &Offer) -> String {
        let candidates = [
            offer.sku.as_deref(),
            offer.article.as_deref(),
            offer.vendor_code.as_deref(),
            offer.code.as_deref(),
        ];
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| offer.id.to_string())
    }

    /// Grouping key shared by all size variants of one product + color.
    ///
    /// Order: override table hit on `(product_id, color)`, then the
    /// product's own article, then `{prefix}-{product_id}`. Offers with no
    /// nested product fall back to the CRM SKU with a trailing size token
    /// stripped. The first three rules depend only on product id and
    /// color, and the last one can never apply to two offers sharing a
    /// product id, so variants of one product + color always agree.
    fn grouping_article(&self, offer: &Offer, color: &str, size: &str, crm_sku: &str) -> String {
        let product = offer.product.as_ref();
        if let Some(product_id) = product.and_then(|p| p.id) {
            if let Some(article) = self.overrides.get(&(product_id, color.to_string())) {
                return article.clone();
            }
            if let Some(article) = product.and_then(|p| p.article.as_deref()) {
                let article = article.trim();
                if !article.is_empty() {
                    return article.to_string();
                }
            }
            return format!("{}-{}", self.prefix, product_id);
        }
        strip_size_suffix(crm_sku, size)
    }
}

/// Strips a trailing `-<size>` token from a SKU when the final token
/// matches the offer's size; returns the SKU unchanged otherwise.
fn strip_size_suffix(sku: &str, size: &str) -> String {
    match sku.rsplit_once('-') {
        Some((base, tail)) if !base.is_empty() && tail.to_lowercase() == size.to_lowercase() => {
            base.to_string()
        }
        _ => sku.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Offer;

    fn offer(json: serde_json::Value) -> Offer {
        serde_json::from_value(json).unwrap()
    }

    fn resolver() -> ArticleResolver {
        ArticleResolver::new("ZNM", &[])
    }

    #[test]
    fn crm_sku_prefers_sku_field() {
        let offer = offer(serde_json::json!({
            "id": 1, "sku": "ZN-507-S", "article": "A", "vendor_code": "V", "code": "C"
        }));
        assert_eq!(resolver().crm_sku(&offer), "ZN-507-S");
    }

    #[test]
    fn crm_sku_skips_blank_candidates() {
        let offer = offer(serde_json::json!({
            "id": 1, "sku": "  ", "article": null, "vendor_code": "V-1"
        }));
        assert_eq!(resolver().crm_sku(&offer), "V-1");
    }

    #[test]
    fn crm_sku_falls_back_to_offer_id() {
        let offer = offer(serde_json::json!({"id": 42}));
        assert_eq!(resolver().crm_sku(&offer), "42");
    }

    #[test]
    fn override_table_wins_over_product_id() {
        let resolver = ArticleResolver::new(
            "ZNM",
            &[ArticleOverride {
                product_id: 123,
                color: "Чорний".to_string(),
                article: "ZN-507".to_string(),
            }],
        );
        let offer = offer(serde_json::json!({
            "id": 1, "sku": "ZN-507-S", "product": {"id": 123}
        }));
        let (grouping, _) = resolver.resolve(&offer, "Чорний", "S");
        assert_eq!(grouping, "ZN-507");
    }

    #[test]
    fn override_is_color_specific() {
        let resolver = ArticleResolver::new(
            "ZNM",
            &[ArticleOverride {
                product_id: 123,
                color: "Чорний".to_string(),
                article: "ZN-507".to_string(),
            }],
        );
        let offer = offer(serde_json::json!({"id": 1, "product": {"id": 123}}));
        let (grouping, _) = resolver.resolve(&offer, "Синій", "S");
        assert_eq!(grouping, "ZNM-123");
    }

    #[test]
    fn product_article_beats_prefix() {
        let offer = offer(serde_json::json!({
            "id": 1, "product": {"id": 9, "article": "BASE-9"}
        }));
        let (grouping, _) = resolver().resolve(&offer, "Чорний", "S");
        assert_eq!(grouping, "BASE-9");
    }

    #[test]
    fn prefix_derivation_from_product_id() {
        let offer = offer(serde_json::json!({"id": 1, "product": {"id": 456}}));
        let (grouping, _) = resolver().resolve(&offer, "Не вказано", "-");
        assert_eq!(grouping, "ZNM-456");
    }

    #[test]
    fn same_product_and_color_group_identically() {
        let small = offer(serde_json::json!({
            "id": 1, "sku": "ZN-1-S", "product": {"id": 7}
        }));
        let medium = offer(serde_json::json!({
            "id": 2, "sku": "ZN-1-M", "product": {"id": 7}
        }));
        let resolver = resolver();
        let (a, _) = resolver.resolve(&small, "Чорний", "S");
        let (b, _) = resolver.resolve(&medium, "Чорний", "M");
        assert_eq!(a, b);
    }

    #[test]
    fn productless_offer_strips_size_suffix() {
        let offer = offer(serde_json::json!({"id": 1, "sku": "ZN-901-XS"}));
        let (grouping, crm_sku) = resolver().resolve(&offer, "Чорний", "XS");
        assert_eq!(grouping, "ZN-901");
        assert_eq!(crm_sku, "ZN-901-XS");
    }

    #[test]
    fn productless_offer_without_matching_suffix_keeps_sku() {
        let offer = offer(serde_json::json!({"id": 1, "sku": "ZN901"}));
        let (grouping, _) = resolver().resolve(&offer, "Чорний", "M");
        assert_eq!(grouping, "ZN901");
    }
}

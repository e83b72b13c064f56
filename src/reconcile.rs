// Joins offers with stock and category data and folds raw properties.
use crate::article::ArticleResolver;
use crate::model::{HOME_CURRENCY, Offer, RawProperty, ReconciledOffer};
use std::collections::HashMap;

/// Property names the upstream catalog uses for color and size, with the
/// locale fallbacks the marketplace expects when a value is absent.
pub const COLOR_PROPERTY: &str = "Колір";
pub const SIZE_PROPERTY: &str = "Розмір";
pub const COLOR_FALLBACK: &str = "Не вказано";
pub const SIZE_FALLBACK: &str = "-";

const NO_DESCRIPTION: &str = "Опис відсутній";

/// True for any casing variant of the size property name.
pub fn is_size_property(name: &str) -> bool {
    name.to_lowercase() == SIZE_PROPERTY.to_lowercase()
}

/// Folds a raw property list into unique name/value pairs: first
/// occurrence fixes the position, the last value for a name wins.
/// Nameless entries are dropped.
pub fn fold_properties(raw: &[RawProperty]) -> Vec<(String, String)> {
    let mut folded: Vec<(String, String)> = Vec::new();
    for prop in raw {
        if prop.name.is_empty() {
            continue;
        }
        match folded.iter_mut().find(|(name, _)| *name == prop.name) {
            Some((_, value)) => *value = prop.value.clone(),
            None => folded.push((prop.name.clone(), prop.value.clone())),
        }
    }
    folded
}

/// Builds the feed-side record for every raw offer, in upstream order.
pub fn reconcile(
    offers: &[Offer],
    stocks: &HashMap<i64, i64>,
    categories: &HashMap<i64, String>,
    resolver: &ArticleResolver,
    shop_name: &str,
) -> Vec<ReconciledOffer> {
    offers
        .iter()
        .map(|offer| reconcile_offer(offer, stocks, categories, resolver, shop_name))
        .collect()
}

fn reconcile_offer(
    offer: &Offer,
    stocks: &HashMap<i64, i64>,
    categories: &HashMap<i64, String>,
    resolver: &ArticleResolver,
    shop_name: &str,
) -> ReconciledOffer {
    // Stock endpoint is authoritative; the offer's own quantity is only a
    // fallback, and absent both ways means out of stock.
    let quantity = stocks
        .get(&offer.id)
        .copied()
        .or(offer.quantity)
        .unwrap_or(0);

    let product = offer.product.as_ref();

    let name = non_blank(product.and_then(|p| p.name.as_deref()))
        .or_else(|| non_blank(offer.name.as_deref()))
        .unwrap_or_else(|| format!("Offer {}", offer.id));
    let description = non_blank(product.and_then(|p| p.description.as_deref()))
        .or_else(|| non_blank(offer.description.as_deref()))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let vendor = non_blank(product.and_then(|p| p.vendor.as_deref()))
        .or_else(|| non_blank(product.and_then(|p| p.vendor_name.as_deref())))
        .unwrap_or_else(|| shop_name.to_string());

    let category_id = product
        .and_then(|p| p.category_id)
        .filter(|id| categories.contains_key(id));

    let currency = offer
        .attributes
        .as_ref()
        .and_then(|a| non_blank(a.currency_code.as_deref()))
        .unwrap_or_else(|| HOME_CURRENCY.to_string());

    let properties = fold_properties(&offer.properties);
    let color = last_property(&offer.properties, COLOR_PROPERTY)
        .unwrap_or_else(|| COLOR_FALLBACK.to_string());
    let size = last_property(&offer.properties, SIZE_PROPERTY)
        .unwrap_or_else(|| SIZE_FALLBACK.to_string());

    let (grouping_article, crm_sku) = resolver.resolve(offer, &color, &size);

    ReconciledOffer {
        id: offer.id,
        name,
        description,
        vendor,
        price: offer.price,
        currency,
        quantity,
        category_id,
        picture: non_blank(offer.thumbnail_url.as_deref()),
        properties,
        color,
        size,
        grouping_article,
        crm_sku,
    }
}

/// Last non-blank value for a property name, matched across casing
/// variants.
fn last_property(raw: &[RawProperty], name: &str) -> Option<String> {
    let needle = name.to_lowercase();
    raw.iter()
        .rev()
        .find(|p| p.name.to_lowercase() == needle && !p.value.trim().is_empty())
        .map(|p| p.value.clone())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

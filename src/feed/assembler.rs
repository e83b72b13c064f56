use crate::config::ShopConfig;
use crate::model::{HOME_CURRENCY, ReconciledOffer};
use crate::reconcile::{SIZE_PROPERTY, is_size_property};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;
use std::io::Cursor;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serializes the complete `yml_catalog` document.
///
/// `date` is the generation timestamp shown in the root attribute; the
/// caller formats it so the assembler stays a pure function of its
/// inputs.
pub fn build_feed(
    shop: &ShopConfig,
    categories: &HashMap<i64, String>,
    offers: &[ReconciledOffer],
    date: &str,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut root = BytesStart::new("yml_catalog");
    root.push_attribute(("date", date));
    writer
        .write_event(Event::Start(root))
        .context("Failed to write yml_catalog element")?;

    writer
        .write_event(Event::Start(BytesStart::new("shop")))
        .context("Failed to write shop element")?;

    write_text_element(&mut writer, "name", &shop.name)?;
    write_text_element(&mut writer, "company", &shop.company)?;
    write_text_element(&mut writer, "url", &shop.url)?;

    writer
        .write_event(Event::Start(BytesStart::new("currencies")))
        .context("Failed to write currencies element")?;
    let mut currency = BytesStart::new("currency");
    currency.push_attribute(("id", HOME_CURRENCY));
    currency.push_attribute(("rate", "1"));
    writer
        .write_event(Event::Empty(currency))
        .context("Failed to write currency element")?;
    writer
        .write_event(Event::End(BytesEnd::new("currencies")))
        .context("Failed to write currencies end")?;

    // Sorted by id so an unchanged catalog always serializes identically.
    writer
        .write_event(Event::Start(BytesStart::new("categories")))
        .context("Failed to write categories element")?;
    let mut sorted: Vec<(&i64, &String)> = categories.iter().collect();
    sorted.sort_by_key(|(id, _)| **id);
    for (id, name) in sorted {
        let mut category = BytesStart::new("category");
        category.push_attribute(("id", id.to_string().as_str()));
        writer
            .write_event(Event::Start(category))
            .context("Failed to write category element")?;
        writer
            .write_event(Event::Text(BytesText::new(name)))
            .context("Failed to write category name")?;
        writer
            .write_event(Event::End(BytesEnd::new("category")))
            .context("Failed to write category end")?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("categories")))
        .context("Failed to write categories end")?;

    writer
        .write_event(Event::Start(BytesStart::new("offers")))
        .context("Failed to write offers element")?;
    for offer in offers {
        write_offer(&mut writer, offer)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("offers")))
        .context("Failed to write offers end")?;

    writer
        .write_event(Event::End(BytesEnd::new("shop")))
        .context("Failed to write shop end")?;
    writer
        .write_event(Event::End(BytesEnd::new("yml_catalog")))
        .context("Failed to write yml_catalog end")?;

    Ok(writer.into_inner().into_inner())
}

fn write_offer(writer: &mut XmlWriter, offer: &ReconciledOffer) -> Result<()> {
    let id = offer.id.to_string();
    let mut start = BytesStart::new("offer");
    start.push_attribute(("id", id.as_str()));
    start.push_attribute((
        "available",
        if offer.quantity > 0 { "true" } else { "false" },
    ));
    writer
        .write_event(Event::Start(start))
        .context("Failed to write offer element")?;

    write_text_element(writer, "name", &offer.name)?;
    write_text_element(writer, "price", &offer.price.to_string())?;
    write_text_element(writer, "currencyId", &offer.currency)?;
    write_text_element(writer, "stock_quantity", &offer.quantity.to_string())?;
    if let Some(category_id) = offer.category_id {
        write_text_element(writer, "categoryId", &category_id.to_string())?;
    }
    if let Some(picture) = &offer.picture {
        write_text_element(writer, "picture", picture)?;
    }
    write_text_element(writer, "description", &offer.description)?;
    write_text_element(writer, "vendor", &offer.vendor)?;
    write_text_element(writer, "article", &offer.grouping_article)?;
    write_text_element(writer, "vendorCode", &offer.crm_sku)?;

    // Size is excluded here and emitted exactly once below under its
    // canonical name.
    for (name, value) in &offer.properties {
        if is_size_property(name) {
            continue;
        }
        write_param(writer, name, value)?;
    }
    write_param(writer, SIZE_PROPERTY, &offer.size)?;

    writer
        .write_event(Event::End(BytesEnd::new("offer")))
        .context("Failed to write offer end")?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {name} element"))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .with_context(|| format!("Failed to write {name} text"))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {name} end"))?;
    Ok(())
}

fn write_param(writer: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    let mut param = BytesStart::new("param");
    param.push_attribute(("name", name));
    writer
        .write_event(Event::Start(param))
        .context("Failed to write param element")?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .context("Failed to write param value")?;
    writer
        .write_event(Event::End(BytesEnd::new("param")))
        .context("Failed to write param end")?;
    Ok(())
}

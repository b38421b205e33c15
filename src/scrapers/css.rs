use scraper::{Html, Selector};
use serde_json::Value;

use crate::resource::Resource;

/// Extracts element text (or an attribute) via a CSS selector
///
/// The argument is a selector, optionally suffixed with `@attribute` to pick
/// an attribute value instead of the element text, e.g.
/// `span.price` or `meta[itemprop="price"]@content`. One match yields a
/// scalar, several yield an array, none yields an absent value.
pub fn extract(resource: &mut Resource, query: &str) -> Option<Value> {
    let (selector_str, attribute) = split_attribute(query);
    let selector = Selector::parse(selector_str.trim()).ok()?;

    let html = resource.content().ok()?.to_string();
    let document = Html::parse_document(&html);

    let mut values = Vec::new();
    for element in document.select(&selector) {
        let value = match attribute {
            Some(attribute) => match element.value().attr(attribute) {
                Some(value) => value.to_string(),
                None => continue,
            },
            None => element.text().collect::<String>().trim().to_string(),
        };
        values.push(Value::String(value));
    }

    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::Array(values)),
    }
}

/// Splits a trailing `@attribute` suffix off the selector, if present
fn split_attribute(query: &str) -> (&str, Option<&str>) {
    if let Some((selector, attribute)) = query.rsplit_once('@') {
        let is_name = !attribute.is_empty()
            && attribute
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !selector.is_empty() && is_name {
            return (selector, Some(attribute));
        }
    }
    (query, None)
}

use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};

use crate::resource::Resource;

/// Extracts a value from the page's first top-level microdata item
///
/// Items are represented as `{"type": [...], "properties": {name: [values]}}`
/// with nested itemscopes recursing into the same shape. The argument is a
/// `/`-separated path of property names and array indices walked from the
/// item root, e.g. `/properties/offers/0/properties/price/0`.
pub fn extract(resource: &mut Resource, item_path: &str) -> Option<Value> {
    let html = resource.content().ok()?.to_string();
    let document = Html::parse_document(&html);

    let item = first_item(&document)?;
    walk(&item, item_path)
}

fn first_item(document: &Html) -> Option<Value> {
    let selector = Selector::parse("[itemscope]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            // Nested itemscopes are reached through their parent item
            !element
                .ancestors()
                .filter_map(|node| node.value().as_element())
                .any(|ancestor| ancestor.attr("itemscope").is_some())
        })
        .map(|element| build_item(&element))
}

fn build_item(element: &ElementRef) -> Value {
    let mut item = Map::new();

    if let Some(itemtype) = element.value().attr("itemtype") {
        item.insert("type".to_string(), json!([itemtype]));
    }

    let mut properties: Map<String, Value> = Map::new();
    let prop_selector = match Selector::parse("[itemprop]") {
        Ok(selector) => selector,
        Err(_) => return Value::Object(item),
    };

    for prop_element in element.select(&prop_selector) {
        if !belongs_to_scope(&prop_element, element) {
            continue;
        }
        let Some(name) = prop_element.value().attr("itemprop") else {
            continue;
        };

        let value = if prop_element.value().attr("itemscope").is_some() {
            build_item(&prop_element)
        } else {
            Value::String(scalar_value(&prop_element))
        };

        // Every property holds a list of values, repeated properties append
        if let Value::Array(values) = properties
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            values.push(value);
        }
    }

    item.insert("properties".to_string(), Value::Object(properties));
    Value::Object(item)
}

/// True when the property belongs directly to `scope`, not to a nested item
fn belongs_to_scope(prop_element: &ElementRef, scope: &ElementRef) -> bool {
    let mut current = prop_element.parent();
    while let Some(node) = current {
        if let Some(element) = node.value().as_element() {
            if node.id() == scope.id() {
                return true;
            }
            if element.attr("itemscope").is_some() {
                return false;
            }
        }
        current = node.parent();
    }
    false
}

fn scalar_value(element: &ElementRef) -> String {
    let value = element.value();
    match value.name() {
        "meta" => value.attr("content").unwrap_or("").to_string(),
        "link" | "a" | "area" => value.attr("href").unwrap_or("").to_string(),
        "img" | "audio" | "video" | "source" | "embed" | "iframe" => {
            value.attr("src").unwrap_or("").to_string()
        }
        "time" => value
            .attr("datetime")
            .map(str::to_string)
            .unwrap_or_else(|| element.text().collect::<String>().trim().to_string()),
        "data" | "meter" => value.attr("value").unwrap_or("").to_string(),
        _ => element.text().collect::<String>().trim().to_string(),
    }
}

/// Walks a `/`-separated path of object keys and array indices
fn walk(item: &Value, path: &str) -> Option<Value> {
    let mut current = item;
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        current = match segment.parse::<i64>() {
            Ok(index) => {
                let items = current.as_array()?;
                let index = if index < 0 {
                    index.checked_add(items.len() as i64)?
                } else {
                    index
                };
                items.get(usize::try_from(index).ok()?)?
            }
            Err(_) => current.get(segment)?,
        };
    }
    Some(current.clone())
}

use scraper::{Html, Selector};
use serde_json::Value;

use crate::resource::Resource;

/// Extracts an Open Graph property from the page's meta tags
///
/// The argument is the property name without the `og:` prefix, e.g. `title`
/// or `image`.
pub fn extract(resource: &mut Resource, tag: &str) -> Option<Value> {
    let html = resource.content().ok()?.to_string();
    let document = Html::parse_document(&html);

    let selector = Selector::parse("meta[property]").ok()?;
    let wanted = format!("og:{tag}");

    for element in document.select(&selector) {
        if element.value().attr("property") != Some(wanted.as_str()) {
            continue;
        }
        if let Some(content) = element.value().attr("content") {
            if !content.is_empty() {
                return Some(Value::String(content.to_string()));
            }
        }
    }

    None
}

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::resource::Resource;

fn asin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bdp/([^/]+)\b").unwrap())
}

/// Commerce-catalog lookup keyed by the product id in the resource URL
///
/// Captures the ASIN from the `dp/<id>` URL segment, fetches the catalog
/// document for it through the resource's transport and returns the
/// requested field. The argument is the field name, e.g. `title` or
/// `price_and_currency` (the latter arrives as a two-element array, usually
/// paired with the `index` filter).
pub fn lookup(resource: &mut Resource, item: &str, endpoint: &str) -> Option<Value> {
    let asin = asin_re()
        .captures(resource.url())?
        .get(1)?
        .as_str()
        .to_string();

    let request = format!("{}/{}", endpoint.trim_end_matches('/'), asin);
    let request = Url::parse(&request).ok()?;
    debug!("catalog lookup for {asin}");

    let mut catalog = Resource::new(request.as_str(), resource.transport());
    let body = catalog.content().ok()?.to_string();
    let document: Value = serde_json::from_str(&body).ok()?;

    document.get(item).cloned().filter(|value| !value.is_null())
}

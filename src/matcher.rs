use log::debug;
use regex::Regex;

use crate::registry::{PlatformConfig, PlatformRegistry};
use crate::url::{sanitize_url, split_url};

/// Finds the platform whose match rule applies to the given URL
///
/// The URL is sanitized first, then split into its network location and the
/// remainder from the path onward (path + query + fragment), so a `url.path`
/// pattern can also match query-string content. Platforms are tried in
/// declaration order and the first one passing both the domain-suffix test
/// and the unanchored path search wins. URLs matching no platform, and
/// inputs that are not URLs at all, yield `None`.
pub fn match_platform<'r>(
    registry: &'r PlatformRegistry,
    url: &str,
) -> Option<(&'r str, &'r PlatformConfig)> {
    let url = sanitize_url(url);
    let parts = split_url(&url);

    for platform in registry.iter() {
        let rule = &platform.config.match_rule;

        if !rule
            .domains
            .iter()
            .any(|suffix| parts.netloc.ends_with(suffix.as_str()))
        {
            continue;
        }

        // Invalid patterns are not validated at load time; they simply never
        // match.
        let pattern = match Regex::new(&rule.path) {
            Ok(pattern) => pattern,
            Err(err) => {
                debug!("platform [{}] has an unusable url.path: {err}", platform.name);
                continue;
            }
        };

        if pattern.is_match(parts.rest) {
            return Some((platform.name.as_str(), &platform.config));
        }
    }

    None
}

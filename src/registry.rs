use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::error::ExtractError;

/// A `<function>.<argument>` reference from the configuration
///
/// Split on the first `.`; the argument is opaque to the engine and handed
/// verbatim to whatever function the name resolves to. A value without a
/// separator becomes a function name with an empty argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function: String,
    pub argument: String,
}

impl FunctionCall {
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((function, argument)) => Self {
                function: function.to_string(),
                argument: argument.to_string(),
            },
            None => Self {
                function: raw.to_string(),
                argument: String::new(),
            },
        }
    }
}

/// The two-stage pipeline producing one product attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recipe {
    pub method: Option<FunctionCall>,
    pub filter: Option<FunctionCall>,
}

/// URL matching rule for a platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    /// Domain suffixes, in configuration order
    pub domains: Vec<String>,
    /// Raw regular-expression pattern searched against path + query + fragment
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub match_rule: MatchRule,
    pub recipes: HashMap<String, Recipe>,
}

impl PlatformConfig {
    /// Builds a typed config from the raw key/value pairs of one section
    ///
    /// Returns `None` when the section lacks `url.domains` or `url.path`;
    /// such sections are dropped from the registry without an error.
    fn from_pairs(pairs: &[(String, String)]) -> Option<Self> {
        let mut domains = None;
        let mut path = None;
        let mut recipes: HashMap<String, Recipe> = HashMap::new();

        for (key, value) in pairs {
            // A bare key is implicitly the method stage of a recipe
            let (group, field) = match key.split_once('.') {
                Some((group, field)) => (group, field),
                None => (key.as_str(), "method"),
            };

            if group == "url" {
                match field {
                    "domains" => {
                        domains = Some(
                            value
                                .split(',')
                                .map(|domain| domain.trim().to_string())
                                .collect(),
                        )
                    }
                    "path" => path = Some(value.clone()),
                    _ => {}
                }
            } else {
                let recipe = recipes.entry(group.to_string()).or_default();
                match field {
                    "method" => recipe.method = Some(FunctionCall::parse(value)),
                    "filter" => recipe.filter = Some(FunctionCall::parse(value)),
                    _ => {}
                }
            }
        }

        Some(Self {
            match_rule: MatchRule {
                domains: domains?,
                path: path?,
            },
            recipes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub config: PlatformConfig,
}

/// Parsed, validated platform configuration
///
/// Immutable after construction; platforms keep their declaration order,
/// which drives the matcher's first-registered-wins rule.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
    rejected: Vec<String>,
}

impl PlatformRegistry {
    /// Load a registry from a platforms file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::ConfigNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse a registry from sectioned key/value text; never fails
    pub fn parse(text: &str) -> Self {
        let mut platforms = Vec::new();
        let mut rejected = Vec::new();

        for (name, pairs) in collect_sections(text) {
            match PlatformConfig::from_pairs(&pairs) {
                Some(config) => platforms.push(Platform { name, config }),
                None => {
                    warn!("dropping platform [{name}]: missing url.domains or url.path");
                    rejected.push(name);
                }
            }
        }

        Self {
            platforms,
            rejected,
        }
    }

    /// Platforms in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PlatformConfig> {
        self.platforms
            .iter()
            .find(|platform| platform.name == name)
            .map(|platform| &platform.config)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Names of sections dropped for missing match fields, in source order
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

/// First pass: raw key/value pairs per section, in source order
///
/// Keys are lower-cased (ConfigParser convention); section names are kept
/// verbatim. Lines without a `=`/`:` delimiter and comment lines are skipped.
fn collect_sections(text: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push((name.trim().to_string(), Vec::new()));
            continue;
        }

        let Some(delim) = line.find(['=', ':']) else {
            continue;
        };
        let (key, value) = (&line[..delim], &line[delim + 1..]);
        if let Some((_, pairs)) = sections.last_mut() {
            pairs.push((key.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMAZON: &str = "
        [amazon]
        url.path    = /.*/dp/.*/.*
        url.domains = amazon, junglee
        image_url   = amazon_api.large_image_url
        name        = amazon_api.title
        price       = amazon_api.price_and_currency
    ";

    #[test]
    fn parses_amazon_section() {
        let registry = PlatformRegistry::parse(AMAZON);
        assert_eq!(registry.len(), 1);

        let config = registry.get("amazon").unwrap();
        assert_eq!(config.match_rule.domains, vec!["amazon", "junglee"]);
        assert_eq!(config.match_rule.path, "/.*/dp/.*/.*");
        assert_eq!(config.recipes.len(), 3);

        let price = &config.recipes["price"];
        assert_eq!(
            price.method,
            Some(FunctionCall {
                function: "amazon_api".into(),
                argument: "price_and_currency".into(),
            })
        );
        assert_eq!(price.filter, None);
    }

    #[test]
    fn bare_key_is_equivalent_to_method_key() {
        let bare = PlatformRegistry::parse(
            "[a]\nurl.domains = a.com\nurl.path = x\nprice = api.title",
        );
        let explicit = PlatformRegistry::parse(
            "[a]\nurl.domains = a.com\nurl.path = x\nprice.method = api.title",
        );
        assert_eq!(
            bare.get("a").unwrap().recipes["price"],
            explicit.get("a").unwrap().recipes["price"]
        );
    }

    #[test]
    fn comma_separated_domains_keep_order_and_count() {
        let registry = PlatformRegistry::parse(
            "[flipkart]
             url.domains = flipkart, flip.kart, flipkar.t, .flipkart, www.flipkart.com, flip-kart
             url.path = (.*/dp/.*/.8)|(/uaa/.*/.*/.*)|(/a/.*/.*)",
        );
        let config = registry.get("flipkart").unwrap();
        assert_eq!(
            config.match_rule.domains,
            vec![
                "flipkart",
                "flip.kart",
                "flipkar.t",
                ".flipkart",
                "www.flipkart.com",
                "flip-kart"
            ]
        );
    }

    #[test]
    fn path_pattern_is_kept_raw() {
        let registry = PlatformRegistry::parse(
            "[ebay]\nurl.domains = ebay.com\nurl.path = *.////\\s([^abc])",
        );
        assert_eq!(
            registry.get("ebay").unwrap().match_rule.path,
            "*.////\\s([^abc])"
        );
    }

    #[test]
    fn incomplete_sections_are_dropped_silently() {
        let registry = PlatformRegistry::parse(
            "[amaz.on]
             domains = amaz.on
             urlpath = xyz

             [amazon]
             url.domains = amazon.com
             url.path = xyz",
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.get("amazon").is_some());
        assert_eq!(registry.rejected(), ["amaz.on"]);
    }

    #[test]
    fn valid_sections_survive_a_trailing_invalid_one() {
        let registry = PlatformRegistry::parse(
            "[amazon]
             url.domains = amazon.com
             url.path = xyz

             [flipkart]
             url.domains = flipkart.com
             url.path = flipped

             [amaz.on]
             domain = amaz.on
             path = xyz",
        );
        let names: Vec<_> = registry.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["amazon", "flipkart"]);
        assert_eq!(registry.rejected(), ["amaz.on"]);
    }

    #[test]
    fn recipe_filter_stage_is_parsed() {
        let registry = PlatformRegistry::parse(
            "[shop]
             url.domains = shop.example
             url.path = /product/
             price.method = microdata./properties/offers/0/properties/price/0
             price.filter = regex.(\\d+\\.\\d+)",
        );
        let price = &registry.get("shop").unwrap().recipes["price"];
        let method = price.method.as_ref().unwrap();
        assert_eq!(method.function, "microdata");
        assert_eq!(method.argument, "/properties/offers/0/properties/price/0");
        let filter = price.filter.as_ref().unwrap();
        assert_eq!(filter.function, "regex");
        assert_eq!(filter.argument, "(\\d+\\.\\d+)");
    }

    #[test]
    fn value_without_separator_degrades_to_empty_argument() {
        let call = FunctionCall::parse("opengraph");
        assert_eq!(call.function, "opengraph");
        assert_eq!(call.argument, "");
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = PlatformRegistry::from_path("does-not-exist.ini");
        assert!(matches!(
            err,
            Err(crate::error::ExtractError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.ini");
        std::fs::write(&path, AMAZON).unwrap();

        let registry = PlatformRegistry::from_path(&path).unwrap();
        assert_eq!(registry.len(), 1);
    }
}

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::error::ExtractError;
use crate::matcher::match_platform;
use crate::pipeline::{evaluate, Registries};
use crate::registry::{PlatformConfig, PlatformRegistry};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::web::{HttpTransport, WebClient};

/// Mapping from attribute name to extracted value
///
/// Attributes whose pipeline produced nothing are present with `Value::Null`.
pub type ExtractionResult = HashMap<String, Value>;

/// Returns product info given the URL of a product page on a configured
/// e-commerce platform
pub struct Extractor {
    registry: PlatformRegistry,
    functions: Registries,
    transport: Arc<dyn HttpTransport>,
}

impl Extractor {
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::default()
    }

    /// Extractor with the bundled functions, loading the platforms file named
    /// in the settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ExtractError> {
        Self::builder()
            .config_path(&settings.platforms_file)
            .settings(settings.clone())
            .build()
    }

    /// Return the product info found at the given URL
    ///
    /// An unmatched URL yields an empty mapping; per-attribute scraping
    /// failures yield `Value::Null` entries. This never fails.
    pub fn extract(&self, url: &str) -> ExtractionResult {
        let mut product = ExtractionResult::new();
        let mut resource = Resource::new(url, Arc::clone(&self.transport));

        let Some((name, config)) = match_platform(&self.registry, resource.url()) else {
            debug!("no platform matches {url}");
            return product;
        };
        debug!("matched platform [{name}] for {url}");

        for (attribute, recipe) in &config.recipes {
            let value = evaluate(recipe, &mut resource, &self.functions);
            product.insert(attribute.clone(), value);
        }

        product
    }

    /// The platform whose match rule applies to the given URL, if any
    pub fn match_platform(&self, url: &str) -> Option<(&str, &PlatformConfig)> {
        match_platform(&self.registry, url)
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Names of configuration sections dropped for missing match fields
    pub fn rejected_platforms(&self) -> &[String] {
        self.registry.rejected()
    }
}

/// Builder for configuring an [`Extractor`]
///
/// The transport and the function registries are injectable so tests can run
/// against canned pages and stub functions.
#[derive(Default)]
pub struct ExtractorBuilder {
    settings: Option<Settings>,
    config_path: Option<PathBuf>,
    config_text: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    functions: Option<Registries>,
}

impl ExtractorBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Load the platform configuration from a file
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use already-loaded platform configuration text
    pub fn config_text(mut self, text: impl Into<String>) -> Self {
        self.config_text = Some(text.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn functions(mut self, functions: Registries) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn build(self) -> Result<Extractor, ExtractError> {
        let settings = self.settings.unwrap_or_default();

        let registry = match (self.config_text, self.config_path) {
            (Some(text), _) => PlatformRegistry::parse(&text),
            (None, Some(path)) => PlatformRegistry::from_path(path)?,
            (None, None) => {
                return Err(ExtractError::Builder(
                    "no platform configuration given; use .config_path() or .config_text()"
                        .to_string(),
                ))
            }
        };

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(WebClient::new(&settings)));
        let functions = self
            .functions
            .unwrap_or_else(|| Registries::builtin(&settings));

        Ok(Extractor {
            registry,
            functions,
            transport,
        })
    }
}

//! Config-driven product attribute extraction from e-commerce pages
//!
//! Instead of a hand-written scraper per site, platforms are described in a
//! sectioned configuration file: a URL matching rule plus, per attribute, a
//! retrieval method and an optional transform filter referenced by name.
//!
//! ```ini
//! [flipkart]
//! url.domains = flipkart.com
//! url.path = /.*/p/.*
//! name = opengraph.title
//! price.method = microdata./properties/offers/0/properties/price/0
//! price.filter = regex.(\d+[.,]?\d*)
//! ```
//!
//! ```no_run
//! use pricetag::{Extractor, Settings};
//!
//! # fn main() -> Result<(), pricetag::ExtractError> {
//! let extractor = Extractor::from_settings(&Settings::default())?;
//! let product = extractor.extract("http://www.flipkart.com/some-shirt/p/itmdvgwn");
//! println!("{:?}", product.get("price"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extractor;
pub mod filters;
pub mod matcher;
pub mod pipeline;
pub mod registry;
pub mod resource;
pub mod scrapers;
pub mod settings;
pub mod url;
pub mod web;

pub use crate::error::{ExtractError, FetchError};
pub use crate::extractor::{ExtractionResult, Extractor, ExtractorBuilder};
pub use crate::pipeline::Registries;
pub use crate::registry::PlatformRegistry;
pub use crate::resource::Resource;
pub use crate::settings::Settings;
pub use crate::url::sanitize_url;
pub use crate::web::{HttpTransport, StaticTransport, WebClient};

/// One-call extraction with ambient settings and the bundled functions
pub fn extract_product(url: &str) -> Result<ExtractionResult, ExtractError> {
    let settings = Settings::load()?;
    let extractor = Extractor::from_settings(&settings)?;
    Ok(extractor.extract(url))
}

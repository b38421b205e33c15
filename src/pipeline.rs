use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use crate::registry::Recipe;
use crate::resource::Resource;
use crate::settings::Settings;
use crate::{filters, scrapers};

/// A retrieval function pulls a raw value out of a fetched page
pub type RetrievalFn = Box<dyn Fn(&mut Resource, &str) -> Option<Value> + Send + Sync>;

/// A transform function post-processes a retrieved value
pub type TransformFn = Box<dyn Fn(&Value, &str) -> Option<Value> + Send + Sync>;

/// Name → function registries consulted by the evaluator
///
/// Configuration references functions by name; anything not registered here
/// resolves to a silent passthrough. [`Registries::builtin`] wires up the
/// bundled scrapers and filters; tests swap in their own closures.
#[derive(Default)]
pub struct Registries {
    retrievals: HashMap<String, RetrievalFn>,
    transforms: HashMap<String, TransformFn>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled scrapers and filters
    pub fn builtin(settings: &Settings) -> Self {
        let mut registries = Self::new();

        registries.register_retrieval("microdata", scrapers::microdata::extract);
        registries.register_retrieval("opengraph", scrapers::opengraph::extract);
        registries.register_retrieval("css", scrapers::css::extract);

        let endpoint = settings.catalog_endpoint.clone();
        registries.register_retrieval("amazon_api", move |resource, item| {
            scrapers::amazon::lookup(resource, item, &endpoint)
        });

        registries.register_transform("regex", filters::regex::apply);
        registries.register_transform("index", filters::index::apply);

        registries
    }

    pub fn register_retrieval(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&mut Resource, &str) -> Option<Value> + Send + Sync + 'static,
    ) {
        self.retrievals.insert(name.into(), Box::new(function));
    }

    pub fn register_transform(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&Value, &str) -> Option<Value> + Send + Sync + 'static,
    ) {
        self.transforms.insert(name.into(), Box::new(function));
    }

    fn retrieval(&self, name: &str) -> Option<&RetrievalFn> {
        self.retrievals.get(name)
    }

    fn transform(&self, name: &str) -> Option<&TransformFn> {
        self.transforms.get(name)
    }
}

/// Value threaded between the two pipeline stages
enum StageValue {
    /// No stage has produced anything yet; the resource handle itself
    Resource,
    Data(Option<Value>),
}

/// Runs a recipe's method and filter stages against a resource
///
/// Each stage resolves its function by name and is skipped silently when the
/// name is unknown. A pipeline that never produced data yields the resource's
/// URL; a pipeline whose stages came up empty yields `Value::Null`.
pub fn evaluate(recipe: &Recipe, resource: &mut Resource, functions: &Registries) -> Value {
    let mut current = StageValue::Resource;

    if let Some(call) = &recipe.method {
        match functions.retrieval(&call.function) {
            Some(function) => current = StageValue::Data(function(resource, &call.argument)),
            None => debug!("unknown retrieval function '{}', stage skipped", call.function),
        }
    }

    if let Some(call) = &recipe.filter {
        match functions.transform(&call.function) {
            Some(function) => {
                current = match current {
                    // A value that is still the resource handle reaches the
                    // transform as its URL string.
                    StageValue::Resource => {
                        let url = Value::String(resource.url().to_string());
                        StageValue::Data(function(&url, &call.argument))
                    }
                    StageValue::Data(Some(value)) => {
                        StageValue::Data(function(&value, &call.argument))
                    }
                    StageValue::Data(None) => StageValue::Data(None),
                };
            }
            None => debug!("unknown transform function '{}', stage skipped", call.function),
        }
    }

    match current {
        StageValue::Resource => Value::String(resource.url().to_string()),
        StageValue::Data(Some(value)) => value,
        StageValue::Data(None) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::registry::FunctionCall;
    use crate::web::StaticTransport;

    fn resource(url: &str) -> Resource {
        Resource::new(url, Arc::new(StaticTransport::new()))
    }

    fn recipe(method: Option<&str>, filter: Option<&str>) -> Recipe {
        Recipe {
            method: method.map(FunctionCall::parse),
            filter: filter.map(FunctionCall::parse),
        }
    }

    #[test]
    fn method_then_filter_receive_their_arguments() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut functions = Registries::new();

        let log = calls.clone();
        functions.register_retrieval("microdata", move |_, arg| {
            log.lock().unwrap().push(format!("microdata:{arg}"));
            Some(json!("xyz"))
        });
        let log = calls.clone();
        functions.register_transform("regex", move |value, arg| {
            log.lock().unwrap().push(format!("regex:{}:{arg}", value.as_str().unwrap()));
            Some(json!("filtered"))
        });

        let mut resource = resource("http://shop.example/p/1");
        let result = evaluate(&recipe(Some("microdata.name"), Some("regex.abc")), &mut resource, &functions);

        assert_eq!(result, json!("filtered"));
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["microdata:name".to_string(), "regex:xyz:abc".to_string()]
        );
    }

    #[test]
    fn unresolved_method_passes_the_resource_through() {
        let functions = Registries::new();
        let mut resource = resource("http://shop.example/p/1");

        let result = evaluate(&recipe(Some("nope.arg"), None), &mut resource, &functions);
        assert_eq!(result, json!("http://shop.example/p/1"));
    }

    #[test]
    fn unresolved_filter_keeps_the_method_result() {
        let mut functions = Registries::new();
        functions.register_retrieval("css", |_, _| Some(json!("29.99")));

        let mut resource = resource("http://shop.example/p/1");
        let result = evaluate(&recipe(Some("css.span"), Some("nope.0")), &mut resource, &functions);
        assert_eq!(result, json!("29.99"));
    }

    #[test]
    fn filter_over_an_untouched_resource_sees_the_url() {
        let mut functions = Registries::new();
        functions.register_transform("regex", filters::regex::apply);

        let mut resource = resource("http://shop.example/p/42");
        let result = evaluate(&recipe(None, Some("regex.p/(\\d+)")), &mut resource, &functions);
        assert_eq!(result, json!("42"));
    }

    #[test]
    fn empty_method_result_skips_the_filter_and_yields_null() {
        let filtered = Arc::new(Mutex::new(false));
        let mut functions = Registries::new();
        functions.register_retrieval("css", |_, _| None);
        let touched = filtered.clone();
        functions.register_transform("regex", move |_, _| {
            *touched.lock().unwrap() = true;
            Some(json!("should not happen"))
        });

        let mut resource = resource("http://shop.example/p/1");
        let result = evaluate(&recipe(Some("css.span"), Some("regex.x")), &mut resource, &functions);

        assert_eq!(result, Value::Null);
        assert!(!*filtered.lock().unwrap());
    }

    #[test]
    fn empty_recipe_yields_the_url() {
        let functions = Registries::new();
        let mut resource = resource("http://shop.example/p/1");
        let result = evaluate(&Recipe::default(), &mut resource, &functions);
        assert_eq!(result, json!("http://shop.example/p/1"));
    }

    #[test]
    fn builtin_registries_cover_the_bundled_functions() {
        let functions = Registries::builtin(&Settings::default());
        for name in ["microdata", "opengraph", "css", "amazon_api"] {
            assert!(functions.retrieval(name).is_some(), "missing retrieval {name}");
        }
        for name in ["regex", "index"] {
            assert!(functions.transform(name).is_some(), "missing transform {name}");
        }
    }
}

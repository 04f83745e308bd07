use crate::core::generator::CatalogGenerator;
use crate::core::media::encode_uri_component;
use crate::domain::ports::{SearchQuery, ServiceDirectory};
use crate::utils::error::{AdapterError, Result};
use serde_json::{json, Map, Value};

pub const DISABILITY_SERVICES_CODE: &str = "disability_services";
pub const ON_SEARCH_ACTION: &str = "on_search";

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `message.intent.category.descriptor.code`, if the request carries one.
pub fn intent_category_code(request: &Value) -> Option<&str> {
    request
        .pointer("/message/intent/category/descriptor/code")
        .and_then(Value::as_str)
}

pub fn is_disability_search(request: &Value) -> bool {
    intent_category_code(request)
        .map(|code| code.eq_ignore_ascii_case(DISABILITY_SERVICES_CODE))
        .unwrap_or(false)
}

impl SearchQuery {
    /// Reads the end-location address and the disability filter from a search
    /// intent. Only the first value of the first tag group is used.
    pub fn from_request(request: &Value) -> Self {
        let address = request
            .pointer("/message/intent/fulfillment/end/location/address")
            .unwrap_or(&Value::Null);
        let field = |name: &str| address.get(name).and_then(non_empty_str);

        Self {
            city: field("city"),
            state: field("state"),
            country: field("country"),
            disability: request
                .pointer("/message/intent/tags/0/list/0/value")
                .and_then(non_empty_str),
        }
    }

    /// `?cities=..&states=..&country=..&disabilities=..`, absent filters left
    /// out. Empty when no filter is set.
    pub fn to_query_string(&self) -> String {
        let params: Vec<String> = [
            ("cities", &self.city),
            ("states", &self.state),
            ("country", &self.country),
            ("disabilities", &self.disability),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(|v| format!("{}={}", key, encode_uri_component(v)))
        })
        .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }

    pub fn search_url(&self, base_url: &str) -> String {
        format!("{}/search{}", base_url, self.to_query_string())
    }
}

/// Wraps the caller's context around a catalog message, with the action
/// rewritten to `on_search`.
pub fn on_search_envelope(context: Option<&Value>, message: Value) -> Value {
    let mut context = match context {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    context.insert(
        "action".to_string(),
        Value::String(ON_SEARCH_ACTION.to_string()),
    );

    json!({
        "context": Value::Object(context),
        "message": message,
    })
}

pub struct SearchOrchestrator<D: ServiceDirectory> {
    directory: D,
    generator: CatalogGenerator,
}

impl<D: ServiceDirectory> SearchOrchestrator<D> {
    pub fn new(directory: D, generator: CatalogGenerator) -> Self {
        Self {
            directory,
            generator,
        }
    }

    pub fn generator(&self) -> &CatalogGenerator {
        &self.generator
    }

    /// Runs one search request end to end. Non-disability categories are
    /// rejected before any upstream call is made.
    pub async fn handle_search(&self, request: &Value) -> Result<Value> {
        if !is_disability_search(request) {
            return Err(AdapterError::UnsupportedCategory {
                code: intent_category_code(request).unwrap_or_default().to_string(),
            });
        }

        let query = SearchQuery::from_request(request);
        tracing::info!(
            city = ?query.city,
            state = ?query.state,
            country = ?query.country,
            disability = ?query.disability,
            "Handling disability services search"
        );

        let api_data = self.directory.search(&query).await.inspect_err(|e| {
            tracing::error!("❌ Upstream directory search failed: {}", e);
        })?;

        let catalog = self.generator.generate(&api_data);
        tracing::info!(
            "✅ Returning {} providers",
            catalog.message.catalog.providers.len()
        );

        let message = serde_json::to_value(catalog.message)?;
        Ok(on_search_envelope(request.get("context"), message))
    }
}

use crate::core::generator::GeneratorOptions;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait ConfigProvider: Send + Sync {
    fn upstream_base_url(&self) -> &str;
    fn bind_address(&self) -> &str;
    fn generator_options(&self) -> GeneratorOptions;
    /// `None` means the upstream call may take as long as it needs.
    fn request_timeout_seconds(&self) -> Option<u64>;
}

/// Filters forwarded to the upstream `/search` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub disability: Option<String>,
}

#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    /// Fetches the raw upstream body. Network failures, non-2xx statuses and
    /// undecodable bodies all surface as `AdapterError::UpstreamFetch`.
    async fn search(&self, query: &SearchQuery) -> Result<Value>;
}

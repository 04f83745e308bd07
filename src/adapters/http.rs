use crate::domain::ports::{ConfigProvider, SearchQuery, ServiceDirectory};
use crate::utils::error::{AdapterError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Upstream disability-services directory reached over HTTP.
pub struct HttpServiceDirectory {
    client: Client,
    base_url: String,
}

impl HttpServiceDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|e| AdapterError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: config.upstream_base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ServiceDirectory for HttpServiceDirectory {
    async fn search(&self, query: &SearchQuery) -> Result<Value> {
        let url = query.search_url(&self.base_url);
        tracing::debug!("Making upstream request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        tracing::debug!("Upstream response status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::upstream(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_search_forwards_filters() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("cities", "Navi Mumbai")
                    .query_param("disabilities", "Hearing Loss");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({"services": []}));
            })
            .await;

        let directory = HttpServiceDirectory::new(server.url("/"));
        let query = SearchQuery {
            city: Some("Navi Mumbai".to_string()),
            disability: Some("Hearing Loss".to_string()),
            ..SearchQuery::default()
        };

        let body = directory.search(&query).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(body, serde_json::json!({"services": []}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(503);
            })
            .await;

        let directory = HttpServiceDirectory::new(server.base_url());
        let result = directory.search(&SearchQuery::default()).await;

        api_mock.assert_async().await;
        assert!(matches!(result, Err(AdapterError::UpstreamFetch { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let directory = HttpServiceDirectory::new(server.base_url());
        let result = directory.search(&SearchQuery::default()).await;

        assert!(matches!(result, Err(AdapterError::UpstreamFetch { .. })));
    }
}

//! USDA FoodData Central API client.
//!
//! See: <https://fdc.nal.usda.gov/api-guide>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::{FoodDataProvider, RawResponse};
use crate::telemetry;
use crate::{PantryError, Result};

/// Default base URL for the FoodData Central API
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Client for the FoodData Central API.
///
/// Authenticates with an `api_key` query parameter. No retries; a request
/// timeout is only applied when configured.
#[derive(Clone)]
pub struct FdcClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl FdcClient {
    /// Create a client against the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, None)
    }

    /// Create a client with a custom base URL (for testing with wiremock)
    /// and an optional per-request timeout.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PantryError::Configuration(
                "FoodData Central API key cannot be blank".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PantryError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(
        &self,
        operation: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<RawResponse> {
        debug!(operation, %url, "requesting FoodData Central");
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| {
                metrics::counter!(
                    telemetry::REMOTE_REQUESTS_TOTAL,
                    "operation" => operation,
                    "status" => "error"
                )
                .increment(1);
                PantryError::Http(e.without_url().to_string())
            })?;

        let status = response.status().as_u16();
        metrics::counter!(
            telemetry::REMOTE_REQUESTS_TOTAL,
            "operation" => operation,
            "status" => status.to_string()
        )
        .increment(1);

        let body = response
            .text()
            .await
            .map_err(|e| PantryError::Http(e.without_url().to_string()))?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl FoodDataProvider for FdcClient {
    fn name(&self) -> &str {
        "fdc"
    }

    async fn fetch_report_by_id(&self, id: i64) -> Result<RawResponse> {
        let url = format!("{}/food/{id}", self.base_url);
        self.get("report", url, &[]).await
    }

    async fn fetch_by_keywords(&self, keywords: &[String]) -> Result<RawResponse> {
        let url = format!("{}/foods/search", self.base_url);
        let query = keywords.join(" ");
        self.get("search", url, &[("query", query.as_str())]).await
    }
}

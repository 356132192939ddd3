//! Provider trait for remote food data sources.
//!
//! A provider only moves bytes: it returns the HTTP status and body as-is
//! and leaves status interpretation (200 / 404 / anything else) to the
//! [`FoodRetriever`](crate::FoodRetriever). Transport failures are the only
//! errors a provider reports.

use async_trait::async_trait;

use crate::Result;

/// Status and body of one provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Remote source of food reports and keyword searches.
#[async_trait]
pub trait FoodDataProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the full report for one food id.
    async fn fetch_report_by_id(&self, id: i64) -> Result<RawResponse>;

    /// Run a keyword search. Keywords are sent in order.
    async fn fetch_by_keywords(&self, keywords: &[String]) -> Result<RawResponse>;
}

//! Cache-through food data retrieval.
//!
//! [`FoodRetriever`] answers every query from the [`CacheStore`] when it can
//! and falls back to the [`FoodDataProvider`] otherwise:
//!
//! - reports: cache, then remote; the raw (unfiltered) provider body is
//!   stored so every read re-applies the same nutrient filter
//! - keyword searches: cache, then remote; a remote hit also writes one
//!   barcode record per result item that carries a barcode
//! - barcodes: cache only; they are populated solely by keyword searches
//!
//! Status mapping for remote calls: 200 is success, 404 is
//! [`NotFound`](PantryError::NotFound), anything else is a
//! [`Retrieval`](PantryError::Retrieval) error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, Namespace};
use crate::providers::{FoodDataProvider, RawResponse};
use crate::types::{FoodReport, FoodSummary, SearchResult};
use crate::{PantryError, Result};

const STATUS_OK: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;

/// Cache-augmented access to food data, shared by all connections.
#[derive(Clone)]
pub struct FoodRetriever {
    cache: Arc<CacheStore>,
    provider: Arc<dyn FoodDataProvider>,
}

impl FoodRetriever {
    pub fn new(cache: Arc<CacheStore>, provider: Arc<dyn FoodDataProvider>) -> Self {
        Self { cache, provider }
    }

    /// The underlying cache store.
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Report for `id`, with nutrients filtered to the tracked set.
    pub async fn get_food_report(&self, id: i64) -> Result<FoodReport> {
        const OP: &str = "get food report";
        if id < 0 {
            return Err(PantryError::InvalidArgument(format!(
                "food id cannot be negative, got {id}"
            )));
        }

        let key = id.to_string();
        let _guard = self.cache.lock(Namespace::Reports, &key).await;

        if let Some(report) = self.cached::<FoodReport>(OP, Namespace::Reports, &key).await? {
            return Ok(report.filtered());
        }

        let response = self
            .provider
            .fetch_report_by_id(id)
            .await
            .map_err(|e| PantryError::retrieval(OP, &key, e))?;
        let body = self.expect_ok(OP, &key, response, || {
            PantryError::NotFound(format!("no food found with id {id}"))
        })?;

        let report: FoodReport =
            serde_json::from_str(&body).map_err(|e| PantryError::retrieval(OP, &key, e))?;
        self.cache
            .put(Namespace::Reports, &key, &body)
            .await
            .map_err(|e| PantryError::retrieval(OP, &key, e))?;

        Ok(report.filtered())
    }

    /// Search results for `keywords`.
    ///
    /// On a remote hit, every item with a non-blank barcode is also written
    /// to the barcode namespace so [`get_food_by_barcode`](Self::get_food_by_barcode)
    /// can find it later. Items without a barcode are skipped. The search
    /// itself is only cached once all of its barcodes are.
    pub async fn get_food_by_keywords(&self, keywords: &[String]) -> Result<Vec<FoodSummary>> {
        const OP: &str = "get food by keywords";
        let key = keywords.join(" ");
        let _guard = self.cache.lock(Namespace::Keywords, &key).await;

        if let Some(result) = self
            .cached::<SearchResult>(OP, Namespace::Keywords, &key)
            .await?
        {
            return Ok(result.items);
        }

        let response = self
            .provider
            .fetch_by_keywords(keywords)
            .await
            .map_err(|e| PantryError::retrieval(OP, &key, e))?;
        let body = self.expect_ok(OP, &key, response, || {
            PantryError::NotFound(format!("no foods found for keywords: {key}"))
        })?;

        let result: SearchResult =
            serde_json::from_str(&body).map_err(|e| PantryError::retrieval(OP, &key, e))?;

        // the search record goes last: once it exists the search is never refetched
        let indexed = self.index_barcodes(OP, &key, &result.items).await?;
        self.cache
            .put(Namespace::Keywords, &key, &body)
            .await
            .map_err(|e| PantryError::retrieval(OP, &key, e))?;
        info!(keywords = %key, items = result.items.len(), indexed, "cached search result");

        Ok(result.items)
    }

    /// A food previously seen in a keyword search, by barcode.
    ///
    /// Never contacts the remote provider.
    pub async fn get_food_by_barcode(&self, barcode: &str) -> Result<FoodSummary> {
        const OP: &str = "get food by barcode";
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(PantryError::InvalidArgument(
                "barcode cannot be blank".to_string(),
            ));
        }

        let record = self
            .cache
            .get(Namespace::Barcodes, barcode)
            .await
            .map_err(|e| PantryError::retrieval(OP, barcode, e))?
            .ok_or_else(|| PantryError::BarcodeNotFound(barcode.to_string()))?;

        serde_json::from_str(&record).map_err(|e| PantryError::retrieval(OP, barcode, e))
    }

    /// Write one barcode record per result item that has a barcode.
    async fn index_barcodes(
        &self,
        operation: &'static str,
        key: &str,
        items: &[FoodSummary],
    ) -> Result<usize> {
        let mut indexed = 0;
        for item in items {
            let Some(barcode) = item.usable_barcode() else {
                continue;
            };
            let record =
                serde_json::to_string(item).map_err(|e| PantryError::retrieval(operation, key, e))?;
            self.cache
                .put(Namespace::Barcodes, barcode, &record)
                .await
                .map_err(|e| PantryError::retrieval(operation, barcode, e))?;
            indexed += 1;
        }
        Ok(indexed)
    }

    /// Load and decode a cached record.
    ///
    /// A record that no longer decodes is logged and treated as a miss, so
    /// the following remote fetch overwrites it.
    async fn cached<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        ns: Namespace,
        key: &str,
    ) -> Result<Option<T>> {
        let Some(record) = self
            .cache
            .get(ns, key)
            .await
            .map_err(|e| PantryError::retrieval(operation, key, e))?
        else {
            return Ok(None);
        };

        match serde_json::from_str(&record) {
            Ok(value) => {
                debug!(namespace = %ns, key, "served from cache");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(namespace = %ns, key, error = %e, "corrupt cache record, refetching");
                Ok(None)
            }
        }
    }

    fn expect_ok(
        &self,
        operation: &'static str,
        key: &str,
        response: RawResponse,
        not_found: impl FnOnce() -> PantryError,
    ) -> Result<String> {
        match response.status {
            STATUS_OK => Ok(response.body),
            STATUS_NOT_FOUND => Err(not_found()),
            status => Err(PantryError::retrieval(
                operation,
                key,
                format!("{} returned HTTP {status}", self.provider.name()),
            )),
        }
    }
}

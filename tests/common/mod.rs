//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pantry::cache::CacheStore;
use pantry::providers::{FoodDataProvider, RawResponse};
use pantry::{FoodRetriever, PantryError, Result};

/// Report with six raw nutrients, two of them tracked (Protein, Energy).
pub const COLA_REPORT: &str = r#"{
    "fdcId": 2494378,
    "description": "COLA",
    "ingredients": "CARBONATED WATER, HIGH FRUCTOSE CORN SYRUP",
    "gtinUpc": "012000338960",
    "foodNutrients": [
        {"nutrient": {"name": "Sodium, Na", "unitName": "mg"}, "amount": 4.0},
        {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 0.0},
        {"nutrient": {"name": "Sugars, total including NLEA", "unitName": "g"}, "amount": 10.6},
        {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 42.0},
        {"nutrient": {"name": "Caffeine", "unitName": "mg"}, "amount": 8.0},
        {"nutrient": {"name": "Calcium, Ca", "unitName": "mg"}, "amount": 0.0}
    ]
}"#;

/// Search response: two items with barcodes, one blank, one absent.
pub const RAFFAELLO_SEARCH: &str = r#"{
    "totalHits": 4,
    "foods": [
        {"fdcId": 2543615, "description": "RAFFAELLO", "gtinUpc": "009800146130"},
        {"fdcId": 2041155, "description": "RAFFAELLO TREAT", "gtinUpc": "009800146147"},
        {"fdcId": 1111111, "description": "COCONUT TREAT", "gtinUpc": "  "},
        {"fdcId": 2222222, "description": "ALMOND TREAT"}
    ]
}"#;

/// Provider double with canned responses and per-operation call counts.
///
/// Unknown ids and queries answer 404.
#[derive(Default)]
pub struct MockProvider {
    reports: Mutex<HashMap<i64, RawResponse>>,
    searches: Mutex<HashMap<String, RawResponse>>,
    report_calls: AtomicUsize,
    search_calls: AtomicUsize,
    delay: Option<Duration>,
    fail_transport: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the network were down.
    pub fn unreachable() -> Self {
        Self {
            fail_transport: true,
            ..Self::default()
        }
    }

    /// Delay every response (to widen race windows).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_report(self, id: i64, status: u16, body: &str) -> Self {
        self.reports
            .lock()
            .unwrap()
            .insert(id, RawResponse::new(status, body));
        self
    }

    pub fn with_search(self, query: &str, status: u16, body: &str) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), RawResponse::new(status, body));
        self
    }

    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.report_calls() + self.search_calls()
    }

    async fn respond(&self, response: Option<RawResponse>) -> Result<RawResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_transport {
            return Err(PantryError::Http("connection refused".to_string()));
        }
        Ok(response.unwrap_or_else(|| RawResponse::new(404, r#"{"error": "not found"}"#)))
    }
}

#[async_trait]
impl FoodDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_report_by_id(&self, id: i64) -> Result<RawResponse> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.reports.lock().unwrap().get(&id).cloned();
        self.respond(response).await
    }

    async fn fetch_by_keywords(&self, keywords: &[String]) -> Result<RawResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.searches.lock().unwrap().get(&keywords.join(" ")).cloned();
        self.respond(response).await
    }
}

/// A retriever over a fresh temp cache and the given provider.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn retriever_with(provider: MockProvider) -> (tempfile::TempDir, FoodRetriever, Arc<MockProvider>) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(CacheStore::open(dir.path()).unwrap());
    let provider = Arc::new(provider);
    let retriever = FoodRetriever::new(cache, provider.clone());
    (dir, retriever, provider)
}

pub fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

//! Pantry - food data over a line protocol, cached on disk
//!
//! Clients send one command per line; the server answers from a persistent
//! cache and falls back to the USDA FoodData Central API on a miss.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pantry::cache::CacheStore;
//! use pantry::providers::FdcClient;
//! use pantry::{FoodRetriever, Server};
//!
//! #[tokio::main]
//! async fn main() -> pantry::Result<()> {
//!     let cache = Arc::new(CacheStore::open("cache")?);
//!     let provider = Arc::new(FdcClient::new("your-fdc-api-key")?);
//!     let retriever = FoodRetriever::new(cache, provider);
//!
//!     let report = retriever.get_food_report(2494378).await?;
//!     println!("{}", report.description);
//!
//!     Server::bind("127.0.0.1:5000", 5, retriever).await?.serve().await
//! }
//! ```

pub mod cache;
pub mod client;
pub mod command;
pub mod error;
pub mod providers;
pub mod retriever;
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use command::Command;
pub use error::{PantryError, Result};
pub use retriever::FoodRetriever;
pub use server::Server;
pub use types::{FoodReport, FoodSummary, NutrientEntry, SearchResult};
pub use version::{BUILD_TIMESTAMP, GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};

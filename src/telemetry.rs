//! Telemetry metric name constants.
//!
//! Centralised metric names for pantry operations. The daemon does not
//! install a recorder itself; without one, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `pantry_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `namespace`: cache namespace ("reports", "barcodes", "keywords")
//! - `operation`: remote call ("report", "search")
//! - `status`: HTTP status code, or "error" for transport failures

/// Cache lookups answered from memory or disk.
///
/// Labels: `namespace`.
pub const CACHE_HITS_TOTAL: &str = "pantry_cache_hits_total";

/// Cache lookups that found no record.
///
/// Labels: `namespace`.
pub const CACHE_MISSES_TOTAL: &str = "pantry_cache_misses_total";

/// Requests sent to the remote food data provider.
///
/// Labels: `operation`, `status`.
pub const REMOTE_REQUESTS_TOTAL: &str = "pantry_remote_requests_total";

/// Client connections accepted by the server.
pub const CONNECTIONS_TOTAL: &str = "pantry_connections_total";

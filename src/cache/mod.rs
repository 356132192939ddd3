//! Persistent record cache.
//!
//! Records live in three independent namespaces under one cache root:
//!
//! ```text
//! <root>/reports/<id>.json        raw provider report bodies
//! <root>/barcodes/<barcode>.json  single search hits, keyed by barcode
//! <root>/keywords/<query>.json    raw provider search bodies
//! ```
//!
//! Records are never evicted from disk. [`CacheStore`] may additionally keep
//! a bounded in-memory copy of recently used records; dropping one from
//! memory only means the next read goes back to disk.

mod store;

pub use store::{CacheStore, KeyGuard};

use std::fmt;

/// A logical partition of the cache with its own key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Food reports keyed by decimal id.
    Reports,
    /// Single search hits keyed by literal barcode.
    Barcodes,
    /// Search results keyed by the space-joined keyword list.
    Keywords,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Reports, Namespace::Barcodes, Namespace::Keywords];

    /// Directory name under the cache root; also used as a metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Reports => "reports",
            Namespace::Barcodes => "barcodes",
            Namespace::Keywords => "keywords",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a record key to a file stem that cannot leave its namespace dir.
///
/// Spaces become `+`; ASCII alphanumerics, `-` and `_` are kept; every other
/// byte is percent-encoded. Distinct keys always map to distinct stems.
pub fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b' ' => stem.push('+'),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => stem.push(byte as char),
            other => stem.push_str(&format!("%{other:02X}")),
        }
    }
    stem
}

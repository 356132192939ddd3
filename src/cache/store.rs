//! Disk-backed [`CacheStore`] with an optional in-memory tier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use moka::future::Cache;
use tokio::io::AsyncWriteExt;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use super::{Namespace, file_stem};
use crate::telemetry;
use crate::{PantryError, Result};

const RECORD_EXTENSION: &str = "json";

type RecordKey = (Namespace, String);
type LockMap = Arc<Mutex<HashMap<RecordKey, Arc<tokio::sync::Mutex<()>>>>>;

/// Exclusive hold on one `(namespace, key)` pair.
///
/// Held by the retriever across a check-then-populate sequence so that two
/// connections missing the same key do not both fetch and write it. The
/// last guard for a key to drop removes its lock entry.
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
    key: RecordKey,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        // waiters hold a clone of the mutex, so a count of one means only the map
        if locks
            .get(&self.key)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

/// Key-addressed persistent storage shared by all connections.
///
/// Writes go to a uniquely named temporary file and are renamed into place,
/// so a reader sees either the previous record or the new one, never a
/// partial write. Reads and writes of different keys never contend.
///
/// ```rust,no_run
/// # async fn demo() -> pantry::Result<()> {
/// use pantry::cache::{CacheStore, Namespace};
///
/// let store = CacheStore::open("cache")?.with_memory_capacity(1_000);
/// store.put(Namespace::Reports, "2494378", "{}").await?;
/// assert!(store.get(Namespace::Reports, "2494378").await?.is_some());
/// # Ok(())
/// # }
/// ```
pub struct CacheStore {
    root: PathBuf,
    memory: Option<Cache<RecordKey, Arc<str>>>,
    locks: LockMap,
    tmp_counter: AtomicU64,
}

impl CacheStore {
    /// Open (and create if needed) a cache rooted at `root`.
    ///
    /// All namespace directories are created up front.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for ns in Namespace::ALL {
            let dir = root.join(ns.as_str());
            std::fs::create_dir_all(&dir).map_err(|source| PantryError::Cache {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self {
            root,
            memory: None,
            locks: Arc::default(),
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Keep up to `max_entries` recently used records in memory.
    ///
    /// `0` disables the memory tier.
    pub fn with_memory_capacity(mut self, max_entries: u64) -> Self {
        self.memory = (max_entries > 0).then(|| Cache::new(max_entries));
        self
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of a record.
    pub fn record_path(&self, ns: Namespace, key: &str) -> PathBuf {
        self.root
            .join(ns.as_str())
            .join(format!("{}.{RECORD_EXTENSION}", file_stem(key)))
    }

    /// Load a record.
    ///
    /// Returns `Ok(None)` when the record was never written. Any other read
    /// failure is a [`PantryError::Cache`].
    pub async fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        let record_key = (ns, key.to_string());
        if let Some(memory) = &self.memory
            && let Some(record) = memory.get(&record_key).await
        {
            record_hit(ns, key, "memory");
            return Ok(Some(record.to_string()));
        }

        let path = self.record_path(ns, key);
        match tokio::fs::read_to_string(&path).await {
            Ok(record) => {
                record_hit(ns, key, "disk");
                if let Some(memory) = &self.memory {
                    memory.insert(record_key, Arc::from(record.as_str())).await;
                }
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(namespace = %ns, key, "cache miss");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "namespace" => ns.as_str())
                    .increment(1);
                Ok(None)
            }
            Err(source) => Err(PantryError::Cache { path, source }),
        }
    }

    /// Write (or overwrite) a record.
    pub async fn put(&self, ns: Namespace, key: &str, record: &str) -> Result<()> {
        let path = self.record_path(ns, key);
        let tmp_path = path.with_extension(format!(
            "{RECORD_EXTENSION}.{}.{}.tmp",
            std::process::id(),
            self.tmp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(source) = write_synced(&tmp_path, record).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PantryError::Cache {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PantryError::Cache { path, source });
        }

        if let Some(memory) = &self.memory {
            memory
                .insert((ns, key.to_string()), Arc::from(record))
                .await;
        }
        debug!(namespace = %ns, key, bytes = record.len(), "cache write");
        Ok(())
    }

    /// Acquire the per-key lock for `(ns, key)`.
    ///
    /// [`get`](Self::get) and [`put`](Self::put) do not take this lock
    /// themselves, so a holder can read and write the key freely.
    pub async fn lock(&self, ns: Namespace, key: &str) -> KeyGuard {
        let key = (ns, key.to_string());
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        KeyGuard {
            guard: Some(mutex.lock_owned().await),
            locks: Arc::clone(&self.locks),
            key,
        }
    }
}

/// Write `record` to `path` and flush it to disk before it is renamed into place.
async fn write_synced(path: &Path, record: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(record.as_bytes()).await?;
    file.sync_all().await
}

fn record_hit(ns: Namespace, key: &str, tier: &'static str) {
    debug!(namespace = %ns, key, tier, "cache hit");
    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "namespace" => ns.as_str()).increment(1);
}

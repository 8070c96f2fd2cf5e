//! Process-wide language pack cache for server rendering.
//!
//! Repeated renders reuse packs instead of refetching them, so a flaky CDN
//! does not turn into failed page renders. Entries expire after sitting idle
//! for [`CACHE_TTL`].

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use super::state::PackData;

/// Idle time after which an entry is dropped, also the sweep period.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Rough bookkeeping cost of one entry beyond its key and payload.
const ENTRY_OVERHEAD: usize = 64;

struct CacheEntry {
    data: PackData,
    last_access: Instant,
    hash: u64,
    byo_lang_pack: bool,
}

/// URL-keyed language pack cache.
///
/// Share one instance between renders with an `Arc`; at most one sweeper
/// runs per instance no matter how many owners start it.
pub struct LanguagePackCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    development: bool,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl LanguagePackCache {
    /// Create a cache. In development mode `set` stores nothing.
    pub fn new(development: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            development,
            sweeper: Mutex::new(None),
        }
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Store a pack under `key`.
    ///
    /// `content_identity` is the URL the registry would have produced for the
    /// same pack. A key that differs from it is a caller-supplied URL: such
    /// entries are not kept alive by reads.
    pub fn set(&self, key: &str, value: PackData, content_identity: Option<&str>) {
        if self.development {
            return;
        }

        let byo_lang_pack = content_identity.is_some_and(|identity| identity != key);
        info!(url = %key, byo_lang_pack, "Caching language pack");
        self.entries.lock().insert(
            key.to_string(),
            CacheEntry {
                data: value,
                last_access: Instant::now(),
                hash: content_hash(key, content_identity),
                byo_lang_pack,
            },
        );
    }

    /// Look up a pack. Expired entries and identity mismatches miss.
    pub fn get(&self, key: &str, content_identity: Option<&str>) -> Option<PackData> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired = now.duration_since(entries.get(key)?.last_access) >= CACHE_TTL;
        if expired {
            entries.remove(key);
            debug!(url = %key, "Cached language pack expired");
            return None;
        }

        let entry = entries.get_mut(key)?;
        if entry.hash != content_hash(key, content_identity) {
            debug!(url = %key, "Cached language pack has a different identity");
            return None;
        }
        if !entry.byo_lang_pack {
            entry.last_access = now;
        }

        debug!(url = %key, "Using cached language pack");
        Some(Arc::clone(&entry.data))
    }

    /// Drop every entry idle for at least [`CACHE_TTL`]. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_access) < CACHE_TTL);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, remaining = entries.len(), "Purged expired language packs");
        }
        purged
    }

    /// Run [`purge_expired`](Self::purge_expired) every [`CACHE_TTL`].
    ///
    /// Returns `true` when this call started the sweeper, `false` when one is
    /// already running or there is no tokio runtime. The task holds a weak
    /// reference and stops once the cache is dropped.
    pub fn ensure_sweeper(self: &Arc<Self>) -> bool {
        let mut sweeper = self.sweeper.lock();
        if sweeper.as_ref().is_some_and(|task| !task.is_finished()) {
            return false;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return false;
        };

        let cache: Weak<Self> = Arc::downgrade(self);
        *sweeper = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(CACHE_TTL);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                cache.purge_expired();
            }
        }));
        debug!("Language pack cache sweeper started");
        true
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Approximate memory held by the cache, in bytes.
    pub fn estimated_size(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .map(|(key, entry)| {
                let payload = serde_json::to_string(&*entry.data)
                    .map(|s| s.len())
                    .unwrap_or_default();
                key.len() + std::mem::size_of::<u64>() + payload + ENTRY_OVERHEAD
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Drop for LanguagePackCache {
    fn drop(&mut self) {
        if let Some(task) = self.sweeper.get_mut().take() {
            task.abort();
        }
    }
}

impl Default for LanguagePackCache {
    fn default() -> Self {
        Self::new(false)
    }
}

fn content_hash(key: &str, content_identity: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    content_identity.hash(&mut hasher);
    hasher.finish()
}

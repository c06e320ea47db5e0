// ── TTL cache ──
//
// Lock-free map from filter signature to cached result. Every write is
// stamped with an absolute expiry; reads check it lazily and a background
// sweeper removes what nobody reads.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::signature::FilterSignature;
use crate::model::DateRange;

/// A cached value and its bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Window the data was fetched for; `None` means unbounded.
    pub range: Option<DateRange>,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// An entry that expires before it was written cannot be trusted.
    fn is_consistent(&self) -> bool {
        self.expires_at >= self.timestamp
    }

    fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_consistent() && !self.is_expired(now)
    }
}

/// Signature-keyed cache with absolute expiry.
pub struct TtlCache<T: Clone + Send + Sync + 'static> {
    entries: DashMap<FilterSignature, CacheEntry<T>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Send + Sync + 'static> TtlCache<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            clock,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up `signature`. Expired or inconsistent entries are evicted and
    /// reported as a miss.
    pub fn get(&self, signature: &FilterSignature) -> Option<T> {
        let now = self.clock.now();
        let verdict = self
            .entries
            .get(signature)
            .map(|entry| entry.is_usable(now).then(|| entry.data.clone()));

        match verdict {
            None => None,
            Some(Some(data)) => Some(data),
            Some(None) => {
                self.entries
                    .remove_if(signature, |_, entry| !entry.is_usable(now));
                trace!(%signature, "evicted stale cache entry on read");
                None
            }
        }
    }

    /// Store `data` with the default TTL. Overwrites any existing entry.
    pub fn put(&self, signature: FilterSignature, data: T, range: Option<DateRange>) {
        self.put_with_ttl(signature, data, range, self.default_ttl);
    }

    pub fn put_with_ttl(
        &self,
        signature: FilterSignature,
        data: T,
        range: Option<DateRange>,
        ttl: Duration,
    ) {
        let timestamp = self.clock.now();
        let delta = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = timestamp
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(
            signature,
            CacheEntry {
                data,
                timestamp,
                expires_at,
                range,
            },
        );
    }

    /// Drop one entry. Returns whether it existed.
    pub fn invalidate(&self, signature: &FilterSignature) -> bool {
        self.entries.remove(signature).is_some()
    }

    /// Drop every entry whose window overlaps `range`, plus unbounded ones.
    pub fn invalidate_overlapping(&self, range: &DateRange) -> usize {
        self.invalidate_where(|_, entry| entry.range.is_none_or(|r| r.overlaps(range)))
    }

    /// Drop every entry for which `pred` holds. Returns the number removed.
    pub fn invalidate_where<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&FilterSignature, &CacheEntry<T>) -> bool,
    {
        let mut removed = 0;
        self.entries.retain(|sig, entry| {
            let drop = pred(sig, entry);
            if drop {
                removed += 1;
            }
            !drop
        });
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove every expired or inconsistent entry.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        self.invalidate_where(|_, entry| !entry.is_usable(now))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries, for persistence.
    pub fn export(&self) -> Vec<(FilterSignature, CacheEntry<T>)> {
        let now = self.clock.now();
        self.entries
            .iter()
            .filter(|r| r.value().is_usable(now))
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Load previously exported entries. Expired ones are discarded and
    /// entries already present are kept.
    pub fn rehydrate(&self, entries: impl IntoIterator<Item = (FilterSignature, CacheEntry<T>)>) -> usize {
        let now = self.clock.now();
        let mut loaded = 0;
        for (signature, entry) in entries {
            if !entry.is_usable(now) {
                continue;
            }
            self.entries.entry(signature).or_insert_with(|| {
                loaded += 1;
                entry
            });
        }
        loaded
    }
}

// ── Background sweeper ───────────────────────────────────────────────

/// Periodically evict expired entries until `cancel` fires.
pub fn spawn_sweeper<T: Clone + Send + Sync + 'static>(
    cache: Arc<TtlCache<T>>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let removed = cache.sweep();
                    if removed > 0 {
                        debug!(removed, remaining = cache.len(), "cache sweep");
                    }
                }
            }
        }
    })
}

//! Request de-duplicating cache in front of a [`Locator`].
//!
//! A located address is never fetched again while it stays in the cache.
//! Concurrent lookups of the same address share one request. Failures are not
//! cached and not retried; the next lookup of that address asks again.

use super::client::{Locator, LookupFuture};
use super::error::LookupError;
use crate::models::IpLookupResult;
use chrono::{DateTime, Utc};
use futures::future::{FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

enum Slot {
    Pending(Shared<LookupFuture>),
    Ready {
        result: IpLookupResult,
        last_used: DateTime<Utc>,
    },
}

/// On-disk form of one ready entry.
#[derive(Serialize, Deserialize, Debug)]
struct SnapshotEntry {
    ip: String,
    #[serde(flatten)]
    result: IpLookupResult,
    /// Unix time in milliseconds.
    last_used: i64,
}

pub struct LookupCache<L> {
    locator: L,
    gc_after: chrono::Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<L: Locator> LookupCache<L> {
    pub fn new(locator: L, gc_after: chrono::Duration) -> Self {
        LookupCache {
            locator,
            gc_after,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Look up an address, served from the cache when possible.
    pub async fn lookup(&self, ip: &str) -> Result<IpLookupResult, LookupError> {
        let key = ip.trim().to_string();

        let pending = {
            let now = Utc::now();
            let mut slots = self.lock();
            self.evict_locked(&mut slots, now);
            match slots.get_mut(&key) {
                Some(Slot::Ready { result, last_used }) => {
                    log::debug!("cache hit {key}");
                    *last_used = now;
                    return Ok(result.clone());
                }
                Some(Slot::Pending(shared)) => {
                    log::debug!("joining in-flight lookup of {key}");
                    shared.clone()
                }
                None => {
                    log::debug!("cache miss {key}");
                    let shared = self.locator.locate(&key).shared();
                    slots.insert(key.clone(), Slot::Pending(shared.clone()));
                    shared
                }
            }
        };

        let outcome = pending.clone().await;

        let mut slots = self.lock();
        match &outcome {
            Ok(result) => {
                slots.insert(
                    key,
                    Slot::Ready {
                        result: result.clone(),
                        last_used: Utc::now(),
                    },
                );
            }
            Err(e) => {
                log::warn!("Lookup of {key} failed: {e}");
                // only drop the request this call waited on, a newer one may be running
                if let Some(Slot::Pending(current)) = slots.get(&key) {
                    if Shared::ptr_eq(current, &pending) {
                        slots.remove(&key);
                    }
                }
            }
        }
        outcome
    }

    /// Drop ready entries unused since `now - gc_after`. Returns how many went.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut slots = self.lock();
        self.evict_locked(&mut slots, now)
    }

    fn evict_locked(&self, slots: &mut HashMap<String, Slot>, now: DateTime<Utc>) -> usize {
        let before = slots.len();
        let gc_after = self.gc_after;
        slots.retain(|_, slot| match slot {
            Slot::Pending(_) => true,
            Slot::Ready { last_used, .. } => now - *last_used <= gc_after,
        });
        let evicted = before - slots.len();
        if evicted > 0 {
            log::debug!("evicted {evicted} idle cache entries");
        }
        evicted
    }

    /// Cached result for an address without touching the network.
    pub fn get(&self, ip: &str) -> Option<IpLookupResult> {
        match self.lock().get(ip.trim()) {
            Some(Slot::Ready { result, .. }) => Some(result.clone()),
            _ => None,
        }
    }

    /// Number of entries, in flight ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write ready entries to a JSON file. Returns the number written.
    pub fn save_file(&self, cache_file: &str) -> Result<usize, Box<dyn Error>> {
        let mut entries: Vec<SnapshotEntry> = self
            .lock()
            .iter()
            .filter_map(|(ip, slot)| match slot {
                Slot::Ready { result, last_used } => Some(SnapshotEntry {
                    ip: ip.clone(),
                    result: result.clone(),
                    last_used: last_used.timestamp_millis(),
                }),
                Slot::Pending(_) => None,
            })
            .collect();
        entries.sort_by(|a, b| a.ip.cmp(&b.ip));

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Error serializing JSON: {e}"))?;
        log::info!("Writing {} entries to cache file: {cache_file}", entries.len());
        std::fs::write(cache_file, json)
            .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
        Ok(entries.len())
    }

    /// Seed the cache from a file written by [`LookupCache::save_file`].
    ///
    /// Entries already idle longer than `gc_after` are skipped. Returns the
    /// number loaded.
    pub fn load_file(&self, cache_file: &str) -> Result<usize, Box<dyn Error>> {
        if !Path::new(cache_file).exists() {
            return Err(format!("Cache file does not exist: {cache_file}").into());
        }
        let json = std::fs::read_to_string(cache_file)
            .map_err(|e| format!("Error reading cache file {cache_file}: {e}"))?;
        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let entries: Vec<SnapshotEntry> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("Error parsing cache JSON: path={} error={}", e.path(), e))?;

        let now = Utc::now();
        let mut slots = self.lock();
        let mut loaded = 0;
        for entry in entries {
            let Some(last_used) = DateTime::<Utc>::from_timestamp_millis(entry.last_used) else {
                log::warn!("Skipping {} with bad timestamp {}", entry.ip, entry.last_used);
                continue;
            };
            if now - last_used > self.gc_after {
                continue;
            }
            slots.insert(
                entry.ip,
                Slot::Ready {
                    result: entry.result,
                    last_used,
                },
            );
            loaded += 1;
        }
        log::info!("Loaded {loaded} entries from cache file: {cache_file}");
        Ok(loaded)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // a panic while holding the lock cannot leave the map half written
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

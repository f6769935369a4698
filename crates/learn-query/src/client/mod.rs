//! The query cache
//!
//! [`QueryClient`] owns every cached query result for one session. It is
//! created at session start, passed to whatever needs it and cleared on
//! logout. Reads go through [`QueryClient::fetch_query`], which serves fresh
//! data from memory, joins a fetch already in flight for the same key, or
//! starts one. Writes never fetch: mutations reconcile the cache through
//! [`QueryClient::invalidate_queries`] and [`QueryClient::set_queries_data`].

mod filter;
mod infinite;
mod query;
mod state;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;

pub use filter::QueryFilter;
pub use infinite::{InfiniteData, next_page_param};
pub use query::{InfiniteQueryDef, QueryDef, valid_id};
pub(crate) use query::Fetcher;
pub use state::{QueryState, QueryStatus};
use state::CacheEntry;

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::key::QueryKey;

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>>>>;

struct InFlight {
    ticket: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Store {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_ticket: u64,
}

struct Inner {
    config: CacheConfig,
    store: RwLock<Store>,
}

/// Session-wide query cache
///
/// Cheap to clone; clones share one store.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.inner.store.read();
        f.debug_struct("QueryClient")
            .field("config", &self.inner.config)
            .field("entry_count", &store.entries.len())
            .field("in_flight", &store.in_flight.len())
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(Error::from)
}

impl QueryClient {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                store: RwLock::new(Store::default()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reads
    // ═══════════════════════════════════════════════════════════════════════

    /// Fresh cached data, else the shared result of one network fetch.
    ///
    /// Concurrent calls for equal keys issue exactly one request and all
    /// resolve with its outcome.
    pub async fn fetch_query<T: DeserializeOwned>(&self, def: &QueryDef<T>) -> Result<T> {
        let value = self.fetch_value(def.key(), def.fetcher()?).await?;
        decode(&value)
    }

    /// Cached data of any age, fetching only when nothing is cached.
    pub async fn ensure_query_data<T: DeserializeOwned>(&self, def: &QueryDef<T>) -> Result<T> {
        if let Some(value) = self.get_query_data(def.key()) {
            return decode(&value);
        }
        self.fetch_query(def).await
    }

    /// Current state of `def`, starting a background refetch if it is stale.
    ///
    /// This is the read-handle entry point: callers render whatever the
    /// returned snapshot holds and read again once the fetch settles.
    /// Must be called within a Tokio runtime.
    pub fn observe<T>(&self, def: &QueryDef<T>) -> QueryState {
        let key = def.key();
        let needs_fetch = {
            let mut guard = self.inner.store.write();
            let store = &mut *guard;
            let entry = store
                .entries
                .entry(key.clone())
                .or_insert_with(CacheEntry::new);
            entry.touch();
            !entry.is_fresh(self.inner.config.stale_time) && !store.in_flight.contains_key(key)
        };

        if needs_fetch && let Ok(fetcher) = def.fetcher() {
            let fetch = self.start_or_join(key, fetcher);
            let key = key.clone();
            tokio::spawn(async move {
                if let Err(err) = fetch.await {
                    tracing::debug!(query.key = %key, error = %err, "background fetch failed");
                }
            });
        }

        self.query_state(key)
    }

    /// Snapshot of one key without touching the network
    #[must_use]
    pub fn query_state(&self, key: &QueryKey) -> QueryState {
        let store = self.inner.store.read();
        QueryState::from_entry(store.entries.get(key), store.in_flight.contains_key(key))
    }

    /// Number of fetches in flight under `filter`
    #[must_use]
    pub fn is_fetching(&self, filter: &QueryFilter) -> usize {
        let store = self.inner.store.read();
        store
            .in_flight
            .keys()
            .filter(|key| {
                let data = store.entries.get(*key).and_then(|e| e.data.as_deref());
                filter.matches(key, data)
            })
            .count()
    }

    #[must_use]
    pub fn get_query_data(&self, key: &QueryKey) -> Option<Arc<Value>> {
        let mut store = self.inner.store.write();
        let entry = store.entries.get_mut(key)?;
        entry.touch();
        entry.data.clone()
    }

    /// Cached data for `key` decoded as `T`
    pub fn get_query_data_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        self.get_query_data(key)
            .map(|value| decode(&value))
            .transpose()
    }

    pub(crate) async fn fetch_value(&self, key: &QueryKey, fetcher: Fetcher) -> Result<Arc<Value>> {
        if let Some(data) = self.fresh_data(key) {
            tracing::debug!(query.key = %key, query.result = "hit");
            return Ok(data);
        }
        self.start_or_join(key, fetcher).await
    }

    fn fresh_data(&self, key: &QueryKey) -> Option<Arc<Value>> {
        let mut store = self.inner.store.write();
        let entry = store.entries.get_mut(key)?;
        entry.touch();
        if entry.is_fresh(self.inner.config.stale_time) {
            entry.data.clone()
        } else {
            None
        }
    }

    /// Join the fetch in flight for `key`, or register a new one.
    pub(crate) fn start_or_join(&self, key: &QueryKey, fetcher: Fetcher) -> SharedFetch {
        self.try_start(key, fetcher).unwrap_or_else(|joined| {
            tracing::debug!(query.key = %key, "joining in-flight fetch");
            joined
        })
    }

    /// Register a new fetch for `key`.
    ///
    /// If one is already in flight, nothing is registered and its shared
    /// future comes back as the error.
    pub(crate) fn try_start(
        &self,
        key: &QueryKey,
        fetcher: Fetcher,
    ) -> std::result::Result<SharedFetch, SharedFetch> {
        let mut guard = self.inner.store.write();
        let store = &mut *guard;

        if let Some(in_flight) = store.in_flight.get(key) {
            return Err(in_flight.future.clone());
        }

        store.next_ticket += 1;
        let ticket = store.next_ticket;
        let entry = store
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new);
        entry.touch();
        entry.fetch_ticket = Some(ticket);

        let span = tracing::debug_span!("query.fetch", query.key = %key, query.ticket = ticket);
        let future = Self::run_fetch(Arc::clone(&self.inner), key.clone(), fetcher, ticket)
            .instrument(span)
            .boxed()
            .shared();
        store.in_flight.insert(
            key.clone(),
            InFlight {
                ticket,
                future: future.clone(),
            },
        );
        Ok(future)
    }

    async fn run_fetch(
        inner: Arc<Inner>,
        key: QueryKey,
        fetcher: Fetcher,
        ticket: u64,
    ) -> Result<Arc<Value>> {
        let result = fetch_with_retry(&inner.config, &key, &fetcher)
            .await
            .map(Arc::new);

        let mut guard = inner.store.write();
        let store = &mut *guard;
        if store
            .in_flight
            .get(&key)
            .is_some_and(|f| f.ticket == ticket)
        {
            store.in_flight.remove(&key);
        }

        match store.entries.get_mut(&key) {
            Some(entry) if entry.fetch_ticket == Some(ticket) => {
                entry.fetch_ticket = None;
                match &result {
                    Ok(data) => {
                        entry.data = Some(Arc::clone(data));
                        entry.error = None;
                        entry.data_updated_at = Some(std::time::Instant::now());
                        entry.invalidated = false;
                        tracing::debug!(query.key = %key, query.result = "stored");
                    }
                    Err(err) => {
                        entry.error = Some(err.clone());
                        tracing::warn!(query.key = %key, error = %err, "fetch failed");
                    }
                }
            }
            _ => {
                tracing::debug!(query.key = %key, "discarding response for invalidated query");
            }
        }

        result
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Writes
    // ═══════════════════════════════════════════════════════════════════════

    /// Replace the data for `key`, creating the entry if needed.
    pub fn set_query_data(&self, key: &QueryKey, data: Value) {
        let mut store = self.inner.store.write();
        store
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new)
            .store(data);
        tracing::debug!(query.key = %key, "query data set");
    }

    /// Update the data for `key` from its current value.
    ///
    /// `updater` returning `None` leaves the entry alone. Returns whether
    /// the stored data changed.
    pub fn set_query_data_with<F>(&self, key: &QueryKey, updater: F) -> bool
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let mut store = self.inner.store.write();
        let current = store.entries.get(key).and_then(|e| e.data.clone());
        let Some(next) = updater(current.as_deref()) else {
            return false;
        };
        if current.as_deref() == Some(&next) {
            return false;
        }
        store
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new)
            .store(next);
        true
    }

    /// Rewrite the data of every cached entry matching `filter`.
    ///
    /// Entries without data are skipped, as are updates that return `None`
    /// or an identical value, so repeating a patch is a no-op. Returns the
    /// number of entries changed.
    pub fn set_queries_data<F>(&self, filter: &QueryFilter, updater: F) -> usize
    where
        F: Fn(&Value) -> Option<Value>,
    {
        let mut store = self.inner.store.write();
        let mut changed = 0;
        for (key, entry) in &mut store.entries {
            let Some(current) = entry.data.as_deref() else {
                continue;
            };
            if !filter.matches(key, Some(current)) {
                continue;
            }
            if let Some(next) = updater(current)
                && next != *current
            {
                entry.store(next);
                changed += 1;
            }
        }
        drop(store);
        tracing::debug!(query.filter = %filter.key(), query.patched = changed, "queries patched");
        changed
    }

    /// Mark every entry matching `filter` stale, keeping its data.
    ///
    /// A fetch in flight for a matching key is detached: its waiters still
    /// get the response, but the cache ignores it. Returns the number of
    /// entries whose state changed; running the same invalidation twice in
    /// a row changes nothing the second time.
    pub fn invalidate_queries(&self, filter: &QueryFilter) -> usize {
        let mut guard = self.inner.store.write();
        let store = &mut *guard;
        let mut changed = 0;
        for (key, entry) in &mut store.entries {
            if !filter.matches(key, entry.data.as_deref()) {
                continue;
            }
            let mut touched = false;
            if !entry.invalidated {
                entry.invalidated = true;
                touched = true;
            }
            if store.in_flight.remove(key).is_some() {
                entry.fetch_ticket = None;
                touched = true;
            }
            if touched {
                changed += 1;
            }
        }
        drop(guard);
        tracing::debug!(
            query.filter = %filter.key(),
            query.invalidated = changed,
            "queries invalidated"
        );
        changed
    }

    /// Drop matching entries and any fetch in flight for them.
    pub fn remove_queries(&self, filter: &QueryFilter) -> usize {
        let mut guard = self.inner.store.write();
        let store = &mut *guard;
        let before = store.entries.len();
        store
            .entries
            .retain(|key, entry| !filter.matches(key, entry.data.as_deref()));
        let entries = &store.entries;
        store
            .in_flight
            .retain(|key, _| entries.contains_key(key) || !filter.matches_key(key));
        let removed = before - store.entries.len();
        drop(guard);
        tracing::debug!(query.filter = %filter.key(), query.removed = removed, "queries removed");
        removed
    }

    /// Evict entries unread for longer than `gc_time` with no fetch in flight.
    pub fn collect_garbage(&self) -> usize {
        let gc_time = self.inner.config.gc_time;
        let mut guard = self.inner.store.write();
        let store = &mut *guard;
        let before = store.entries.len();
        let in_flight = &store.in_flight;
        store.entries.retain(|key, entry| {
            in_flight.contains_key(key) || entry.last_accessed.elapsed() < gc_time
        });
        let evicted = before - store.entries.len();
        drop(guard);
        if evicted > 0 {
            tracing::debug!(query.evicted = evicted, "garbage collected");
        }
        evicted
    }

    /// Forget everything, e.g. on logout.
    pub fn clear(&self) {
        let mut store = self.inner.store.write();
        store.entries.clear();
        store.in_flight.clear();
        drop(store);
        tracing::debug!("query cache cleared");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Introspection
    // ═══════════════════════════════════════════════════════════════════════

    /// All cached keys, sorted
    #[must_use]
    pub fn cached_keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.inner.store.read().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// State of every cached key
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<QueryKey, QueryState> {
        let store = self.inner.store.read();
        store
            .entries
            .iter()
            .map(|(key, entry)| {
                (
                    key.clone(),
                    QueryState::from_entry(Some(entry), store.in_flight.contains_key(key)),
                )
            })
            .collect()
    }
}

async fn fetch_with_retry(
    config: &CacheConfig,
    key: &QueryKey,
    fetcher: &Fetcher,
) -> Result<Value> {
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < config.retry && err.is_retryable() => {
                let delay = config.retry_delay(attempt);
                tracing::debug!(
                    query.key = %key,
                    query.attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "retrying fetch",
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

//! Per-key cache entries and the snapshots handed to readers

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Stored state for one key
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub data: Option<Arc<Value>>,
    pub error: Option<Error>,
    pub data_updated_at: Option<Instant>,
    pub invalidated: bool,
    /// Ticket of the fetch whose response may be written here; cleared
    /// when the fetch is abandoned so a late response is dropped.
    pub fetch_ticket: Option<u64>,
    pub last_accessed: Instant,
}

impl CacheEntry {
    pub fn new() -> Self {
        Self {
            data: None,
            error: None,
            data_updated_at: None,
            invalidated: false,
            fetch_ticket: None,
            last_accessed: Instant::now(),
        }
    }

    pub fn with_data(data: Value) -> Self {
        let mut entry = Self::new();
        entry.store(data);
        entry
    }

    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    /// Data present, not invalidated, and younger than `stale_time`.
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self.data.is_some()
            && self
                .data_updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    pub fn store(&mut self, data: Value) {
        self.data = Some(Arc::new(data));
        self.error = None;
        self.data_updated_at = Some(Instant::now());
        self.invalidated = false;
    }
}

/// Lifecycle of a query's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data yet
    Pending,
    /// Data present; a later refetch may still have failed
    Success,
    /// No data, and the last fetch failed
    Error,
}

/// Snapshot of one key, as a read handle sees it
#[derive(Debug, Clone)]
pub struct QueryState {
    pub data: Option<Arc<Value>>,
    pub status: QueryStatus,
    pub is_fetching: bool,
    pub is_invalidated: bool,
    pub error: Option<Error>,
    pub data_updated_at: Option<Instant>,
}

impl QueryState {
    pub(crate) fn from_entry(entry: Option<&CacheEntry>, is_fetching: bool) -> Self {
        let Some(entry) = entry else {
            return Self {
                data: None,
                status: QueryStatus::Pending,
                is_fetching,
                is_invalidated: false,
                error: None,
                data_updated_at: None,
            };
        };
        let status = if entry.data.is_some() {
            QueryStatus::Success
        } else if entry.error.is_some() {
            QueryStatus::Error
        } else {
            QueryStatus::Pending
        };
        Self {
            data: entry.data.clone(),
            status,
            is_fetching,
            is_invalidated: entry.invalidated,
            error: entry.error.clone(),
            data_updated_at: entry.data_updated_at,
        }
    }

    /// First load: nothing to show and a fetch under way
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.is_fetching
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Decode the data into `T`; `None` while there is nothing cached.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.data
            .as_deref()
            .map(|value| T::deserialize(value).map_err(Error::from))
            .transpose()
    }
}

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::key::QueryKey;

type Predicate = Arc<dyn Fn(&QueryKey, Option<&Value>) -> bool + Send + Sync>;

/// Selects cached entries for bulk operations
///
/// Matches every key under `prefix` (or exactly `prefix` when `exact`),
/// further narrowed by an optional predicate over the key and its data.
#[derive(Clone)]
pub struct QueryFilter {
    prefix: QueryKey,
    exact: bool,
    predicate: Option<Predicate>,
}

impl fmt::Debug for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFilter")
            .field("prefix", &self.prefix)
            .field("exact", &self.exact)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}

impl QueryFilter {
    /// Every key under `prefix`, including `prefix` itself
    #[must_use]
    pub const fn prefix(prefix: QueryKey) -> Self {
        Self {
            prefix,
            exact: false,
            predicate: None,
        }
    }

    /// Only `key` itself
    #[must_use]
    pub const fn exact(key: QueryKey) -> Self {
        Self {
            prefix: key,
            exact: true,
            predicate: None,
        }
    }

    /// Keep only entries whose cached data satisfies `predicate`.
    ///
    /// Entries without data never match a data predicate.
    #[must_use]
    pub fn with_data_predicate<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.with_predicate(move |_, data| data.is_some_and(&predicate))
    }

    #[must_use]
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&QueryKey, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.prefix
    }

    #[must_use]
    pub fn matches_key(&self, key: &QueryKey) -> bool {
        if self.exact {
            &self.prefix == key
        } else {
            self.prefix.is_prefix_of(key)
        }
    }

    #[must_use]
    pub fn matches(&self, key: &QueryKey, data: Option<&Value>) -> bool {
        self.matches_key(key) && self.predicate.as_ref().is_none_or(|p| p(key, data))
    }
}

impl From<QueryKey> for QueryFilter {
    fn from(key: QueryKey) -> Self {
        Self::prefix(key)
    }
}

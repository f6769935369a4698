//! Query definitions: a key bound to the function that fetches it

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::QueryKey;

/// Type-erased fetch function producing the JSON stored in the cache
pub(crate) type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Type-erased fetch of one page by its absolute `next` URL
pub(crate) type PageFetcher =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

fn erase<T, F, Fut>(fetch: F) -> Fetcher
where
    T: Serialize + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetch();
        async move { Ok(serde_json::to_value(fut.await?)?) }.boxed()
    })
}

/// Reject placeholder identifiers before any request is made.
///
/// Negative ids stand in for "not known yet" while dependent reads are
/// still disabled.
pub fn valid_id(id: i64) -> Result<i64> {
    if id < 0 {
        Err(Error::InvalidIdentifier(id))
    } else {
        Ok(id)
    }
}

/// A cache key plus the fetch that fills it
///
/// `T` is the decoded type callers receive; the cache itself stores JSON.
pub struct QueryDef<T> {
    key: QueryKey,
    fetcher: Option<Fetcher>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for QueryDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetcher: self.fetcher.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for QueryDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDef")
            .field("key", &self.key)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl<T> QueryDef<T> {
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        T: Serialize + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            key,
            fetcher: Some(erase(fetch)),
            _marker: PhantomData,
        }
    }

    /// A query that never fetches, e.g. a detail read without an id yet
    #[must_use]
    pub const fn disabled(key: QueryKey) -> Self {
        Self {
            key,
            fetcher: None,
            _marker: PhantomData,
        }
    }

    /// Merge a caller's `enabled` option; it can only switch fetching off.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        if !enabled {
            self.fetcher = None;
        }
        self
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.fetcher.is_some()
    }

    /// Run the fetch directly, bypassing the cache.
    pub async fn fetch_uncached(&self) -> Result<Value> {
        (self.fetcher()?)().await
    }

    pub(crate) fn fetcher(&self) -> Result<Fetcher> {
        self.fetcher
            .clone()
            .ok_or_else(|| Error::QueryDisabled(self.key.clone()))
    }
}

/// An infinite list: first page from the endpoint, later pages by cursor
pub struct InfiniteQueryDef<T> {
    key: QueryKey,
    first_page: Option<Fetcher>,
    next_page: PageFetcher,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for InfiniteQueryDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            first_page: self.first_page.clone(),
            next_page: Arc::clone(&self.next_page),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for InfiniteQueryDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteQueryDef")
            .field("key", &self.key)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl<T> InfiniteQueryDef<T> {
    pub fn new<F, Fut, N, NFut>(key: QueryKey, first_page: F, next_page: N) -> Self
    where
        T: Serialize + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        N: Fn(String) -> NFut + Send + Sync + 'static,
        NFut: Future<Output = Result<T>> + Send + 'static,
    {
        let next_page: PageFetcher = Arc::new(move |url| {
            let fut = next_page(url);
            async move { Ok(serde_json::to_value(fut.await?)?) }.boxed()
        });
        Self {
            key,
            first_page: Some(erase(first_page)),
            next_page,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        if !enabled {
            self.first_page = None;
        }
        self
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.first_page.is_some()
    }

    pub(crate) fn first_page(&self) -> Result<Fetcher> {
        self.first_page
            .clone()
            .ok_or_else(|| Error::QueryDisabled(self.key.clone()))
    }

    pub(crate) fn next_page(&self) -> PageFetcher {
        Arc::clone(&self.next_page)
    }
}

//! Infinite (cursor-paginated) queries
//!
//! Cached as `{"pages": [...], "pageParams": [...]}`. The first page comes
//! from the list endpoint; each later page is the previous page's `next`
//! URL, followed exactly as the server wrote it.

use std::sync::Arc;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::query::{Fetcher, InfiniteQueryDef, PageFetcher};
use super::{QueryClient, decode};
use crate::error::{Error, Result};
use crate::key::QueryKey;

/// Decoded pages of an infinite query
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<T> {
    pub pages: Vec<T>,
    /// `None` for the first page, then the URL each page was fetched from
    pub page_params: Vec<Option<String>>,
}

impl<T: DeserializeOwned> InfiniteData<T> {
    pub fn from_value(value: &Value) -> Result<Self> {
        let pages = value
            .get("pages")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Decode("infinite query data has no pages".into()))?
            .iter()
            .map(decode)
            .collect::<Result<Vec<T>>>()?;
        let page_params = value
            .get("pageParams")
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .map(|p| p.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { pages, page_params })
    }
}

fn page_next(page: &Value) -> Option<String> {
    page.get("next").and_then(Value::as_str).map(str::to_owned)
}

/// Cursor for the page after the last one cached; `None` once exhausted.
#[must_use]
pub fn next_page_param(data: &Value) -> Option<String> {
    data.get("pages")
        .and_then(Value::as_array)
        .and_then(|pages| pages.last())
        .and_then(page_next)
}

fn page_count(data: &Value) -> usize {
    data.get("pages")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn append_page(data: &Value, page: Value, param: String) -> Value {
    let mut pages = data
        .get("pages")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut params = data
        .get("pageParams")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    pages.push(page);
    params.push(Value::String(param));
    json!({"pages": pages, "pageParams": params})
}

/// Refetch from the first page, following cursors up to `pages` pages.
fn refetch_pages(first: Fetcher, next: PageFetcher, pages: usize) -> Fetcher {
    Arc::new(move || {
        let first = Arc::clone(&first);
        let next = Arc::clone(&next);
        async move {
            let mut fetched = vec![first().await?];
            let mut params = vec![Value::Null];
            while fetched.len() < pages {
                let Some(url) = fetched.last().and_then(page_next) else {
                    break;
                };
                fetched.push(next(url.clone()).await?);
                params.push(Value::String(url));
            }
            Ok(json!({"pages": fetched, "pageParams": params}))
        }
        .boxed()
    })
}

/// Fetch the page at `url` and append it to `current`.
fn fetch_following(current: Arc<Value>, next: PageFetcher, url: String) -> Fetcher {
    Arc::new(move || {
        let current = Arc::clone(&current);
        let next = Arc::clone(&next);
        let url = url.clone();
        async move {
            let page = next(url.clone()).await?;
            Ok(append_page(&current, page, url))
        }
        .boxed()
    })
}

impl QueryClient {
    /// Fresh pages from the cache, else (re)load them.
    ///
    /// A refetch reloads as many pages as were cached, starting again from
    /// the first, so the pages stay consistent with each other.
    pub async fn fetch_infinite_query<T: DeserializeOwned>(
        &self,
        def: &InfiniteQueryDef<T>,
    ) -> Result<InfiniteData<T>> {
        let first = def.first_page()?;
        let pages = self
            .get_query_data(def.key())
            .map_or(1, |data| page_count(&data).max(1));
        let value = self
            .fetch_value(def.key(), refetch_pages(first, def.next_page(), pages))
            .await?;
        InfiniteData::from_value(&value)
    }

    /// Load one more page by following the last page's `next` URL.
    ///
    /// Without cached pages this loads the first page. Once the last page
    /// has no `next`, this returns the cached pages without a request. A
    /// fetch already in flight for the key is awaited first, and the cursor
    /// is then read from the pages it stored.
    pub async fn fetch_next_page<T: DeserializeOwned>(
        &self,
        def: &InfiniteQueryDef<T>,
    ) -> Result<InfiniteData<T>> {
        if !def.is_enabled() {
            return Err(Error::QueryDisabled(def.key().clone()));
        }
        loop {
            let Some(current) = self.get_query_data(def.key()) else {
                return self.fetch_infinite_query(def).await;
            };
            let Some(url) = next_page_param(&current) else {
                tracing::debug!(query.key = %def.key(), "no next page");
                return InfiniteData::from_value(&current);
            };

            let fetcher = fetch_following(current, def.next_page(), url);
            match self.try_start(def.key(), fetcher) {
                Ok(fetch) => return InfiniteData::from_value(&*fetch.await?),
                Err(pending) => {
                    tracing::debug!(query.key = %def.key(), "waiting for in-flight fetch");
                    pending.await?;
                }
            }
        }
    }

    /// Whether the cached pages end with a `next` cursor
    #[must_use]
    pub fn has_next_page(&self, key: &QueryKey) -> bool {
        self.get_query_data(key)
            .is_some_and(|data| next_page_param(&data).is_some())
    }
}

//! Key factories, read queries and mutations per resource group
//!
//! Each group module exposes:
//!
//! - `keys`: the group's branch of the key tree. `*_root()` functions return
//!   prefixes for bulk invalidation.
//! - query constructors taking a [`LearnApi`] and returning a
//!   [`QueryDef`](crate::QueryDef) or [`InfiniteQueryDef`](crate::InfiniteQueryDef);
//! - mutation constructors taking a [`LearnApi`] and a
//!   [`QueryClient`](crate::QueryClient), wired to the invalidation protocol.
//!
//! [`LearnApi`]: learn_api::LearnApi

pub mod articles;
pub mod channels;
pub mod learning_paths;
pub mod learning_resources;
pub mod profiles;
pub mod program_letters;
pub mod search_subscriptions;
pub mod testimonials;
pub mod user_lists;
pub mod users;
pub mod widget_lists;

use std::future::Future;

use serde::Serialize;

use crate::client::{QueryDef, valid_id};
use crate::key::QueryKey;

/// Query over one API call
pub(crate) fn api_query<T, F, Fut>(key: QueryKey, fetch: F) -> QueryDef<T>
where
    T: Serialize + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = learn_api::Result<T>> + Send + 'static,
{
    QueryDef::new(key, move || {
        let fut = fetch();
        async move { Ok(fut.await?) }
    })
}

/// Detail query for an id the caller may not know yet.
///
/// `None` disables the query. A negative placeholder fails with
/// `InvalidIdentifier` before any request is made.
pub(crate) fn detail_query<T, F, Fut>(key: QueryKey, id: Option<i64>, fetch: F) -> QueryDef<T>
where
    T: Serialize + 'static,
    F: Fn(i64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = learn_api::Result<T>> + Send + 'static,
{
    let Some(id) = id else {
        return QueryDef::disabled(key);
    };
    QueryDef::new(key, move || {
        let fut = valid_id(id).map(&fetch);
        async move { Ok(fut?.await?) }
    })
}

//! Query cache and invalidation protocol for the MIT Learn API
//!
//! - [`key`]: hierarchical query keys; invalidation is by key prefix.
//! - [`client`]: the session cache with in-flight request sharing,
//!   staleness, retries and cursor pagination.
//! - [`groups`]: per resource group key factories, queries and mutations.
//! - [`invalidation`]: membership-aware invalidation and in-place patching
//!   used by the mutations.
//!
//! # Example
//!
//! ```rust,ignore
//! use learn_query::{CacheConfig, LearnQuery, groups::learning_paths};
//!
//! let lq = LearnQuery::new(api, CacheConfig::default());
//! let path = lq.client.fetch_query(&learning_paths::detail(&lq.api, Some(7))).await?;
//! learning_paths::destroy(&lq.api, &lq.client).mutate(7).await?;
//! ```

pub mod client;
pub mod config;
mod error;
pub mod groups;
pub mod invalidation;
pub mod key;
pub mod mutation;
pub mod observability;

use std::sync::Arc;

pub use client::{
    InfiniteData, InfiniteQueryDef, QueryClient, QueryDef, QueryFilter, QueryState, QueryStatus,
    next_page_param, valid_id,
};
pub use config::{ApiConfig, CacheConfig, Config, ConfigBuilder, TelemetryConfig};
pub use error::{Error, Result};
pub use invalidation::{InvalidateOptions, ListCategory, PATCH_ONLY, ParentField};
pub use key::{CanonicalParams, KeySegment, QueryKey};
use learn_api::{HttpTransport, HttpTransportConfig, LearnApi, TracedTransport};
pub use mutation::{MoveItem, Mutation, MutationState, RelationshipRef, Update};

/// An API client paired with the cache its mutations reconcile
#[derive(Debug, Clone)]
pub struct LearnQuery {
    pub api: LearnApi,
    pub client: QueryClient,
}

impl LearnQuery {
    #[must_use]
    pub fn new(api: LearnApi, cache: CacheConfig) -> Self {
        Self {
            api,
            client: QueryClient::new(cache),
        }
    }

    /// Build the HTTP stack described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(HttpTransportConfig {
            timeout: config.api.timeout,
            csrf_token: config.api.csrf_token.clone(),
            ..HttpTransportConfig::default()
        })?;
        let transport = TracedTransport::new(transport, config.telemetry.service_name.clone());
        let api = LearnApi::new(config.api.base_url.clone(), Arc::new(transport));
        Ok(Self::new(api, config.cache))
    }

    /// Drop every cached result; the session's identity changed.
    pub fn logout(&self) {
        tracing::info!("clearing query cache on logout");
        self.client.clear();
    }
}

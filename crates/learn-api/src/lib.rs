//! Typed REST client for the MIT Learn learning-resources API.
//!
//! One API struct per resource group ([`LearningResourcesApi`],
//! [`LearningPathsApi`], [`UserListsApi`], ...), all sharing an
//! [`ApiClient`] that resolves paths against a base URL and sends them
//! through a pluggable [`Transport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use learn_api::{HttpTransport, HttpTransportConfig, LearnApi};
//!
//! let transport = HttpTransport::new(HttpTransportConfig::default())?;
//! let api = LearnApi::new("https://learn.mit.edu/api/".parse()?, Arc::new(transport));
//! let resource = api.learning_resources.retrieve(42).await?;
//! ```

pub mod apis;
mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use apis::{
    ArticlesApi, ChannelsApi, LearnApi, LearningPathsApi, LearningResourcesApi, ProfilesApi,
    ProgramLettersApi, SearchSubscriptionApi, TestimonialsApi, UserListsApi, UsersApi,
    WidgetListsApi,
};
pub use client::{ApiClient, append_query};
pub use error::{ApiError, Result};
#[cfg(any(test, feature = "testing"))]
pub use transport::{MockTransport, RecordedRequest};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, HttpTransportConfig, Method, TracedTransport, Transport,
};

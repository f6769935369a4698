//! Write executor
//!
//! A [`Mutation`] runs one API write and then reconciles the cache in two
//! explicit phases:
//!
//! 1. `on_success(cache, input, output)` after a successful write, for
//!    synchronous in-place patches;
//! 2. `on_settled(cache, input, output)` after success, or after a failure
//!    that may still have changed server state, for invalidation.
//!
//! Writes are never retried.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::client::QueryClient;
use crate::error::{Error, Result};

type MutateFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O>> + Send + Sync>;
type SuccessFn<I, O> = Arc<dyn Fn(&QueryClient, &I, &O) + Send + Sync>;
type SettledFn<I, O> = Arc<dyn Fn(&QueryClient, &I, Option<&O>) + Send + Sync>;

/// Identity plus body of an update.
///
/// The id addresses the URL and drives invalidation; only `body` is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update<B> {
    pub id: i64,
    pub body: B,
}

impl<B> Update<B> {
    pub const fn new(id: i64, body: B) -> Self {
        Self { id, body }
    }
}

/// Move list item `id` of list `parent` to `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveItem {
    pub parent: i64,
    pub id: i64,
    pub position: i32,
}

/// An existing membership: relationship `id` links `parent` to `child`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipRef {
    pub id: i64,
    pub parent: i64,
    pub child: i64,
}

/// Where the last call of a [`Mutation`] stands
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState<O> {
    Idle,
    Pending,
    Success(O),
    Error(Error),
}

impl<O> MutationState<O> {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// One kind of API write bound to a cache
pub struct Mutation<I, O> {
    name: &'static str,
    client: QueryClient,
    mutate_fn: MutateFn<I, O>,
    on_success: Option<SuccessFn<I, O>>,
    on_settled: Option<SettledFn<I, O>>,
    state: Arc<Mutex<MutationState<O>>>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            client: self.client.clone(),
            mutate_fn: Arc::clone(&self.mutate_fn),
            on_success: self.on_success.clone(),
            on_settled: self.on_settled.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<I, O> fmt::Debug for Mutation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("name", &self.name)
            .field("has_on_success", &self.on_success.is_some())
            .field("has_on_settled", &self.on_settled.is_some())
            .finish_non_exhaustive()
    }
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Clone + Send + 'static,
{
    pub fn new<F, Fut>(name: &'static str, client: &QueryClient, mutate: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Self {
            name,
            client: client.clone(),
            mutate_fn: Arc::new(move |input| mutate(input).boxed()),
            on_success: None,
            on_settled: None,
            state: Arc::new(Mutex::new(MutationState::Idle)),
        }
    }

    #[must_use]
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&QueryClient, &I, &O) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_settled<F>(mut self, f: F) -> Self
    where
        F: Fn(&QueryClient, &I, Option<&O>) + Send + Sync + 'static,
    {
        self.on_settled = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Run the write, then the cache phases; returns the server's response
    /// unmodified.
    pub async fn mutate(&self, input: I) -> Result<O>
    where
        I: Clone,
    {
        *self.state.lock() = MutationState::Pending;
        tracing::debug!(mutation = self.name, "mutation started");

        let result = (self.mutate_fn)(input.clone()).await;

        match &result {
            Ok(output) => {
                if let Some(on_success) = &self.on_success {
                    on_success(&self.client, &input, output);
                }
                if let Some(on_settled) = &self.on_settled {
                    on_settled(&self.client, &input, Some(output));
                }
                tracing::info!(mutation = self.name, "mutation succeeded");
                *self.state.lock() = MutationState::Success(output.clone());
            }
            Err(err) => {
                if err.may_have_side_effects() {
                    if let Some(on_settled) = &self.on_settled {
                        on_settled(&self.client, &input, None);
                    }
                } else {
                    tracing::debug!(mutation = self.name, "write had no effect, cache left alone");
                }
                tracing::warn!(mutation = self.name, error = %err, "mutation failed");
                *self.state.lock() = MutationState::Error(err.clone());
            }
        }

        result
    }

    #[must_use]
    pub fn state(&self) -> MutationState<O> {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.lock().is_pending()
    }

    pub fn reset(&self) {
        *self.state.lock() = MutationState::Idle;
    }
}

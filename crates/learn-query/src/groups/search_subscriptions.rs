//! `searchSubscriptions`: saved searches the learner is notified about

use learn_api::LearnApi;
use learn_api::models::{
    PercolateQuery, PercolateQuerySubscriptionRequest, SubscriptionCheckParams,
    SubscriptionListParams,
};

use super::api_query;
use crate::client::{QueryClient, QueryDef, QueryFilter};
use crate::mutation::Mutation;

pub mod keys {
    use serde::Serialize;

    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "searchSubscriptions";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn list<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        root().with("list").with_params(params)
    }

    #[must_use]
    pub fn check<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        root().with("check").with_params(params)
    }
}

/// Search parameters to subscribe to, plus the subscription body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscribe {
    pub params: SubscriptionCheckParams,
    pub request: PercolateQuerySubscriptionRequest,
}

#[must_use]
pub fn list(api: &LearnApi, params: SubscriptionListParams) -> QueryDef<Vec<PercolateQuery>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.subscriptions.list(&params).await }
    })
}

/// Subscriptions matching exactly these search parameters
#[must_use]
pub fn check(api: &LearnApi, params: SubscriptionCheckParams) -> QueryDef<Vec<PercolateQuery>> {
    let api = api.clone();
    api_query(keys::check(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.subscriptions.check(&params).await }
    })
}

#[must_use]
pub fn subscribe(api: &LearnApi, client: &QueryClient) -> Mutation<Subscribe, PercolateQuery> {
    let api = api.clone();
    Mutation::new("search_subscriptions.subscribe", client, move |input: Subscribe| {
        let api = api.clone();
        async move { Ok(api.subscriptions.subscribe(&input.params, &input.request).await?) }
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::root()));
    })
}

#[must_use]
pub fn unsubscribe(api: &LearnApi, client: &QueryClient) -> Mutation<i64, ()> {
    let api = api.clone();
    Mutation::new("search_subscriptions.unsubscribe", client, move |id: i64| {
        let api = api.clone();
        async move { Ok(api.subscriptions.unsubscribe(id).await?) }
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::root()));
    })
}

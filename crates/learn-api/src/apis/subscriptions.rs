use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    PercolateQuery, PercolateQuerySubscriptionRequest, SubscriptionCheckParams,
    SubscriptionListParams,
};

const BASE: &str = "v0/learning_resources_user_subscription/";

/// Saved-search subscriptions of the signed-in learner
#[derive(Debug, Clone)]
pub struct SearchSubscriptionApi {
    client: ApiClient,
}

impl SearchSubscriptionApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &SubscriptionListParams) -> Result<Vec<PercolateQuery>> {
        self.client.get(BASE, params).await
    }

    /// Subscriptions matching exactly these search parameters
    pub async fn check(&self, params: &SubscriptionCheckParams) -> Result<Vec<PercolateQuery>> {
        self.client.get(&format!("{BASE}check/"), params).await
    }

    pub async fn subscribe(
        &self,
        params: &SubscriptionCheckParams,
        request: &PercolateQuerySubscriptionRequest,
    ) -> Result<PercolateQuery> {
        self.client
            .post_with_query(&format!("{BASE}subscribe/"), params, request)
            .await
    }

    pub async fn unsubscribe(&self, id: i64) -> Result<()> {
        self.client
            .post_empty(&format!("{BASE}{id}/unsubscribe/"), &())
            .await
    }
}

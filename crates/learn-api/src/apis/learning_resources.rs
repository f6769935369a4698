use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    FeaturedListParams, LearningResource, LearningResourcesListParams,
    MicroLearningPathRelationship, MicroUserListRelationship, Paginated, SetLearningPathsRequest,
    SetUserListsRequest, Topic, TopicsListParams,
};

/// `/api/v1/learning_resources/`, `/api/v1/featured/`, `/api/v1/topics/`
#[derive(Debug, Clone)]
pub struct LearningResourcesApi {
    client: ApiClient,
}

impl LearningResourcesApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, id: i64) -> Result<LearningResource> {
        self.client
            .get(&format!("v1/learning_resources/{id}/"), &())
            .await
    }

    pub async fn list(
        &self,
        params: &LearningResourcesListParams,
    ) -> Result<Paginated<LearningResource>> {
        self.client.get("v1/learning_resources/", params).await
    }

    /// Featured resources; the server orders them randomly per request
    pub async fn featured(
        &self,
        params: &FeaturedListParams,
    ) -> Result<Paginated<LearningResource>> {
        self.client.get("v1/featured/", params).await
    }

    pub async fn topics(&self, params: &TopicsListParams) -> Result<Paginated<Topic>> {
        self.client.get("v1/topics/", params).await
    }

    /// Replace the set of learning paths containing resource `id`
    pub async fn set_learning_paths(
        &self,
        id: i64,
        request: &SetLearningPathsRequest,
    ) -> Result<Vec<MicroLearningPathRelationship>> {
        self.client
            .patch(&format!("v1/learning_resources/{id}/learning_paths/"), request)
            .await
    }

    /// Replace the set of user lists containing resource `id`
    pub async fn set_user_lists(
        &self,
        id: i64,
        request: &SetUserListsRequest,
    ) -> Result<Vec<MicroUserListRelationship>> {
        self.client
            .patch(&format!("v1/learning_resources/{id}/userlists/"), request)
            .await
    }
}

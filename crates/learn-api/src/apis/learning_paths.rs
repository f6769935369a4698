use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    LearningPath, LearningPathRelationship, LearningPathRelationshipRequest, LearningPathRequest,
    ListItemsParams, ListParams, Paginated, PatchedLearningPathRelationshipRequest,
    PatchedLearningPathRequest,
};

/// `/api/v1/learningpaths/` and nested `items/`
#[derive(Debug, Clone)]
pub struct LearningPathsApi {
    client: ApiClient,
}

impl LearningPathsApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<LearningPath>> {
        self.client.get("v1/learningpaths/", params).await
    }

    pub async fn retrieve(&self, id: i64) -> Result<LearningPath> {
        self.client.get(&format!("v1/learningpaths/{id}/"), &()).await
    }

    pub async fn create(&self, request: &LearningPathRequest) -> Result<LearningPath> {
        self.client.post("v1/learningpaths/", request).await
    }

    pub async fn partial_update(
        &self,
        id: i64,
        patch: &PatchedLearningPathRequest,
    ) -> Result<LearningPath> {
        self.client
            .patch(&format!("v1/learningpaths/{id}/"), patch)
            .await
    }

    pub async fn destroy(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("v1/learningpaths/{id}/")).await
    }

    /// First page of items; later pages come from the `next` cursor
    pub async fn items_list(
        &self,
        parent: i64,
        params: &ListItemsParams,
    ) -> Result<Paginated<LearningPathRelationship>> {
        self.client
            .get(&format!("v1/learningpaths/{parent}/items/"), params)
            .await
    }

    pub async fn items_create(
        &self,
        parent: i64,
        request: &LearningPathRelationshipRequest,
    ) -> Result<LearningPathRelationship> {
        self.client
            .post(&format!("v1/learningpaths/{parent}/items/"), request)
            .await
    }

    pub async fn items_partial_update(
        &self,
        parent: i64,
        id: i64,
        patch: &PatchedLearningPathRelationshipRequest,
    ) -> Result<LearningPathRelationship> {
        self.client
            .patch(&format!("v1/learningpaths/{parent}/items/{id}/"), patch)
            .await
    }

    pub async fn items_destroy(&self, parent: i64, id: i64) -> Result<()> {
        self.client
            .delete(&format!("v1/learningpaths/{parent}/items/{id}/"))
            .await
    }
}

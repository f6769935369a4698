use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    ListItemsParams, ListParams, Paginated, PatchedUserListRelationshipRequest,
    PatchedUserListRequest, UserList, UserListRelationship, UserListRelationshipRequest,
    UserListRequest,
};

/// `/api/v1/userlists/` and nested `items/`
#[derive(Debug, Clone)]
pub struct UserListsApi {
    client: ApiClient,
}

impl UserListsApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<UserList>> {
        self.client.get("v1/userlists/", params).await
    }

    pub async fn retrieve(&self, id: i64) -> Result<UserList> {
        self.client.get(&format!("v1/userlists/{id}/"), &()).await
    }

    pub async fn create(&self, request: &UserListRequest) -> Result<UserList> {
        self.client.post("v1/userlists/", request).await
    }

    pub async fn partial_update(
        &self,
        id: i64,
        patch: &PatchedUserListRequest,
    ) -> Result<UserList> {
        self.client
            .patch(&format!("v1/userlists/{id}/"), patch)
            .await
    }

    pub async fn destroy(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("v1/userlists/{id}/")).await
    }

    /// First page of items; later pages come from the `next` cursor
    pub async fn items_list(
        &self,
        parent: i64,
        params: &ListItemsParams,
    ) -> Result<Paginated<UserListRelationship>> {
        self.client
            .get(&format!("v1/userlists/{parent}/items/"), params)
            .await
    }

    pub async fn items_create(
        &self,
        parent: i64,
        request: &UserListRelationshipRequest,
    ) -> Result<UserListRelationship> {
        self.client
            .post(&format!("v1/userlists/{parent}/items/"), request)
            .await
    }

    pub async fn items_partial_update(
        &self,
        parent: i64,
        id: i64,
        patch: &PatchedUserListRelationshipRequest,
    ) -> Result<UserListRelationship> {
        self.client
            .patch(&format!("v1/userlists/{parent}/items/{id}/"), patch)
            .await
    }

    pub async fn items_destroy(&self, parent: i64, id: i64) -> Result<()> {
        self.client
            .delete(&format!("v1/userlists/{parent}/items/{id}/"))
            .await
    }
}

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Article, ArticleListParams, ArticleRequest, Paginated, PatchedArticleRequest};

/// `/api/v1/articles/`
#[derive(Debug, Clone)]
pub struct ArticlesApi {
    client: ApiClient,
}

impl ArticlesApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ArticleListParams) -> Result<Paginated<Article>> {
        self.client.get("v1/articles/", params).await
    }

    pub async fn retrieve(&self, id: i64) -> Result<Article> {
        self.client.get(&format!("v1/articles/{id}/"), &()).await
    }

    pub async fn create(&self, request: &ArticleRequest) -> Result<Article> {
        self.client.post("v1/articles/", request).await
    }

    pub async fn partial_update(&self, id: i64, patch: &PatchedArticleRequest) -> Result<Article> {
        self.client.patch(&format!("v1/articles/{id}/"), patch).await
    }

    pub async fn destroy(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("v1/articles/{id}/")).await
    }
}

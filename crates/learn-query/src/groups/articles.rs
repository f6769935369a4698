//! `articles`: CMS pages

use learn_api::LearnApi;
use learn_api::models::{
    Article, ArticleListParams, ArticleRequest, Paginated, PatchedArticleRequest,
};

use super::{api_query, detail_query};
use crate::client::{QueryClient, QueryDef, QueryFilter};
use crate::mutation::{Mutation, Update};

pub mod keys {
    use serde::Serialize;

    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "articles";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn detail(id: Option<i64>) -> QueryKey {
        root().with("detail").with(id)
    }

    #[must_use]
    pub fn list_root() -> QueryKey {
        root().with("list")
    }

    #[must_use]
    pub fn list<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        list_root().with_params(params)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<Article> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.articles.retrieve(id).await }
    })
}

#[must_use]
pub fn list(api: &LearnApi, params: ArticleListParams) -> QueryDef<Paginated<Article>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        async move { api.articles.list(&params).await }
    })
}

#[must_use]
pub fn create(api: &LearnApi, client: &QueryClient) -> Mutation<ArticleRequest, Article> {
    let api = api.clone();
    Mutation::new("articles.create", client, move |request: ArticleRequest| {
        let api = api.clone();
        async move { Ok(api.articles.create(&request).await?) }
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::list_root()));
    })
}

/// The response is the new detail; lists are refetched.
#[must_use]
pub fn update(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<PatchedArticleRequest>, Article> {
    let api = api.clone();
    Mutation::new(
        "articles.update",
        client,
        move |input: Update<PatchedArticleRequest>| {
            let api = api.clone();
            async move { Ok(api.articles.partial_update(input.id, &input.body).await?) }
        },
    )
    .on_success(|cache, input, article| match serde_json::to_value(article) {
        Ok(value) => cache.set_query_data(&keys::detail(Some(input.id)), value),
        Err(err) => tracing::warn!(error = %err, "cannot cache updated article"),
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::list_root()));
    })
}

#[must_use]
pub fn destroy(api: &LearnApi, client: &QueryClient) -> Mutation<i64, ()> {
    let api = api.clone();
    Mutation::new("articles.destroy", client, move |id: i64| {
        let api = api.clone();
        async move { Ok(api.articles.destroy(id).await?) }
    })
    .on_success(|cache, id, _| {
        cache.remove_queries(&QueryFilter::exact(keys::detail(Some(*id))));
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::list_root()));
    })
}

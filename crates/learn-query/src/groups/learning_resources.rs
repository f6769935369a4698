//! `learningResources` namespace: resources, featured lists, topics and
//! the membership-setting writes
//!
//! Learning paths and user lists live under this namespace as well (see
//! [`super::learning_paths`] and [`super::user_lists`]), so invalidating
//! [`keys::root`] reaches them too.

use learn_api::LearnApi;
use learn_api::models::{
    FeaturedListParams, LearningResource, LearningResourcesListParams,
    MicroLearningPathRelationship, MicroUserListRelationship, Paginated, SetLearningPathsRequest,
    SetUserListsRequest, Topic, TopicsListParams,
};
use serde_json::Value;

use super::{api_query, detail_query};
use crate::client::{QueryClient, QueryDef};
use crate::invalidation::{
    InvalidateOptions, ParentField, invalidate_resource_queries, invalidate_user_list_queries,
    patch_parents_in_patch_only_lists,
};
use crate::mutation::{Mutation, Update};

pub mod keys {
    use serde::Serialize;

    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "learningResources";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn detail_root() -> QueryKey {
        root().with("detail")
    }

    #[must_use]
    pub fn detail(id: Option<i64>) -> QueryKey {
        detail_root().with(id)
    }

    #[must_use]
    pub fn list_root() -> QueryKey {
        root().with("list")
    }

    #[must_use]
    pub fn list<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        list_root().with_params(params)
    }

    #[must_use]
    pub fn featured_root() -> QueryKey {
        root().with("featured")
    }

    #[must_use]
    pub fn featured<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        featured_root().with_params(params)
    }

    #[must_use]
    pub fn topics_root() -> QueryKey {
        root().with("topics")
    }

    #[must_use]
    pub fn topics<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        topics_root().with_params(params)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<LearningResource> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.learning_resources.retrieve(id).await }
    })
}

#[must_use]
pub fn list(
    api: &LearnApi,
    params: LearningResourcesListParams,
) -> QueryDef<Paginated<LearningResource>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.learning_resources.list(&params).await }
    })
}

/// Featured resources; never invalidated on membership changes
#[must_use]
pub fn featured(
    api: &LearnApi,
    params: FeaturedListParams,
) -> QueryDef<Paginated<LearningResource>> {
    let api = api.clone();
    api_query(keys::featured(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.learning_resources.featured(&params).await }
    })
}

#[must_use]
pub fn topics(api: &LearnApi, params: TopicsListParams) -> QueryDef<Paginated<Topic>> {
    let api = api.clone();
    api_query(keys::topics(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.learning_resources.topics(&params).await }
    })
}

/// Parent list ids recorded in the cached detail of resource `id`.
///
/// Read at settle time: the detail entry is never patched by the
/// membership-setting writes, so it still holds the memberships from
/// before the write.
fn cached_parent_ids(client: &QueryClient, id: i64, field: ParentField) -> Vec<i64> {
    client
        .get_query_data(&keys::detail(Some(id)))
        .and_then(|data| {
            data.get(field.as_str()).and_then(Value::as_array).map(|parents| {
                parents
                    .iter()
                    .filter_map(|p| p.get("parent").and_then(Value::as_i64))
                    .collect()
            })
        })
        .unwrap_or_default()
}

fn to_values<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

fn merged(mut ids: Vec<i64>, more: &[i64]) -> Vec<i64> {
    ids.extend_from_slice(more);
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Replace the learning paths that contain a resource.
///
/// Featured lists get the new memberships patched in; the resource, the
/// learning paths it joined and the ones it left are invalidated.
#[must_use]
pub fn set_learning_paths(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<SetLearningPathsRequest>, Vec<MicroLearningPathRelationship>> {
    let api = api.clone();
    Mutation::new(
        "learning_resources.set_learning_paths",
        client,
        move |input: Update<SetLearningPathsRequest>| {
            let api = api.clone();
            async move {
                Ok(api
                    .learning_resources
                    .set_learning_paths(input.id, &input.body)
                    .await?)
            }
        },
    )
    .on_success(|cache, input, output| {
        patch_parents_in_patch_only_lists(
            cache,
            input.id,
            ParentField::LearningPaths,
            &to_values(output),
        );
    })
    .on_settled(|cache, input, _| {
        let previous = cached_parent_ids(cache, input.id, ParentField::LearningPaths);
        invalidate_resource_queries(cache, input.id, &InvalidateOptions::skip_patch_only());
        for parent in merged(previous, &input.body.learning_path_id) {
            invalidate_resource_queries(cache, parent, &InvalidateOptions::default());
        }
    })
}

/// Replace the user lists that contain a resource.
#[must_use]
pub fn set_user_lists(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<SetUserListsRequest>, Vec<MicroUserListRelationship>> {
    let api = api.clone();
    Mutation::new(
        "learning_resources.set_user_lists",
        client,
        move |input: Update<SetUserListsRequest>| {
            let api = api.clone();
            async move {
                Ok(api
                    .learning_resources
                    .set_user_lists(input.id, &input.body)
                    .await?)
            }
        },
    )
    .on_success(|cache, input, output| {
        patch_parents_in_patch_only_lists(
            cache,
            input.id,
            ParentField::UserLists,
            &to_values(output),
        );
    })
    .on_settled(|cache, input, _| {
        let previous = cached_parent_ids(cache, input.id, ParentField::UserLists);
        invalidate_resource_queries(cache, input.id, &InvalidateOptions::skip_patch_only());
        for parent in merged(previous, &input.body.userlist_id) {
            invalidate_user_list_queries(cache, parent);
        }
    })
}

//! `learningResources.userlists`: a learner's own ordered lists
//!
//! User lists are not learning resources themselves, so writes to a list
//! reconcile through [`invalidate_user_list_queries`] rather than the
//! resource protocol; the resources inside still use it.

use learn_api::LearnApi;
use learn_api::models::{
    ListItemsParams, ListParams, Paginated, PatchedUserListRelationshipRequest,
    PatchedUserListRequest, UserList, UserListRelationship, UserListRelationshipRequest,
    UserListRequest,
};

use super::{api_query, detail_query};
use crate::client::{InfiniteQueryDef, QueryClient, QueryDef, QueryFilter};
use crate::invalidation::{
    InvalidateOptions, ParentField, invalidate_resource_queries, invalidate_user_list_queries,
    patch_parents_on_destroy, patch_resource,
};
use crate::mutation::{MoveItem, Mutation, RelationshipRef, Update};

pub mod keys {
    use serde::Serialize;

    use crate::groups::learning_resources;
    use crate::key::QueryKey;

    #[must_use]
    pub fn root() -> QueryKey {
        learning_resources::keys::root().with("userlists")
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

    /// Every page-size variant of one list's items
    #[must_use]
    pub fn infinite_items_root(parent: i64) -> QueryKey {
        detail(Some(parent)).with("infiniteItems")
    }

    #[must_use]
    pub fn infinite_items<P: Serialize + ?Sized>(parent: i64, params: &P) -> QueryKey {
        infinite_items_root(parent).with_params(params)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<UserList> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.user_lists.retrieve(id).await }
    })
}

#[must_use]
pub fn list(api: &LearnApi, params: ListParams) -> QueryDef<Paginated<UserList>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        async move { api.user_lists.list(&params).await }
    })
}

/// Items of user list `parent`; later pages follow the server's `next` URL.
#[must_use]
pub fn items(
    api: &LearnApi,
    parent: i64,
    params: ListItemsParams,
) -> InfiniteQueryDef<Paginated<UserListRelationship>> {
    let first = api.clone();
    let next = api.clone();
    InfiniteQueryDef::new(
        keys::infinite_items(parent, &params),
        move || {
            let api = first.clone();
            async move { Ok(api.user_lists.items_list(parent, &params).await?) }
        },
        move |url: String| {
            let api = next.clone();
            async move {
                Ok(api
                    .client()
                    .get_url::<Paginated<UserListRelationship>>(&url)
                    .await?)
            }
        },
    )
}

/// A new list may appear in any list query, so every user-list query goes stale.
#[must_use]
pub fn create(api: &LearnApi, client: &QueryClient) -> Mutation<UserListRequest, UserList> {
    let api = api.clone();
    Mutation::new("user_lists.create", client, move |request: UserListRequest| {
        let api = api.clone();
        async move { Ok(api.user_lists.create(&request).await?) }
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::root()));
    })
}

#[must_use]
pub fn update(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<PatchedUserListRequest>, UserList> {
    let api = api.clone();
    Mutation::new(
        "user_lists.update",
        client,
        move |input: Update<PatchedUserListRequest>| {
            let api = api.clone();
            async move { Ok(api.user_lists.partial_update(input.id, &input.body).await?) }
        },
    )
    .on_settled(|cache, input, _| {
        invalidate_user_list_queries(cache, input.id);
    })
}

#[must_use]
pub fn destroy(api: &LearnApi, client: &QueryClient) -> Mutation<i64, ()> {
    let api = api.clone();
    Mutation::new("user_lists.destroy", client, move |id: i64| {
        let api = api.clone();
        async move { Ok(api.user_lists.destroy(id).await?) }
    })
    .on_settled(|cache, id, _| {
        invalidate_user_list_queries(cache, *id);
    })
}

/// Add a resource to a user list; reconciled like a learning-path item.
#[must_use]
pub fn create_relationship(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<UserListRelationshipRequest, UserListRelationship> {
    let api = api.clone();
    Mutation::new(
        "user_lists.relationship.create",
        client,
        move |request: UserListRelationshipRequest| {
            let api = api.clone();
            async move { Ok(api.user_lists.items_create(request.parent, &request).await?) }
        },
    )
    .on_success(|cache, _, relationship| match serde_json::to_value(&relationship.resource) {
        Ok(resource) => {
            patch_resource(cache, &resource);
        }
        Err(err) => tracing::warn!(error = %err, "cannot patch created relationship"),
    })
    .on_settled(|cache, request, _| {
        invalidate_resource_queries(cache, request.child, &InvalidateOptions::skip_patch_only());
        invalidate_user_list_queries(cache, request.parent);
    })
}

/// Reorder an item; only the parent's item lists are refetched.
#[must_use]
pub fn move_relationship(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<MoveItem, UserListRelationship> {
    let api = api.clone();
    Mutation::new("user_lists.relationship.move", client, move |item: MoveItem| {
        let api = api.clone();
        async move {
            let patch = PatchedUserListRelationshipRequest {
                position: Some(item.position),
            };
            Ok(api
                .user_lists
                .items_partial_update(item.parent, item.id, &patch)
                .await?)
        }
    })
    .on_settled(|cache, item, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::infinite_items_root(item.parent)));
    })
}

/// Remove a resource from a user list.
#[must_use]
pub fn destroy_relationship(api: &LearnApi, client: &QueryClient) -> Mutation<RelationshipRef, ()> {
    let api = api.clone();
    Mutation::new(
        "user_lists.relationship.destroy",
        client,
        move |relationship: RelationshipRef| {
            let api = api.clone();
            async move {
                Ok(api
                    .user_lists
                    .items_destroy(relationship.parent, relationship.id)
                    .await?)
            }
        },
    )
    .on_success(|cache, relationship, _| {
        patch_parents_on_destroy(
            cache,
            relationship.child,
            ParentField::UserLists,
            relationship.id,
        );
    })
    .on_settled(|cache, relationship, _| {
        let child = relationship.child;
        invalidate_resource_queries(cache, child, &InvalidateOptions::skip_patch_only());
        invalidate_user_list_queries(cache, relationship.parent);
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::groups::{learning_paths, learning_resources};

    #[test]
    fn test_separate_from_learning_paths() {
        assert!(learning_resources::keys::root().is_prefix_of(&keys::root()));
        assert!(!learning_paths::keys::root().is_prefix_of(&keys::detail(Some(1))));
        assert_ne!(keys::detail(Some(1)), learning_paths::keys::detail(Some(1)));
    }

    #[test]
    fn test_items_nest_under_detail() {
        let items = keys::infinite_items(3, &json!({}));
        assert!(keys::detail(Some(3)).is_prefix_of(&items));
        assert!(!keys::list_root().is_prefix_of(&items));
    }
}

//! `learningResources.learningpaths`: staff-curated ordered lists
//!
//! Item lists are infinite queries nested under the path's detail key, so
//! invalidating a path's detail also reaches its items.

use learn_api::LearnApi;
use learn_api::models::{
    LearningPath, LearningPathRelationship, LearningPathRelationshipRequest, LearningPathRequest,
    ListItemsParams, ListParams, Paginated, PatchedLearningPathRelationshipRequest,
    PatchedLearningPathRequest,
};

use super::{api_query, detail_query};
use crate::client::{InfiniteQueryDef, QueryClient, QueryDef, QueryFilter};
use crate::invalidation::{
    InvalidateOptions, ParentField, invalidate_resource_queries, patch_parents_on_destroy,
    patch_resource,
};
use crate::mutation::{MoveItem, Mutation, RelationshipRef, Update};

pub mod keys {
    use serde::Serialize;

    use crate::groups::learning_resources;
    use crate::key::QueryKey;

    #[must_use]
    pub fn root() -> QueryKey {
        learning_resources::keys::root().with("learningpaths")
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

    /// Every page-size variant of one path's item list
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
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<LearningPath> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.learning_paths.retrieve(id).await }
    })
}

#[must_use]
pub fn list(api: &LearnApi, params: ListParams) -> QueryDef<Paginated<LearningPath>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        async move { api.learning_paths.list(&params).await }
    })
}

/// Items of path `parent`; later pages follow the server's `next` URL.
#[must_use]
pub fn items(
    api: &LearnApi,
    parent: i64,
    params: ListItemsParams,
) -> InfiniteQueryDef<Paginated<LearningPathRelationship>> {
    let first = api.clone();
    let next = api.clone();
    InfiniteQueryDef::new(
        keys::infinite_items(parent, &params),
        move || {
            let api = first.clone();
            async move { Ok(api.learning_paths.items_list(parent, &params).await?) }
        },
        move |url: String| {
            let api = next.clone();
            async move {
                Ok(api
                    .client()
                    .get_url::<Paginated<LearningPathRelationship>>(&url)
                    .await?)
            }
        },
    )
}

/// New paths may appear in any list, so every path query goes stale.
#[must_use]
pub fn create(api: &LearnApi, client: &QueryClient) -> Mutation<LearningPathRequest, LearningPath> {
    let api = api.clone();
    Mutation::new("learning_paths.create", client, move |request: LearningPathRequest| {
        let api = api.clone();
        async move { Ok(api.learning_paths.create(&request).await?) }
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::root()));
    })
}

#[must_use]
pub fn update(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<PatchedLearningPathRequest>, LearningPath> {
    let api = api.clone();
    Mutation::new(
        "learning_paths.update",
        client,
        move |input: Update<PatchedLearningPathRequest>| {
            let api = api.clone();
            async move { Ok(api.learning_paths.partial_update(input.id, &input.body).await?) }
        },
    )
    .on_settled(|cache, input, _| {
        invalidate_resource_queries(cache, input.id, &InvalidateOptions::default());
    })
}

#[must_use]
pub fn destroy(api: &LearnApi, client: &QueryClient) -> Mutation<i64, ()> {
    let api = api.clone();
    Mutation::new("learning_paths.destroy", client, move |id: i64| {
        let api = api.clone();
        async move { Ok(api.learning_paths.destroy(id).await?) }
    })
    .on_settled(|cache, id, _| {
        invalidate_resource_queries(cache, *id, &InvalidateOptions::default());
    })
}

/// Add a resource to a path.
///
/// The response embeds the updated child resource, which is written over
/// every cached copy of it. Featured lists keep that patch; everything
/// else about the child and the parent is then invalidated.
#[must_use]
pub fn create_relationship(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<LearningPathRelationshipRequest, LearningPathRelationship> {
    let api = api.clone();
    Mutation::new(
        "learning_paths.relationship.create",
        client,
        move |request: LearningPathRelationshipRequest| {
            let api = api.clone();
            async move { Ok(api.learning_paths.items_create(request.parent, &request).await?) }
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
        invalidate_resource_queries(cache, request.parent, &InvalidateOptions::default());
    })
}

/// Reorder an item; only the parent's item lists are refetched.
#[must_use]
pub fn move_relationship(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<MoveItem, LearningPathRelationship> {
    let api = api.clone();
    Mutation::new("learning_paths.relationship.move", client, move |item: MoveItem| {
        let api = api.clone();
        async move {
            let patch = PatchedLearningPathRelationshipRequest {
                position: Some(item.position),
            };
            Ok(api
                .learning_paths
                .items_partial_update(item.parent, item.id, &patch)
                .await?)
        }
    })
    .on_settled(|cache, item, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::infinite_items_root(item.parent)));
    })
}

/// Remove a resource from a path.
///
/// The delete returns no body, so the relationship is stripped from every
/// cached copy of the child locally before the invalidation.
#[must_use]
pub fn destroy_relationship(api: &LearnApi, client: &QueryClient) -> Mutation<RelationshipRef, ()> {
    let api = api.clone();
    Mutation::new(
        "learning_paths.relationship.destroy",
        client,
        move |relationship: RelationshipRef| {
            let api = api.clone();
            async move {
                Ok(api
                    .learning_paths
                    .items_destroy(relationship.parent, relationship.id)
                    .await?)
            }
        },
    )
    .on_success(|cache, relationship, _| {
        patch_parents_on_destroy(
            cache,
            relationship.child,
            ParentField::LearningPaths,
            relationship.id,
        );
    })
    .on_settled(|cache, relationship, _| {
        let child = relationship.child;
        invalidate_resource_queries(cache, child, &InvalidateOptions::skip_patch_only());
        invalidate_resource_queries(cache, relationship.parent, &InvalidateOptions::default());
    })
}

//! Mutations against a mocked API, checked through the cache they reconcile

use std::sync::Arc;

use learn_api::models::{
    FeaturedListParams, LearningPathRelationshipRequest, LearningPathRequest, LearningResource,
    LearningResourcesListParams, ListItemsParams, ListParams, MicroLearningPathRelationship,
    MicroUserListRelationship, SetLearningPathsRequest, SetUserListsRequest,
    UserListRelationshipRequest,
};
use learn_api::{LearnApi, Method, MockTransport};
use learn_query::groups::{learning_paths, learning_resources, user_lists, users};
use learn_query::{
    CacheConfig, LearnQuery, MoveItem, QueryFilter, QueryKey, RelationshipRef, Update,
};
use serde_json::{Value, json};
use tokio_test::{assert_pending, assert_ready};

const BASE: &str = "http://learn.test/api/";

fn setup() -> (MockTransport, LearnQuery) {
    let mock = MockTransport::new();
    let api = LearnApi::new(BASE.parse().unwrap(), Arc::new(mock.clone()));
    (mock, LearnQuery::new(api, CacheConfig::for_tests()))
}

fn resource(id: i64, learning_path_parents: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Resource {id}"),
        "resource_type": "course",
        "learning_path_parents": learning_path_parents,
        "user_list_parents": [],
    })
}

fn page(results: Vec<Value>, next: Option<String>) -> Value {
    json!({"count": results.len(), "next": next, "previous": null, "results": results})
}

fn item(parent: i64, child: i64, position: i32) -> Value {
    json!({
        "id": 100 + child,
        "parent": parent,
        "child": child,
        "position": position,
        "resource": resource(child, json!([{"id": 100 + child, "parent": parent, "child": child}])),
    })
}

fn register_relationship_create(mock: &MockTransport) {
    mock.respond(
        Method::Post,
        "/api/v1/learningpaths/7/items/",
        201,
        json!({
            "id": 99,
            "parent": 7,
            "child": 42,
            "position": 0,
            "resource": resource(42, json!([{"id": 99, "parent": 7, "child": 42}])),
        }),
    );
}

fn resource_list_key(limit: u32) -> QueryKey {
    learning_resources::keys::list(&LearningResourcesListParams {
        limit: Some(limit),
        ..LearningResourcesListParams::default()
    })
}

fn cached_resource(lq: &LearnQuery, id: i64) -> LearningResource {
    lq.client
        .get_query_data_as(&learning_resources::keys::detail(Some(id)))
        .unwrap()
        .unwrap()
}

fn featured_key() -> QueryKey {
    learning_resources::keys::featured(&FeaturedListParams::default())
}

fn featured_resource(lq: &LearnQuery) -> LearningResource {
    let data = lq.client.get_query_data(&featured_key()).unwrap();
    serde_json::from_value(data["results"][0].clone()).unwrap()
}

fn user_list_page_key(limit: u32) -> QueryKey {
    user_lists::keys::list(&ListParams {
        limit: Some(limit),
        offset: None,
    })
}

#[tokio::test]
async fn test_relationship_lifecycle_patches_cached_resource() {
    let (mock, lq) = setup();
    mock.respond(Method::Get, "/api/v1/learning_resources/42/", 200, resource(42, json!([])));
    mock.respond(Method::Post, "/api/v1/learningpaths/", 201, json!({"id": 7, "title": "L"}));
    register_relationship_create(&mock);
    mock.respond_empty(Method::Delete, "/api/v1/learningpaths/7/items/99/", 204);

    let before = lq
        .client
        .fetch_query(&learning_resources::detail(&lq.api, Some(42)))
        .await
        .unwrap();
    assert!(before.learning_path_parents.is_empty());

    let path = learning_paths::create(&lq.api, &lq.client)
        .mutate(LearningPathRequest {
            title: "L".to_string(),
            ..LearningPathRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(path.id, 7);

    let relationship = learning_paths::create_relationship(&lq.api, &lq.client)
        .mutate(LearningPathRelationshipRequest {
            parent: 7,
            child: 42,
            position: None,
        })
        .await
        .unwrap();
    assert_eq!(relationship.id, 99);

    assert_eq!(
        cached_resource(&lq, 42).learning_path_parents,
        vec![MicroLearningPathRelationship {
            id: 99,
            parent: 7,
            child: 42
        }]
    );
    assert_eq!(mock.call_count(Method::Get, "/api/v1/learning_resources/42/"), 1);
    let detail = lq
        .client
        .query_state(&learning_resources::keys::detail(Some(42)));
    assert!(detail.is_invalidated);

    learning_paths::destroy_relationship(&lq.api, &lq.client)
        .mutate(RelationshipRef {
            id: 99,
            parent: 7,
            child: 42,
        })
        .await
        .unwrap();

    assert!(cached_resource(&lq, 42).learning_path_parents.is_empty());
    assert_eq!(mock.call_count(Method::Get, "/api/v1/learning_resources/42/"), 1);

    let sent: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Post)
        .map(|r| r.body)
        .collect();
    assert_eq!(
        sent,
        vec![
            Some(json!({"title": "L", "description": "", "published": false})),
            Some(json!({"parent": 7, "child": 42})),
        ]
    );
}

#[tokio::test]
async fn test_relationship_create_invalidates_only_lists_holding_the_child() {
    let (mock, lq) = setup();
    register_relationship_create(&mock);

    lq.client
        .set_query_data(&resource_list_key(1), page(vec![resource(42, json!([]))], None));
    lq.client
        .set_query_data(&resource_list_key(2), page(vec![resource(43, json!([]))], None));
    lq.client
        .set_query_data(&resource_list_key(3), page(vec![resource(44, json!([]))], None));
    let featured = learning_resources::keys::featured(&FeaturedListParams::default());
    lq.client
        .set_query_data(&featured, page(vec![resource(42, json!([]))], None));
    lq.client
        .set_query_data(&learning_paths::keys::detail(Some(7)), json!({"id": 7, "title": "L"}));
    lq.client
        .set_query_data(&learning_paths::keys::detail(Some(8)), json!({"id": 8, "title": "M"}));

    learning_paths::create_relationship(&lq.api, &lq.client)
        .mutate(LearningPathRelationshipRequest {
            parent: 7,
            child: 42,
            position: None,
        })
        .await
        .unwrap();

    let state = |key: &QueryKey| lq.client.query_state(key);
    assert!(state(&resource_list_key(1)).is_invalidated);
    assert!(!state(&resource_list_key(2)).is_invalidated);
    assert!(!state(&resource_list_key(3)).is_invalidated);
    assert!(state(&learning_paths::keys::detail(Some(7))).is_invalidated);
    assert!(!state(&learning_paths::keys::detail(Some(8))).is_invalidated);

    // Featured keeps its patched copy instead of refetching
    let featured = state(&featured);
    assert!(!featured.is_invalidated);
    let data = featured.data.unwrap();
    assert_eq!(data["results"][0]["learning_path_parents"][0]["id"], 99);
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_set_learning_paths_invalidates_old_and_new_parents() {
    let (mock, lq) = setup();
    mock.respond(
        Method::Patch,
        "/api/v1/learning_resources/42/learning_paths/",
        200,
        json!([{"id": 2, "parent": 8, "child": 42}]),
    );
    let detail = learning_resources::keys::detail(Some(42));
    lq.client
        .set_query_data(&detail, resource(42, json!([{"id": 1, "parent": 7, "child": 42}])));
    lq.client.set_query_data(
        &featured_key(),
        page(vec![resource(42, json!([{"id": 1, "parent": 7, "child": 42}]))], None),
    );
    lq.client
        .set_query_data(&resource_list_key(1), page(vec![resource(42, json!([]))], None));
    for path in [7, 8, 9] {
        lq.client.set_query_data(
            &learning_paths::keys::detail(Some(path)),
            json!({"id": path, "title": format!("Path {path}")}),
        );
    }

    let relationships = learning_resources::set_learning_paths(&lq.api, &lq.client)
        .mutate(Update::new(42, SetLearningPathsRequest {
            learning_path_id: vec![8],
        }))
        .await
        .unwrap();
    let joined = MicroLearningPathRelationship {
        id: 2,
        parent: 8,
        child: 42,
    };
    assert_eq!(relationships, vec![joined]);

    let state = |key: &QueryKey| lq.client.query_state(key);
    let featured = state(&featured_key());
    assert!(!featured.is_invalidated);
    assert_eq!(featured_resource(&lq).learning_path_parents, vec![joined]);

    // The detail is only invalidated; it still names the path that was left.
    assert!(state(&detail).is_invalidated);
    assert_eq!(cached_resource(&lq, 42).learning_path_parents[0].parent, 7);
    assert!(state(&resource_list_key(1)).is_invalidated);
    assert!(state(&learning_paths::keys::detail(Some(7))).is_invalidated);
    assert!(state(&learning_paths::keys::detail(Some(8))).is_invalidated);
    assert!(!state(&learning_paths::keys::detail(Some(9))).is_invalidated);

    let sent = mock.requests().pop().unwrap();
    assert_eq!(sent.body, Some(json!({"learning_path_id": [8]})));
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_set_user_lists_invalidates_old_and_new_lists() {
    let (mock, lq) = setup();
    mock.respond(
        Method::Patch,
        "/api/v1/learning_resources/42/userlists/",
        200,
        json!([{"id": 6, "parent": 4, "child": 42}]),
    );
    let mut cached = resource(42, json!([]));
    cached["user_list_parents"] = json!([{"id": 5, "parent": 3, "child": 42}]);
    let detail = learning_resources::keys::detail(Some(42));
    lq.client.set_query_data(&detail, cached.clone());
    lq.client.set_query_data(&featured_key(), page(vec![cached], None));
    for list in [3, 4, 9] {
        lq.client.set_query_data(
            &user_lists::keys::detail(Some(list)),
            json!({"id": list, "title": format!("List {list}")}),
        );
    }
    // A user list numbered like the resource is a different object.
    lq.client
        .set_query_data(&user_lists::keys::detail(Some(42)), json!({"id": 42, "title": "Mine"}));

    learning_resources::set_user_lists(&lq.api, &lq.client)
        .mutate(Update::new(42, SetUserListsRequest {
            userlist_id: vec![4],
        }))
        .await
        .unwrap();

    let state = |key: &QueryKey| lq.client.query_state(key);
    assert!(!state(&featured_key()).is_invalidated);
    assert_eq!(
        featured_resource(&lq).user_list_parents,
        vec![MicroUserListRelationship {
            id: 6,
            parent: 4,
            child: 42
        }]
    );
    assert!(state(&detail).is_invalidated);
    assert!(state(&user_lists::keys::detail(Some(3))).is_invalidated);
    assert!(state(&user_lists::keys::detail(Some(4))).is_invalidated);
    assert!(!state(&user_lists::keys::detail(Some(9))).is_invalidated);
    assert!(!state(&user_lists::keys::detail(Some(42))).is_invalidated);
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_user_list_relationship_lifecycle() {
    let (mock, lq) = setup();
    let mut added = resource(42, json!([]));
    added["user_list_parents"] = json!([{"id": 55, "parent": 3, "child": 42}]);
    mock.respond(
        Method::Post,
        "/api/v1/userlists/3/items/",
        201,
        json!({"id": 55, "parent": 3, "child": 42, "position": 0, "resource": added}),
    );
    mock.respond_empty(Method::Delete, "/api/v1/userlists/3/items/55/", 204);

    lq.client
        .set_query_data(&learning_resources::keys::detail(Some(42)), resource(42, json!([])));
    lq.client
        .set_query_data(&featured_key(), page(vec![resource(42, json!([]))], None));
    lq.client
        .set_query_data(&user_lists::keys::detail(Some(3)), json!({"id": 3, "title": "Mine"}));
    lq.client
        .set_query_data(&user_lists::keys::detail(Some(4)), json!({"id": 4, "title": "Other"}));
    lq.client.set_query_data(
        &user_list_page_key(1),
        page(vec![json!({"id": 3, "title": "Mine"})], None),
    );
    lq.client.set_query_data(
        &user_list_page_key(2),
        page(vec![json!({"id": 4, "title": "Other"})], None),
    );

    let relationship = user_lists::create_relationship(&lq.api, &lq.client)
        .mutate(UserListRelationshipRequest {
            parent: 3,
            child: 42,
            position: None,
        })
        .await
        .unwrap();
    assert_eq!(relationship.id, 55);

    let membership = MicroUserListRelationship {
        id: 55,
        parent: 3,
        child: 42,
    };
    assert_eq!(cached_resource(&lq, 42).user_list_parents, vec![membership]);
    assert_eq!(featured_resource(&lq).user_list_parents, vec![membership]);

    let state = |key: &QueryKey| lq.client.query_state(key);
    assert!(!state(&featured_key()).is_invalidated);
    assert!(state(&user_lists::keys::detail(Some(3))).is_invalidated);
    assert!(state(&user_list_page_key(1)).is_invalidated);
    assert!(!state(&user_lists::keys::detail(Some(4))).is_invalidated);
    assert!(!state(&user_list_page_key(2)).is_invalidated);

    user_lists::destroy_relationship(&lq.api, &lq.client)
        .mutate(RelationshipRef {
            id: 55,
            parent: 3,
            child: 42,
        })
        .await
        .unwrap();

    assert!(cached_resource(&lq, 42).user_list_parents.is_empty());
    assert!(featured_resource(&lq).user_list_parents.is_empty());
    assert!(!state(&featured_key()).is_invalidated);
    assert!(!state(&user_lists::keys::detail(Some(4))).is_invalidated);
    assert_eq!(mock.total_calls(), 2);
}

#[tokio::test]
async fn test_failed_relationship_create_leaves_cache_alone() {
    let (mock, lq) = setup();
    mock.respond(
        Method::Post,
        "/api/v1/learningpaths/7/items/",
        400,
        json!({"child": ["already in list"]}),
    );
    lq.client
        .set_query_data(&resource_list_key(1), page(vec![resource(42, json!([]))], None));

    let err = learning_paths::create_relationship(&lq.api, &lq.client)
        .mutate(LearningPathRelationshipRequest {
            parent: 7,
            child: 42,
            position: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.api_error().and_then(learn_api::ApiError::status_code), Some(400));
    assert!(!lq.client.query_state(&resource_list_key(1)).is_invalidated);
}

#[tokio::test]
async fn test_item_pages_follow_next_verbatim() {
    let (mock, lq) = setup();
    let next = format!("{BASE}v1/learningpaths/7/items/?limit=2&offset=2");
    mock.respond(
        Method::Get,
        "/api/v1/learningpaths/7/items/?limit=2",
        200,
        page(vec![item(7, 1, 0), item(7, 2, 1)], Some(next.clone())),
    );
    mock.respond(
        Method::Get,
        "/api/v1/learningpaths/7/items/?limit=2&offset=2",
        200,
        page(vec![item(7, 3, 2)], None),
    );

    let def = learning_paths::items(&lq.api, 7, ListItemsParams {
        limit: Some(2),
        offset: None,
    });
    let first = lq.client.fetch_infinite_query(&def).await.unwrap();
    assert_eq!(first.pages.len(), 1);
    assert!(lq.client.has_next_page(def.key()));

    let all = lq.client.fetch_next_page(&def).await.unwrap();
    assert_eq!(all.pages.len(), 2);
    assert_eq!(all.page_params, vec![None, Some(next)]);
    assert!(!lq.client.has_next_page(def.key()));

    let again = lq.client.fetch_next_page(&def).await.unwrap();
    assert_eq!(again, all);

    let queries: Vec<_> = mock.requests().into_iter().map(|r| r.query).collect();
    assert_eq!(
        queries,
        vec![Some("limit=2".to_string()), Some("limit=2&offset=2".to_string())]
    );
}

#[tokio::test]
async fn test_move_invalidates_only_the_parents_items() {
    let (mock, lq) = setup();
    mock.respond(
        Method::Get,
        "/api/v1/learningpaths/7/items/",
        200,
        page(vec![item(7, 1, 0), item(7, 2, 1)], None),
    );
    mock.respond(Method::Patch, "/api/v1/learningpaths/7/items/101/", 200, item(7, 1, 1));
    lq.client
        .set_query_data(&learning_paths::keys::detail(Some(7)), json!({"id": 7, "title": "L"}));

    let def = learning_paths::items(&lq.api, 7, ListItemsParams::default());
    lq.client.fetch_infinite_query(&def).await.unwrap();

    let moved = learning_paths::move_relationship(&lq.api, &lq.client)
        .mutate(MoveItem {
            parent: 7,
            id: 101,
            position: 1,
        })
        .await
        .unwrap();
    assert_eq!(moved.position, 1);

    assert!(lq.client.query_state(def.key()).is_invalidated);
    assert!(
        !lq.client
            .query_state(&learning_paths::keys::detail(Some(7)))
            .is_invalidated
    );
    let patch = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Patch)
        .unwrap();
    assert_eq!(patch.body, Some(json!({"position": 1})));
}

#[tokio::test]
async fn test_concurrent_detail_reads_share_one_request() {
    let (mock, lq) = setup();
    mock.respond(Method::Get, "/api/v1/learning_resources/42/", 200, resource(42, json!([])));
    let def = learning_resources::detail(&lq.api, Some(42));

    let mut first = tokio_test::task::spawn(lq.client.fetch_query(&def));
    assert_pending!(first.poll());
    let key = learning_resources::keys::detail(Some(42));
    assert_eq!(lq.client.is_fetching(&QueryFilter::exact(key.clone())), 1);

    let second = lq.client.fetch_query(&def).await.unwrap();
    let first = assert_ready!(first.poll()).unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.total_calls(), 1);
    assert_eq!(lq.client.is_fetching(&QueryFilter::exact(key)), 0);
}

#[tokio::test]
async fn test_placeholder_id_makes_no_request() {
    let (mock, lq) = setup();
    let err = lq
        .client
        .fetch_query(&learning_resources::detail(&lq.api, Some(-1)))
        .await
        .unwrap_err();
    assert!(err.is_invalid_identifier());
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_signed_out_session_reads_as_anonymous() {
    let (mock, lq) = setup();
    mock.respond(
        Method::Get,
        "/api/v0/users/me/",
        200,
        json!({"id": 1, "username": "ada", "is_authenticated": true}),
    );
    mock.respond(Method::Get, "/api/v0/users/me/", 403, json!({"detail": "forbidden"}));

    let user = lq.client.fetch_query(&users::me(&lq.api)).await.unwrap();
    assert!(user.is_authenticated);

    lq.logout();
    let user = lq.client.fetch_query(&users::me(&lq.api)).await.unwrap();
    assert!(!user.is_authenticated);
    assert_eq!(user.id, None);
    assert!(lq.client.query_state(&users::keys::me()).is_success());
}

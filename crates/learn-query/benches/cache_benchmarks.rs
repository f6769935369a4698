//! Performance benchmarks for the query cache
//!
//! Measures key construction, cache hits, shared in-flight fetches and the
//! membership-scoped invalidation and patch passes.

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use learn_query::groups::learning_resources;
use learn_query::invalidation::{InvalidateOptions, invalidate_resource_queries, patch_resource};
use learn_query::{CacheConfig, QueryClient, QueryDef, QueryKey};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

fn resource(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Resource {id}"),
        "resource_type": "course",
        "learning_path_parents": [],
        "user_list_parents": [],
    })
}

fn list_key(index: usize) -> QueryKey {
    learning_resources::keys::list(&json!({"limit": 10, "offset": index * 10}))
}

/// `lists` cached list pages of ten resources each; resource `i` sits in page `i / 10`
fn populated_client(lists: usize) -> QueryClient {
    let client = QueryClient::new(CacheConfig {
        stale_time: Duration::from_secs(3600),
        ..CacheConfig::for_tests()
    });
    for index in 0..lists {
        let start = (index * 10) as i64;
        let results: Vec<Value> = (start..start + 10).map(resource).collect();
        client.set_query_data(
            &list_key(index),
            json!({"count": results.len(), "next": null, "previous": null, "results": results}),
        );
        client.set_query_data(&learning_resources::keys::detail(Some(start)), resource(start));
    }
    client
}

fn bench_key_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_construction");

    group.bench_function("detail", |b| {
        b.iter(|| black_box(learning_resources::keys::detail(Some(black_box(42)))));
    });

    let params = json!({
        "limit": 20,
        "offset": 40,
        "resource_type": ["course", "program"],
        "topic": ["Physics", "Mathematics"],
        "free": true,
    });
    group.bench_function("list_with_params", |b| {
        b.iter(|| black_box(learning_resources::keys::list(black_box(&params))));
    });

    let prefix = learning_resources::keys::list_root();
    let key = learning_resources::keys::list(&params);
    group.bench_function("is_prefix_of", |b| {
        b.iter(|| black_box(prefix.is_prefix_of(black_box(&key))));
    });

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_hit");

    let client = populated_client(10);
    let def: QueryDef<Value> = QueryDef::new(learning_resources::keys::detail(Some(0)), || async {
        Ok(resource(0))
    });
    rt.block_on(async {
        client.fetch_query(&def).await.unwrap();
    });

    group.bench_function("fetch_query_fresh", |b| {
        b.to_async(&rt).iter(|| async {
            let _ = black_box(client.fetch_query(&def).await);
        });
    });

    group.bench_function("get_query_data", |b| {
        b.iter(|| black_box(client.get_query_data(def.key())));
    });

    group.finish();
}

fn bench_shared_fetch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("shared_fetch");
    group.sample_size(50);

    for waiters in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("waiters", waiters), &waiters, |b, &waiters| {
            b.to_async(&rt).iter(|| async move {
                let client = QueryClient::new(CacheConfig::for_tests());
                let def: QueryDef<Value> =
                    QueryDef::new(learning_resources::keys::detail(Some(1)), || async {
                        tokio::task::yield_now().await;
                        Ok(resource(1))
                    });
                let fetches = (0..waiters).map(|_| client.fetch_query(&def));
                black_box(futures::future::join_all(fetches).await);
            });
        });
    }

    group.finish();
}

fn bench_invalidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("invalidate_resource_queries");
    group.sample_size(30);

    for lists in [10, 100, 1000] {
        group.throughput(Throughput::Elements(lists as u64));
        group.bench_with_input(BenchmarkId::new("lists", lists), &lists, |b, &lists| {
            let client = populated_client(lists);
            b.iter(|| {
                black_box(invalidate_resource_queries(
                    &client,
                    black_box(5),
                    &InvalidateOptions::default(),
                ))
            });
        });
    }

    group.finish();
}

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch_resource");
    group.sample_size(30);

    for lists in [10, 100, 1000] {
        group.throughput(Throughput::Elements(lists as u64));
        group.bench_with_input(BenchmarkId::new("lists", lists), &lists, |b, &lists| {
            let client = populated_client(lists);
            let mut generation = 0_u64;
            b.iter(|| {
                generation += 1;
                let mut updated = resource(5);
                updated["title"] = json!(format!("Resource 5 v{generation}"));
                black_box(patch_resource(&client, &updated))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_construction,
    bench_cache_hit,
    bench_shared_fetch,
    bench_invalidation,
    bench_patch,
);
criterion_main!(benches);

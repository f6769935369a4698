//! Cache reconciliation after writes
//!
//! Two tools, used by every mutation in [`crate::groups`]:
//!
//! - **Invalidation** marks entries stale. A resource's own detail keys are
//!   invalidated by prefix; list-shaped entries are invalidated only if
//!   their cached data currently contains the resource, since the resource
//!   id is not part of a list's key. User lists are numbered separately from
//!   resources and have their own pass, [`invalidate_user_list_queries`].
//! - **Patching** rewrites cached resources in place, without a refetch.
//!   Used for relationship create/destroy and for the list categories that
//!   must never be invalidated (see [`PATCH_ONLY`]).
//!
//! Both are idempotent: running either twice leaves the cache as the first
//! run did.

use serde_json::Value;

use crate::client::{QueryClient, QueryFilter};
use crate::groups::{learning_paths, learning_resources, user_lists};
use crate::key::QueryKey;

/// List-shaped query families that may hold a given resource
///
/// User-list lists hold user lists, not resources, so they are not a
/// category here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListCategory {
    /// `learningResources.list(params)`
    Resources,
    /// `learningResources.learningpaths.list(params)`
    LearningPaths,
    /// `learningResources.featured(params)`
    Featured,
}

impl ListCategory {
    pub const ALL: [Self; 3] = [Self::Resources, Self::LearningPaths, Self::Featured];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::LearningPaths => "learning_paths",
            Self::Featured => "featured",
        }
    }

    /// Key prefix covering every cached query of this category
    #[must_use]
    pub fn prefix(&self) -> QueryKey {
        match self {
            Self::Resources => learning_resources::keys::list_root(),
            Self::LearningPaths => learning_paths::keys::list_root(),
            Self::Featured => learning_resources::keys::featured_root(),
        }
    }

    /// Listed in [`PATCH_ONLY`]
    #[must_use]
    pub fn is_patch_only(&self) -> bool {
        PATCH_ONLY.contains(self)
    }
}

/// Categories that are patched in place and never invalidated after a
/// membership change.
///
/// The featured endpoint orders its results randomly on every request, so a
/// refetch visibly reshuffles the list.
pub const PATCH_ONLY: &[ListCategory] = &[ListCategory::Featured];

/// Which list categories [`invalidate_resource_queries`] scans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidateOptions {
    skip: Vec<ListCategory>,
}

impl InvalidateOptions {
    /// Skip the [`PATCH_ONLY`] categories; the caller patches them instead.
    #[must_use]
    pub fn skip_patch_only() -> Self {
        Self {
            skip: PATCH_ONLY.to_vec(),
        }
    }

    #[must_use]
    pub fn skip(mut self, category: ListCategory) -> Self {
        if !self.skip.contains(&category) {
            self.skip.push(category);
        }
        self
    }

    #[must_use]
    pub fn skips(&self, category: ListCategory) -> bool {
        self.skip.contains(&category)
    }
}

/// Which membership collection of a resource to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentField {
    LearningPaths,
    UserLists,
}

impl ParentField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LearningPaths => "learning_path_parents",
            Self::UserLists => "user_list_parents",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Membership tests
// ═══════════════════════════════════════════════════════════════════════════

fn has_id(value: &Value, id: i64) -> bool {
    value.get("id").and_then(Value::as_i64) == Some(id)
}

/// `value` is the learning resource `id` itself, not a relationship or
/// other record that merely shares the number.
fn is_resource(value: &Value, id: i64) -> bool {
    has_id(value, id) && value.get("resource_type").is_some()
}

fn result_entries(data: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    if let Some(pages) = data.get("pages").and_then(Value::as_array) {
        return Box::new(pages.iter().flat_map(result_entries));
    }
    if let Some(results) = data.get("results").and_then(Value::as_array) {
        return Box::new(results.iter());
    }
    if let Some(items) = data.as_array() {
        return Box::new(items.iter());
    }
    Box::new(std::iter::empty())
}

/// Whether cached list data (one page, infinite pages, or a bare array)
/// holds an entry with this `id`.
#[must_use]
pub fn list_has_resource(data: &Value, id: i64) -> bool {
    result_entries(data).any(|entry| has_id(entry, id))
}

// ═══════════════════════════════════════════════════════════════════════════
// Invalidation
// ═══════════════════════════════════════════════════════════════════════════

/// Invalidate everything that shows resource `id`.
///
/// Its detail keys go first (as a resource and as a learning path, each
/// with everything nested below). Then each list category not
/// skipped by `options` is scanned, and only entries whose cached data
/// contains `id` are invalidated. Returns the number of entries changed.
pub fn invalidate_resource_queries(
    client: &QueryClient,
    id: i64,
    options: &InvalidateOptions,
) -> usize {
    let mut changed = 0;
    for detail in [
        learning_resources::keys::detail(Some(id)),
        learning_paths::keys::detail(Some(id)),
    ] {
        changed += client.invalidate_queries(&QueryFilter::prefix(detail));
    }

    for category in ListCategory::ALL {
        if options.skips(category) {
            continue;
        }
        let filter = QueryFilter::prefix(category.prefix())
            .with_data_predicate(move |data| list_has_resource(data, id));
        changed += client.invalidate_queries(&filter);
    }

    tracing::debug!(resource.id = id, query.invalidated = changed, "resource queries invalidated");
    changed
}

/// Invalidate user list `id`: its detail branch and the user-list lists
/// that contain it.
pub fn invalidate_user_list_queries(client: &QueryClient, id: i64) -> usize {
    let detail = QueryFilter::prefix(user_lists::keys::detail(Some(id)));
    let mut changed = client.invalidate_queries(&detail);
    let filter = QueryFilter::prefix(user_lists::keys::list_root())
        .with_data_predicate(move |data| list_has_resource(data, id));
    changed += client.invalidate_queries(&filter);
    tracing::debug!(userlist.id = id, query.invalidated = changed, "user list queries invalidated");
    changed
}

// ═══════════════════════════════════════════════════════════════════════════
// Patching
// ═══════════════════════════════════════════════════════════════════════════

fn map_entries<F>(entries: &[Value], id: i64, update: &F) -> Option<Vec<Value>>
where
    F: Fn(&Value) -> Option<Value>,
{
    let mut changed = false;
    let next: Vec<Value> = entries
        .iter()
        .map(|entry| {
            map_resource(entry, id, update).map_or_else(
                || entry.clone(),
                |patched| {
                    changed = true;
                    patched
                },
            )
        })
        .collect();
    changed.then_some(next)
}

fn with_field(data: &Value, field: &str, value: Vec<Value>) -> Value {
    let mut next = data.clone();
    if let Some(object) = next.as_object_mut() {
        object.insert(field.to_string(), Value::Array(value));
    }
    next
}

/// Apply `update` to every copy of resource `id` inside `data`.
///
/// `data` may be the resource itself, a page (`results`), infinite pages
/// (`pages[].results`) or a bare array. Order and every other entry are
/// preserved. Returns `None` when nothing changed.
pub fn map_resource<F>(data: &Value, id: i64, update: &F) -> Option<Value>
where
    F: Fn(&Value) -> Option<Value>,
{
    if is_resource(data, id) {
        return update(data).filter(|next| next != data);
    }
    if let Some(pages) = data.get("pages").and_then(Value::as_array) {
        return map_entries(pages, id, update).map(|pages| with_field(data, "pages", pages));
    }
    if let Some(results) = data.get("results").and_then(Value::as_array) {
        return map_entries(results, id, update)
            .map(|results| with_field(data, "results", results));
    }
    if let Some(items) = data.as_array() {
        return map_entries(items, id, update).map(Value::Array);
    }
    None
}

/// Replace resource `resource.id` inside `data` with `resource`.
#[must_use]
pub fn replace_resource(data: &Value, resource: &Value) -> Option<Value> {
    let id = resource.get("id").and_then(Value::as_i64)?;
    map_resource(data, id, &|_: &Value| Some(resource.clone()))
}

/// Drop relationship `relationship_id` from resource `child`'s `field`
/// inside `data`.
#[must_use]
pub fn remove_parent_membership(
    data: &Value,
    child: i64,
    field: ParentField,
    relationship_id: i64,
) -> Option<Value> {
    map_resource(data, child, &|resource: &Value| {
        let parents = resource.get(field.as_str())?.as_array()?;
        let kept: Vec<Value> = parents
            .iter()
            .filter(|parent| !has_id(parent, relationship_id))
            .cloned()
            .collect();
        Some(with_field(resource, field.as_str(), kept))
    })
}

/// Replace resource `child`'s `field` inside `data` with `parents`.
#[must_use]
pub fn set_parent_memberships(
    data: &Value,
    child: i64,
    field: ParentField,
    parents: &[Value],
) -> Option<Value> {
    map_resource(data, child, &|resource: &Value| {
        Some(with_field(resource, field.as_str(), parents.to_vec()))
    })
}

fn patch_filters(id: i64, categories: impl IntoIterator<Item = ListCategory>) -> Vec<QueryFilter> {
    let mut filters = vec![QueryFilter::exact(learning_resources::keys::detail(Some(id)))];
    filters.extend(
        categories
            .into_iter()
            .map(|category| QueryFilter::prefix(category.prefix())),
    );
    filters
}

fn patch_with<F>(client: &QueryClient, filters: &[QueryFilter], id: i64, update: F) -> usize
where
    F: Fn(&Value) -> Option<Value>,
{
    let patched: usize = filters
        .iter()
        .map(|filter| client.set_queries_data(filter, |data| map_resource(data, id, &update)))
        .sum();
    tracing::debug!(resource.id = id, query.patched = patched, "resource patched in cache");
    patched
}

/// Write `resource` over every cached copy of it: its detail entry and
/// every list category.
pub fn patch_resource(client: &QueryClient, resource: &Value) -> usize {
    let Some(id) = resource.get("id").and_then(Value::as_i64) else {
        tracing::warn!("cannot patch a resource without an id");
        return 0;
    };
    patch_with(client, &patch_filters(id, ListCategory::ALL), id, |_: &Value| {
        Some(resource.clone())
    })
}

/// Strip relationship `relationship_id` from every cached copy of
/// resource `child`.
pub fn patch_parents_on_destroy(
    client: &QueryClient,
    child: i64,
    field: ParentField,
    relationship_id: i64,
) -> usize {
    let filters = patch_filters(child, ListCategory::ALL);
    patch_with(client, &filters, child, |resource: &Value| {
        remove_parent_membership(resource, child, field, relationship_id)
    })
}

/// Set resource `child`'s memberships in the [`PATCH_ONLY`] lists, which
/// the follow-up invalidation skips.
pub fn patch_parents_in_patch_only_lists(
    client: &QueryClient,
    child: i64,
    field: ParentField,
    parents: &[Value],
) -> usize {
    let filters: Vec<QueryFilter> = PATCH_ONLY
        .iter()
        .map(|category| QueryFilter::prefix(category.prefix()))
        .collect();
    patch_with(client, &filters, child, |resource: &Value| {
        set_parent_memberships(resource, child, field, parents)
    })
}

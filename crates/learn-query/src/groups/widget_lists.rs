//! `widgetLists`: editable widget columns on channel pages

use learn_api::LearnApi;
use learn_api::models::{WidgetList, WidgetListRequest};

use super::detail_query;
use crate::client::{QueryClient, QueryDef};
use crate::mutation::{Mutation, Update};

pub mod keys {
    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "widgetLists";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn detail(id: Option<i64>) -> QueryKey {
        root().with("detail").with(id)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<WidgetList> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.widget_lists.retrieve(id).await }
    })
}

/// Replace a widget list; the response becomes the cached detail.
#[must_use]
pub fn update(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<WidgetListRequest>, WidgetList> {
    let api = api.clone();
    Mutation::new(
        "widget_lists.update",
        client,
        move |input: Update<WidgetListRequest>| {
            let api = api.clone();
            async move { Ok(api.widget_lists.update(input.id, &input.body).await?) }
        },
    )
    .on_success(|cache, input, widgets| match serde_json::to_value(widgets) {
        Ok(value) => cache.set_query_data(&keys::detail(Some(input.id)), value),
        Err(err) => tracing::warn!(error = %err, "cannot cache updated widget list"),
    })
}

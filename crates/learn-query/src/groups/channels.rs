//! `channels`: topic, department, unit and pathway landing pages

use learn_api::LearnApi;
use learn_api::models::{
    Channel, ChannelCount, ChannelListParams, ChannelType, Paginated, PatchedChannelRequest,
};

use super::{api_query, detail_query};
use crate::client::{QueryClient, QueryDef, QueryFilter};
use crate::mutation::{Mutation, Update};

pub mod keys {
    use learn_api::models::ChannelType;
    use serde::Serialize;

    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "channels";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn detail(id: Option<i64>) -> QueryKey {
        root().with("detail").with(id)
    }

    #[must_use]
    pub fn detail_by_name(channel_type: ChannelType, name: &str) -> QueryKey {
        root()
            .with("detailByName")
            .with(channel_type.as_str())
            .with(name)
    }

    #[must_use]
    pub fn list<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        root().with("list").with_params(params)
    }

    #[must_use]
    pub fn counts(channel_type: ChannelType) -> QueryKey {
        root().with("counts").with(channel_type.as_str())
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<Channel> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.channels.retrieve(id).await }
    })
}

#[must_use]
pub fn detail_by_name(api: &LearnApi, channel_type: ChannelType, name: &str) -> QueryDef<Channel> {
    let api = api.clone();
    let owned = name.to_string();
    api_query(keys::detail_by_name(channel_type, name), move || {
        let api = api.clone();
        let name = owned.clone();
        async move { api.channels.retrieve_by_name(channel_type, &name).await }
    })
}

#[must_use]
pub fn list(api: &LearnApi, params: ChannelListParams) -> QueryDef<Paginated<Channel>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        async move { api.channels.list(&params).await }
    })
}

/// Resource counts per facet value for every channel of one type
#[must_use]
pub fn counts(api: &LearnApi, channel_type: ChannelType) -> QueryDef<Vec<ChannelCount>> {
    let api = api.clone();
    api_query(keys::counts(channel_type), move || {
        let api = api.clone();
        async move { api.channels.counts(channel_type).await }
    })
}

/// A channel is cached under its id and its name, so the whole namespace
/// goes stale.
#[must_use]
pub fn update(
    api: &LearnApi,
    client: &QueryClient,
) -> Mutation<Update<PatchedChannelRequest>, Channel> {
    let api = api.clone();
    Mutation::new(
        "channels.update",
        client,
        move |input: Update<PatchedChannelRequest>| {
            let api = api.clone();
            async move { Ok(api.channels.partial_update(input.id, &input.body).await?) }
        },
    )
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::prefix(keys::root()));
    })
}

//! `testimonials`: read-only attestations shown on channel pages

use learn_api::LearnApi;
use learn_api::models::{Paginated, Testimonial, TestimonialListParams};

use super::{api_query, detail_query};
use crate::client::QueryDef;

pub mod keys {
    use serde::Serialize;

    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "testimonials";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn detail(id: Option<i64>) -> QueryKey {
        root().with("detail").with(id)
    }

    #[must_use]
    pub fn list<P: Serialize + ?Sized>(params: &P) -> QueryKey {
        root().with("list").with_params(params)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: Option<i64>) -> QueryDef<Testimonial> {
    let api = api.clone();
    detail_query(keys::detail(id), id, move |id| {
        let api = api.clone();
        async move { api.testimonials.retrieve(id).await }
    })
}

#[must_use]
pub fn list(api: &LearnApi, params: TestimonialListParams) -> QueryDef<Paginated<Testimonial>> {
    let api = api.clone();
    api_query(keys::list(&params), move || {
        let api = api.clone();
        let params = params.clone();
        async move { api.testimonials.list(&params).await }
    })
}

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Paginated, Testimonial, TestimonialListParams};

/// `/api/v0/testimonials/`
#[derive(Debug, Clone)]
pub struct TestimonialsApi {
    client: ApiClient,
}

impl TestimonialsApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &TestimonialListParams) -> Result<Paginated<Testimonial>> {
        self.client.get("v0/testimonials/", params).await
    }

    pub async fn retrieve(&self, id: i64) -> Result<Testimonial> {
        self.client.get(&format!("v0/testimonials/{id}/"), &()).await
    }
}

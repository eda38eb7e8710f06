//! Reviews on establishments

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::models::{NewReview, Review, ReviewPage, ReviewStats};
use crate::session::SessionStore;

#[derive(Deserialize)]
struct HasReviewedResponse {
    #[serde(rename = "hasReviewed", default)]
    has_reviewed: bool,
}

/// Client for the `/api/reviews` endpoints
pub struct ReviewsClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl ReviewsClient {
    pub(crate) fn new(base_url: String, http_client: Client, session: Arc<SessionStore>) -> Self {
        Self {
            base_url,
            http_client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Approved reviews for an establishment, paginated
    pub async fn for_establishment(
        &self,
        establishment_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<ReviewPage, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint(&format!("/api/reviews/establishment/{}", establishment_id)),
        )
        .query("page", &page.to_string())
        .query("limit", &limit.to_string())
        .execute()
        .await
    }

    /// Submit a review. The rating range was already checked by
    /// [`NewReview::new`], so no invalid rating reaches the server.
    pub async fn create(&self, review: &NewReview) -> Result<Review, Error> {
        Fetch::post(&self.http_client, self.endpoint("/api/reviews"))
            .session(self.session.clone())
            .json(review)?
            .execute()
            .await
    }

    /// Update an owned review
    pub async fn update(&self, id: &str, review: &NewReview) -> Result<Review, Error> {
        Fetch::put(
            &self.http_client,
            self.endpoint(&format!("/api/reviews/{}", id)),
        )
        .session(self.session.clone())
        .json(review)?
        .execute()
        .await
    }

    /// Delete an owned review
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        Fetch::delete(
            &self.http_client,
            self.endpoint(&format!("/api/reviews/{}", id)),
        )
        .session(self.session.clone())
        .execute_empty()
        .await
    }

    /// Reviews written by the authenticated user
    pub async fn my_reviews(&self) -> Result<Vec<Review>, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/reviews/my-reviews"))
            .session(self.session.clone())
            .execute()
            .await
    }

    /// Whether the authenticated user already reviewed an establishment.
    ///
    /// Any failure answers `false`. Callers use this only to decide whether
    /// to show the review form, and an establishment without a review yet
    /// produces the same answer as a failed lookup.
    pub async fn has_reviewed(&self, establishment_id: &str) -> bool {
        let result: Result<HasReviewedResponse, Error> = Fetch::get(
            &self.http_client,
            self.endpoint(&format!("/api/reviews/check/{}", establishment_id)),
        )
        .session(self.session.clone())
        .execute()
        .await;

        result.map(|response| response.has_reviewed).unwrap_or(false)
    }

    /// Review aggregation for an establishment
    pub async fn stats(&self, establishment_id: &str) -> Result<ReviewStats, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint(&format!("/api/reviews/stats/{}", establishment_id)),
        )
        .execute()
        .await
    }
}

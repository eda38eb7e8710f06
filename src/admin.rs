//! Moderation and platform statistics, admin role required

use std::sync::Arc;

use log::info;
use reqwest::Client;
use serde_json::json;

use crate::error::Error;
use crate::establishments::ListFilters;
use crate::fetch::Fetch;
use crate::models::{DashboardStats, Establishment, EstablishmentPage, EstablishmentRequest, GroupCount};
use crate::session::SessionStore;

/// Client for the `/api/admin` endpoints.
///
/// Every call carries the session token; the server enforces the admin
/// role and answers 403 otherwise.
pub struct AdminClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl AdminClient {
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

    /// List establishments across every moderation state
    pub async fn list_establishments(
        &self,
        filters: ListFilters,
    ) -> Result<EstablishmentPage, Error> {
        let mut request = Fetch::get(&self.http_client, self.endpoint("/api/admin/establishments"))
            .session(self.session.clone());
        for (key, value) in filters.query_pairs() {
            request = request.query(key, &value);
        }
        request.execute().await
    }

    /// Fetch one establishment regardless of moderation state
    pub async fn get_establishment(&self, id: &str) -> Result<Establishment, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint(&format!("/api/admin/establishments/{}", id)),
        )
        .session(self.session.clone())
        .execute()
        .await
    }

    /// Approve a pending establishment
    pub async fn approve(&self, id: &str) -> Result<Establishment, Error> {
        info!("approving establishment {}", id);
        Fetch::put(
            &self.http_client,
            self.endpoint(&format!("/api/admin/establishments/{}/approve", id)),
        )
        .session(self.session.clone())
        .execute()
        .await
    }

    /// Reject an establishment with a reason shown to its owner
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Establishment, Error> {
        info!("rejecting establishment {}", id);
        Fetch::put(
            &self.http_client,
            self.endpoint(&format!("/api/admin/establishments/{}/reject", id)),
        )
        .session(self.session.clone())
        .json(&json!({ "reason": reason }))?
        .execute()
        .await
    }

    /// Edit an establishment on behalf of its owner
    pub async fn update_establishment(
        &self,
        id: &str,
        request: &EstablishmentRequest,
    ) -> Result<Establishment, Error> {
        Fetch::put(
            &self.http_client,
            self.endpoint(&format!("/api/admin/establishments/{}", id)),
        )
        .session(self.session.clone())
        .json(request)?
        .execute()
        .await
    }

    /// Deactivate an establishment, hiding it from the public listing
    pub async fn deactivate(&self, id: &str) -> Result<(), Error> {
        Fetch::delete(
            &self.http_client,
            self.endpoint(&format!("/api/admin/establishments/{}", id)),
        )
        .session(self.session.clone())
        .execute_empty()
        .await
    }

    /// Totals and grouped reports for the admin dashboard
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint("/api/admin/dashboard-stats"),
        )
        .session(self.session.clone())
        .execute()
        .await
    }

    /// Establishments awaiting moderation
    pub async fn pending(&self) -> Result<EstablishmentPage, Error> {
        self.by_status("pending").await
    }

    /// Approved establishments
    pub async fn approved(&self) -> Result<EstablishmentPage, Error> {
        self.by_status("approved").await
    }

    /// Rejected establishments
    pub async fn rejected(&self) -> Result<EstablishmentPage, Error> {
        self.by_status("rejected").await
    }

    async fn by_status(&self, status: &str) -> Result<EstablishmentPage, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/admin/establishments"))
            .session(self.session.clone())
            .query("status", status)
            .execute()
            .await
    }

    /// Free-text search over every establishment
    pub async fn search(&self, query: &str) -> Result<EstablishmentPage, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/admin/establishments"))
            .session(self.session.clone())
            .query("search", query)
            .execute()
            .await
    }

    /// Establishment counts grouped by neighborhood
    pub async fn establishments_by_neighborhood(&self) -> Result<Vec<GroupCount>, Error> {
        let stats = self.dashboard_stats().await?;
        Ok(stats.establishments_by_neighborhood)
    }

    /// Establishment counts grouped by type
    pub async fn establishments_by_type(&self) -> Result<Vec<GroupCount>, Error> {
        let stats = self.dashboard_stats().await?;
        Ok(stats.establishments_by_type)
    }
}

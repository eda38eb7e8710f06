//! Plan subscription and local payment-gateway configuration

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::models::{PaymentCheckout, PlanId, Subscription};
use crate::session::SessionStore;

#[derive(Deserialize)]
struct SubscribeResponse {
    #[serde(default)]
    data: Option<PaymentCheckout>,
}

/// Client for the `/api/plans` endpoints
pub struct PlansClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl PlansClient {
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

    /// Subscribe to a plan.
    ///
    /// Paid plans answer with MercadoPago checkout data; the caller opens
    /// `sandbox_init_point` or `init_point` to complete payment. The free
    /// plan activates immediately and the checkout comes back empty.
    pub async fn subscribe(&self, plan_id: PlanId) -> Result<PaymentCheckout, Error> {
        info!("subscribing to plan {}", plan_id);
        let response: SubscribeResponse =
            Fetch::post(&self.http_client, self.endpoint("/api/plans/subscribe"))
                .session(self.session.clone())
                .json(&json!({ "plan_id": plan_id }))?
                .execute()
                .await?;
        Ok(response.data.unwrap_or_default())
    }

    /// The authenticated user's current subscription
    pub async fn my_subscription(&self) -> Result<Subscription, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/plans/my-subscription"))
            .session(self.session.clone())
            .execute()
            .await
    }
}

/// MercadoPago gateway configuration edited on the admin payment screen.
///
/// Persisted locally as JSON until the backend grows a settings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub webhook_url: String,
    pub premium_price: f64,
    pub vip_price: f64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            public_key: String::new(),
            webhook_url: String::new(),
            premium_price: 29.90,
            vip_price: 49.90,
        }
    }
}

impl PaymentConfig {
    /// True once both MercadoPago credentials are filled in
    pub fn is_configured(&self) -> bool {
        !self.access_token.is_empty() && !self.public_key.is_empty()
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write the configuration as JSON
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

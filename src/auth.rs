//! Authentication and account management

use std::sync::Arc;

use log::{debug, info};
use reqwest::Client;
use serde_json::json;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::models::{
    LoginResponse, RegisterEstablishmentRequest, RegisterRequest, RegisterResponse, User,
};
use crate::session::{SessionStatus, SessionStore};

/// Client for the `/api/auth` endpoints.
///
/// Obtained from [`crate::Barzinhos::auth`]; shares its session store with
/// every other service module.
pub struct AuthClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl AuthClient {
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

    /// Exchange credentials for a session.
    ///
    /// On success the token and user are stored and persisted. On failure
    /// nothing is touched, so a previously persisted session survives a
    /// mistyped password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let response: LoginResponse = Fetch::post(&self.http_client, self.endpoint("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))?
            .execute()
            .await?;

        self.session
            .establish(response.token.clone(), response.user.clone())?;
        info!("logged in as {}", response.user.email);
        Ok(response)
    }

    /// Register an establishment owner account together with its listing
    /// data. When the server answers with a session it is stored, matching
    /// the login behavior.
    pub async fn register_establishment(
        &self,
        request: &RegisterEstablishmentRequest,
    ) -> Result<RegisterResponse, Error> {
        let response: RegisterResponse = Fetch::post(
            &self.http_client,
            self.endpoint("/api/auth/register-establishment"),
        )
        .json(request)?
        .execute()
        .await?;

        self.store_registration(&response)?;
        Ok(response)
    }

    /// Register an administrator account. Requires an admin session on
    /// servers that restrict admin creation.
    pub async fn register_admin(&self, request: &RegisterRequest) -> Result<RegisterResponse, Error> {
        let response: RegisterResponse = Fetch::post(
            &self.http_client,
            self.endpoint("/api/auth/register-admin"),
        )
        .session(self.session.clone())
        .json(request)?
        .execute()
        .await?;

        self.store_registration(&response)?;
        Ok(response)
    }

    fn store_registration(&self, response: &RegisterResponse) -> Result<(), Error> {
        if let (Some(token), Some(user)) = (&response.token, &response.user) {
            self.session.establish(token.clone(), user.clone())?;
        }
        Ok(())
    }

    /// Fetch the authenticated user and refresh the stored copy
    pub async fn me(&self) -> Result<User, Error> {
        let user: User = Fetch::get(&self.http_client, self.endpoint("/api/auth/me"))
            .session(self.session.clone())
            .execute()
            .await?;
        self.session.update_user(user.clone())?;
        Ok(user)
    }

    /// Change the password of the authenticated user
    pub async fn update_password(&self, current: &str, new: &str) -> Result<(), Error> {
        Fetch::put(&self.http_client, self.endpoint("/api/auth/update-password"))
            .session(self.session.clone())
            .json(&json!({ "currentPassword": current, "newPassword": new }))?
            .execute_empty()
            .await
    }

    /// Drop the session locally. No server round-trip, tokens are stateless
    /// on the server side. Idempotent.
    pub fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.session.clear()
    }

    /// Verify a session restored from disk with a who-am-I request.
    ///
    /// Returns the user when the token is still valid, `Ok(None)` when there
    /// is no token or the server rejected it with a 401 (the stale session
    /// is cleared). Transport errors propagate and leave the persisted
    /// session in place, so a server outage does not log the user out.
    pub async fn restore_session(&self) -> Result<Option<User>, Error> {
        if self.session.status() == SessionStatus::Unauthenticated {
            return Ok(None);
        }
        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(Error::Unauthorized { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// True when a token is held, verified or not
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// True when the current user has the admin role
    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// True when the current user has the establishment role
    pub fn is_establishment(&self) -> bool {
        self.session.is_establishment()
    }
}

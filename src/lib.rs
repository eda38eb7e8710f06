//! Barzinhos Rust Client Library
//!
//! A typed client for the Barzinhos local-business directory API, covering
//! authentication, establishment management, reviews, admin moderation and
//! plan subscriptions.
//!
//! ```no_run
//! use barzinhos_client::Barzinhos;
//!
//! # async fn run() -> Result<(), barzinhos_client::Error> {
//! let client = Barzinhos::new("https://api.barzinhos.com.br")?;
//! let session = client.auth().login("joana@example.com", "s3cret").await?;
//! println!("logged in as {}", session.user.email);
//!
//! let page = client.establishments().list(Default::default()).await?;
//! for establishment in page.establishments {
//!     println!("{} ({})", establishment.name, establishment.rating_label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod establishments;
pub mod fetch;
pub mod models;
pub mod plans;
pub mod reviews;
pub mod session;
pub mod validation;

use std::sync::Arc;

use crate::admin::AdminClient;
use crate::auth::AuthClient;
use crate::config::ClientOptions;
pub use crate::error::Error;
use crate::establishments::EstablishmentsClient;
use crate::plans::PlansClient;
use crate::reviews::ReviewsClient;
use crate::session::SessionStore;

/// Entry point for the Barzinhos API
#[derive(Debug, Clone)]
pub struct Barzinhos {
    base_url: String,
    http_client: reqwest::Client,
    session: Arc<SessionStore>,
    options: ClientOptions,
}

impl Barzinhos {
    /// Create a client for the API at `base_url` with default options
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Create a client from the `BARZINHOS_API_URL` environment variable,
    /// falling back to the local development URL when unset
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("BARZINHOS_API_URL")
            .unwrap_or_else(|_| crate::config::DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// Create a client with explicit options
    pub fn new_with_options(options: ClientOptions) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let session_file = if options.persist_session {
            options.session_file.clone()
        } else {
            None
        };
        let session = Arc::new(SessionStore::new(session_file));

        Ok(Self {
            base_url: options.base_url.clone(),
            http_client,
            session,
            options,
        })
    }

    /// Authentication and account management
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(
            self.base_url.clone(),
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Establishment listing, ownership and images
    pub fn establishments(&self) -> EstablishmentsClient {
        EstablishmentsClient::new(
            self.base_url.clone(),
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Reviews on establishments
    pub fn reviews(&self) -> ReviewsClient {
        ReviewsClient::new(
            self.base_url.clone(),
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Moderation and platform statistics, admin role required
    pub fn admin(&self) -> AdminClient {
        AdminClient::new(
            self.base_url.clone(),
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Plan subscription
    pub fn plans(&self) -> PlansClient {
        PlansClient::new(
            self.base_url.clone(),
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// The shared session store
    pub fn session(&self) -> Arc<SessionStore> {
        self.session.clone()
    }

    /// Register a hook fired when a 401 response invalidates the session.
    ///
    /// The hook runs at most once per invalidated session, the place an
    /// application would redirect to its login screen.
    pub fn on_unauthorized<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.session.set_on_invalidated(Arc::new(hook));
    }

    /// The options this client was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

/// Commonly used types
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::models::{
        Establishment, EstablishmentRequest, NewReview, PlanId, Review, Role, User,
    };
    pub use crate::Barzinhos;
}

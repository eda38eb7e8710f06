//! Configuration options for the Barzinhos client

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Configuration options for the Barzinhos client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the Barzinhos API
    pub base_url: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// Whether to persist the session to disk
    pub persist_session: bool,

    /// Where the session is persisted when `persist_session` is set.
    /// `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            persist_session: true,
            session_file: None,
        }
    }
}

impl ClientOptions {
    /// Set the API base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the session file path
    pub fn with_session_file(mut self, value: PathBuf) -> Self {
        self.session_file = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let options = ClientOptions::default().with_base_url("https://api.barzinhos.com.br/");
        assert_eq!(options.base_url, "https://api.barzinhos.com.br");
    }

    #[test]
    fn defaults_target_local_development() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
        assert!(options.persist_session);
        assert!(options.session_file.is_none());
    }
}

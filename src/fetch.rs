//! Thin wrapper over reqwest shared by every service module

use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

use crate::error::Error;
use crate::session::SessionStore;

enum Body {
    Json(Vec<u8>),
    Multipart(Form),
    Empty,
}

/// Builder for a single API request.
///
/// Consumed by [`FetchBuilder::execute`] or [`FetchBuilder::execute_empty`];
/// multipart bodies cannot be replayed.
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Body,
    session: Option<Arc<SessionStore>>,
}

impl<'a> FetchBuilder<'a> {
    pub fn new(client: &'a Client, url: impl Into<String>, method: Method) -> Self {
        Self {
            client,
            url: url.into(),
            method,
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: Body::Empty,
            session: None,
        }
    }

    /// Add a header. Values that are not valid header values are ignored.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a query string parameter
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a JSON body
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Body::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Set a multipart form body
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    /// Attach the session store. The bearer token is read when the request
    /// is sent, and a 401 response invalidates the store.
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Send the request and deserialize a JSON response body
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = self.send().await?;
        let parsed = response.json::<T>().await?;
        Ok(parsed)
    }

    /// Send the request, discarding any response body
    pub async fn execute_empty(self) -> Result<(), Error> {
        self.send().await?;
        Ok(())
    }

    async fn send(self) -> Result<reqwest::Response, Error> {
        let mut url = Url::parse(&self.url)?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        debug!("{} {}", self.method, url);

        let mut request = self.client.request(self.method, url).headers(self.headers);

        match self.body {
            Body::Json(bytes) => {
                request = request
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(bytes);
            }
            Body::Multipart(form) => {
                request = request.multipart(form);
            }
            Body::Empty => {}
        }

        if let Some(session) = &self.session {
            if let Some(token) = session.token() {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| Error::validation("session token is not a valid header value"))?;
                request = request.header(AUTHORIZATION, value);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        trace!("response status {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        if status == StatusCode::UNAUTHORIZED {
            if let Some(session) = &self.session {
                session.invalidate();
            }
            return Err(Error::Unauthorized { message });
        }

        Err(Error::api(status.as_u16(), message))
    }
}

/// Pull the server-provided message out of a JSON error body
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error"] {
        if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }
    None
}

/// Entry points for building requests
pub struct Fetch;

impl Fetch {
    pub fn get<'a>(client: &'a Client, url: impl Into<String>) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    pub fn post<'a>(client: &'a Client, url: impl Into<String>) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    pub fn put<'a>(client: &'a Client, url: impl Into<String>) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    pub fn delete<'a>(client: &'a Client, url: impl Into<String>) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_taken_from_message_then_error_key() {
        assert_eq!(
            extract_message(r#"{"message":"Credenciais inválidas"}"#).as_deref(),
            Some("Credenciais inválidas")
        );
        assert_eq!(
            extract_message(r#"{"error":"not found"}"#).as_deref(),
            Some("not found")
        );
        assert_eq!(extract_message("<html>502</html>"), None);
        assert_eq!(extract_message(r#"{"detail":"other"}"#), None);
    }
}

//! HTTP transport seam for talking to the identity provider.
//!
//! [`TokenTransport`] keeps the exchange logic independent of the HTTP
//! client. [`ReqwestTransport`] is the production implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

use crate::error::{ErrorResponse, TransportError};

/// An `application/x-www-form-urlencoded` POST request.
#[derive(Clone)]
pub struct FormRequest {
    /// Target URL.
    pub url: Url,
    /// Form parameters in send order.
    pub params: Vec<(String, String)>,
    /// HTTP Basic credentials (client id, client secret).
    pub basic_auth: Option<(String, String)>,
}

impl FormRequest {
    /// Creates a form request without parameters.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            params: Vec::new(),
            basic_auth: None,
        }
    }

    /// Appends a form parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Sets HTTP Basic credentials.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Returns the value of the first parameter named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for FormRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(key, value)| {
                let shown = if key == crate::types::params::PASSWORD {
                    "[REDACTED]"
                } else {
                    value.as_str()
                };
                (key.as_str(), shown)
            })
            .collect();

        f.debug_struct("FormRequest")
            .field("url", &self.url.as_str())
            .field("params", &params)
            .field(
                "basic_auth",
                &self.basic_auth.as_ref().map(|(user, _)| (user.as_str(), "[REDACTED]")),
            )
            .finish()
    }
}

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes a successful JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] for non-2xx statuses (with the
    /// OAuth 2.0 error body when one parses) and
    /// [`TransportError::MalformedResponse`] when the body is not `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        if !self.is_success() {
            return Err(TransportError::Status {
                status: self.status,
                error: serde_json::from_slice::<ErrorResponse>(&self.body).ok(),
            });
        }
        serde_json::from_slice(&self.body).map_err(TransportError::MalformedResponse)
    }
}

/// HTTP operations needed by the grant exchange.
#[async_trait]
pub trait TokenTransport: Send + Sync {
    /// Sends a form POST with `Accept: application/json`.
    async fn post_form(&self, request: &FormRequest) -> Result<HttpResponse, TransportError>;

    /// Sends a GET with `Accept: application/json`.
    async fn get_json(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// [`TokenTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client, keeping its TLS and pooling settings.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl TokenTransport for ReqwestTransport {
    async fn post_form(&self, request: &FormRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .post(request.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&request.params);

        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }

        Self::read(builder.send().await?).await
    }

    async fn get_json(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::read(response).await
    }
}

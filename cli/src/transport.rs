//! reqwest-backed [`Transport`] with a cookie jar.
//!
//! The backend keeps the session in an `access_token` cookie. The jar starts
//! empty or seeded from `--session-cookie`, and sign-in/refresh responses
//! update it like a browser would.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;

use filotra::{ApiRequest, ApiResponse, ClientConfig, Method, Transport, TransportError};
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};

use crate::CliError;

pub const SESSION_COOKIE: &str = "access_token";

/// Accept either a bare token or a full `name=value` cookie pair.
pub fn cookie_pair(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains('=') { raw.to_owned() } else { format!("{SESSION_COOKIE}={raw}") }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    origin: Url,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig, session_cookie: Option<&str>) -> Result<Self, CliError> {
        let origin = Url::parse(&config.base_url).map_err(|_| CliError::InvalidBaseUrl(config.base_url.clone()))?;
        let jar = Arc::new(Jar::default());
        if let Some(raw) = session_cookie {
            jar.add_cookie_str(&cookie_pair(raw), &origin);
        }
        let client = reqwest::Client::builder().cookie_provider(Arc::clone(&jar)).build()?;
        Ok(Self { client, jar, origin, config })
    }

    /// Current `Cookie` header for the backend origin, if any.
    pub fn cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(ToOwned::to_owned))
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.config.url(&request.path);
        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        let builder = self.client.request(reqwest_method(request.method), &url);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let response = builder.send().await.map_err(|e| TransportError::Failed(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| TransportError::Failed(e.to_string()))?;
        tracing::debug!(status, %url, "response received");
        Ok(ApiResponse::from_text(status, &text))
    }
}

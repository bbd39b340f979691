//! Secured request client.
//!
//! # Responsibilities
//! - Resolve paths against the configured same-origin base URL
//! - Attach the identification and session token headers to every call
//! - Send credentials (the session cookies) to same-origin targets only
//! - Translate 403 into a page reload plus `SessionExpired`
//! - Translate other non-2xx answers into `HttpError`
//!
//! # Design Decisions
//! - No retries; every failure goes straight back to the caller
//! - JSON requests carry a per-request timeout; uploads use their own deadline

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{PattaError, PattaResult};
use crate::observability::metrics;
use crate::page::PageHost;
use crate::security::headers::{apply_security_headers, default_json_content_type};
use crate::security::Session;

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Text(String),
    Multipart(Form),
}

impl RequestBody {
    fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// Per-call options, mirroring what a caller would hand to `fetch`.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Json(body),
            ..Self::default()
        }
    }

    pub fn post_multipart(form: Form) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Multipart(form),
            ..Self::default()
        }
    }
}

/// HTTP client bound to one session and one origin.
#[derive(Clone)]
pub struct SecureClient {
    inner: reqwest::Client,
    base: Url,
    session: Arc<Session>,
    host: Arc<dyn PageHost>,
    request_timeout: Duration,
}

impl SecureClient {
    pub fn new(config: &ClientConfig, session: Arc<Session>, host: Arc<dyn PageHost>) -> PattaResult<Self> {
        let base = Url::parse(&config.api.base_url).map_err(|source| PattaError::InvalidUrl {
            input: config.api.base_url.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs));
        if !config.api.system_proxy {
            builder = builder.no_proxy();
        }
        let inner = builder.build()?;

        Ok(Self {
            inner,
            base,
            session,
            host,
            request_timeout: Duration::from_secs(config.api.request_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve a path (or absolute URL) against the base URL.
    pub fn resolve(&self, target: &str) -> PattaResult<Url> {
        self.base.join(target).map_err(|source| PattaError::InvalidUrl {
            input: target.to_string(),
            source,
        })
    }

    /// Whether `url` shares the base URL's origin.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.base.origin()
    }

    /// Start a request with the security headers and same-origin credentials attached.
    pub(crate) fn prepare(&self, method: Method, url: Url, mut headers: HeaderMap) -> RequestBuilder {
        apply_security_headers(&mut headers, &self.session);

        if self.is_same_origin(&url) {
            if let Some(cookies) = self.session.cookie_header() {
                match HeaderValue::from_str(cookies) {
                    Ok(value) => {
                        headers.insert(COOKIE, value);
                    }
                    Err(_) => tracing::warn!("Session cookies are not a valid header value; sending without credentials"),
                }
            }
        }

        self.inner.request(method, url).headers(headers)
    }

    /// Perform a request and return the parsed JSON body.
    pub async fn request(&self, target: &str, options: RequestOptions) -> PattaResult<serde_json::Value> {
        self.request_json(target, options).await
    }

    /// Perform a request and deserialize the JSON body into `T`.
    pub async fn request_json<T: DeserializeOwned>(&self, target: &str, options: RequestOptions) -> PattaResult<T> {
        let url = self.resolve(target)?;
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        default_json_content_type(&mut headers, body.is_multipart());

        let builder = self
            .prepare(method.clone(), url.clone(), headers)
            .timeout(self.request_timeout);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(&value)?),
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        tracing::debug!(method = %method, url = %url, "Sending request");

        let response = builder.send().await.inspect_err(|e| {
            metrics::record_request("transport_error");
            tracing::warn!(url = %url, error = %e, "Request failed");
        })?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            metrics::record_request("session_expired");
            metrics::record_session_expired();
            tracing::warn!(url = %url, "Session expired, reloading page");
            self.host.reload();
            return Err(PattaError::SessionExpired);
        }

        let text = response.text().await?;

        if !status.is_success() {
            metrics::record_request("http_error");
            tracing::warn!(url = %url, status = status.as_u16(), "Request rejected");
            return Err(PattaError::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        metrics::record_request("ok");
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::page::RecordingHost;

    fn client(base: &str) -> SecureClient {
        let mut config = ClientConfig::default();
        config.api.base_url = base.to_string();
        let session = Arc::new(Session::new(SessionConfig::default(), Some("csrf_token=t1; sid=abc".into())));
        SecureClient::new(&config, session, Arc::new(RecordingHost::new())).unwrap()
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let client = client("https://patta.example.gov/portal/");
        assert_eq!(
            client.resolve("/api/patta/apply").unwrap().as_str(),
            "https://patta.example.gov/api/patta/apply"
        );
        assert_eq!(
            client.resolve("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = ClientConfig::default();
        config.api.base_url = "::nope".into();
        let session = Arc::new(Session::new(SessionConfig::default(), None));
        let result = SecureClient::new(&config, session, Arc::new(RecordingHost::new()));
        assert!(matches!(result, Err(PattaError::InvalidUrl { .. })));
    }

    #[test]
    fn test_credentials_only_for_same_origin() {
        let client = client("https://patta.example.gov");

        let same = client
            .prepare(Method::GET, client.resolve("/api/patta/requests").unwrap(), HeaderMap::new())
            .build()
            .unwrap();
        assert_eq!(same.headers()[COOKIE], "csrf_token=t1; sid=abc");
        assert_eq!(same.headers()["x-xsrf-token"], "t1");

        let other = client
            .prepare(Method::GET, client.resolve("https://tiles.example/1.png").unwrap(), HeaderMap::new())
            .build()
            .unwrap();
        assert!(other.headers().get(COOKIE).is_none());
        assert_eq!(other.headers()["x-requested-with"], "XMLHttpRequest");
    }
}

//! Per-session anti-forgery token.
//!
//! The token is read from the session cookie when the backend has issued one,
//! otherwise generated locally. Either way it is resolved once and never
//! changes for the lifetime of the [`Session`].

use std::fmt;
use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use reqwest::header::HeaderValue;

use crate::config::SessionConfig;

/// Number of random bytes behind a generated token.
pub const TOKEN_BYTES: usize = 32;

/// Length of a generated token (unpadded base64 of 32 bytes).
pub const TOKEN_LEN: usize = 43;

/// Opaque anti-forgery token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the value out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// Where a session's token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cookie,
    Generated,
}

/// Session-scoped state shared by everything that talks to the backend.
pub struct Session {
    config: SessionConfig,
    cookies: Option<String>,
    token: OnceLock<(SessionToken, TokenSource)>,
}

impl Session {
    /// Create a session from the page's cookie string (`name=value; ...`), if any.
    pub fn new(config: SessionConfig, cookies: Option<String>) -> Self {
        Self {
            config,
            cookies: cookies.filter(|c| !c.trim().is_empty()),
            token: OnceLock::new(),
        }
    }

    /// The session token, resolved on first access.
    pub fn token(&self) -> &SessionToken {
        &self.resolved().0
    }

    /// Whether the token came from the cookie or was generated.
    pub fn token_source(&self) -> TokenSource {
        self.resolved().1
    }

    /// Name of the header the token travels in.
    pub fn header_name(&self) -> &str {
        &self.config.header_name
    }

    /// Raw cookie string sent as credentials to same-origin targets.
    pub fn cookie_header(&self) -> Option<&str> {
        self.cookies.as_deref()
    }

    fn resolved(&self) -> &(SessionToken, TokenSource) {
        self.token.get_or_init(|| {
            let from_cookie = self
                .cookies
                .as_deref()
                .and_then(|c| read_cookie(c, &self.config.cookie_name))
                .filter(|value| {
                    // The token must travel in a header; anything that cannot is ignored.
                    let usable = HeaderValue::from_str(value).is_ok();
                    if !usable {
                        tracing::warn!(cookie = %self.config.cookie_name, "Token cookie is not a valid header value, ignoring it");
                    }
                    usable
                });

            match from_cookie {
                Some(value) => {
                    tracing::debug!(cookie = %self.config.cookie_name, "Session token read from cookie");
                    (SessionToken(value.to_string()), TokenSource::Cookie)
                }
                None => {
                    tracing::debug!("No token cookie present, generated session token");
                    (SessionToken(generate_token()), TokenSource::Generated)
                }
            }
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("header_name", &self.config.header_name)
            .field("has_cookies", &self.cookies.is_some())
            .field("resolved", &self.token.get().is_some())
            .finish()
    }
}

/// Find a cookie value in a `Cookie` header string. Empty values count as absent.
pub fn read_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Generate a fresh token from the OS random source.
///
/// Panics if the OS cannot supply randomness; there is no sensible fallback.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    let mut token = STANDARD.encode(bytes);
    token.truncate(TOKEN_LEN);
    token
}

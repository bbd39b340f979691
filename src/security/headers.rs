//! Headers attached to every backend call.
//!
//! # Responsibilities
//! - Identify calls as scripted (`X-Requested-With`)
//! - Carry the session token in the configured header
//! - Default the content type to JSON for non-multipart bodies
//!
//! # Design Decisions
//! - Identification and token headers always win over caller-supplied values
//! - A caller-supplied content type is never replaced

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::security::Session;

pub const X_REQUESTED_WITH: &str = "x-requested-with";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Insert the identification and token headers into `headers`.
pub fn apply_security_headers(headers: &mut HeaderMap, session: &Session) {
    headers.insert(
        HeaderName::from_static(X_REQUESTED_WITH),
        HeaderValue::from_static(XML_HTTP_REQUEST),
    );

    // Header name is checked at config load; the session only hands out tokens
    // that are valid header values.
    match (
        HeaderName::from_bytes(session.header_name().as_bytes()),
        HeaderValue::from_str(session.token().as_str()),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = session.header_name(), "Session token header not attached"),
    }
}

/// Set `Content-Type: application/json` unless the body is multipart or a
/// content type is already present.
pub fn default_json_content_type(headers: &mut HeaderMap, is_multipart: bool) {
    if !is_multipart && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
}

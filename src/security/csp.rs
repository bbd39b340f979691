//! Content-Security-Policy violation monitor.
//!
//! Violations are always recorded. Under the `block-and-replace` policy the
//! page content is additionally swapped for a notice; under `log-only` nothing
//! else happens.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::{CspConfig, CspPolicy};
use crate::observability::metrics;

/// A single policy violation as reported by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CspViolation {
    pub blocked_uri: String,
    pub violated_directive: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Milliseconds since the Unix epoch.
    #[serde(default = "now_ms")]
    pub timestamp_ms: u64,
}

impl CspViolation {
    pub fn new(blocked_uri: impl Into<String>, violated_directive: impl Into<String>) -> Self {
        Self {
            blocked_uri: blocked_uri.into(),
            violated_directive: violated_directive.into(),
            source_file: None,
            line_number: None,
            timestamp_ms: now_ms(),
        }
    }

    /// Parse a browser `application/csp-report` body (`{"csp-report": {...}}`).
    pub fn from_report_json(body: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(rename = "csp-report")]
            report: CspViolation,
        }

        serde_json::from_str::<Envelope>(body).map(|e| e.report)
    }
}

/// What the monitor wants done with the page after a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CspResponse {
    LogOnly,
    ReplaceContent(String),
}

/// Decide the response to a violation under `config`. Pure.
pub fn respond(config: &CspConfig, _violation: &CspViolation) -> CspResponse {
    match config.policy {
        CspPolicy::LogOnly => CspResponse::LogOnly,
        CspPolicy::BlockAndReplace => CspResponse::ReplaceContent(config.replacement_html.clone()),
    }
}

/// Emit the structured diagnostic record for a violation.
pub fn log_violation(violation: &CspViolation) {
    metrics::record_csp_violation(&violation.violated_directive);
    tracing::error!(
        blocked_uri = %violation.blocked_uri,
        directive = %violation.violated_directive,
        source_file = violation.source_file.as_deref().unwrap_or(""),
        line = violation.line_number.unwrap_or(0),
        timestamp_ms = violation.timestamp_ms,
        "CSP violation"
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

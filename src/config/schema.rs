//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the patta client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend location and request settings.
    pub api: ApiConfig,

    /// Session token settings (cookie and header names).
    pub session: SessionConfig,

    /// Document validation limits.
    pub validation: ValidationConfig,

    /// Upload settings.
    pub upload: UploadConfig,

    /// Content-Security-Policy violation handling.
    pub csp: CspConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin the client treats as same-origin (e.g., "https://patta.example.gov").
    pub base_url: String,

    /// Path of the application submission endpoint.
    pub apply_path: String,

    /// Timeout for ordinary JSON requests in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Honour HTTP(S)_PROXY from the environment.
    pub system_proxy: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            apply_path: "/api/patta/apply".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            system_proxy: true,
        }
    }
}

/// Anti-forgery session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie the token is read from.
    pub cookie_name: String,

    /// Request header the token is sent in.
    pub header_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "csrf_token".to_string(),
            header_name: "X-XSRF-TOKEN".to_string(),
        }
    }
}

/// Document validation limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum accepted file size in bytes.
    pub max_file_bytes: u64,

    /// Accepted MIME types.
    pub allowed_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024, // 10 MiB
            allowed_types: vec![
                "application/pdf".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Hard deadline for a whole upload (send + response body) in milliseconds.
    pub deadline_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 120_000,
        }
    }
}

/// What to do when the page reports a policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CspPolicy {
    /// Record the violation and carry on.
    #[default]
    LogOnly,
    /// Record the violation and replace the page content with a notice.
    BlockAndReplace,
}

/// CSP violation handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CspConfig {
    /// Enforcement policy.
    pub policy: CspPolicy,

    /// Markup shown when `policy` is `block-and-replace`.
    pub replacement_html: String,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            policy: CspPolicy::LogOnly,
            replacement_html: "<h1>Security violation detected</h1>".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

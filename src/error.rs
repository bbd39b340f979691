//! Error definitions shared by the request client, uploader and assembler.

use std::time::Duration;

use thiserror::Error;

use crate::upload::DocumentField;
use crate::validation::FileRejection;

/// Errors surfaced to callers of the client.
#[derive(Debug, Error)]
pub enum PattaError {
    /// A required document was not supplied or is empty.
    #[error("Missing required document: {0}")]
    MissingDocument(DocumentField),

    /// A document failed client-side validation.
    #[error("Document {field} rejected: {reason}")]
    Rejected {
        field: DocumentField,
        reason: FileRejection,
    },

    /// The backend answered 403; the session is gone and the page was reloaded.
    #[error("Session expired")]
    SessionExpired,

    /// A JSON request got a non-2xx answer other than 403.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The application upload got a non-2xx answer.
    #[error("Upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    /// The application upload did not complete within the deadline.
    #[error("Upload timed out after {0:?}")]
    UploadTimeout(Duration),

    /// A coordinate was not finite or fell outside its valid range.
    #[error("Invalid coordinate {name}={value}")]
    InvalidCoordinate { name: &'static str, value: f64 },

    /// A numeric field did not hold a number.
    #[error("Invalid number in {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },

    /// A path or URL could not be resolved against the base URL.
    #[error("Invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Network or protocol failure below the HTTP status level.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A body was not the expected JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a document from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type PattaResult<T> = Result<T, PattaError>;

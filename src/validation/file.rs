//! Document checks run whenever a file input changes.
//!
//! # Rules (first failure wins)
//! 1. size ≤ configured limit (10 MiB by default)
//! 2. MIME type on the allow-list
//! 3. filename free of embedded markup tags

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ValidationConfig;

/// Markup tags that must never appear in an uploaded filename.
const UNSAFE_FILENAME_PATTERN: &str = r"(?i)<(script|iframe|object|embed|svg)";

/// What the client knows about a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Why a document was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("file is {size} bytes, limit is {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("unsupported file type '{0}'")]
    UnsupportedType(String),

    #[error("unsafe filename '{0}'")]
    UnsafeFilename(String),
}

impl FileRejection {
    /// Short label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            FileRejection::FileTooLarge { .. } => "too_large",
            FileRejection::UnsupportedType(_) => "unsupported_type",
            FileRejection::UnsafeFilename(_) => "unsafe_filename",
        }
    }

    /// Message shown to the person who picked the file.
    pub fn user_message(&self) -> String {
        match self {
            FileRejection::FileTooLarge { limit, .. } => format!(
                "File too large. Maximum size is {}MB.",
                limit / (1024 * 1024)
            ),
            FileRejection::UnsupportedType(_) => {
                "Invalid file type. Only PDF, JPG and PNG files are allowed.".to_string()
            }
            FileRejection::UnsafeFilename(_) => {
                "Invalid filename. Please rename the file and try again.".to_string()
            }
        }
    }
}

/// Applies the size, type and filename rules.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_bytes: u64,
    allowed_types: Vec<String>,
    unsafe_name: Regex,
}

impl FileValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            max_bytes: config.max_file_bytes,
            allowed_types: config.allowed_types.clone(),
            unsafe_name: Regex::new(UNSAFE_FILENAME_PATTERN).expect("static filename pattern"),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check a descriptor. Never mutates it.
    pub fn validate(&self, file: &FileDescriptor) -> Result<(), FileRejection> {
        if file.size > self.max_bytes {
            return Err(FileRejection::FileTooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }

        // Exact match; MIME strings are compared as reported.
        if !self.allowed_types.iter().any(|t| *t == file.mime_type) {
            return Err(FileRejection::UnsupportedType(file.mime_type.clone()));
        }

        if self.unsafe_name.is_match(&file.name) {
            return Err(FileRejection::UnsafeFilename(file.name.clone()));
        }

        Ok(())
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upload to backend:
//!     → timeouts.rs (enforce the upload deadline)
//!     → on expiry the request future is dropped and the caller gets UploadTimeout
//! ```
//!
//! # Design Decisions
//! - Every upload has a deadline
//! - No retries: every failure goes straight back to the caller

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};

//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Session start:
//!     → token.rs (read csrf_token cookie or generate, once)
//!
//! Outgoing request:
//!     → headers.rs (X-Requested-With, X-XSRF-TOKEN, JSON content type)
//!     → http client
//!
//! Page reports a policy violation:
//!     → csp.rs (log record, optional page replacement)
//! ```
//!
//! # Design Decisions
//! - The token lives in an explicit `Session`, never in a global
//! - Token values are redacted from Debug output

pub mod csp;
pub mod headers;
pub mod token;

pub use csp::{CspResponse, CspViolation};
pub use token::{Session, SessionToken, TokenSource};

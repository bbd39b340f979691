//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! caller (api.rs, upload orchestrator)
//!     → client.rs (resolve URL, security headers, same-origin credentials)
//!     → backend
//!     → 2xx: JSON body | 403: PageHost::reload + SessionExpired | other: HttpError
//! ```

pub mod api;
pub mod client;

pub use api::PattaApi;
pub use client::{RequestBody, RequestOptions, SecureClient};

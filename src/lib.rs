//! Client security helper for the patta (land record) submission service.
//!
//! # Architecture Overview
//!
//! ```text
//!   page events ──▶ page::Dispatcher ──▶ Vec<Action> ──▶ PageHost
//!                      │                                   ▲
//!                      ├─ security::csp (violation log)    │ reload on 403
//!                      └─ validation (file rules, drops)   │
//!                                                          │
//!   FormAccessor + BoundarySource                          │
//!        │                                                 │
//!        ▼                                                 │
//!   upload::assemble ──▶ upload::Uploader ──▶ http::SecureClient ──▶ backend
//!                           (deadline)          (headers, token,
//!                                                same-origin cookies)
//!                                                     ▲
//!                                 security::Session ──┘ (token, once)
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod page;
pub mod resilience;
pub mod security;
pub mod upload;
pub mod validation;

pub use config::ClientConfig;
pub use error::{PattaError, PattaResult};
pub use http::{PattaApi, SecureClient};
pub use page::{Dispatcher, PageHost};
pub use security::Session;
pub use upload::{submit_patta, Uploader};
pub use validation::FileValidator;

//! Client-side document validation.
//!
//! # Data Flow
//! ```text
//! file input change / drop
//!     → page dispatcher
//!     → file.rs (size, type, filename rules)
//!     → drop_guard.rs (drop target must be a document field)
//!     → accept, or clear input + alert / deny drop
//! ```
//!
//! # Design Decisions
//! - Validation is synchronous and side-effect free; the page layer applies the outcome
//! - Fail closed: any rule failure rejects the file

pub mod drop_guard;
pub mod file;

pub use drop_guard::{DropDecision, DropGuard, DropTarget};
pub use file::{FileDescriptor, FileRejection, FileValidator};

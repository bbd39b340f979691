//! Application submission.
//!
//! # Data Flow
//! ```text
//! FormAccessor + BoundarySource (map layer)
//!     → assembler.rs (read fields, check documents and coordinates)
//!     → payload.rs SubmissionPayload
//!     → orchestrator.rs Uploader (required documents, multipart POST, deadline)
//!     → parsed JSON answer or PattaError
//! ```
//!
//! # Design Decisions
//! - A payload missing any of the five documents never reaches the network
//! - One attempt per call; no retries
//! - The deadline aborts the transfer, not just the wait

pub mod assembler;
pub mod boundary;
pub mod orchestrator;
pub mod payload;

pub use assembler::{assemble, submit_patta, FormAccessor};
pub use boundary::{BoundarySource, FormCoordinate, LatLng, Ring, StaticBoundary};
pub use orchestrator::{Uploader, UPLOAD_DEADLINE};
pub use payload::{DocumentField, DocumentFile, Location, SubmissionPayload};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Whatever metrics recorder the host application installs
//! ```

pub mod logging;
pub mod metrics;

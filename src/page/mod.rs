//! Page integration.
//!
//! # Data Flow
//! ```text
//! page event (policy violation, file input change, drop)
//!     → events.rs Dispatcher (table: EventKind → handler)
//!     → Vec<Action> (pure)
//!     → events::apply → PageHost (clear input, alert, replace content, deny drop)
//!
//! 403 from the backend:
//!     → http client → PageHost::reload
//! ```

pub mod events;
pub mod host;

pub use events::{check_file_input, Action, Dispatcher, EventKind, PageEvent};
pub use host::{HeadlessHost, HostCall, PageHost, RecordingHost};

//! The surface the helper acts on.
//!
//! In a browser this is the document; elsewhere it is whatever embeds the
//! client. Implementations use interior mutability so one host can be shared
//! between the dispatcher and the request client.

use std::sync::Mutex;

use crate::validation::DropTarget;

pub trait PageHost: Send + Sync {
    /// Clear the selection of a file input.
    fn clear_input(&self, field: &str);

    /// Show a message to the user.
    fn alert(&self, message: &str);

    /// Replace the whole page content.
    fn replace_content(&self, html: &str);

    /// Stop the default handling of a drop (the browser opening the file).
    fn deny_drop(&self, target: &DropTarget);

    /// Reload the page, discarding in-memory state.
    fn reload(&self);
}

/// Host for non-interactive use: every action is logged and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessHost;

impl PageHost for HeadlessHost {
    fn clear_input(&self, field: &str) {
        tracing::debug!(field, "Input cleared");
    }

    fn alert(&self, message: &str) {
        tracing::warn!(message, "User alert");
    }

    fn replace_content(&self, html: &str) {
        tracing::warn!(bytes = html.len(), "Page content replaced");
    }

    fn deny_drop(&self, target: &DropTarget) {
        tracing::debug!(region = ?target.region, "Drop denied");
    }

    fn reload(&self) {
        tracing::warn!("Page reload requested");
    }
}

/// Something a [`RecordingHost`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ClearInput(String),
    Alert(String),
    ReplaceContent(String),
    DenyDrop(Option<String>),
    Reload,
}

/// Host that remembers every call, for embedding tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.lock().iter().filter(|c| **c == HostCall::Reload).count()
    }

    fn record(&self, call: HostCall) {
        self.lock().push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostCall>> {
        self.calls.lock().expect("recording host mutex poisoned")
    }
}

impl PageHost for RecordingHost {
    fn clear_input(&self, field: &str) {
        self.record(HostCall::ClearInput(field.to_string()));
    }

    fn alert(&self, message: &str) {
        self.record(HostCall::Alert(message.to_string()));
    }

    fn replace_content(&self, html: &str) {
        self.record(HostCall::ReplaceContent(html.to_string()));
    }

    fn deny_drop(&self, target: &DropTarget) {
        self.record(HostCall::DenyDrop(target.region.clone()));
    }

    fn reload(&self) {
        self.record(HostCall::Reload);
    }
}

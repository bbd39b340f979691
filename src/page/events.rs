//! Page event dispatch.
//!
//! Each event kind maps to one handler in an explicit table. Handlers are
//! plain functions from event data to a list of [`Action`]s; they touch
//! nothing. [`apply`] then carries the actions out against a [`PageHost`].
//! Dispatch for a given event is synchronous, so a file input is fully
//! validated before the next event for it is looked at.

use std::collections::HashMap;

use crate::config::{ClientConfig, CspConfig};
use crate::observability::metrics;
use crate::page::PageHost;
use crate::security::csp::{self, CspResponse, CspViolation};
use crate::validation::{DropDecision, DropGuard, DropTarget, FileDescriptor, FileRejection, FileValidator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SecurityPolicyViolation,
    FileInputChange,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    SecurityPolicyViolation(CspViolation),
    /// `file` is `None` when the selection was emptied.
    FileInputChange {
        field: String,
        file: Option<FileDescriptor>,
    },
    Drop(DropTarget),
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::SecurityPolicyViolation(_) => EventKind::SecurityPolicyViolation,
            PageEvent::FileInputChange { .. } => EventKind::FileInputChange,
            PageEvent::Drop(_) => EventKind::Drop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LogViolation(CspViolation),
    ReplaceContent(String),
    AcceptFile {
        field: String,
        file: FileDescriptor,
    },
    RejectFile {
        field: String,
        file: FileDescriptor,
        rejection: FileRejection,
    },
    DenyDrop(DropTarget),
}

/// Read-only state handlers may consult.
pub struct HandlerContext<'a> {
    pub csp: &'a CspConfig,
    pub validator: &'a FileValidator,
    pub drop_guard: &'a DropGuard,
}

pub type Handler = fn(&PageEvent, &HandlerContext<'_>) -> Vec<Action>;

pub struct Dispatcher {
    table: HashMap<EventKind, Handler>,
    csp: CspConfig,
    validator: FileValidator,
    drop_guard: DropGuard,
}

impl Dispatcher {
    /// Dispatcher with the standard handlers for all three event kinds.
    pub fn new(config: &ClientConfig) -> Self {
        let mut table: HashMap<EventKind, Handler> = HashMap::new();
        table.insert(EventKind::SecurityPolicyViolation, on_policy_violation);
        table.insert(EventKind::FileInputChange, on_file_input_change);
        table.insert(EventKind::Drop, on_drop);

        Self {
            table,
            csp: config.csp.clone(),
            validator: FileValidator::new(&config.validation),
            drop_guard: DropGuard::default(),
        }
    }

    /// Replace (or add) the handler for `kind`.
    pub fn with_handler(mut self, kind: EventKind, handler: Handler) -> Self {
        self.table.insert(kind, handler);
        self
    }

    pub fn with_drop_guard(mut self, guard: DropGuard) -> Self {
        self.drop_guard = guard;
        self
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    /// Work out the actions for an event without performing them.
    pub fn actions(&self, event: &PageEvent) -> Vec<Action> {
        let ctx = HandlerContext {
            csp: &self.csp,
            validator: &self.validator,
            drop_guard: &self.drop_guard,
        };

        match self.table.get(&event.kind()) {
            Some(handler) => handler(event, &ctx),
            None => {
                tracing::trace!(kind = ?event.kind(), "No handler registered");
                Vec::new()
            }
        }
    }

    /// Compute and perform the actions for an event.
    pub fn dispatch(&self, event: &PageEvent, host: &dyn PageHost) -> Vec<Action> {
        let actions = self.actions(event);
        for action in &actions {
            apply(action, host);
        }
        actions
    }
}

fn on_policy_violation(event: &PageEvent, ctx: &HandlerContext<'_>) -> Vec<Action> {
    let PageEvent::SecurityPolicyViolation(violation) = event else {
        return Vec::new();
    };

    let mut actions = vec![Action::LogViolation(violation.clone())];
    if let CspResponse::ReplaceContent(html) = csp::respond(ctx.csp, violation) {
        actions.push(Action::ReplaceContent(html));
    }
    actions
}

fn on_file_input_change(event: &PageEvent, ctx: &HandlerContext<'_>) -> Vec<Action> {
    match event {
        PageEvent::FileInputChange {
            field,
            file: Some(file),
        } => vec![file_action(ctx.validator, field, file)],
        _ => Vec::new(),
    }
}

fn on_drop(event: &PageEvent, ctx: &HandlerContext<'_>) -> Vec<Action> {
    let PageEvent::Drop(target) = event else {
        return Vec::new();
    };

    match ctx.drop_guard.decide(target) {
        DropDecision::Allow => Vec::new(),
        DropDecision::Deny => vec![Action::DenyDrop(target.clone())],
    }
}

fn file_action(validator: &FileValidator, field: &str, file: &FileDescriptor) -> Action {
    match validator.validate(file) {
        Ok(()) => Action::AcceptFile {
            field: field.to_string(),
            file: file.clone(),
        },
        Err(rejection) => Action::RejectFile {
            field: field.to_string(),
            file: file.clone(),
            rejection,
        },
    }
}

/// Perform one action against the host.
pub fn apply(action: &Action, host: &dyn PageHost) {
    match action {
        Action::LogViolation(violation) => csp::log_violation(violation),
        Action::ReplaceContent(html) => host.replace_content(html),
        Action::AcceptFile { field, file } => {
            tracing::info!(field = %field, name = %file.name, size = file.size, mime = %file.mime_type, "File validated");
        }
        Action::RejectFile {
            field,
            file,
            rejection,
        } => {
            metrics::record_file_rejection(rejection.reason());
            tracing::warn!(field = %field, name = %file.name, reason = rejection.reason(), "File rejected");
            host.clear_input(field);
            host.alert(&rejection.user_message());
        }
        Action::DenyDrop(target) => {
            tracing::warn!(region = ?target.region, "Drop outside document field denied");
            host.deny_drop(target);
        }
    }
}

/// Input-change entry point: validate, apply the outcome, report acceptance.
///
/// A rejected file has its input cleared and the user alerted.
pub fn check_file_input(
    validator: &FileValidator,
    host: &dyn PageHost,
    field: &str,
    file: &FileDescriptor,
) -> bool {
    let action = file_action(validator, field, file);
    let accepted = matches!(action, Action::AcceptFile { .. });
    apply(&action, host);
    accepted
}

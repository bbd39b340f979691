//! Drag-and-drop guard.
//!
//! Files may only be dropped onto a designated document field. Anything else
//! is refused outright so the browser never opens the file itself.

use std::collections::HashSet;

use crate::upload::DocumentField;

/// Where a drop landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Document field region enclosing the target, if any.
    pub region: Option<String>,
}

impl DropTarget {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            region: Some(name.into()),
        }
    }

    pub fn outside() -> Self {
        Self { region: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDecision {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct DropGuard {
    regions: HashSet<String>,
}

impl DropGuard {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn decide(&self, target: &DropTarget) -> DropDecision {
        match &target.region {
            Some(region) if self.regions.contains(region) => DropDecision::Allow,
            _ => DropDecision::Deny,
        }
    }
}

impl Default for DropGuard {
    /// The five required document inputs.
    fn default() -> Self {
        Self::new(DocumentField::ALL.iter().map(|f| f.as_str()))
    }
}

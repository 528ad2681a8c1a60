//! Describe-before-mutate transition guard
//!
//! Each resource kind declares a small table of operations. For every
//! operation the table names its semantic inverse and the observed status that
//! makes the literal request a no-op. [`decide`] compares a fresh probe result
//! against that rule and picks the call to issue, so that repeating the same
//! verb (or pairing an injection with its recovery) toggles the resource
//! instead of failing.

use crate::error::ActionError;
use serde::Serialize;
use std::collections::HashMap;

/// Status observed for a set of resource identifiers
///
/// Built fresh from a single probe; identifiers the provider did not report
/// are read as an empty status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteStatus {
    statuses: HashMap<String, String>,
}

impl RemoteStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, status: impl Into<String>) {
        self.statuses.insert(id.into(), status.into());
    }

    pub fn with(mut self, id: impl Into<String>, status: impl Into<String>) -> Self {
        self.insert(id, status);
        self
    }

    /// Status of `id`, empty when not reported
    pub fn status(&self, id: &str) -> &str {
        self.statuses.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RemoteStatus {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut status = RemoteStatus::new();
        for (k, v) in iter {
            status.insert(k, v);
        }
        status
    }
}

/// Observed status that turns a request into its inverse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipWhen {
    /// The resource already shows this status
    StatusIs(&'static str),
    /// The resource does not show this status
    StatusIsNot(&'static str),
}

impl FlipWhen {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            FlipWhen::StatusIs(expected) => status == *expected,
            FlipWhen::StatusIsNot(expected) => status != *expected,
        }
    }
}

/// One supported value of the `type` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    /// Inverse operation and the rule that selects it; `None` never flips
    pub flip: Option<(&'static str, FlipWhen)>,
}

impl Operation {
    pub const fn flipping(name: &'static str, inverse: &'static str, when: FlipWhen) -> Self {
        Self {
            name,
            flip: Some((inverse, when)),
        }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self { name, flip: None }
    }

    pub fn inverse(&self) -> Option<&'static str> {
        self.flip.map(|(inverse, _)| inverse)
    }
}

/// Supported operations of a resource kind
#[derive(Debug, Clone, Copy)]
pub struct OperationTable {
    pub operations: &'static [Operation],
}

impl OperationTable {
    pub const fn new(operations: &'static [Operation]) -> Self {
        Self { operations }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Look up the requested type; unknown values list the supported set
    pub fn lookup(&self, name: &str) -> Result<&Operation, ActionError> {
        self.get(name).ok_or_else(|| {
            ActionError::invalid(format!(
                "type `{}` is not support(support {})",
                name,
                self.names().join(", ")
            ))
        })
    }
}

/// The call the guard decided to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "operation", rename_all = "snake_case")]
pub enum Transition {
    /// The literal requested operation
    Forward(&'static str),
    /// The inverse, because the resource already reflects the request
    Inverse(&'static str),
}

impl Transition {
    pub fn operation(&self) -> &'static str {
        match self {
            Transition::Forward(op) | Transition::Inverse(op) => op,
        }
    }

    pub fn is_flipped(&self) -> bool {
        matches!(self, Transition::Inverse(_))
    }
}

/// Decide between the requested operation and its inverse
///
/// A single key whose status matches the flip rule flips the whole batch;
/// mixed batches are not split per identifier.
pub fn decide<S: AsRef<str>>(operation: &Operation, observed: &RemoteStatus, keys: &[S]) -> Transition {
    match operation.flip {
        Some((inverse, when))
            if keys
                .iter()
                .any(|key| when.matches(observed.status(key.as_ref()))) =>
        {
            Transition::Inverse(inverse)
        }
        _ => Transition::Forward(operation.name),
    }
}

//! Post-filtering of audit log entries
//!
//! The log store only applies a coarse pre-filter. This module applies the exact
//! semantics on the client side:
//!
//! 1. drop entries that are not about secrets ([`is_relevant`])
//! 2. resource fragment: case-insensitive substring of any of the three path fields
//! 3. principal fragment: case-insensitive substring of the principal email
//! 4. operation set: normalized operation must be one of the requested kinds
//!
//! Dimensions combine with AND, kinds inside the operation set with OR. Input order
//! is preserved.

#![warn(clippy::all, rust_2018_idioms)]

use tracing::debug;

use super::operations::OperationSet;
use super::relevance::is_relevant;
use super::types::AuditLogEntry;

/// Default day window when none is configured
pub const DEFAULT_DAYS: u32 = 7;

/// Longest day window accepted (Cloud Logging retains entries for at most ten years)
pub const MAX_DAYS: u32 = 3650;

/// What the user asked to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Substring of the secret path (case-insensitive)
    pub resource_fragment: Option<String>,

    /// Substring of the principal email (case-insensitive)
    pub principal_fragment: Option<String>,

    /// Requested operations; empty means all operations
    pub operations: OperationSet,

    /// How many days back to look
    pub days: u32,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl FilterCriteria {
    /// Criteria with no filters and the default day window
    pub fn new() -> Self {
        Self {
            resource_fragment: None,
            principal_fragment: None,
            operations: OperationSet::new(),
            days: DEFAULT_DAYS,
        }
    }

    /// Builder pattern: filter by secret name fragment. Blank fragments are ignored.
    pub fn with_resource_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.resource_fragment = non_blank(fragment.into());
        self
    }

    /// Builder pattern: filter by principal fragment. Blank fragments are ignored.
    pub fn with_principal_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.principal_fragment = non_blank(fragment.into());
        self
    }

    /// Builder pattern: restrict to the given operations
    pub fn with_operations(mut self, operations: OperationSet) -> Self {
        self.operations = operations;
        self
    }

    /// Builder pattern: set the day window, clamped to `1..=MAX_DAYS`
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days.clamp(1, MAX_DAYS);
        self
    }

    /// True when any user filter is active
    pub fn has_filters(&self) -> bool {
        self.resource_fragment.is_some()
            || self.principal_fragment.is_some()
            || !self.operations.is_empty()
    }

    /// Whether a single entry survives every filtering step
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        is_relevant(entry)
            && self
                .resource_fragment
                .as_deref()
                .map_or(true, |f| resource_matches(entry, &f.to_lowercase()))
            && self
                .principal_fragment
                .as_deref()
                .map_or(true, |f| principal_matches(entry, &f.to_lowercase()))
            && (self.operations.is_empty() || self.operations.contains(&entry.operation()))
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new()
    }
}

fn resource_matches(entry: &AuditLogEntry, needle: &str) -> bool {
    entry
        .resource_paths()
        .into_iter()
        .flatten()
        .any(|path| path.to_lowercase().contains(needle))
}

fn principal_matches(entry: &AuditLogEntry, needle: &str) -> bool {
    let principal = entry.principal();
    !principal.is_empty() && principal.to_lowercase().contains(needle)
}

/// Apply relevance classification and the user's criteria, keeping input order
pub fn filter_records(mut entries: Vec<AuditLogEntry>, criteria: &FilterCriteria) -> Vec<AuditLogEntry> {
    let received = entries.len();
    let relevant = entries.iter().filter(|entry| is_relevant(entry)).count();

    entries.retain(|entry| criteria.matches(entry));

    debug!(
        "Audit entries: {} received, {} relevant, {} after filters",
        received,
        relevant,
        entries.len()
    );

    entries
}

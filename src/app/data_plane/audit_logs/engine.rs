//! Audit log query pipeline
//!
//! One invocation runs: filter expression → log source → relevance + post-filter →
//! renderer. The only I/O is the single [`LogSource::read_entries`] call; a failure
//! there ends the invocation before anything is rendered.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use tracing::info;

use super::client::LogSource;
use super::filter::{filter_records, FilterCriteria};
use super::query::{AuditQuery, SECRET_MANAGER_SERVICE};
use super::render::{render, OutputFormat};

/// Default cap on entries fetched from the log store
pub const DEFAULT_LIMIT: u32 = 50;

/// Everything one invocation needs; no ambient state is consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogRequest {
    pub criteria: FilterCriteria,

    /// Project to read from; `None` lets the log source pick its default
    pub project: Option<String>,

    /// Maximum number of entries requested from the store
    pub limit: Option<u32>,

    pub format: OutputFormat,

    /// Service the store-side filter is scoped to
    pub service_name: String,
}

impl AuditLogRequest {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            project: None,
            limit: Some(DEFAULT_LIMIT),
            format: OutputFormat::default(),
            service_name: SECRET_MANAGER_SERVICE.to_string(),
        }
    }

    /// Builder pattern: read from a specific project
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Builder pattern: set the store-side entry limit (at least one entry)
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.max(1));
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Store-side query for this request
    pub fn query(&self) -> AuditQuery {
        AuditQuery::from_criteria(&self.criteria).with_service_name(self.service_name.clone())
    }
}

/// Run one audit log query and return the rendered output
pub fn run_audit_query(source: &dyn LogSource, request: &AuditLogRequest) -> Result<String> {
    let filter = request.query().filter_expression();
    info!(
        "Querying audit logs (project: {}, limit: {:?}): {}",
        request.project.as_deref().unwrap_or("<default>"),
        request.limit,
        filter
    );

    let entries = source
        .read_entries(&filter, request.project.as_deref(), request.limit)
        .context("Failed to read Secret Manager audit logs")?;

    let matched = filter_records(entries, &request.criteria);
    render(&matched, &request.criteria, request.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = AuditLogRequest::new(FilterCriteria::new());
        assert_eq!(request.limit, Some(DEFAULT_LIMIT));
        assert_eq!(request.project, None);
        assert_eq!(request.service_name, SECRET_MANAGER_SERVICE);
    }

    #[test]
    fn test_limit_is_at_least_one() {
        let request = AuditLogRequest::new(FilterCriteria::new()).with_limit(0);
        assert_eq!(request.limit, Some(1));
    }
}

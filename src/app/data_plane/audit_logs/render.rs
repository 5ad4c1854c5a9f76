//! Rendering of filtered audit entries
//!
//! `table` is meant for people: a header naming the active filters, one row per entry
//! and a total. `json` and `yaml` print the entries exactly as received so they can be
//! piped into other tools.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};

use super::filter::FilterCriteria;
use super::types::AuditLogEntry;

/// Paths longer than this are shortened to their last two segments
pub const MAX_PATH_WIDTH: usize = 60;

/// Shown in place of an empty principal
pub const SYSTEM_PRINCIPAL: &str = "system";

/// Printed after an empty result
pub const VISIBILITY_HINT: &str = "Note: audit log entries can take a few minutes to appear, \
and secret access events are only recorded when Data Access audit logs are enabled for Secret Manager.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Render entries in the requested format
pub fn render(entries: &[AuditLogEntry], criteria: &FilterCriteria, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(entries, criteria)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(entries).context("Failed to serialize audit entries as JSON")
        }
        OutputFormat::Yaml => serde_yaml::to_string(entries)
            .map(|yaml| yaml.trim_end().to_string())
            .context("Failed to serialize audit entries as YAML"),
    }
}

/// Human-readable phrases for the active filters, in display order
pub fn describe_filters(criteria: &FilterCriteria) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(fragment) = &criteria.resource_fragment {
        parts.push(format!("resource matching '{}'", fragment));
    }
    if let Some(fragment) = &criteria.principal_fragment {
        parts.push(format!("principal matching '{}'", fragment));
    }
    if !criteria.operations.is_empty() {
        parts.push(format!("operations '{}'", criteria.operations));
    }
    parts
}

fn header_line(criteria: &FilterCriteria) -> String {
    let filters = describe_filters(criteria);
    if filters.is_empty() {
        format!("Secret Manager audit log entries (last {} days):", criteria.days)
    } else {
        format!(
            "Secret Manager audit log entries for {} (last {} days):",
            filters.join(" and "),
            criteria.days
        )
    }
}

/// Message shown when nothing matched
pub fn empty_message(criteria: &FilterCriteria) -> String {
    let filters = describe_filters(criteria);
    if filters.is_empty() {
        format!("No audit log entries found in the last {} days.", criteria.days)
    } else {
        format!(
            "No audit log entries found for {} in the last {} days.",
            filters.join(" and "),
            criteria.days
        )
    }
}

/// Bound the width of the resource column.
///
/// Long paths keep only their last two segments, e.g.
/// `.../versions/12` for a long version path.
pub fn shorten_path(path: &str) -> String {
    if path.chars().count() <= MAX_PATH_WIDTH {
        return path.to_string();
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., parent, last] => format!(".../{}/{}", parent, last),
        _ => path.to_string(),
    }
}

fn table_row(timestamp: &str, operation: &str, principal: &str, resource: &str) -> String {
    format!("{:<19}  {:<15}  {:<30}  {}", timestamp, operation, principal, resource)
        .trim_end()
        .to_string()
}

fn total_line(count: usize) -> String {
    match count {
        1 => "Total: 1 entry".to_string(),
        n => format!("Total: {} entries", n),
    }
}

fn render_table(entries: &[AuditLogEntry], criteria: &FilterCriteria) -> String {
    if entries.is_empty() {
        return format!("{}\n{}", empty_message(criteria), VISIBILITY_HINT);
    }

    let mut lines = vec![
        header_line(criteria),
        String::new(),
        table_row("TIMESTAMP", "OPERATION", "PRINCIPAL", "RESOURCE"),
    ];

    for entry in entries {
        let principal = match entry.principal() {
            "" => SYSTEM_PRINCIPAL,
            principal => principal,
        };
        let resource = entry
            .primary_path()
            .map(shorten_path)
            .unwrap_or_else(|| "-".to_string());
        lines.push(table_row(
            &entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            entry.operation().as_str(),
            principal,
            &resource,
        ));
    }

    lines.push(String::new());
    lines.push(total_line(entries.len()));
    lines.join("\n")
}

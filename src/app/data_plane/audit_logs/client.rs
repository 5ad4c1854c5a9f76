//! Log source for Secret Manager audit entries
//!
//! [`LogSource`] is the seam between the engine and the log store. The production
//! implementation, [`GcloudLogSource`], shells out to `gcloud logging read`, which takes
//! care of authentication and transport.

#![warn(clippy::all, rust_2018_idioms)]

use std::process::Command;
use std::time::Instant;

use super::error::AuditLogError;
use super::types::AuditLogEntry;

/// Something that can answer a log filter with audit entries
pub trait LogSource {
    /// Run one query.
    ///
    /// # Arguments
    /// * `filter` - Cloud Logging filter expression
    /// * `scope` - Project to read from (`None` uses the caller's default project)
    /// * `limit` - Maximum number of entries to return
    fn read_entries(
        &self,
        filter: &str,
        scope: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<AuditLogEntry>, AuditLogError>;
}

/// Reads audit entries through the `gcloud` command-line tool
#[derive(Debug, Clone)]
pub struct GcloudLogSource {
    program: String,
}

impl GcloudLogSource {
    /// Use `gcloud` from `PATH`
    pub fn new() -> Self {
        Self::with_program("gcloud")
    }

    /// Use a specific `gcloud` binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the program for one query
    pub fn command_args(filter: &str, scope: Option<&str>, limit: Option<u32>) -> Vec<String> {
        let mut args = vec![
            "logging".to_string(),
            "read".to_string(),
            filter.to_string(),
            "--format=json".to_string(),
        ];
        if let Some(project) = scope {
            args.push(format!("--project={}", project));
        }
        if let Some(limit) = limit {
            args.push(format!("--limit={}", limit));
        }
        args
    }
}

impl Default for GcloudLogSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSource for GcloudLogSource {
    fn read_entries(
        &self,
        filter: &str,
        scope: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<AuditLogEntry>, AuditLogError> {
        let args = Self::command_args(filter, scope, limit);
        log::debug!("[gcloud] {} {}", self.program, args.join(" "));

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| AuditLogError::Launch {
                program: self.program.clone(),
                source,
            })?;
        let duration_ms = start.elapsed().as_millis();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("[gcloud] Query failed after {}ms: {}", duration_ms, stderr);
            return Err(AuditLogError::QueryFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let entries = parse_entries(&output.stdout)?;
        log::info!(
            "[gcloud] Response: {}ms, {} bytes, {} entries",
            duration_ms,
            output.stdout.len(),
            entries.len()
        );
        Ok(entries)
    }
}

/// Parse the JSON array printed by `gcloud logging read --format=json`.
///
/// gcloud prints nothing at all when no entry matches, so blank output is an empty list.
pub fn parse_entries(stdout: &[u8]) -> Result<Vec<AuditLogEntry>, AuditLogError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(stdout).map_err(|source| AuditLogError::MalformedResponse { source })
}

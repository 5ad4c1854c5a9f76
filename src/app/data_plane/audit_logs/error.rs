//! Errors raised while reading audit logs

#![warn(clippy::all, rust_2018_idioms)]

/// Failure of a log source query.
///
/// `Launch` and `QueryFailed` mean the store could not be queried; `MalformedResponse`
/// means it answered with something that is not a list of audit entries.
#[derive(Debug, thiserror::Error)]
pub enum AuditLogError {
    #[error("failed to run '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("log query failed ({status}): {stderr}")]
    QueryFailed { status: String, stderr: String },

    #[error("log query returned an unexpected response")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },
}

impl AuditLogError {
    /// True when the store could not be queried at all
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            AuditLogError::Launch { .. } | AuditLogError::QueryFailed { .. }
        )
    }
}

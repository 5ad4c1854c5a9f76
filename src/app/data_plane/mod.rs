//! Data Plane Services Module
//!
//! This module contains log store integrations. Data plane services query data that
//! cloud services record about themselves, as opposed to managing the resources.
//!
//! ## Available Services
//!
//! - **Secret Manager Audit Logs**: who accessed, created, changed or deleted which
//!   secret, read from Cloud Audit Logs
//!
//! ## Architecture
//!
//! Each service follows the same layering:
//!
//! ```text
//! 1. Query layer (src/app/data_plane/{service}/query.rs)
//!    └─ Store-side filter expression
//!
//! 2. Client layer (src/app/data_plane/{service}/client.rs)
//!    └─ Runs the query against the store
//!
//! 3. Classification and filtering
//!    └─ Exact client-side semantics
//!
//! 4. Rendering
//!    └─ Table for people, JSON/YAML for tools
//! ```

pub mod audit_logs;

// Re-export commonly used types
pub use audit_logs::{
    run_audit_query, AuditLogEntry, AuditLogRequest, GcloudLogSource, LogSource,
};

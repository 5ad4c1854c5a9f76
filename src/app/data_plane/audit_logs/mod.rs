//! Secret Manager Audit Logs Module
//!
//! Queries Cloud Audit Logs for Secret Manager activity, keeps the entries that are
//! really about secrets, and renders them.
//!
//! ## Architecture
//!
//! ```text
//! FilterCriteria → AuditQuery (store-side filter) → LogSource (gcloud logging read)
//!                                                        ↓
//!               render ← filter_records (relevance + exact matching)
//! ```
//!
//! ## Why filter twice?
//!
//! The store's `:` operator is only a coarse substring test, and location listings are
//! logged under the same method as secret listings. The store-side filter narrows the
//! download; [`filter::filter_records`] decides what is shown.
//!
//! ## Usage Example
//!
//! ```no_run
//! use secretaudit::app::data_plane::audit_logs::{
//!     run_audit_query, AuditLogRequest, FilterCriteria, GcloudLogSource, OperationSet,
//! };
//!
//! let criteria = FilterCriteria::new()
//!     .with_resource_fragment("db-password")
//!     .with_operations(OperationSet::parse("ACCESS"));
//! let request = AuditLogRequest::new(criteria).with_project("my-project");
//!
//! let output = run_audit_query(&GcloudLogSource::new(), &request)?;
//! println!("{}", output);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Visibility
//!
//! Entries may take a few minutes to show up, and `ACCESS` events are only logged when
//! Data Access audit logs are enabled for Secret Manager.

#![warn(clippy::all, rust_2018_idioms)]

pub mod client;
pub mod engine;
pub mod error;
pub mod filter;
pub mod operations;
pub mod path_shape;
pub mod query;
pub mod relevance;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use client::{GcloudLogSource, LogSource};
pub use engine::{run_audit_query, AuditLogRequest, DEFAULT_LIMIT};
pub use error::AuditLogError;
pub use filter::{filter_records, FilterCriteria, DEFAULT_DAYS};
pub use operations::{normalize, NormalizedOperation, OperationKind, OperationSet};
pub use query::AuditQuery;
pub use relevance::is_relevant;
pub use render::{render, OutputFormat};
pub use types::AuditLogEntry;

//! secretaudit - Secret Manager audit log explorer
//!
//! Answers "who did what to which secret, and when" from Cloud Audit Logs. A query takes
//! loosely specified criteria (part of a secret name, part of a principal, a set of
//! operations, a day window), reads matching entries through `gcloud logging read`,
//! drops entries that are not really about secrets, and prints the rest as a table or
//! as JSON/YAML.
//!
//! # Architecture Overview
//!
//! - **Configuration** ([`app::config`]): optional YAML file with defaults for the CLI
//! - **Data Plane** ([`app::data_plane`]): log store integrations
//!   - [`app::data_plane::audit_logs`]: query building, relevance classification,
//!     post-filtering and rendering of Secret Manager audit entries
//!
//! The command-line entry point lives in `src/main.rs`; everything it does is reachable
//! through [`app::data_plane::audit_logs::run_audit_query`].

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;

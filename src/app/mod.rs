//! Core modules for secretaudit.
//!
//! # Module Organization
//!
//! - [`config`] - YAML configuration with defaults for the command line
//! - [`data_plane`] - Queries against log stores (Cloud Audit Logs)

pub mod config;
pub mod data_plane;

#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;

use secretaudit::app::config::EngineConfig;
use secretaudit::app::data_plane::audit_logs::filter::MAX_DAYS;
use secretaudit::app::data_plane::audit_logs::{
    run_audit_query, AuditLogRequest, FilterCriteria, GcloudLogSource, OperationSet, OutputFormat,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_BRANCH"),
    " ",
    env!("GIT_COMMIT"),
    ")"
);

/// Show Secret Manager audit log entries
#[derive(Parser, Debug)]
#[command(name = "secretaudit", version, long_version = LONG_VERSION, long_about = None)]
struct Cli {
    /// Secret name, or part of one, to show entries for
    secret: Option<String>,

    /// Number of days to look back
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAYS)))]
    days: Option<u32>,

    /// Maximum number of entries to fetch from Cloud Logging
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    limit: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Only show entries whose principal contains this text
    #[arg(short, long)]
    user: Option<String>,

    /// Comma-separated operations to show (ACCESS, CREATE, UPDATE, DELETE, GET_METADATA,
    /// LIST, UPDATE_METADATA, DESTROY_VERSION, DISABLE_VERSION, ENABLE_VERSION)
    #[arg(short, long)]
    operations: Option<String>,

    /// Project to read audit logs from
    #[arg(short, long)]
    project: Option<String>,

    /// Config file (defaults to $SECRETAUDIT_CONFIG or the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging() -> Result<()> {
    // Quiet by default; RUST_LOG=secretaudit=debug shows queries and filter counts
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::builder().parse("secretaudit=warn"))
        .context("Failed to parse log filter")?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // Bridge log crate events (gcloud client) to tracing
    tracing_log::LogTracer::init().context("Failed to initialize log-to-tracing bridge")?;

    Ok(())
}

fn build_request(cli: Cli, config: &EngineConfig) -> AuditLogRequest {
    let mut criteria = FilterCriteria::new().with_days(cli.days.unwrap_or(config.default_days));
    if let Some(secret) = cli.secret {
        criteria = criteria.with_resource_fragment(secret);
    }
    if let Some(user) = cli.user {
        criteria = criteria.with_principal_fragment(user);
    }
    if let Some(operations) = cli.operations.as_deref() {
        criteria = criteria.with_operations(OperationSet::parse(operations));
    }

    let mut request = AuditLogRequest::new(criteria)
        .with_limit(cli.limit.unwrap_or(config.default_limit))
        .with_format(cli.format)
        .with_service_name(config.service_name.clone());
    if let Some(project) = cli.project.or_else(|| config.project.clone()) {
        request = request.with_project(project);
    }
    request
}

fn run(cli: Cli) -> Result<String> {
    let config = EngineConfig::load(cli.config.as_deref())?;
    let source = GcloudLogSource::with_program(config.gcloud_binary.clone());
    let request = build_request(cli, &config);
    run_audit_query(&source, &request)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Warning: {:#}", e);
    }
    tracing::debug!("secretaudit {} starting: {:?}", LONG_VERSION, cli);

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_come_from_config() {
        let cli = Cli::parse_from(["secretaudit"]);
        let config = EngineConfig {
            default_days: 14,
            default_limit: 75,
            project: Some("from-config".to_string()),
            ..EngineConfig::default()
        };

        let request = build_request(cli, &config);
        assert_eq!(request.criteria.days, 14);
        assert_eq!(request.limit, Some(75));
        assert_eq!(request.project.as_deref(), Some("from-config"));
        assert_eq!(request.format, OutputFormat::Table);
        assert!(!request.criteria.has_filters());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "secretaudit",
            "db-password",
            "--days",
            "30",
            "--limit",
            "10",
            "--format",
            "json",
            "--user",
            "alice",
            "--operations",
            "access, bogus",
            "--project",
            "demo",
        ]);

        let request = build_request(cli, &EngineConfig::default());
        assert_eq!(request.criteria.resource_fragment.as_deref(), Some("db-password"));
        assert_eq!(request.criteria.principal_fragment.as_deref(), Some("alice"));
        assert_eq!(request.criteria.operations.to_string(), "ACCESS");
        assert_eq!(request.criteria.days, 30);
        assert_eq!(request.limit, Some(10));
        assert_eq!(request.format, OutputFormat::Json);
        assert_eq!(request.project.as_deref(), Some("demo"));
    }

    #[test]
    fn test_zero_days_is_rejected() {
        assert!(Cli::try_parse_from(["secretaudit", "--days", "0"]).is_err());
    }

    #[test]
    fn test_days_beyond_retention_are_rejected() {
        assert!(Cli::try_parse_from(["secretaudit", "--days", "3650"]).is_ok());
        assert!(Cli::try_parse_from(["secretaudit", "--days", "3651"]).is_err());
        assert!(Cli::try_parse_from(["secretaudit", "--days", "4294967295"]).is_err());
    }
}

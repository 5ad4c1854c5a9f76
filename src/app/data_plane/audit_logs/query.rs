//! Cloud Logging filter expression builder
//!
//! Produces the coarse, store-side filter handed to `gcloud logging read`. The store's
//! `:` operator is a substring match whose exact semantics (case, path segmentation)
//! we do not rely on; [`super::filter`] re-checks everything on the client.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use super::filter::{FilterCriteria, DEFAULT_DAYS, MAX_DAYS};

/// Service name Secret Manager audit entries are logged under
pub const SECRET_MANAGER_SERVICE: &str = "secretmanager.googleapis.com";

/// Fields that may hold the secret path, depending on the method
pub const RESOURCE_PATH_FIELDS: [&str; 3] = [
    "protoPayload.resourceName",
    "protoPayload.request.name",
    "protoPayload.response.name",
];

pub const PRINCIPAL_FIELD: &str = "protoPayload.authenticationInfo.principalEmail";

/// Options for building a log filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    /// Service the query is scoped to
    pub service_name: String,

    /// Days before now covered by the query
    pub days: u32,

    pub resource_fragment: Option<String>,

    pub principal_fragment: Option<String>,
}

impl AuditQuery {
    pub fn new(days: u32) -> Self {
        Self {
            service_name: SECRET_MANAGER_SERVICE.to_string(),
            days: days.clamp(1, MAX_DAYS),
            resource_fragment: None,
            principal_fragment: None,
        }
    }

    /// Query matching the store-side part of the given criteria
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            resource_fragment: criteria.resource_fragment.clone(),
            principal_fragment: criteria.principal_fragment.clone(),
            ..Self::new(criteria.days)
        }
    }

    /// Builder pattern: scope to another service name
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Builder pattern: require the fragment in one of the path fields
    pub fn with_resource_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.resource_fragment = Some(fragment.into());
        self
    }

    /// Builder pattern: require the fragment in the principal email
    pub fn with_principal_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.principal_fragment = Some(fragment.into());
        self
    }

    /// Lower time bound relative to `now`, saturating at the earliest representable time
    pub fn start_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Filter expression relative to the current time
    pub fn filter_expression(&self) -> String {
        self.filter_expression_at(Utc::now())
    }

    /// Filter expression relative to `now`
    ///
    /// # Example
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use secretaudit::app::data_plane::audit_logs::query::AuditQuery;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
    /// let filter = AuditQuery::new(7)
    ///     .with_principal_fragment("alice")
    ///     .filter_expression_at(now);
    ///
    /// assert_eq!(
    ///     filter,
    ///     "protoPayload.serviceName=\"secretmanager.googleapis.com\" \
    ///      AND timestamp>=\"2026-10-10T09:00:00Z\" \
    ///      AND protoPayload.authenticationInfo.principalEmail:\"alice\""
    /// );
    /// ```
    pub fn filter_expression_at(&self, now: DateTime<Utc>) -> String {
        let start = self
            .start_time(now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut clauses = vec![
            format!("protoPayload.serviceName={}", quote(&self.service_name)),
            format!("timestamp>={}", quote(&start)),
        ];

        if let Some(fragment) = &self.resource_fragment {
            let alternatives: Vec<String> = RESOURCE_PATH_FIELDS
                .iter()
                .map(|field| format!("{}:{}", field, quote(fragment)))
                .collect();
            clauses.push(format!("({})", alternatives.join(" OR ")));
        }

        if let Some(fragment) = &self.principal_fragment {
            clauses.push(format!("{}:{}", PRINCIPAL_FIELD, quote(fragment)));
        }

        clauses.join(" AND ")
    }
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS)
    }
}

/// Quote a value for the logging query language
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

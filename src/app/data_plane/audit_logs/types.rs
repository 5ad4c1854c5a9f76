//! Data types for Secret Manager audit log entries
//!
//! The structs mirror the JSON that `gcloud logging read --format=json` prints for
//! Cloud Audit Logs. Only the fields the engine inspects are typed; everything else
//! is carried in `extra` maps so that structured output reproduces the entry as it
//! was received.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::operations::{normalize, NormalizedOperation};

/// Authentication context of an audit entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfo {
    /// Identity that performed the call (user or service account email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_email: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request or response message embedded in the audit payload.
///
/// Secret Manager puts the secret (or version) name in `name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `protoPayload` of an audit entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPayload {
    /// Service-qualified method name, e.g.
    /// `google.cloud.secretmanager.v1.SecretManagerService.AccessSecretVersion`
    #[serde(default)]
    pub method_name: String,

    /// Resource the call acted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_info: Option<AuthenticationInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<NamedMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<NamedMessage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One audit event as reported by Cloud Logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub proto_payload: AuditPayload,

    /// Remaining top-level fields (insertId, logName, severity, resource, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl AuditLogEntry {
    /// Create an entry with the given timestamp and method name and nothing else
    pub fn new(timestamp: DateTime<Utc>, method_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            proto_payload: AuditPayload {
                method_name: method_name.into(),
                ..AuditPayload::default()
            },
            extra: Map::new(),
        }
    }

    /// Builder pattern: set the principal email
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.proto_payload
            .authentication_info
            .get_or_insert_with(AuthenticationInfo::default)
            .principal_email = Some(principal.into());
        self
    }

    /// Builder pattern: set `protoPayload.resourceName`
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.proto_payload.resource_name = Some(name.into());
        self
    }

    /// Builder pattern: set `protoPayload.request.name`
    pub fn with_request_name(mut self, name: impl Into<String>) -> Self {
        self.proto_payload
            .request
            .get_or_insert_with(NamedMessage::default)
            .name = Some(name.into());
        self
    }

    /// Builder pattern: set `protoPayload.response.name`
    pub fn with_response_name(mut self, name: impl Into<String>) -> Self {
        self.proto_payload
            .response
            .get_or_insert_with(NamedMessage::default)
            .name = Some(name.into());
        self
    }

    pub fn method_name(&self) -> &str {
        &self.proto_payload.method_name
    }

    /// Principal email, or an empty string for system-initiated events
    pub fn principal(&self) -> &str {
        self.proto_payload
            .authentication_info
            .as_ref()
            .and_then(|info| non_empty(info.principal_email.as_ref()))
            .unwrap_or("")
    }

    pub fn resource_name(&self) -> Option<&str> {
        non_empty(self.proto_payload.resource_name.as_ref())
    }

    pub fn request_name(&self) -> Option<&str> {
        self.proto_payload
            .request
            .as_ref()
            .and_then(|msg| non_empty(msg.name.as_ref()))
    }

    pub fn response_name(&self) -> Option<&str> {
        self.proto_payload
            .response
            .as_ref()
            .and_then(|msg| non_empty(msg.name.as_ref()))
    }

    /// The three alternative path fields, in precedence order.
    ///
    /// Different methods populate different fields, so filters must look at all of them.
    pub fn resource_paths(&self) -> [Option<&str>; 3] {
        [
            self.resource_name(),
            self.request_name(),
            self.response_name(),
        ]
    }

    /// First non-empty path field
    pub fn primary_path(&self) -> Option<&str> {
        self.resource_paths().into_iter().flatten().next()
    }

    /// Canonical operation for this entry's method name
    pub fn operation(&self) -> NormalizedOperation {
        normalize(self.method_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ACCESS_ENTRY: &str = r#"{
        "insertId": "abc123",
        "logName": "projects/demo/logs/cloudaudit.googleapis.com%2Fdata_access",
        "timestamp": "2026-10-01T12:30:45.123456Z",
        "protoPayload": {
            "@type": "type.googleapis.com/google.cloud.audit.AuditLog",
            "serviceName": "secretmanager.googleapis.com",
            "methodName": "google.cloud.secretmanager.v1.SecretManagerService.AccessSecretVersion",
            "resourceName": "projects/123/secrets/db-password/versions/3",
            "authenticationInfo": { "principalEmail": "dev@example.com" },
            "request": {
                "@type": "type.googleapis.com/google.cloud.secretmanager.v1.AccessSecretVersionRequest",
                "name": "projects/demo/secrets/db-password/versions/latest"
            }
        }
    }"#;

    #[test]
    fn test_deserialize_access_entry() {
        let entry: AuditLogEntry = serde_json::from_str(ACCESS_ENTRY).unwrap();

        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2026, 10, 1, 12, 30, 45).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
        assert_eq!(entry.principal(), "dev@example.com");
        assert_eq!(
            entry.resource_name(),
            Some("projects/123/secrets/db-password/versions/3")
        );
        assert_eq!(
            entry.request_name(),
            Some("projects/demo/secrets/db-password/versions/latest")
        );
        assert_eq!(entry.response_name(), None);
        assert_eq!(entry.extra["insertId"], "abc123");
        assert_eq!(
            entry.proto_payload.extra["serviceName"],
            "secretmanager.googleapis.com"
        );
    }

    #[test]
    fn test_serialization_keeps_unknown_fields() {
        let entry: AuditLogEntry = serde_json::from_str(ACCESS_ENTRY).unwrap();
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["insertId"], "abc123");
        assert_eq!(value["protoPayload"]["@type"], "type.googleapis.com/google.cloud.audit.AuditLog");
        assert_eq!(
            value["protoPayload"]["request"]["@type"],
            "type.googleapis.com/google.cloud.secretmanager.v1.AccessSecretVersionRequest"
        );
        assert_eq!(
            value["protoPayload"]["authenticationInfo"]["principalEmail"],
            "dev@example.com"
        );
    }

    #[test]
    fn test_missing_principal_is_empty() {
        let entry: AuditLogEntry = serde_json::from_str(
            r#"{"timestamp": "2026-10-01T00:00:00Z", "protoPayload": {"methodName": "X"}}"#,
        )
        .unwrap();

        assert_eq!(entry.principal(), "");
        assert_eq!(entry.primary_path(), None);
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let result = serde_json::from_str::<AuditLogEntry>(r#"{"protoPayload": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_paths_are_skipped() {
        let entry = AuditLogEntry::new(Utc::now(), "ListSecrets")
            .with_resource_name("")
            .with_response_name("projects/p/secrets/s");

        assert_eq!(entry.resource_paths(), [None, None, Some("projects/p/secrets/s")]);
        assert_eq!(entry.primary_path(), Some("projects/p/secrets/s"));
    }
}

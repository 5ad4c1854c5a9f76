//! Relevance classification
//!
//! Cloud Logging reports more than secret activity under the Secret Manager service:
//! location enumeration and other administrative calls show up too. [`is_relevant`]
//! decides whether an entry is about secrets at all. It runs before any user filter
//! and is not configurable.

#![warn(clippy::all, rust_2018_idioms)]

use super::operations::{NormalizedOperation, OperationKind};
use super::path_shape::{classify, PathShape};
use super::types::AuditLogEntry;

/// True when the entry describes an action on secrets
pub fn is_relevant(entry: &AuditLogEntry) -> bool {
    match entry.operation() {
        NormalizedOperation::Known(OperationKind::List) => is_relevant_listing(entry),
        // Every other rule names a secret-scoped action
        NormalizedOperation::Known(_) => true,
        NormalizedOperation::Other(_) => false,
    }
}

/// Listing calls share one method name for "list secrets" and "list locations".
fn is_relevant_listing(entry: &AuditLogEntry) -> bool {
    let touches_secret = entry
        .resource_paths()
        .into_iter()
        .flatten()
        .any(|path| classify(path) == PathShape::ResourceInstance);
    if touches_secret {
        return true;
    }

    // Heuristic: a bare project path counts as a secret listing even though the
    // path alone cannot prove it.
    match entry.primary_path().map(classify) {
        Some(PathShape::SubScope) => false,
        Some(PathShape::Root) | Some(PathShape::ResourceInstance) => true,
        Some(PathShape::Empty) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SERVICE: &str = "google.cloud.secretmanager.v1.SecretManagerService";

    fn entry(method: &str) -> AuditLogEntry {
        AuditLogEntry::new(Utc::now(), format!("{}.{}", SERVICE, method))
    }

    #[test]
    fn test_explicit_actions_are_always_relevant() {
        for method in [
            "AccessSecretVersion",
            "CreateSecret",
            "AddSecretVersion",
            "DeleteSecret",
            "GetSecret",
            "UpdateSecret",
            "DestroySecretVersion",
            "DisableSecretVersion",
            "EnableSecretVersion",
        ] {
            assert!(is_relevant(&entry(method)), "{}", method);
        }
    }

    #[test]
    fn test_create_is_relevant_regardless_of_paths() {
        assert!(is_relevant(&entry("CreateSecret")));
        assert!(is_relevant(
            &entry("CreateSecret").with_resource_name("projects/p/locations/us-east1")
        ));
    }

    #[test]
    fn test_location_listing_is_noise() {
        let listing = entry("ListSecrets").with_resource_name("projects/p/locations/us-central1");
        assert!(!is_relevant(&listing));
    }

    #[test]
    fn test_listing_with_secret_segment_is_relevant() {
        assert!(is_relevant(
            &entry("ListSecrets").with_resource_name("projects/p/secrets/my-secret")
        ));
        // The secret may only appear in the response
        assert!(is_relevant(
            &entry("ListSecrets")
                .with_resource_name("projects/p/locations/us-central1")
                .with_response_name("projects/p/secrets/my-secret")
        ));
    }

    #[test]
    fn test_project_level_listing_is_relevant() {
        // Known heuristic boundary: any non-location path without a secret segment
        // is taken as a project-level secret listing.
        assert!(is_relevant(&entry("ListSecrets").with_resource_name("projects/my-project")));
        assert!(is_relevant(&entry("ListSecrets").with_resource_name("organizations/42")));
    }

    #[test]
    fn test_listing_falls_back_to_request_name() {
        // resourceName absent or empty: the first non-empty path field decides
        let root = entry("ListSecrets")
            .with_resource_name("")
            .with_request_name("projects/p");
        assert!(is_relevant(&root));

        let location = entry("ListSecrets").with_request_name("projects/p/locations/europe-west1");
        assert!(!is_relevant(&location));

        // An empty resourceName does not mask a location in request.name
        let masked = entry("ListSecrets")
            .with_resource_name("")
            .with_request_name("projects/p/locations/us-east1")
            .with_response_name("projects/p");
        assert!(!is_relevant(&masked));
    }

    #[test]
    fn test_listing_without_paths_is_not_relevant() {
        assert!(!is_relevant(&entry("ListSecrets")));
        assert!(!is_relevant(&entry("ListSecrets").with_resource_name("")));
    }

    #[test]
    fn test_unrelated_methods_are_not_relevant() {
        assert!(!is_relevant(
            &AuditLogEntry::new(Utc::now(), "google.cloud.location.Locations.ListLocations")
                .with_resource_name("projects/p/secrets/my-secret")
        ));
        assert!(!is_relevant(&entry("ListSecretVersions")));
    }
}

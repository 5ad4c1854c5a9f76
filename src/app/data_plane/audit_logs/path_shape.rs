//! Shape classification for Secret Manager resource paths
//!
//! Resource paths look like `projects/p/secrets/name/versions/3`,
//! `projects/p/locations/us-central1` or plain `projects/p`. Callers only need to know
//! which of those families a path belongs to.

#![warn(clippy::all, rust_2018_idioms)]

/// Collection segment that precedes a secret name
pub const SECRET_COLLECTION: &str = "secrets";

/// Collection segment of a location (sub-scope) container
pub const LOCATION_COLLECTION: &str = "locations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// No path at all
    Empty,
    /// Names a secret (or something below one, such as a version)
    ResourceInstance,
    /// Names a location container and nothing below it
    SubScope,
    /// Any other non-empty path, typically a bare project
    Root,
}

/// Classify a resource path by its segments
pub fn classify(path: &str) -> PathShape {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        PathShape::Empty
    } else if segments
        .windows(2)
        .any(|pair| pair[0] == SECRET_COLLECTION)
    {
        PathShape::ResourceInstance
    } else if segments.contains(&LOCATION_COLLECTION) {
        PathShape::SubScope
    } else {
        PathShape::Root
    }
}

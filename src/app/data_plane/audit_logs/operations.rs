//! Operation taxonomy for Secret Manager audit events
//!
//! Raw method names such as
//! `google.cloud.secretmanager.v1.SecretManagerService.AccessSecretVersion` are mapped
//! onto a small closed set of [`OperationKind`]s through [`OPERATION_RULES`], an ordered
//! table evaluated top to bottom where the first matching sub-token wins. Method names
//! that match no rule fall back to their last dot-separated segment.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical Secret Manager operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Read a secret version's payload
    Access,
    /// Create a secret
    Create,
    /// Add a new secret version (new secret value)
    Update,
    /// Delete a secret
    Delete,
    /// Read secret or version metadata
    GetMetadata,
    /// Enumerate secrets
    List,
    /// Change secret metadata (labels, replication, rotation, ...)
    UpdateMetadata,
    DestroyVersion,
    DisableVersion,
    EnableVersion,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Access,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
        OperationKind::GetMetadata,
        OperationKind::List,
        OperationKind::UpdateMetadata,
        OperationKind::DestroyVersion,
        OperationKind::DisableVersion,
        OperationKind::EnableVersion,
    ];

    /// Canonical upper-case name, as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Access => "ACCESS",
            OperationKind::Create => "CREATE",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
            OperationKind::GetMetadata => "GET_METADATA",
            OperationKind::List => "LIST",
            OperationKind::UpdateMetadata => "UPDATE_METADATA",
            OperationKind::DestroyVersion => "DESTROY_VERSION",
            OperationKind::DisableVersion => "DISABLE_VERSION",
            OperationKind::EnableVersion => "ENABLE_VERSION",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation name outside the closed taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownOperation(s.trim().to_string()))
    }
}

/// Ordered method-name rules. The first sub-token contained in the method name decides.
pub const OPERATION_RULES: &[(&str, OperationKind)] = &[
    ("AccessSecretVersion", OperationKind::Access),
    ("CreateSecret", OperationKind::Create),
    ("AddSecretVersion", OperationKind::Update),
    ("DeleteSecret", OperationKind::Delete),
    ("GetSecret", OperationKind::GetMetadata),
    ("ListSecrets", OperationKind::List),
    ("UpdateSecret", OperationKind::UpdateMetadata),
    ("DestroySecretVersion", OperationKind::DestroyVersion),
    ("DisableSecretVersion", OperationKind::DisableVersion),
    ("EnableSecretVersion", OperationKind::EnableVersion),
];

/// Result of normalizing a method name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedOperation {
    Known(OperationKind),
    /// No rule matched; holds the last dot-separated segment of the method name
    Other(String),
}

impl NormalizedOperation {
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            NormalizedOperation::Known(kind) => Some(*kind),
            NormalizedOperation::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NormalizedOperation::Known(kind) => kind.as_str(),
            NormalizedOperation::Other(name) => name,
        }
    }
}

impl fmt::Display for NormalizedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw method name onto the operation taxonomy.
///
/// # Example
/// ```
/// use secretaudit::app::data_plane::audit_logs::operations::{normalize, NormalizedOperation, OperationKind};
///
/// assert_eq!(
///     normalize("google.cloud.secretmanager.v1.SecretManagerService.AddSecretVersion"),
///     NormalizedOperation::Known(OperationKind::Update)
/// );
/// assert_eq!(
///     normalize("google.cloud.other.v1.Service.UnknownMethod"),
///     NormalizedOperation::Other("UnknownMethod".to_string())
/// );
/// ```
pub fn normalize(method_name: &str) -> NormalizedOperation {
    OPERATION_RULES
        .iter()
        .find(|(token, _)| method_name.contains(token))
        .map(|(_, kind)| NormalizedOperation::Known(*kind))
        .unwrap_or_else(|| NormalizedOperation::Other(last_segment(method_name).to_string()))
}

fn last_segment(method_name: &str) -> &str {
    method_name.rsplit('.').next().unwrap_or(method_name)
}

/// Operations requested on the command line.
///
/// Keeps first-seen order and holds no duplicates. Parsing is lenient: unknown names are
/// dropped instead of failing the command, so a typo narrows the result rather than
/// aborting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSet {
    kinds: Vec<OperationKind>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"access, create"`
    pub fn parse(list: &str) -> Self {
        let mut set = Self::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.parse::<OperationKind>() {
                Ok(kind) => {
                    set.insert(kind);
                }
                Err(err) => tracing::debug!("Ignoring operation filter entry: {}", err),
            }
        }
        set
    }

    /// Add a kind; returns false if it was already present
    pub fn insert(&mut self, kind: OperationKind) -> bool {
        if self.kinds.contains(&kind) {
            return false;
        }
        self.kinds.push(kind);
        true
    }

    /// Membership test for a normalized operation. Fallback operations never match.
    pub fn contains(&self, operation: &NormalizedOperation) -> bool {
        operation
            .kind()
            .is_some_and(|kind| self.kinds.contains(&kind))
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<OperationKind> for OperationSet {
    fn from_iter<I: IntoIterator<Item = OperationKind>>(iter: I) -> Self {
        let mut set = Self::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Display for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds.iter().map(OperationKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}

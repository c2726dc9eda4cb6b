//! Manifest parsing and validation
//!
//! The manifest (`vendor/manifest` by default) is a JSON document listing
//! the pinned dependencies of a project:
//!
//! ```json
//! {
//!   "dependencies": [
//!     {
//!       "importpath": "example.org/pkg/foo",
//!       "repository": "https://example.org/pkg/foo.git",
//!       "vcs": "git",
//!       "revision": "4d326cba938df15c2be0009bd974b395fdfb7163"
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("open manifest {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode manifest {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a manifest entry was rejected.
///
/// Invalid entries are skipped; they never abort a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("unsupported VCS ({0})")]
    UnsupportedVcs(String),

    #[error("import path escapes the vendor root: {0}")]
    UnsafeImportPath(String),
}

/// Version-control system managing a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
}

impl VcsKind {
    /// Parse the manifest's `vcs` value. Absent or empty means git.
    pub fn from_manifest(value: Option<&str>) -> Result<Self, DescriptorError> {
        match value {
            None | Some("") | Some("git") => Ok(VcsKind::Git),
            Some(other) => Err(DescriptorError::UnsupportedVcs(other.to_string())),
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => write!(f, "git"),
        }
    }
}

/// One raw record of the manifest, as written.
///
/// Every field is optional here; `validate` decides whether the entry is
/// usable. `null` and absent fields are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(
        default,
        rename = "importpath",
        alias = "importPath",
        skip_serializing_if = "Option::is_none"
    )]
    pub import_path: Option<String>,

    #[serde(default, alias = "repositoryURL", skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, alias = "vcsKind", skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ManifestEntry {
    /// Best-effort label for log lines, even for incomplete entries
    pub fn label(&self) -> &str {
        non_empty(&self.import_path)
            .or_else(|| non_empty(&self.repository))
            .unwrap_or("<unnamed>")
    }

    /// Turn the raw record into a descriptor the reconciler can act on.
    ///
    /// Reports the first problem in the order import path, repository,
    /// revision, vcs.
    pub fn validate(&self) -> Result<Dependency, DescriptorError> {
        let import_path =
            non_empty(&self.import_path).ok_or(DescriptorError::MissingField("importpath"))?;
        let repository =
            non_empty(&self.repository).ok_or(DescriptorError::MissingField("repository"))?;
        let revision =
            non_empty(&self.revision).ok_or(DescriptorError::MissingField("revision"))?;
        let vcs = VcsKind::from_manifest(self.vcs.as_deref())?;

        let mut segments = import_path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .peekable();
        if segments.peek().is_none() || segments.any(|s| s == "..") {
            return Err(DescriptorError::UnsafeImportPath(import_path.to_string()));
        }

        Ok(Dependency {
            import_path: import_path.to_string(),
            repository: repository.to_string(),
            vcs,
            revision: revision.to_string(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A validated manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Hierarchical name, also the destination below the vendor root
    pub import_path: String,
    /// Remote to clone from
    pub repository: String,
    pub vcs: VcsKind,
    /// Commit hash, tag, or branch name to check out
    pub revision: String,
}

/// Parsed dependency manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Entries in manifest order
    #[serde(default)]
    pub dependencies: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest JSON
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a manifest from a file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ManifestError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

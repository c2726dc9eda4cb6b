//! Reconciliation of the vendor tree against the manifest
//!
//! Each dependency is handled on its own, in manifest order:
//!
//! ```text
//!  absent           -- clone --> checkout
//!  present, match   -- nothing
//!  present, stale   -- (fetch, unless the revision is already local) --> checkout
//! ```
//!
//! Invalid entries are skipped. Anything else that goes wrong (directory
//! creation, clone, fetch, checkout) ends the run.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::core::config::SyncConfig;
use crate::core::manifest::{Dependency, DescriptorError, ManifestEntry, ManifestError};
use crate::core::vendor_paths::destination_for;
use crate::git::{GitError, Vcs};

/// Mutating version-control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsOperation {
    Clone,
    Fetch,
    Checkout,
}

impl fmt::Display for VcsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsOperation::Clone => write!(f, "clone"),
            VcsOperation::Fetch => write!(f, "fetch"),
            VcsOperation::Checkout => write!(f, "checkout"),
        }
    }
}

/// Errors that end a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("{context}: {source}")]
    Environment {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{operation} {target}: {source}")]
    VcsOperationFailed {
        operation: VcsOperation,
        target: String,
        #[source]
        source: GitError,
    },
}

/// On-disk state of a dependency's checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocalCheckout {
    /// Destination does not exist
    Absent,
    /// HEAD is exactly the pinned revision
    Matching,
    /// Present at some other revision
    Stale {
        /// The pinned revision is already in local history
        resolvable: bool,
    },
}

impl LocalCheckout {
    /// What it takes to bring this checkout to the pinned revision
    pub fn action(self) -> Action {
        match self {
            LocalCheckout::Absent => Action::Clone,
            LocalCheckout::Matching => Action::UpToDate,
            LocalCheckout::Stale { resolvable: true } => Action::Checkout,
            LocalCheckout::Stale { resolvable: false } => Action::Fetch,
        }
    }
}

impl fmt::Display for LocalCheckout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalCheckout::Absent => write!(f, "missing"),
            LocalCheckout::Matching => write!(f, "up to date"),
            LocalCheckout::Stale { resolvable: true } => write!(f, "stale"),
            LocalCheckout::Stale { resolvable: false } => write!(f, "stale, needs fetch"),
        }
    }
}

/// What reconciling a dependency did (or, in a dry run, would do)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Clone, then checkout
    Clone,
    /// Fetch, then checkout
    Fetch,
    /// Checkout from local history
    Checkout,
    UpToDate,
}

impl Action {
    /// Past-tense description for progress lines
    pub fn done(self) -> &'static str {
        match self {
            Action::Clone => "cloned",
            Action::Fetch => "fetched and checked out",
            Action::Checkout => "checked out",
            Action::UpToDate => "up to date",
        }
    }

    /// Description for dry runs
    pub fn planned(self) -> &'static str {
        match self {
            Action::Clone => "would clone",
            Action::Fetch => "would fetch and check out",
            Action::Checkout => "would check out",
            Action::UpToDate => "up to date",
        }
    }
}

/// Progress notification, delivered as soon as an entry is handled
#[derive(Debug)]
pub enum SyncEvent<'a> {
    Skipped {
        entry: &'a ManifestEntry,
        reason: &'a DescriptorError,
    },
    Reconciled {
        dependency: &'a Dependency,
        action: Action,
    },
}

/// Counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub cloned: usize,
    pub fetched: usize,
    pub checked_out: usize,
    pub up_to_date: usize,
    pub skipped: usize,
}

impl SyncReport {
    fn record(&mut self, action: Action) {
        match action {
            Action::Clone => self.cloned += 1,
            Action::Fetch => self.fetched += 1,
            Action::Checkout => self.checked_out += 1,
            Action::UpToDate => self.up_to_date += 1,
        }
    }

    /// Dependencies that passed validation
    pub fn reconciled(&self) -> usize {
        self.cloned + self.fetched + self.checked_out + self.up_to_date
    }
}

/// Brings checkouts below the vendor root to their pinned revisions
pub struct Reconciler<V> {
    config: SyncConfig,
    vcs: V,
}

impl<V: Vcs> Reconciler<V> {
    pub fn new(config: SyncConfig, vcs: V) -> Self {
        Self { config, vcs }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Checkout directory for a dependency
    pub fn destination(&self, dependency: &Dependency) -> PathBuf {
        destination_for(&self.config.vendor_root, &dependency.import_path)
    }

    /// Classify the local checkout without changing anything.
    ///
    /// A checkout whose current revision cannot be read counts as stale.
    pub fn inspect(&self, dependency: &Dependency) -> Result<LocalCheckout, SyncError> {
        let dest = self.destination(dependency);
        match std::fs::metadata(&dest) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LocalCheckout::Absent),
            Err(source) => {
                return Err(SyncError::Environment {
                    context: format!("stat {}", dest.display()),
                    source,
                })
            }
        }

        match self.vcs.current_revision(&dest) {
            Ok(current) if current == dependency.revision => return Ok(LocalCheckout::Matching),
            Ok(current) => debug!(%current, wanted = %dependency.revision, "checkout is stale"),
            Err(e) => debug!(error = %e, "cannot read current revision"),
        }

        Ok(LocalCheckout::Stale {
            resolvable: self.vcs.has_revision(&dest, &dependency.revision),
        })
    }

    /// Bring one dependency to its pinned revision.
    ///
    /// An exact match issues no commands at all; every other path ends in a
    /// forced checkout.
    #[cfg_attr(
        feature = "telemetry",
        instrument(skip(self, dependency), fields(import_path = %dependency.import_path))
    )]
    pub fn reconcile(&self, dependency: &Dependency) -> Result<Action, SyncError> {
        let dest = self.destination(dependency);
        if !self.config.dry_run {
            ensure_parent(&dest)?;
        }

        let action = self.inspect(dependency)?.action();
        debug!(?action, dest = %dest.display(), "decided");
        if self.config.dry_run {
            return Ok(action);
        }

        match action {
            Action::UpToDate => return Ok(action),
            Action::Clone => self
                .vcs
                .clone_repo(&dependency.repository, &dest)
                .map_err(|source| vcs_failed(VcsOperation::Clone, &dependency.import_path, source))?,
            Action::Fetch => self
                .vcs
                .fetch(&dest)
                .map_err(|source| vcs_failed(VcsOperation::Fetch, &dependency.import_path, source))?,
            Action::Checkout => {}
        }

        self.vcs
            .checkout(&dest, &dependency.revision)
            .map_err(|source| {
                vcs_failed(
                    VcsOperation::Checkout,
                    &format!("{}@{}", dependency.import_path, dependency.revision),
                    source,
                )
            })?;

        Ok(action)
    }

    /// Reconcile every entry in order, skipping invalid ones.
    ///
    /// Stops at the first fatal error; `on_event` has already seen every
    /// entry handled before it.
    pub fn reconcile_all<F>(
        &self,
        entries: &[ManifestEntry],
        mut on_event: F,
    ) -> Result<SyncReport, SyncError>
    where
        F: FnMut(SyncEvent<'_>),
    {
        let mut report = SyncReport::default();

        for entry in entries {
            let dependency = match entry.validate() {
                Ok(dependency) => dependency,
                Err(reason) => {
                    debug!(entry = entry.label(), %reason, "skipping dependency");
                    report.skipped += 1;
                    on_event(SyncEvent::Skipped {
                        entry,
                        reason: &reason,
                    });
                    continue;
                }
            };

            let action = self.reconcile(&dependency)?;
            report.record(action);
            on_event(SyncEvent::Reconciled {
                dependency: &dependency,
                action,
            });
        }

        Ok(report)
    }
}

fn ensure_parent(dest: &Path) -> Result<(), SyncError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SyncError::Environment {
            context: format!("create parent for {}", dest.display()),
            source,
        })?;
    }
    Ok(())
}

fn vcs_failed(operation: VcsOperation, target: &str, source: GitError) -> SyncError {
    SyncError::VcsOperationFailed {
        operation,
        target: target.to_string(),
        source,
    }
}

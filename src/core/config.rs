//! Resolved run configuration
//!
//! Built once in `main()` from CLI flags and environment, then handed to
//! the reconciler. Nothing below this layer looks at the process working
//! directory.

use std::path::{Path, PathBuf};

use crate::core::reconcile::SyncError;
use crate::core::vendor_paths::{default_manifest_path, default_vendor_root, resolve_against};

/// Paths and switches for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Project root
    pub root: PathBuf,
    /// Manifest file
    pub manifest_path: PathBuf,
    /// Directory the checkouts are placed under
    pub vendor_root: PathBuf,
    /// Decide actions without performing them
    pub dry_run: bool,
}

impl SyncConfig {
    /// Configuration with the default layout below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            manifest_path: default_manifest_path(&root),
            vendor_root: default_vendor_root(&root),
            root,
            dry_run: false,
        }
    }

    /// Resolve optional overrides, falling back to the current directory
    /// for the root and to the default layout for everything else.
    pub fn resolve(
        root: Option<&Path>,
        manifest_path: Option<&Path>,
        vendor_root: Option<&Path>,
    ) -> Result<Self, SyncError> {
        let cwd = std::env::current_dir().map_err(|source| SyncError::Environment {
            context: "determine working directory".to_string(),
            source,
        })?;
        let root = match root {
            Some(root) => resolve_against(&cwd, root),
            None => cwd,
        };

        let mut config = Self::new(root);
        if let Some(path) = manifest_path {
            config.manifest_path = resolve_against(&config.root, path);
        }
        if let Some(path) = vendor_root {
            config.vendor_root = resolve_against(&config.root, path);
        }
        Ok(config)
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

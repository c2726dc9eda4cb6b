//! Project layout helpers.
//!
//! Default layout relative to the project root:
//! - manifest: `vendor/manifest`
//! - checkouts: `.gopath/src/<import path>`

use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_PATH: &str = "vendor/manifest";
pub const DEFAULT_VENDOR_ROOT: &str = ".gopath/src";

pub fn default_manifest_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_MANIFEST_PATH)
}

pub fn default_vendor_root(root: &Path) -> PathBuf {
    root.join(DEFAULT_VENDOR_ROOT)
}

/// Map an import path onto its checkout directory below `vendor_root`.
///
/// The import path is split on `/`; empty and `.` segments are dropped.
pub fn destination_for(vendor_root: &Path, import_path: &str) -> PathBuf {
    import_path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(vendor_root.to_path_buf(), |path, segment| path.join(segment))
}

/// Resolve a user-supplied path against the project root
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

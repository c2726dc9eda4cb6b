//! Test fixtures for creating project environments.
//!
//! A `ProjectFixture` is a temporary project root with a manifest and a
//! set of bare remotes to vendor from -- all offline.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use serde_json::{json, Value};
use vendorsync::SyncConfig;

use super::git_helpers;

/// A bare remote plus the staging clone used to publish commits to it.
pub struct RemoteRepo {
    pub url: String,
    pub staging: PathBuf,
    /// Commit hashes in the order they were pushed
    pub commits: Vec<String>,
}

impl RemoteRepo {
    /// Commit a file in staging and push it. Returns the commit hash.
    pub fn publish(&mut self, filename: &str, content: &str) -> String {
        let sha = git_helpers::commit_file(
            &self.staging,
            filename,
            content,
            &format!("Update {}", filename),
        );
        git_helpers::push_with_tags(&self.staging, "origin", "main");
        self.commits.push(sha.clone());
        sha
    }

    /// Tag the latest commit and push the tag.
    pub fn publish_tag(&self, name: &str) {
        git_helpers::tag(&self.staging, name);
        git_helpers::push_with_tags(&self.staging, "origin", "main");
    }
}

/// A test project with temporary directories that are cleaned up on drop.
pub struct ProjectFixture {
    /// Kept alive for the lifetime of the fixture.
    pub _temp: TempDir,
    /// Project root (contains vendor/manifest and .gopath/src)
    pub root: PathBuf,
    /// Bare remotes and their staging clones
    pub remotes_dir: PathBuf,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        let remotes_dir = temp.path().join("remotes");
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::create_dir_all(&remotes_dir).unwrap();
        Self {
            _temp: temp,
            root,
            remotes_dir,
        }
    }

    /// Create a bare remote with `commits` commits on main.
    pub fn add_remote(&self, name: &str, commits: usize) -> RemoteRepo {
        let bare = self.remotes_dir.join(format!("{}.git", name));
        git_helpers::init_bare_repo(&bare);

        let staging = self.remotes_dir.join(format!("{}-staging", name));
        git_helpers::init_repo(&staging);
        let url = format!("file://{}", bare.display());
        git_helpers::add_remote(&staging, "origin", &url);

        let mut remote = RemoteRepo {
            url,
            staging,
            commits: Vec::new(),
        };
        for i in 0..commits.max(1) {
            remote.publish("VERSION", &format!("{}\n", i + 1));
        }
        remote
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("vendor").join("manifest")
    }

    /// Checkout directory for an import path under the default vendor root.
    pub fn vendor_path(&self, import_path: &str) -> PathBuf {
        self.root.join(".gopath").join("src").join(import_path)
    }

    /// Write the manifest from raw JSON entries.
    pub fn write_manifest(&self, dependencies: Vec<Value>) {
        let manifest = json!({ "version": 0, "dependencies": dependencies });
        fs::write(
            self.manifest_path(),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
    }

    pub fn config(&self) -> SyncConfig {
        SyncConfig::new(&self.root)
    }
}

/// A manifest entry pinned to `revision`.
pub fn dependency(import_path: &str, repository: &str, revision: &str) -> Value {
    json!({
        "importpath": import_path,
        "repository": repository,
        "vcs": "git",
        "revision": revision,
        "branch": "master",
    })
}

/// Read a file relative to a checkout.
pub fn read(checkout: &Path, file: &str) -> String {
    fs::read_to_string(checkout.join(file)).unwrap()
}

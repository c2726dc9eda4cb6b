//! `Vcs` wrapper that records every mutating call before delegating.

use std::cell::RefCell;
use std::path::Path;

use vendorsync::git::{GitCli, GitError, Vcs};

/// Real git underneath, with a log of clone/fetch/checkout calls.
pub struct RecordingVcs {
    inner: GitCli,
    calls: RefCell<Vec<String>>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self {
            inner: GitCli::locate().expect("git must be installed to run tests"),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Operation names in call order, e.g. `["clone", "checkout"]`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == operation).count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Vcs for RecordingVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        self.calls.borrow_mut().push("clone".to_string());
        self.inner.clone_repo(url, dest)
    }

    fn current_revision(&self, dir: &Path) -> Result<String, GitError> {
        self.inner.current_revision(dir)
    }

    fn has_revision(&self, dir: &Path, revision: &str) -> bool {
        self.inner.has_revision(dir, revision)
    }

    fn fetch(&self, dir: &Path) -> Result<(), GitError> {
        self.calls.borrow_mut().push("fetch".to_string());
        self.inner.fetch(dir)
    }

    fn checkout(&self, dir: &Path, revision: &str) -> Result<(), GitError> {
        self.calls.borrow_mut().push("checkout".to_string());
        self.inner.checkout(dir, revision)
    }
}

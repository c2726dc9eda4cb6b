//! Git operations wrapper
//!
//! The reconciler only talks to the `Vcs` trait. `GitCli` is the real
//! implementation: it shells out to `git` for clone, fetch and checkout so
//! progress and credential prompts reach the terminal untouched, and uses
//! git2 (libgit2 bindings) for the read-only revision queries.

pub mod cli;

pub use cli::GitCli;

use git2::Repository;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("git executable not found: {0}")]
    ExecutableNotFound(#[from] which::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    OperationFailed(String),
}

/// The version-control operations needed to reconcile a checkout.
///
/// Mutating operations block until the underlying tool exits.
pub trait Vcs {
    /// Clone `url` into `dest`, which must not exist yet
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError>;

    /// Full id of the commit currently checked out in `dir`
    fn current_revision(&self, dir: &Path) -> Result<String, GitError>;

    /// Whether `revision` resolves to a commit without touching the network
    fn has_revision(&self, dir: &Path, revision: &str) -> bool;

    /// Refresh all remote branches and tags, pruning deleted refs
    fn fetch(&self, dir: &Path) -> Result<(), GitError>;

    /// Force-checkout `revision`, discarding local modifications
    fn checkout(&self, dir: &Path, revision: &str) -> Result<(), GitError>;
}

/// Open a git repository at the given path
pub fn open_repo<P: AsRef<Path>>(path: P) -> Result<Repository, GitError> {
    Repository::open(path.as_ref())
        .map_err(|e| GitError::NotARepo(format!("{}: {}", path.as_ref().display(), e)))
}

/// Full id of the commit HEAD points to
pub fn head_revision(repo: &Repository) -> Result<String, GitError> {
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}

/// Whether `revision` (hash, tag or branch) peels to a commit in `repo`
pub fn resolves_to_commit(repo: &Repository, revision: &str) -> bool {
    repo.revparse_single(&format!("{}^{{commit}}", revision))
        .is_ok()
}

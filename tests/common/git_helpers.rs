//! Git helper utilities for integration tests.
//!
//! Create bare remotes, commit and tag files, and inspect checkouts --
//! all through the `git` CLI over `file://` URLs for offline testing.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Initialize a bare git repository at the given path.
pub fn init_bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "--bare", "-b", "main"]);
}

/// Initialize a non-bare git repository with user config.
pub fn init_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "-b", "main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
}

/// Create a file, stage, and commit it. Returns the commit hash.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> String {
    fs::write(repo_path.join(filename), content).unwrap();
    git(repo_path, &["add", filename]);
    git(repo_path, &["commit", "-m", message]);
    get_head_sha(repo_path)
}

/// Create a lightweight tag at HEAD.
pub fn tag(repo_path: &Path, name: &str) {
    git(repo_path, &["tag", name]);
}

/// Add a remote to a repository.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) {
    git(repo_path, &["remote", "add", name, url]);
}

/// Push a branch and all tags to a remote.
pub fn push_with_tags(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", remote, branch]);
    git(repo_path, &["push", remote, "--tags"]);
}

/// Get HEAD sha.
pub fn get_head_sha(repo_path: &Path) -> String {
    git_output(repo_path, &["rev-parse", "HEAD"])
}

/// Check whether a commit is present in the repo's object store.
pub fn has_commit(repo_path: &Path, sha: &str) -> bool {
    Command::new("git")
        .args(["cat-file", "-e", &format!("{}^{{commit}}", sha)])
        .current_dir(repo_path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Porcelain status of the working tree (empty when clean).
pub fn status_porcelain(repo_path: &Path) -> String {
    git_output(repo_path, &["status", "--porcelain"])
}

/// Run a git command, panic on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run a git command and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

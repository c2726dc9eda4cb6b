//! `Vcs` implementation backed by the git executable

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{head_revision, open_repo, resolves_to_commit, GitError, Vcs};
use crate::util::log_cmd;

#[cfg(feature = "telemetry")]
use std::time::Instant;
#[cfg(feature = "telemetry")]
use tracing::instrument;
use tracing::debug;

/// Runs git commands with inherited stdio
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    /// Locate `git` on `PATH`
    pub fn locate() -> Result<Self, GitError> {
        Ok(Self {
            program: which::which("git")?,
        })
    }

    /// Run `git <subcommand> <args>` in `dir` and wait for it; stdout/stderr
    /// go straight to ours.
    fn run(&self, dir: &Path, subcommand: &str, args: &[&OsStr]) -> Result<(), GitError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(subcommand).args(args).current_dir(dir);
        log_cmd(&cmd);

        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let status = cmd.status()?;

        #[cfg(feature = "telemetry")]
        debug!(
            command = subcommand,
            success = status.success(),
            duration_ms = start.elapsed().as_millis() as u64,
            "git command complete"
        );

        if !status.success() {
            return Err(GitError::OperationFailed(format!(
                "git {} exited with {}",
                subcommand, status
            )));
        }
        Ok(())
    }
}

impl Vcs for GitCli {
    #[cfg_attr(feature = "telemetry", instrument(skip(self)))]
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let parent = dest.parent().unwrap_or(dest);
        self.run(parent, "clone", &[OsStr::new(url), dest.as_os_str()])
    }

    fn current_revision(&self, dir: &Path) -> Result<String, GitError> {
        let repo = open_repo(dir)?;
        head_revision(&repo)
    }

    fn has_revision(&self, dir: &Path, revision: &str) -> bool {
        match open_repo(dir) {
            Ok(repo) => resolves_to_commit(&repo, revision),
            Err(e) => {
                debug!(error = %e, "cannot inspect local history");
                false
            }
        }
    }

    #[cfg_attr(feature = "telemetry", instrument(skip(self)))]
    fn fetch(&self, dir: &Path) -> Result<(), GitError> {
        self.run(dir, "fetch", &["--all", "--tags", "--prune"].map(OsStr::new))
    }

    #[cfg_attr(feature = "telemetry", instrument(skip(self)))]
    fn checkout(&self, dir: &Path, revision: &str) -> Result<(), GitError> {
        self.run(dir, "checkout", &[OsStr::new("-qf"), OsStr::new(revision)])
    }
}

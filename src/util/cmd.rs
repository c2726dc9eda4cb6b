//! Command logging for verbose output.

use std::process::Command;
use tracing::debug;

/// Log a command just before execution.
///
/// Emits a debug event with the program, arguments and working directory.
/// Visible with `--verbose` or `RUST_LOG=vendorsync::cmd=debug`.
pub fn log_cmd(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    let cwd = cmd
        .get_current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    debug!(
        target: "vendorsync::cmd",
        %program,
        ?args,
        %cwd,
        "exec"
    );
}


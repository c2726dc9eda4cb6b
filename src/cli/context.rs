//! Context passed to command handlers
//!
//! Bundles the resolved configuration and global CLI flags into a single
//! struct so handlers don't take them one by one.

use crate::core::config::SyncConfig;

/// Context available to all command handlers.
///
/// Created once in `main()` after resolving the configuration.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Resolved paths and switches
    pub config: SyncConfig,
    /// Suppress non-essential output (`--quiet`)
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(config: SyncConfig, quiet: bool) -> Self {
        Self { config, quiet }
    }
}

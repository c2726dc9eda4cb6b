//! vendorsync - vendor tree synchronizer
//!
//! Reads a JSON dependency manifest and makes a vendor directory contain
//! every listed git dependency checked out at its pinned revision.

pub mod cli;
pub mod core;
pub mod git;
pub mod telemetry;
pub mod util;

pub use core::config::SyncConfig;
pub use core::manifest::{Dependency, Manifest, ManifestEntry};
pub use core::reconcile::{Action, LocalCheckout, Reconciler, SyncError, SyncEvent, SyncReport};

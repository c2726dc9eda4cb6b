//! Core business logic for vendorsync

pub mod config;
pub mod manifest;
pub mod reconcile;
pub mod vendor_paths;

pub use config::SyncConfig;
pub use manifest::{Dependency, Manifest, ManifestEntry};
pub use reconcile::{Action, LocalCheckout, Reconciler, SyncError};

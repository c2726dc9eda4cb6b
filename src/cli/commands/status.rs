//! Status command implementation

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::context::CommandContext;
use crate::cli::output::{Output, Table};
use crate::core::manifest::Manifest;
use crate::core::reconcile::{LocalCheckout, Reconciler, SyncError};
use crate::git::Vcs;

/// State of one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    /// Import path, or a best-effort label for incomplete entries
    pub import_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// Local checkout state; absent for skipped entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<LocalCheckout>,
    /// Why the entry would be skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl DependencyStatus {
    fn state_label(&self) -> String {
        match (&self.checkout, &self.skipped) {
            (Some(checkout), _) => checkout.to_string(),
            (None, Some(reason)) => format!("skipped: {}", reason),
            (None, None) => String::new(),
        }
    }
}

/// Inspect every manifest entry without changing anything
pub fn collect_status<V: Vcs>(
    ctx: &CommandContext,
    manifest: &Manifest,
    vcs: V,
) -> Result<Vec<DependencyStatus>, SyncError> {
    let reconciler = Reconciler::new(ctx.config.clone(), vcs);

    manifest
        .dependencies
        .iter()
        .map(|entry| -> Result<DependencyStatus, SyncError> {
            match entry.validate() {
                Ok(dependency) => Ok(DependencyStatus {
                    checkout: Some(reconciler.inspect(&dependency)?),
                    destination: Some(reconciler.destination(&dependency)),
                    revision: Some(dependency.revision),
                    import_path: dependency.import_path,
                    skipped: None,
                }),
                Err(reason) => Ok(DependencyStatus {
                    import_path: entry.label().to_string(),
                    revision: entry.revision.clone().filter(|r| !r.is_empty()),
                    destination: None,
                    checkout: None,
                    skipped: Some(reason.to_string()),
                }),
            }
        })
        .collect()
}

/// Run the status command
pub fn run_status<V: Vcs>(ctx: &CommandContext, vcs: V, json: bool) -> anyhow::Result<()> {
    let manifest = Manifest::load(&ctx.config.manifest_path).map_err(SyncError::from)?;
    let statuses = collect_status(ctx, &manifest, vcs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    Output::header("Dependency Status");
    println!();

    let mut table = Table::new(vec!["Dependency", "Revision", "State"]);
    for status in &statuses {
        let revision = status
            .revision
            .as_deref()
            .map(short_revision)
            .unwrap_or_default();
        let state = status.state_label();
        table.add_row(vec![status.import_path.as_str(), revision.as_str(), state.as_str()]);
    }
    table.print();

    let total = statuses.len();
    let up_to_date = count(&statuses, |c| c == LocalCheckout::Matching);
    let missing = count(&statuses, |c| c == LocalCheckout::Absent);
    let skipped = statuses.iter().filter(|s| s.skipped.is_some()).count();
    println!();
    println!(
        "  {}/{} up to date | {} missing | {} stale | {} skipped",
        up_to_date,
        total,
        missing,
        total - up_to_date - missing - skipped,
        skipped
    );

    Ok(())
}

fn count(statuses: &[DependencyStatus], pred: impl Fn(LocalCheckout) -> bool) -> usize {
    statuses
        .iter()
        .filter_map(|s| s.checkout)
        .filter(|c| pred(*c))
        .count()
}

/// Abbreviate long commit ids for display; tags and branches are kept whole
fn short_revision(revision: &str) -> String {
    if revision.len() == 40 && revision.chars().all(|c| c.is_ascii_hexdigit()) {
        revision[..12].to_string()
    } else {
        revision.to_string()
    }
}

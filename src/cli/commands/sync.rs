//! Sync command implementation

use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::core::manifest::Manifest;
use crate::core::reconcile::{Reconciler, SyncError, SyncEvent, SyncReport};
use crate::git::Vcs;

/// Run the sync command
///
/// Loads the manifest, then reconciles every entry in order. Returns the
/// counts of what was done; the first fatal error ends the run.
pub fn run_sync<V: Vcs>(ctx: &CommandContext, vcs: V) -> Result<SyncReport, SyncError> {
    let manifest = Manifest::load(&ctx.config.manifest_path)?;
    let dry_run = ctx.config.dry_run;

    if !ctx.quiet {
        Output::header(&format!(
            "Syncing {} dependencies into {}",
            manifest.dependencies.len(),
            ctx.config.vendor_root.display()
        ));
        if dry_run {
            Output::info("Dry run: no directories or checkouts will be changed");
        }
        println!();
    }

    let reconciler = Reconciler::new(ctx.config.clone(), vcs);
    let report = reconciler.reconcile_all(&manifest.dependencies, |event| match event {
        SyncEvent::Skipped { entry, reason } => {
            Output::warning(&format!("skipping {}: {}", entry.label(), reason));
        }
        SyncEvent::Reconciled { dependency, action } => {
            if !ctx.quiet {
                let what = if dry_run { action.planned() } else { action.done() };
                println!(
                    "  {} @ {}: {}",
                    Output::import_path(&dependency.import_path),
                    Output::revision(&dependency.revision),
                    what
                );
            }
        }
    })?;

    if !ctx.quiet {
        println!();
        Output::success(&summary(&report, dry_run));
    }

    Ok(report)
}

/// One-line summary of a finished run
pub fn summary(report: &SyncReport, dry_run: bool) -> String {
    let verb = if dry_run { "Checked" } else { "Synced" };
    let mut line = format!(
        "{} {} dependencies ({} cloned, {} fetched, {} checked out, {} up to date)",
        verb,
        report.reconciled(),
        report.cloned,
        report.fetched,
        report.checked_out,
        report.up_to_date
    );
    if report.skipped > 0 {
        line.push_str(&format!(", {} skipped", report.skipped));
    }
    line
}

//! vendorsync CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

use vendorsync::cli::{CommandContext, Output};
use vendorsync::git::GitCli;
use vendorsync::telemetry::{init_telemetry, TelemetryConfig};
use vendorsync::SyncConfig;

#[derive(Parser)]
#[command(name = "vendorsync")]
#[command(author, version, about = "Check out pinned git dependencies into a vendor tree", long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true, env = "VENDORSYNC_ROOT")]
    root: Option<PathBuf>,
    /// Manifest file (default: <root>/vendor/manifest)
    #[arg(short, long, global = true, env = "VENDORSYNC_MANIFEST")]
    manifest: Option<PathBuf>,
    /// Directory checkouts are placed under (default: <root>/.gopath/src)
    #[arg(long, global = true, env = "VENDORSYNC_VENDOR_ROOT")]
    vendor_root: Option<PathBuf>,
    /// Show debug logging, including every git command
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only report skipped entries and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the vendor tree with the manifest (default)
    Sync {
        /// Show what would be done without changing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Show the state of every dependency
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else if cli.quiet {
        TelemetryConfig::quiet()
    } else {
        TelemetryConfig::default()
    };
    let _guard = match init_telemetry(&telemetry) {
        Ok(guard) => Some(guard),
        Err(e) => {
            Output::warning(&format!("logging disabled: {}", e));
            None
        }
    };

    if let Err(e) = run(cli) {
        Output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "vendorsync", &mut std::io::stdout());
        }
        Some(Commands::Status { json }) => {
            let (config, git) = prepare(&cli)?;
            let ctx = CommandContext::new(config, cli.quiet);
            vendorsync::cli::commands::status::run_status(&ctx, git, *json)?;
        }
        Some(Commands::Sync { dry_run }) => {
            let (config, git) = prepare(&cli)?;
            let ctx = CommandContext::new(config.with_dry_run(*dry_run), cli.quiet);
            vendorsync::cli::commands::sync::run_sync(&ctx, git)?;
        }
        None => {
            let (config, git) = prepare(&cli)?;
            let ctx = CommandContext::new(config, cli.quiet);
            vendorsync::cli::commands::sync::run_sync(&ctx, git)?;
        }
    }

    Ok(())
}

/// Resolve the configuration and find git
fn prepare(cli: &Cli) -> anyhow::Result<(SyncConfig, GitCli)> {
    let config = SyncConfig::resolve(
        cli.root.as_deref(),
        cli.manifest.as_deref(),
        cli.vendor_root.as_deref(),
    )?;
    tracing::debug!(?config, "resolved configuration");
    Ok((config, GitCli::locate()?))
}

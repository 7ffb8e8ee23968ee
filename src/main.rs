//! embedgen: build-time asset embedding generator.
//!
//! Walks input directories, fingerprints the discovered file set, and
//! generates a C++ header (plus a resource script on the Windows target)
//! that bakes the file bytes into the application binary. Unchanged file
//! sets are detected via a recorded fingerprint and skipped.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod diagnostic;
mod emit;
mod fingerprint;
mod generate;
mod plan;
mod ui;

use config::Config;
use diagnostic::{Diagnostic, DiagnosticLevel};
use emit::Target;

#[derive(Parser)]
#[command(name = "embedgen")]
#[command(about = "Embed directory trees into native binaries at build time")]
#[command(version)]
struct Cli {
    /// Input directories followed by the output directory.
    ///
    /// A trailing separator on an input keys entries relative to the
    /// directory itself; without one, the directory name leads every key.
    #[arg(required = true, num_args = 2..)]
    paths: Vec<PathBuf>,

    /// Path to embedgen config (TOML)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Target platform for the generated artifacts (defaults to the host)
    #[arg(short, long, value_enum)]
    target: Option<Target>,

    /// Regenerate even when the recorded fingerprint is unchanged
    #[arg(short, long)]
    force: bool,

    /// Print the embedding plan without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Treat warnings as errors and abort before emission
    #[arg(short = 'W', long)]
    deny_warnings: bool,

    /// Format for the dry-run plan listing
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(&cli);

    match result {
        Ok(diags) => {
            let has_errors = diags.iter().any(|d| d.level == DiagnosticLevel::Error);
            let has_warnings = diags.iter().any(|d| d.level == DiagnosticLevel::Warning);

            for diag in &diags {
                ui::diagnostic(diag);
            }

            if has_errors || (has_warnings && cli.deny_warnings) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Vec<Diagnostic>> {
    let config = Config::load(cli.config.as_deref())?;

    let Some((out_dir, inputs)) = cli.paths.split_last() else {
        anyhow::bail!("expected input directories followed by an output directory");
    };

    let opts = generate::Options {
        target: cli.target.unwrap_or_else(Target::host),
        force: cli.force,
        dry_run: cli.dry_run,
        deny_warnings: cli.deny_warnings,
        format: cli.output,
    };

    generate::generate(&config, inputs, out_dir, &opts)
}

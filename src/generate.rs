//! Generation pipeline: plan, detect changes, emit, persist.

use crate::OutputFormat;
use crate::config::Config;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::emit::{self, Target};
use crate::fingerprint;
use crate::plan::{EmbedPlan, build_plan};
use crate::ui;
use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Invocation options resolved from the command line
pub struct Options {
    pub target: Target,
    pub force: bool,
    pub dry_run: bool,
    pub deny_warnings: bool,
    pub format: OutputFormat,
}

/// Run one full generation pass.
///
/// Fingerprint persistence happens only after emission succeeds; a failure
/// anywhere leaves the old record in place so the next run regenerates.
pub fn generate(
    config: &Config,
    inputs: &[PathBuf],
    out_dir: &Path,
    opts: &Options,
) -> Result<Vec<Diagnostic>> {
    let mut diags = validate_inputs(inputs);
    if !diags.is_empty() {
        return Ok(diags);
    }

    let exclude = match build_exclude_set(config) {
        Ok(set) => set,
        Err(diag) => return Ok(vec![diag]),
    };

    let plan = build_plan(inputs, exclude)?;
    diags.extend(plan_warnings(&plan));
    if opts.deny_warnings && !diags.is_empty() {
        return Ok(diags);
    }

    if opts.dry_run {
        print_plan(&plan, opts.format);
        ui::plan_summary(plan.entries.len(), &plan.fingerprint);
        return Ok(diags);
    }

    let record_path = out_dir.join(&config.output.fingerprint);
    if !opts.force && fingerprint::is_current(&record_path, &plan.fingerprint) {
        ui::info("No changes detected. Skipping generation.");
        return Ok(diags);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let emitter = emit::for_target(opts.target);
    let written = emitter.emit(&plan, config, out_dir)?;
    fingerprint::persist(&record_path, &plan.fingerprint)?;

    for path in &written {
        ui::generated(path);
    }
    ui::embed_summary(plan.entries.len());

    Ok(diags)
}

/// Input paths must exist and be directories before any walk starts.
fn validate_inputs(inputs: &[PathBuf]) -> Vec<Diagnostic> {
    let mut diags = vec![];
    for input in inputs {
        if !input.exists() {
            diags.push(Diagnostic::new(
                DiagnosticCode::E0101InputNotFound,
                "Input directory not found",
                input.display().to_string(),
            ));
        } else if !input.is_dir() {
            diags.push(Diagnostic::new(
                DiagnosticCode::E0102InputNotADirectory,
                "Input path is not a directory",
                input.display().to_string(),
            ));
        }
    }
    diags
}

/// Build the exclude glob set from config
fn build_exclude_set(config: &Config) -> Result<globset::GlobSet, Diagnostic> {
    let mut builder = globset::GlobSetBuilder::new();
    for pat in &config.scan.exclude {
        match globset::Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                return Err(Diagnostic::new(
                    DiagnosticCode::E0201ConfigInvalid,
                    format!("Invalid scan.exclude glob '{}': {}", pat, e),
                    "embedgen.toml",
                ));
            }
        }
    }
    builder.build().map_err(|e| {
        Diagnostic::new(
            DiagnosticCode::E0201ConfigInvalid,
            format!("Failed to build exclude glob set: {}", e),
            "embedgen.toml",
        )
    })
}

/// Warnings carried alongside a successful run
fn plan_warnings(plan: &EmbedPlan) -> Vec<Diagnostic> {
    let mut diags = vec![];

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in &plan.entries {
        if !seen.insert(entry.relative_path.as_str()) {
            diags.push(Diagnostic::new(
                DiagnosticCode::W0101DuplicateKey,
                format!(
                    "Duplicate key '{}'; the later entry wins",
                    entry.relative_path
                ),
                entry.source_path.clone(),
            ));
        }
    }

    if plan.entries.is_empty() {
        diags.push(Diagnostic::new(
            DiagnosticCode::W0102EmptyPlan,
            "No files discovered; the generated map will be empty",
            "",
        ));
    }

    diags
}

/// Create a header cell (bold when colors enabled)
fn header_cell(text: &str) -> Cell {
    if ui::stdout_supports_color() {
        Cell::new(text).add_attribute(Attribute::Bold)
    } else {
        Cell::new(text)
    }
}

/// Print the plan listing in the requested format
fn print_plan(plan: &EmbedPlan, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan.entries).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Plain => {
            for entry in &plan.entries {
                println!(
                    "{}\t{}\t{}",
                    entry.symbol, entry.relative_path, entry.source_path
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    header_cell("Symbol"),
                    header_cell("Key"),
                    header_cell("Source"),
                ]);
            for entry in &plan.entries {
                table.add_row(vec![
                    Cell::new(&entry.symbol),
                    Cell::new(&entry.relative_path),
                    Cell::new(&entry.source_path),
                ]);
            }
            println!("{table}");
        }
    }
}

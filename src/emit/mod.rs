//! Code emission strategies.
//!
//! Two self-contained strategies produce the generated header: a resource
//! table compiled from a platform resource script, and inline-section
//! directives that place the raw bytes into the binary directly. The
//! strategy is picked once from the target platform.

pub mod resource;
pub mod section;

use crate::config::Config;
use crate::plan::{EmbedEntry, EmbedPlan};
use anyhow::Result;
use clap::ValueEnum;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Target platform for the generated artifacts
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Resource-table embedding via a compiled .rc script
    Windows,
    /// Inline-section embedding into .rodata
    Linux,
    /// Inline-section embedding into __TEXT,__const
    Macos,
}

impl Target {
    /// The platform this generator is running on
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }
}

/// One emission strategy, selected once at startup.
pub trait Emitter {
    /// Write the generated artifacts into `out_dir`, returning their paths.
    fn emit(&self, plan: &EmbedPlan, config: &Config, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Select the emitter for a target platform.
pub fn for_target(target: Target) -> Box<dyn Emitter> {
    match target {
        Target::Windows => Box::new(resource::ResourceTableEmitter),
        Target::Linux | Target::Macos => Box::new(section::InlineSectionEmitter::new(target)),
    }
}

/// Entries that survive key deduplication, in discovery order.
///
/// When two entries share a relative path the last-discovered one wins;
/// earlier occurrences are dropped here so the generated map never carries
/// a duplicate key.
pub(crate) fn winning_entries(plan: &EmbedPlan) -> Vec<&EmbedEntry> {
    let mut last: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in plan.entries.iter().enumerate() {
        last.insert(entry.relative_path.as_str(), i);
    }
    plan.entries
        .iter()
        .enumerate()
        .filter(|(i, entry)| last.get(entry.relative_path.as_str()).copied() == Some(*i))
        .map(|(_, entry)| entry)
        .collect()
}

/// Common top of the generated header.
pub(crate) fn header_prelude() -> String {
    let mut out = String::new();
    out.push_str("// Generated by embedgen. Do not edit.\n");
    out.push_str("#pragma once\n");
    out.push_str("#include <unordered_map>\n");
    out.push_str("#include <string>\n");
    out.push_str("#include <cstddef>\n");
    out.push_str("#include <cstdint>\n");
    out.push('\n');
    out.push_str(
        "using EmbeddedFilesMap = const std::unordered_map<std::string, std::pair<const uint8_t*, size_t>>;\n",
    );
    out
}

/// The `GetEmbeddedFiles()` accessor over a function-local static map.
///
/// The static initializer runs once under the C++ magic-static guarantee,
/// so concurrent first access from the embedding application is safe and
/// the map is immutable for the rest of the process lifetime.
pub(crate) fn embedded_files_map(
    entries: &[&EmbedEntry],
    value_for: impl Fn(&EmbedEntry) -> String,
) -> String {
    let mut out = String::new();
    out.push_str("inline EmbeddedFilesMap& GetEmbeddedFiles() {\n");
    out.push_str("    static EmbeddedFilesMap embedded_files = {\n");
    for entry in entries {
        out.push_str(&format!(
            "        {{ \"{}\", {} }},\n",
            entry.relative_path,
            value_for(entry)
        ));
    }
    out.push_str("    };\n");
    out.push('\n');
    out.push_str("    return embedded_files;\n");
    out.push_str("}\n");
    out
}

/// Extension-to-MIME lookup emitted when `[embed] mime_helper` is enabled.
const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("xml", "text/xml"),
    ("xhtml", "application/xhtml+xml"),
    ("pdf", "application/pdf"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "application/ogg"),
    ("aac", "audio/aac"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
    ("otf", "font/otf"),
    ("ttf", "font/ttf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("wasm", "application/wasm"),
    ("bin", "application/octet-stream"),
];

/// The `GetEmbeddedFileMimeType()` helper for serving embedded files.
pub(crate) fn mime_helper() -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("inline const char* GetEmbeddedFileMimeType(const std::string& file_path) {\n");
    out.push_str("    static const std::unordered_map<std::string, const char*> mime_types = {\n");
    for (ext, mime) in MIME_TYPES {
        out.push_str(&format!("        {{ \"{ext}\", \"{mime}\" }},\n"));
    }
    out.push_str("    };\n");
    out.push('\n');
    out.push_str("    size_t last_dot = file_path.rfind('.');\n");
    out.push_str("    std::string ext = (last_dot != std::string::npos) ? file_path.substr(last_dot + 1) : \"\";\n");
    out.push_str("    auto it = mime_types.find(ext);\n");
    out.push_str(
        "    return it != mime_types.end() ? it->second : \"application/octet-stream\";\n",
    );
    out.push_str("}\n");
    out
}

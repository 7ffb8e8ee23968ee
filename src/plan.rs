//! Embedding plan construction.
//!
//! Walks the input directories and assigns every regular file a lookup key,
//! a generated symbol, and a place in the plan fingerprint.

use crate::fingerprint::Fingerprint;
use anyhow::{Context, Result};
use globset::GlobSet;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// One file scheduled for embedding.
///
/// `relative_path` is the key the generated map is queried by; `symbol` is
/// the identifier the generated code uses for the entry's data. Both use
/// `/` separators regardless of host platform.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedEntry {
    /// Absolutized source file path with normalized separators
    pub source_path: String,
    /// Lookup key, relative to the input directory's base
    pub relative_path: String,
    /// Generated identifier (FILE_0, FILE_1, ...)
    pub symbol: String,
}

/// The full embedding plan for one invocation.
#[derive(Debug)]
pub struct EmbedPlan {
    /// Entries in discovery order
    pub entries: Vec<EmbedEntry>,
    /// Hex digest over (source_path, mtime) of every entry
    pub fingerprint: String,
}

/// Accumulates entries, the symbol counter, and the running fingerprint
/// across all input directories.
pub struct PlanBuilder {
    entries: Vec<EmbedEntry>,
    fingerprint: Fingerprint,
    next_symbol: usize,
    exclude: GlobSet,
}

impl PlanBuilder {
    pub fn new(exclude: GlobSet) -> Self {
        Self {
            entries: Vec::new(),
            fingerprint: Fingerprint::new(),
            next_symbol: 0,
            exclude,
        }
    }

    /// Walk one input directory and add every regular file to the plan.
    ///
    /// A trailing separator on the argument keys entries relative to the
    /// directory itself; without one, the directory's final segment becomes
    /// the leading key segment. Any walk or metadata failure aborts the
    /// whole build.
    pub fn add_directory(&mut self, dir: &Path) -> Result<()> {
        let keep_dir_name = !has_trailing_separator(dir) && dir.file_name().is_some();

        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let inner = entry.path().strip_prefix(dir).with_context(|| {
                format!("Walked path escaped input directory: {}", dir.display())
            })?;
            let relative_path = if keep_dir_name {
                match dir.file_name() {
                    Some(name) => normalize_separators(&Path::new(name).join(inner)),
                    None => normalize_separators(inner),
                }
            } else {
                normalize_separators(inner)
            };

            if self.exclude.is_match(&relative_path) {
                continue;
            }

            let source_path = std::path::absolute(entry.path()).with_context(|| {
                format!("Failed to absolutize path: {}", entry.path().display())
            })?;
            let source_path = normalize_separators(&source_path);

            let metadata = entry
                .metadata()
                .with_context(|| format!("Failed to stat file: {}", entry.path().display()))?;
            let mtime = metadata.modified().with_context(|| {
                format!("Failed to read mtime: {}", entry.path().display())
            })?;

            self.fingerprint.fold(&source_path, mtime);
            self.entries.push(EmbedEntry {
                source_path,
                relative_path,
                symbol: format!("FILE_{}", self.next_symbol),
            });
            self.next_symbol += 1;
        }

        Ok(())
    }

    pub fn finish(self) -> EmbedPlan {
        EmbedPlan {
            entries: self.entries,
            fingerprint: self.fingerprint.finish(),
        }
    }
}

/// Build the plan for a set of input directories, in argument order.
pub fn build_plan(inputs: &[impl AsRef<Path>], exclude: GlobSet) -> Result<EmbedPlan> {
    let mut builder = PlanBuilder::new(exclude);
    for dir in inputs {
        builder.add_directory(dir.as_ref())?;
    }
    Ok(builder.finish())
}

/// Whether the argument was written with a trailing path separator.
///
/// Inspects the raw argument string; `Path` itself discards the trailing
/// separator during parsing.
fn has_trailing_separator(dir: &Path) -> bool {
    let raw = dir.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with('\\')
}

/// Replace backslash separators with forward slashes.
fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::GlobSetBuilder;
    use std::fs;
    use std::path::PathBuf;

    fn no_exclude() -> GlobSet {
        GlobSetBuilder::new().build().expect("empty glob set")
    }

    fn write_tree(root: &Path) {
        fs::create_dir_all(root.join("assets/sub")).expect("mkdir");
        fs::write(root.join("assets/a.txt"), "abc").expect("write");
        fs::write(root.join("assets/sub/b.txt"), "hello").expect("write");
    }

    #[test]
    fn test_trailing_separator_drops_dir_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());

        let input = PathBuf::from(format!("{}/assets/", dir.path().display()));
        let plan = build_plan(&[input], no_exclude()).expect("plan");

        let keys: Vec<_> = plan.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(keys, vec!["a.txt", "sub/b.txt"]);
    }

    #[test]
    fn test_no_trailing_separator_keeps_dir_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());

        let input = dir.path().join("assets");
        let plan = build_plan(&[input], no_exclude()).expect("plan");

        let keys: Vec<_> = plan.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(keys, vec!["assets/a.txt", "assets/sub/b.txt"]);
    }

    #[test]
    fn test_symbols_are_sequential_across_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("one")).expect("mkdir");
        fs::create_dir_all(dir.path().join("two")).expect("mkdir");
        fs::write(dir.path().join("one/x.txt"), "x").expect("write");
        fs::write(dir.path().join("two/y.txt"), "y").expect("write");

        let plan = build_plan(
            &[dir.path().join("one"), dir.path().join("two")],
            no_exclude(),
        )
        .expect("plan");

        let symbols: Vec<_> = plan.entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FILE_0", "FILE_1"]);
    }

    #[test]
    fn test_keys_use_forward_slashes() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());

        let plan = build_plan(&[dir.path().join("assets")], no_exclude()).expect("plan");
        for entry in &plan.entries {
            assert!(!entry.relative_path.contains('\\'));
            assert!(!entry.source_path.contains('\\'));
        }
    }

    #[test]
    fn test_source_paths_are_absolute() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());

        let plan = build_plan(&[dir.path().join("assets")], no_exclude()).expect("plan");
        for entry in &plan.entries {
            assert!(Path::new(&entry.source_path).is_absolute());
        }
    }

    #[test]
    fn test_exclude_glob_skips_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());

        let mut builder = GlobSetBuilder::new();
        builder.add(globset::Glob::new("**/*.txt").expect("glob"));
        let exclude = builder.build().expect("glob set");

        let input = PathBuf::from(format!("{}/assets/", dir.path().display()));
        let plan = build_plan(&[input], exclude).expect("plan");
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn test_excluded_entries_do_not_affect_fingerprint() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());
        let input = dir.path().join("assets");

        let mut builder = GlobSetBuilder::new();
        builder.add(globset::Glob::new("**/b.txt").expect("glob"));
        let exclude = builder.build().expect("glob set");

        let full = build_plan(std::slice::from_ref(&input), no_exclude()).expect("plan");
        let filtered = build_plan(std::slice::from_ref(&input), exclude).expect("plan");
        assert_ne!(full.fingerprint, filtered.fingerprint);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = build_plan(&[dir.path().join("nope")], no_exclude());
        assert!(result.is_err());
    }

    #[test]
    fn test_fingerprint_tracks_mtime() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_tree(dir.path());
        let input = dir.path().join("assets");

        let before = build_plan(std::slice::from_ref(&input), no_exclude()).expect("plan");

        // Same content, newer mtime
        let file = fs::File::options()
            .write(true)
            .open(dir.path().join("assets/a.txt"))
            .expect("open");
        file.set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(10))
            .expect("set mtime");
        drop(file);

        let after = build_plan(std::slice::from_ref(&input), no_exclude()).expect("plan");
        assert_ne!(before.fingerprint, after.fingerprint);
    }
}

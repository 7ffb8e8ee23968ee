//! Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration (embedgen.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub embed: EmbedConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Names of the files written to the output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Generated header file name
    #[serde(default = "default_header")]
    pub header: String,
    /// Resource script file name (resource-table target only)
    #[serde(default = "default_resource_script")]
    pub resource_script: String,
    /// Fingerprint record file name
    #[serde(default = "default_fingerprint")]
    pub fingerprint: String,
}

fn default_header() -> String {
    "EmbeddedFiles.h".to_string()
}

fn default_resource_script() -> String {
    "data.rc".to_string()
}

fn default_fingerprint() -> String {
    "output_hash.txt".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            resource_script: default_resource_script(),
            fingerprint: default_fingerprint(),
        }
    }
}

/// Embedding options for the generated code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Byte alignment for inline-section data
    #[serde(default = "default_align")]
    pub align: u32,
    /// Emit the extension-to-MIME-type helper into the header
    #[serde(default)]
    pub mime_helper: bool,
}

fn default_align() -> u32 {
    16
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            align: default_align(),
            mime_helper: false,
        }
    }
}

/// Directory walk filtering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns matched against relative keys; matching files are skipped
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    /// Load config from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .or_else(Self::find_config)
            .unwrap_or_else(|| PathBuf::from("embedgen.toml"));

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if no file exists
            Ok(Config::default())
        }
    }

    /// Find config file by walking up directory tree
    fn find_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let config_path = current.join("embedgen.toml");
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

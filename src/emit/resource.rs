//! Resource-table emission for the Windows toolchain.
//!
//! Every entry becomes an RCDATA resource in the generated script, compiled
//! and linked by the platform resource compiler. The script points at the
//! original source paths, so those files must stay in place until the
//! native build has run.

use crate::config::Config;
use crate::emit::{Emitter, embedded_files_map, header_prelude, mime_helper, winning_entries};
use crate::plan::EmbedPlan;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ResourceTableEmitter;

impl Emitter for ResourceTableEmitter {
    fn emit(&self, plan: &EmbedPlan, config: &Config, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let script_path = out_dir.join(&config.output.resource_script);
        let header_path = out_dir.join(&config.output.header);

        let mut script = String::from("#include \"winres.h\"\n");
        for entry in &plan.entries {
            script.push_str(&format!(
                "{} RCDATA \"{}\"\n",
                entry.symbol, entry.source_path
            ));
        }
        std::fs::write(&script_path, script).with_context(|| {
            format!("Failed to write resource script: {}", script_path.display())
        })?;

        let mut header = header_prelude();
        header.push('\n');
        header.push_str("#include <windows.h>\n");
        header.push_str(ACCESSOR);
        header.push('\n');
        header.push_str(&embedded_files_map(&winning_entries(plan), |entry| {
            format!("GetEmbeddedFileData(\"{}\")", entry.symbol)
        }));
        if config.embed.mime_helper {
            header.push_str(&mime_helper());
        }
        std::fs::write(&header_path, header)
            .with_context(|| format!("Failed to write header: {}", header_path.display()))?;

        Ok(vec![script_path, header_path])
    }
}

/// Resource lookup accessor. Any failed step yields a null, zero-length
/// view rather than an exception.
const ACCESSOR: &str = r#"
inline std::pair<const uint8_t*, size_t> GetEmbeddedFileData(const char* resource_name) {
    HRSRC resource = FindResourceA(NULL, resource_name, RT_RCDATA);
    if (resource) {
        HGLOBAL data_handle = LoadResource(NULL, resource);
        if (data_handle) {
            const uint8_t* data = static_cast<const uint8_t*>(LockResource(data_handle));
            size_t size = SizeofResource(NULL, resource);
            return std::make_pair(data, size);
        }
    }
    return std::make_pair(nullptr, 0);
}
"#;

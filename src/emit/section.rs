//! Inline-section emission for GCC and Clang toolchains.
//!
//! Each entry's bytes are placed into a read-only section with `.incbin`,
//! bracketed by globally visible start/end labels. The labels sit adjacent
//! around a single include directive, so `end - start` is always the exact
//! file length.

use crate::config::Config;
use crate::emit::{
    Emitter, Target, embedded_files_map, header_prelude, mime_helper, winning_entries,
};
use crate::plan::EmbedPlan;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct InlineSectionEmitter {
    target: Target,
}

impl InlineSectionEmitter {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl Emitter for InlineSectionEmitter {
    fn emit(&self, plan: &EmbedPlan, config: &Config, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let header_path = out_dir.join(&config.output.header);
        let section = section_directive(self.target);
        let align = config.embed.align;

        let mut header = header_prelude();
        for entry in &plan.entries {
            let sym = &entry.symbol;
            header.push('\n');
            header.push_str(&format!("__asm__(\".section {section}\");\n"));
            header.push_str(&format!("__asm__(\".balign {align}\");\n"));
            header.push_str(&format!("__asm__(\".globl __binary_{sym}_start\");\n"));
            header.push_str(&format!("__asm__(\"__binary_{sym}_start:\");\n"));
            header.push_str(&format!(
                "__asm__(\".incbin \\\"{}\\\"\");\n",
                entry.source_path
            ));
            header.push_str(&format!("__asm__(\".globl __binary_{sym}_end\");\n"));
            header.push_str(&format!("__asm__(\"__binary_{sym}_end:\");\n"));
            header.push_str(&format!(
                "extern const uint8_t __binary_{sym}_start[] __asm__(\"__binary_{sym}_start\") __attribute__((aligned({align})));\n"
            ));
            header.push_str(&format!(
                "extern const uint8_t __binary_{sym}_end[] __asm__(\"__binary_{sym}_end\") __attribute__((aligned({align})));\n"
            ));
        }
        header.push('\n');
        header.push_str(&embedded_files_map(&winning_entries(plan), |entry| {
            let sym = &entry.symbol;
            format!(
                "{{ __binary_{sym}_start, static_cast<size_t>(__binary_{sym}_end - __binary_{sym}_start) }}"
            )
        }));
        if config.embed.mime_helper {
            header.push_str(&mime_helper());
        }
        std::fs::write(&header_path, header)
            .with_context(|| format!("Failed to write header: {}", header_path.display()))?;

        Ok(vec![header_path])
    }
}

/// Read-only data section for the target ABI, escaped for inclusion in a
/// C string literal.
fn section_directive(target: Target) -> &'static str {
    match target {
        Target::Macos => "__TEXT,__const",
        _ => r#".rodata,\"a\",@progbits"#,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::EmbedEntry;
    use std::fs;

    fn sample_plan() -> EmbedPlan {
        EmbedPlan {
            entries: vec![
                EmbedEntry {
                    source_path: "/project/assets/a.txt".to_string(),
                    relative_path: "a.txt".to_string(),
                    symbol: "FILE_0".to_string(),
                },
                EmbedEntry {
                    source_path: "/project/assets/sub/b.txt".to_string(),
                    relative_path: "sub/b.txt".to_string(),
                    symbol: "FILE_1".to_string(),
                },
            ],
            fingerprint: "0".repeat(64),
        }
    }

    fn emit_header(target: Target, config: &Config) -> String {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = InlineSectionEmitter::new(target)
            .emit(&sample_plan(), config, dir.path())
            .expect("emit");
        assert_eq!(written.len(), 1, "inline-section emits the header only");
        fs::read_to_string(dir.path().join(&config.output.header)).expect("read header")
    }

    #[test]
    fn test_linux_targets_rodata() {
        let header = emit_header(Target::Linux, &Config::default());
        assert!(header.contains(r#"__asm__(".section .rodata,\"a\",@progbits");"#));
    }

    #[test]
    fn test_macos_targets_text_const() {
        let header = emit_header(Target::Macos, &Config::default());
        assert!(header.contains(r#"__asm__(".section __TEXT,__const");"#));
        assert!(!header.contains(".rodata"));
    }

    #[test]
    fn test_labels_bracket_a_single_incbin() {
        let header = emit_header(Target::Linux, &Config::default());
        let start = header.find("__asm__(\"__binary_FILE_0_start:\");").expect("start label");
        let incbin = header
            .find(r#"__asm__(".incbin \"/project/assets/a.txt\"");"#)
            .expect("incbin directive");
        let end = header.find("__asm__(\"__binary_FILE_0_end:\");").expect("end label");
        assert!(start < incbin && incbin < end);
    }

    #[test]
    fn test_extern_symbols_declared_for_each_entry() {
        let header = emit_header(Target::Linux, &Config::default());
        for sym in ["FILE_0", "FILE_1"] {
            assert!(header.contains(&format!(
                "extern const uint8_t __binary_{sym}_start[] __asm__(\"__binary_{sym}_start\") __attribute__((aligned(16)));"
            )));
            assert!(header.contains(&format!(
                "extern const uint8_t __binary_{sym}_end[] __asm__(\"__binary_{sym}_end\") __attribute__((aligned(16)));"
            )));
        }
    }

    #[test]
    fn test_map_computes_size_from_symbol_pair() {
        let header = emit_header(Target::Linux, &Config::default());
        assert!(header.contains(
            "{ \"a.txt\", { __binary_FILE_0_start, static_cast<size_t>(__binary_FILE_0_end - __binary_FILE_0_start) } },"
        ));
    }

    #[test]
    fn test_alignment_is_configurable() {
        let mut config = Config::default();
        config.embed.align = 64;
        let header = emit_header(Target::Linux, &config);
        assert!(header.contains("__asm__(\".balign 64\");"));
        assert!(header.contains("__attribute__((aligned(64)))"));
        assert!(!header.contains(".balign 16"));
    }
}

//! Integration Test: Layering
//!
//! The core crate is headless: no terminal crates in its manifest or its
//! sources. The TUI is a thin client: it never talks HTTP itself and never
//! does arithmetic, it only forwards keys and renders conductor messages.

use std::fs;

use architectural_enforcement::{code_part, rust_sources, workspace_root, SourceFile};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_crates() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest readable");

    for krate in UI_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "aicalc-core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_have_no_ui_imports() {
    let mut violations = Vec::new();

    for path in rust_sources("conductor/core/src") {
        let Some(file) = SourceFile::read(&path) else {
            continue;
        };
        for (idx, line) in file.lines().iter().enumerate() {
            let code = code_part(line);
            if UI_CRATES.iter().any(|k| code.contains(&format!("{k}::"))) {
                violations.push(file.violation(idx, line, "UI import in core"));
            }
        }
    }

    assert!(violations.is_empty(), "{violations:#?}");
}

#[test]
fn test_tui_has_no_http_or_arithmetic() {
    let mut violations = Vec::new();

    for path in rust_sources("tui/src") {
        let Some(file) = SourceFile::read(&path) else {
            continue;
        };
        for (idx, line) in file.lines().iter().enumerate() {
            let code = code_part(line);
            if code.contains("reqwest") {
                violations.push(file.violation(idx, line, "HTTP in surface"));
            }
            if code.contains("arithmetic::") || code.contains("parse_operand(") {
                violations.push(file.violation(idx, line, "Arithmetic in surface"));
            }
        }
    }

    assert!(violations.is_empty(), "{violations:#?}");
}

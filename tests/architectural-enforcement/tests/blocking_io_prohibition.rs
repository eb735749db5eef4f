//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in the TUI and the core MUST NOT use blocking
//! I/O. Config loading and log-file setup run in plain functions before the
//! event loop starts, which is allowed.

use architectural_enforcement::{code_part, enclosing_fn, rust_sources, SourceFile};

/// Patterns that block the runtime thread, with a label for the report
const BLOCKING_PATTERNS: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("fs::read_to_string(", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("std::thread::sleep", "Thread sleep"),
];

/// Test that async production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();
    check_directory("tui/src", &mut violations);
    check_directory("conductor/core/src", &mut violations);

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O found in async production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nUse tokio::fs, tokio::net, tokio::process or async reqwest instead,");
        eprintln!("or move the work into a plain fn that runs before the event loop.");

        panic!("Found {} blocking I/O violation(s)", violations.len());
    }
}

/// Nothing in the workspace may reach for the blocking HTTP client
#[test]
fn test_no_blocking_reqwest_anywhere() {
    for dir in ["tui/src", "conductor/core/src"] {
        for path in rust_sources(dir) {
            let Some(file) = SourceFile::read(&path) else {
                continue;
            };
            assert!(
                !file.content.contains("reqwest::blocking"),
                "{} uses reqwest::blocking",
                path.display()
            );
        }
    }
}

fn check_directory(dir: &str, violations: &mut Vec<String>) {
    for path in rust_sources(dir) {
        let Some(file) = SourceFile::read(&path) else {
            continue;
        };
        let lines = file.lines();

        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            let Some((_, label)) = BLOCKING_PATTERNS.iter().find(|(p, _)| code.contains(p)) else {
                continue;
            };

            match enclosing_fn(&lines, idx) {
                Some(f) if f.is_async && !f.is_test => {
                    violations.push(file.violation(idx, line, label));
                }
                _ => {}
            }
        }
    }
}

//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the TUI and the core MUST NOT call sleep
//! methods. Waiting happens on I/O, channels or join handles.
//! **Exceptions**: Frame rate limiting in `tui/src/app.rs`, test code.

use architectural_enforcement::{code_part, enclosing_fn, nearby_contains, rust_sources, SourceFile};

struct SleepPolicy {
    allow_frame_limiting: bool,
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    check_directory(
        "tui/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: true,
        },
    );
    check_directory(
        "conductor/core/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: false,
        },
    );

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nAcceptable: frame rate limiting in tui/src/app.rs, test functions.");
        eprintln!("Instead of sleeping, await the JoinHandle, channel or timeout.");

        panic!("Found {} sleep violation(s)", violations.len());
    }
}

#[test]
fn test_scanned_directories_exist() {
    assert!(!rust_sources("tui/src").is_empty());
    assert!(!rust_sources("conductor/core/src").is_empty());
}

fn check_directory(dir: &str, violations: &mut Vec<String>, policy: &SleepPolicy) {
    for path in rust_sources(dir) {
        let Some(file) = SourceFile::read(&path) else {
            continue;
        };
        let lines = file.lines();

        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                continue;
            }

            if enclosing_fn(&lines, idx).is_some_and(|f| f.is_test) {
                continue;
            }

            if policy.allow_frame_limiting
                && path.ends_with("tui/src/app.rs")
                && is_frame_limiting_context(&lines, idx)
            {
                continue;
            }

            violations.push(file.violation(idx, line, "sleep"));
        }
    }
}

/// Check if sleep is used for frame rate limiting (acceptable in the TUI loop)
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    nearby_contains(
        lines,
        current_idx.saturating_sub(10),
        current_idx + 5,
        &["frame", "fps", "tick_rate"],
    )
}

#[test]
fn test_frame_limiting_detection() {
    let code = vec![
        "async fn render_loop() {",
        "    let frame_duration = Duration::from_millis(33);",
        "    loop {",
        "        render();",
        "        tokio::time::sleep(frame_duration).await;",
        "    }",
        "}",
    ];
    assert!(is_frame_limiting_context(&code, 4));

    let polling = vec![
        "async fn wait_for_answer() {",
        "    while !done() {",
        "        tokio::time::sleep(Duration::from_millis(10)).await;",
        "    }",
        "}",
    ];
    assert!(!is_frame_limiting_context(&polling, 2));
}

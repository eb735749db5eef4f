//! Architectural Enforcement
//!
//! Shared source-scanning helpers for the tests in `tests/`:
//! - No sleep() calls in production code
//! - No blocking I/O inside async functions
//! - The core crate stays free of UI crates
//!
//! The scanners are line based. They are heuristics, not a parser, and only
//! need to be good enough for this workspace's formatting (rustfmt).

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// A source file split into lines
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// File contents
    pub content: String,
}

impl SourceFile {
    /// Read a file, `None` if it cannot be read
    #[must_use]
    pub fn read(path: &Path) -> Option<Self> {
        fs::read_to_string(path).ok().map(|content| Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Lines of the file
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }

    /// Format a violation at a zero-based line index
    #[must_use]
    pub fn violation(&self, idx: usize, line: &str, what: &str) -> String {
        format!(
            "{}:{} - {}: {}",
            self.path.display(),
            idx + 1,
            what,
            line.trim()
        )
    }
}

/// Part of a line before any `//` comment
#[must_use]
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Header of the function enclosing a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnclosingFn {
    /// Declared `async fn`
    pub is_async: bool,
    /// Marked `#[test]` / `#[tokio::test]`, or inside a `#[cfg(test)]` module
    pub is_test: bool,
}

/// Whether a trimmed line declares a function
#[must_use]
pub fn is_fn_header(trimmed: &str) -> bool {
    let rest = trimmed
        .strip_prefix("pub(crate) ")
        .or_else(|| trimmed.strip_prefix("pub "))
        .unwrap_or(trimmed);
    let rest = rest.strip_prefix("async ").unwrap_or(rest);
    rest.starts_with("fn ")
}

/// Find the function a line belongs to, scanning backwards
#[must_use]
pub fn enclosing_fn(lines: &[&str], current_idx: usize) -> Option<EnclosingFn> {
    let fn_idx = (0..=current_idx)
        .rev()
        .find(|&i| is_fn_header(lines[i].trim()))?;
    let header = lines[fn_idx].trim();

    let has_test_attr = (0..fn_idx)
        .rev()
        .map(|i| lines[i].trim())
        .take_while(|l| l.starts_with("#[") || l.starts_with("///"))
        .any(|l| l.starts_with("#[test]") || l.starts_with("#[tokio::test"));

    Some(EnclosingFn {
        is_async: header.contains("async fn "),
        is_test: has_test_attr || in_test_module(lines, current_idx),
    })
}

/// Whether a line sits below a `#[cfg(test)]` attribute
///
/// Test modules sit at the end of a file, so everything after the marker
/// counts as test code.
#[must_use]
pub fn in_test_module(lines: &[&str], current_idx: usize) -> bool {
    lines[..current_idx]
        .iter()
        .any(|l| l.trim().starts_with("#[cfg(test)]"))
}

/// Whether any line in `[from, to)` contains one of `needles` (case-insensitive)
#[must_use]
pub fn nearby_contains(lines: &[&str], from: usize, to: usize, needles: &[&str]) -> bool {
    lines[from..to.min(lines.len())].iter().any(|line| {
        let lower = line.to_lowercase();
        needles.iter().any(|n| lower.contains(n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_header_variants() {
        assert!(is_fn_header("fn main() {"));
        assert!(is_fn_header("pub fn load() -> Result<()> {"));
        assert!(is_fn_header("pub async fn run(&mut self) {"));
        assert!(is_fn_header("pub(crate) fn helper() {"));
        assert!(is_fn_header("async fn step(&mut self) {"));
        assert!(!is_fn_header("let f = fn_name();"));
    }

    #[test]
    fn test_enclosing_fn_detects_async_and_test() {
        let code = vec![
            "pub async fn poll(&mut self) {",
            "    work().await;",
            "}",
            "",
            "#[tokio::test]",
            "async fn test_poll() {",
            "    tokio::time::sleep(d).await;",
            "}",
        ];

        let prod = enclosing_fn(&code, 1).unwrap();
        assert!(prod.is_async);
        assert!(!prod.is_test);

        let test = enclosing_fn(&code, 6).unwrap();
        assert!(test.is_async);
        assert!(test.is_test);
    }

    #[test]
    fn test_cfg_test_module_counts_as_test() {
        let code = vec![
            "fn prod() {}",
            "#[cfg(test)]",
            "mod tests {",
            "    fn helper() {",
            "        std::fs::read(p);",
            "    }",
            "}",
        ];
        assert!(!enclosing_fn(&code, 0).unwrap().is_test);
        assert!(enclosing_fn(&code, 4).unwrap().is_test);
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // sleep(10)"), "let x = 1; ");
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}

//! Source-tree architecture checks
//!
//! These walk the workspace sources and fail on violations of the
//! core/surface split:
//! - narrator-core must not depend on any UI framework
//! - production code must not block on `std::thread::sleep`; the
//!   sequencer's only notion of time is the `Instant` handed to it
//! - no process-wide mutable state (the catalog cache is an explicitly
//!   constructed object, never a global)

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn workspace_root() -> PathBuf {
    // tests/architectural-enforcement -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("workspace root")
        .to_path_buf()
}

/// Every non-test, non-comment Rust source line in a directory, as
/// (path, line_no, line).
fn source_lines(dir: &Path) -> Vec<(PathBuf, usize, String)> {
    let mut lines = Vec::new();
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        let text = fs::read_to_string(entry.path()).expect("read source file");
        // Skip everything from the in-file test module down; unit tests may
        // sleep or fake globals freely.
        let cut = text.find("#[cfg(test)]").unwrap_or(text.len());
        for (i, line) in text[..cut].lines().enumerate() {
            // Doc text may name anything; only code lines are checked.
            if line.trim_start().starts_with("//") {
                continue;
            }
            lines.push((entry.path().to_path_buf(), i + 1, line.to_string()));
        }
    }
    lines
}

#[test]
fn narrator_core_has_no_ui_dependencies() {
    let manifest = workspace_root().join("narrator/core/Cargo.toml");
    let text = fs::read_to_string(&manifest).expect("read narrator-core manifest");

    for forbidden in ["ratatui", "crossterm", "termion", "cursive"] {
        assert!(
            !text.contains(forbidden),
            "narrator-core must not depend on {forbidden} (found in {})",
            manifest.display()
        );
    }
}

#[test]
fn narrator_core_sources_never_import_ui_crates() {
    let src = workspace_root().join("narrator/core/src");
    for (path, line_no, line) in source_lines(&src) {
        assert!(
            !line.contains("ratatui") && !line.contains("crossterm"),
            "{}:{line_no} references a UI crate: {line}",
            path.display()
        );
    }
}

#[test]
fn no_blocking_sleep_in_production_code() {
    for dir in ["narrator/core/src", "tui/src"] {
        let dir = workspace_root().join(dir);
        for (path, line_no, line) in source_lines(&dir) {
            assert!(
                !line.contains("thread::sleep"),
                "{}:{line_no} blocks the thread: {line}",
                path.display()
            );
        }
    }
}

#[test]
fn no_global_mutable_state_in_core() {
    let src = workspace_root().join("narrator/core/src");
    for (path, line_no, line) in source_lines(&src) {
        for forbidden in ["static mut", "lazy_static", "OnceLock", "OnceCell"] {
            assert!(
                !line.contains(forbidden),
                "{}:{line_no} introduces global mutable state: {line}",
                path.display()
            );
        }
    }
}

#[test]
fn surface_grades_only_through_the_core() {
    // The TUI must not talk to the grading service itself.
    let manifest = workspace_root().join("tui/Cargo.toml");
    let text = fs::read_to_string(&manifest).expect("read praxis-tui manifest");
    assert!(
        !text.contains("reqwest"),
        "praxis-tui must reach the grader only through narrator-core"
    );
}

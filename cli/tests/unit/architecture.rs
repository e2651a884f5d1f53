//! Structural tests for layer boundary enforcement.
//!
//! These tests scan source files to verify that the domain layer stays pure
//! and infrastructure never reaches back into command handlers.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines of `path` ahead of its `#[cfg(test)]` module, with
/// 1-based line numbers. Test modules sit at the end of every source file.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

fn find_forbidden(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    violations.push(format!("{rel}:{lineno}: found `{pattern}`: {line}"));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let domain_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join("domain");
    let violations = find_forbidden(
        &domain_dir,
        &["crate::infra", "crate::commands", "std::fs", "std::process", "std::net"],
    );
    assert!(
        violations.is_empty(),
        "Domain layer must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands() {
    let infra_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join("infra");
    let violations = find_forbidden(&infra_dir, &["crate::commands", "crate::cli"]);
    assert!(
        violations.is_empty(),
        "Infra must not depend on command handlers:\n{}",
        violations.join("\n")
    );
}

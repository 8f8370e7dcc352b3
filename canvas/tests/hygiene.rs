//! Hygiene: source-scan budgets for the layout core.
//!
//! The canvas crate runs inside request handlers and editor hosts, so a
//! panic or a silently dropped error takes the caller down with it. Each
//! pattern below has a budget (zero). Sibling `*_test.rs` files are exempt.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: [Budget; 9] = [
    Budget { pattern: ".unwrap()", max: 0, why: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "aborts the caller" },
    Budget { pattern: "unreachable!(", max: 0, why: "aborts the caller" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished path" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished path" },
    Budget { pattern: "let _ =", max: 0, why: "discards a result unread" },
    Budget { pattern: ".ok()", max: 0, why: "discards an error unread" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn production_sources() -> Vec<SourceFile> {
    let mut files = Vec::new();
    walk(Path::new("src"), &mut files);
    files
}

fn walk(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let name = path.to_string_lossy().to_string();
        if !name.ends_with(".rs") || name.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: name, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = production_sources();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")), "run from the canvas crate root");
}

#[test]
fn budgets_hold() {
    let files = production_sources();
    let mut failures = Vec::new();

    for budget in &BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, n)| n).sum();
        if count > budget.max {
            let listing: Vec<String> = found.iter().map(|(path, n)| format!("    {path}: {n}")).collect();
            failures.push(format!(
                "{} ({}): found {count}, max {}\n{}",
                budget.pattern,
                budget.why,
                budget.max,
                listing.join("\n")
            ));
        }
    }

    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

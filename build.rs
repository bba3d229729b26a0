use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set");
    let src = PathBuf::from(manifest_dir).join("src");
    println!("cargo:rerun-if-changed={}", src.display());

    let mut files = Vec::new();
    collect_rust_files(&src, &mut files);

    let mut violations = Vec::new();
    for file in &files {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        let rel = file.strip_prefix(&src).unwrap_or(file).display().to_string();
        for (line_num, msg) in dead_code_allows(&content)
            .into_iter()
            .chain(unserialized_env_mutations(&content))
        {
            violations.push(format!("  src/{}:{} - {}", rel, line_num, msg));
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("SOURCE CHECKS FAILED");
        eprintln!("========================================");
        for violation in &violations {
            eprintln!("{}", violation);
        }
        eprintln!("========================================\n");
        panic!("Build failed: {} source check violation(s)", violations.len());
    }
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, files);
        } else if path.extension().is_some_and(|e| e == "rs") {
            files.push(path);
        }
    }
}

/// Dead code gets deleted, not silenced.
fn dead_code_allows(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
                && trimmed.contains("dead_code")
        })
        .map(|(i, _)| (i + 1, "#[allow(dead_code)] is not allowed".to_string()))
        .collect()
}

/// Tests that touch environment variables must run under `#[serial]`.
fn unserialized_env_mutations(content: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let mut test_start: Option<usize> = None;
    let mut has_serial = false;
    let mut depth: i32 = 0;
    let mut entered_body = false;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed == "#[test]" {
            test_start = Some(i + 1);
            has_serial = false;
            entered_body = false;
            depth = 0;
            continue;
        }
        if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
            has_serial = true;
            continue;
        }
        let Some(start) = test_start else {
            continue;
        };

        for c in line.chars() {
            match c {
                '{' => {
                    depth += 1;
                    entered_body = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        let mutates_env = !trimmed.starts_with("//")
            && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"));
        if mutates_env && !has_serial {
            violations.push((start, "test mutates env without #[serial]".to_string()));
            test_start = None;
            continue;
        }

        if entered_body && depth <= 0 {
            test_start = None;
        }
    }

    violations
}

use std::path::{Path, PathBuf};

use oxidized_bashrc::analyze::{analyze_content, analyze_file, collect_startup_files, run};
use oxidized_bashrc::catalog::Catalog;
use oxidized_bashrc::config::{Config, Suppression};

fn builtin() -> Catalog {
    Catalog::builtin().unwrap()
}

fn fixture(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

#[test]
fn clean_file_has_no_issues() {
    let report = analyze_file(&fixture("clean.bashrc"), &builtin(), &Config::default());
    assert!(report.error.is_none());
    assert!(
        report.issues.is_empty(),
        "Expected no issues, got: {:?}",
        report.issues
    );
    assert!(report.lines_scanned > 0);
}

#[test]
fn dirty_file_reports_issues_with_line_numbers() {
    let report = analyze_file(&fixture("dirty.bashrc"), &builtin(), &Config::default());

    let found: Vec<(usize, &str)> = report
        .issues
        .iter()
        .map(|i| (i.line, i.category.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (4, "Direct Path Management"),
            (5, "Module Load in bashrc"),
            (6, "Conda Activation"),
            (7, "Hardcoded Paths"),
            (9, "Conflicting Modules"),
        ]
    );

    let first = &report.issues[0];
    assert_eq!(first.text, "export PATH=/usr/local/bin");
    assert_eq!(first.problem, "PATH is overwritten instead of extended");
    assert!(!first.recommendation.is_empty());
    assert!(first.explanation.is_none());
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let content = "# export PATH=/usr/local/bin\n\n   \n   # conda activate base\n";
    let report = analyze_content(Path::new("x"), content, &builtin(), &Config::default());
    assert!(report.issues.is_empty());
    assert_eq!(report.lines_scanned, 0);
}

#[test]
fn lines_are_stripped_before_matching() {
    let content = "if true; then\n    conda activate myenv   \nfi\n";
    let report = analyze_content(Path::new("x"), content, &builtin(), &Config::default());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].line, 2);
    assert_eq!(report.issues[0].text, "conda activate myenv");
}

#[test]
fn inline_marker_skips_line() {
    let content = "conda activate base # bashrc:ignore\nconda activate base # OXIDIZED-BASHRC:IGNORE\n";
    let report = analyze_content(Path::new("x"), content, &builtin(), &Config::default());
    assert!(report.issues.is_empty());
}

#[test]
fn config_suppression_moves_issue_to_suppressed() {
    let config = Config {
        suppress: vec![Suppression {
            category: "Conda Activation".to_string(),
            file: "dirty.bashrc".to_string(),
            lines: Some("6".to_string()),
            reason: "needed on login node".to_string(),
        }],
        ..Config::default()
    };
    let report = analyze_file(&fixture("dirty.bashrc"), &builtin(), &config);

    assert!(report.issues.iter().all(|i| i.category != "Conda Activation"));
    assert_eq!(report.suppressed.len(), 1);
    let suppressed = &report.suppressed[0];
    assert!(suppressed.suppressed);
    assert_eq!(suppressed.line, 6);
    assert_eq!(
        suppressed.suppression_reason.as_deref(),
        Some("needed on login node")
    );
}

#[test]
fn suppression_outside_line_range_does_not_apply() {
    let config = Config {
        suppress: vec![Suppression {
            category: "Conda Activation".to_string(),
            file: String::new(),
            lines: Some("1-3".to_string()),
            reason: "r".to_string(),
        }],
        ..Config::default()
    };
    let report = analyze_file(&fixture("dirty.bashrc"), &builtin(), &config);
    assert!(report.suppressed.is_empty());
    assert!(report.issues.iter().any(|i| i.category == "Conda Activation"));
}

#[test]
fn suppression_for_other_file_does_not_apply() {
    let config = Config {
        suppress: vec![Suppression {
            category: "Conda Activation".to_string(),
            file: ".zshrc".to_string(),
            lines: None,
            reason: "r".to_string(),
        }],
        ..Config::default()
    };
    let report = analyze_file(&fixture("dirty.bashrc"), &builtin(), &config);
    assert!(report.suppressed.is_empty());
}

#[test]
fn invalid_utf8_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".bashrc");
    std::fs::write(&path, b"export X=\xff\xfe\nconda activate myenv\n").unwrap();

    let report = analyze_file(&path, &builtin(), &Config::default());
    assert!(report.error.is_none());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].line, 2);
}

#[test]
fn unreadable_file_is_recorded_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // Reading a directory as a file fails.
    let report = analyze_file(dir.path(), &builtin(), &Config::default());
    assert!(report.error.is_some());
    assert!(report.issues.is_empty());
}

#[test]
fn directories_expand_to_startup_files() {
    let files = collect_startup_files(&[fixture("home")]);
    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![".bashrc", ".profile"]);
}

#[test]
fn run_keeps_input_order_and_aggregates() {
    let paths = vec![fixture("dirty.bashrc"), fixture("clean.bashrc"), fixture("home")];
    let report = run(&paths, &builtin(), &Config::default());

    let files: Vec<&Path> = report.files.iter().map(|f| f.file.as_path()).collect();
    assert_eq!(files.len(), 4);
    assert!(files[0].ends_with("dirty.bashrc"));
    assert!(files[1].ends_with("clean.bashrc"));
    assert!(files[2].ends_with("home/.bashrc"));
    assert!(files[3].ends_with("home/.profile"));

    assert!(!report.passed);
    assert_eq!(report.issue_count(), 6);
    assert_eq!(report.catalog, "built-in");

    let by_category = report.count_by_category();
    assert_eq!(by_category[0], ("Direct Path Management", 1));
    assert!(by_category.contains(&("Module Load in bashrc", 2)));
}

#[test]
fn run_on_clean_file_passes() {
    let report = run(&[fixture("clean.bashrc")], &builtin(), &Config::default());
    assert!(report.passed);
    assert_eq!(report.issue_count(), 0);
}

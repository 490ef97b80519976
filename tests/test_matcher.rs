use oxidized_bashrc::catalog::Catalog;

fn builtin() -> Catalog {
    Catalog::builtin().expect("built-in catalog should load")
}

fn categories_for(catalog: &Catalog, line: &str) -> Vec<String> {
    catalog
        .check_line(line)
        .iter()
        .map(|m| m.category.to_string())
        .collect()
}

const PATH_RULES: &str = r#"
categories:
  - name: Direct Path Management
    description: PATH overwrites
    patterns:
      - problem: PATH is overwritten
        detector: '(^|[\s;])PATH='
        exclude_pattern: '\$\{?PATH\}?'
        ai_recommendation: append instead
  - name: Hardcoded Paths
    description: absolute paths
    patterns:
      - problem: hardcoded home
        detector: '/home/'
        ai_recommendation: use $HOME
"#;

#[test]
fn path_overwrite_is_flagged() {
    let catalog = builtin();
    let categories = categories_for(&catalog, "export PATH=/usr/local/bin");
    assert!(categories.contains(&"Direct Path Management".to_string()));
}

#[test]
fn path_append_is_suppressed_by_exclude_pattern() {
    let catalog = builtin();
    let categories = categories_for(&catalog, "export PATH=/usr/local/bin:$PATH");
    assert!(!categories.contains(&"Direct Path Management".to_string()));

    let categories = categories_for(&catalog, "export PATH=\"${PATH}:/opt/tools/bin\"");
    assert!(!categories.contains(&"Direct Path Management".to_string()));
}

#[test]
fn conda_activate_matches_exactly_once() {
    let catalog = builtin();
    let conda: Vec<_> = catalog
        .check_line("conda activate myenv")
        .into_iter()
        .filter(|m| m.category == "Conda Activation")
        .collect();
    assert_eq!(conda.len(), 1);
}

#[test]
fn module_load_is_flagged() {
    let catalog = builtin();
    let categories = categories_for(&catalog, "module load gcc/12.3.0");
    assert!(categories.contains(&"Module Load in bashrc".to_string()));
}

#[test]
fn hardcoded_home_path_is_flagged_even_when_appending() {
    let catalog = builtin();
    let categories = categories_for(&catalog, "export PATH=/home/user/bin:$PATH");
    assert!(categories.contains(&"Hardcoded Paths".to_string()));
    assert!(!categories.contains(&"Direct Path Management".to_string()));
}

#[test]
fn mixed_compilers_are_conflicting() {
    let catalog = builtin();
    let categories = categories_for(&catalog, "module load gcc/12.3.0 intel/2023.1");
    assert!(categories.contains(&"Conflicting Modules".to_string()));
    assert!(categories.contains(&"Module Load in bashrc".to_string()));
}

#[test]
fn benign_lines_do_not_match() {
    let catalog = builtin();
    for line in [
        "alias ll='ls -alF'",
        "export EDITOR=vim",
        "export MANPATH=/usr/share/man",
        "export PATH=\"$HOME/bin:$PATH\"",
        "HISTSIZE=10000",
    ] {
        assert!(
            catalog.check_line(line).is_empty(),
            "unexpected match on {line:?}: {:?}",
            categories_for(&catalog, line)
        );
        assert!(!catalog.matches_line(line));
    }
}

#[test]
fn matching_is_case_insensitive() {
    let catalog = builtin();
    let lower = categories_for(&catalog, "export PATH=/usr/local/bin");
    let upper = categories_for(&catalog, "EXPORT PATH=/usr/local/bin");
    assert_eq!(lower, upper);
    assert!(!upper.is_empty());

    assert_eq!(
        categories_for(&catalog, "CONDA ACTIVATE myenv"),
        categories_for(&catalog, "conda activate myenv")
    );
}

#[test]
fn check_line_is_idempotent() {
    let catalog = builtin();
    let line = "module load gcc/12.3.0 intel/2023.1";
    let first = catalog.check_line(line);
    let second = catalog.check_line(line);
    assert_eq!(first, second);
}

#[test]
fn detector_miss_never_reported() {
    let catalog = Catalog::from_yaml_str(PATH_RULES).unwrap();
    let hits = catalog.check_line("echo hello");
    assert!(hits.is_empty());
}

#[test]
fn one_line_can_match_several_categories() {
    let catalog = Catalog::from_yaml_str(PATH_RULES).unwrap();
    let hits = catalog.check_line("PATH=/home/me/bin");
    let categories: Vec<&str> = hits.iter().map(|m| m.category).collect();
    assert_eq!(categories, vec!["Direct Path Management", "Hardcoded Paths"]);
}

#[test]
fn exclusion_applies_to_whole_line() {
    // The exclude pattern matches anywhere, even before the detector match.
    let catalog = Catalog::from_yaml_str(PATH_RULES).unwrap();
    let hits = catalog.check_line("OLD=$PATH; PATH=/opt/bin");
    assert!(hits.iter().all(|m| m.category != "Direct Path Management"));
}

#[test]
fn duplicate_patterns_are_not_deduplicated() {
    let yaml = r#"
categories:
  - name: Twice
    description: same detector twice
    patterns:
      - { problem: first, detector: 'conda', ai_recommendation: r }
      - { problem: second, detector: 'conda', ai_recommendation: r }
"#;
    let catalog = Catalog::from_yaml_str(yaml).unwrap();
    let hits = catalog.check_line("conda activate x");
    let problems: Vec<&str> = hits.iter().map(|m| m.pattern.problem()).collect();
    assert_eq!(problems, vec!["first", "second"]);
}

#[test]
fn detector_search_is_unanchored() {
    let yaml = "categories:\n  - name: C\n    description: d\n    patterns:\n      - { problem: p, detector: 'activate', ai_recommendation: r }\n";
    let catalog = Catalog::from_yaml_str(yaml).unwrap();
    assert_eq!(catalog.check_line("  source ~/env/bin/activate  ").len(), 1);
}

#[test]
fn catalog_is_shared_across_threads() {
    let catalog = builtin();
    let lines = [
        "export PATH=/usr/local/bin",
        "conda activate myenv",
        "module load gcc/12.3.0",
        "export EDITOR=vim",
    ];
    let expected: Vec<usize> = lines.iter().map(|l| catalog.check_line(l).len()).collect();

    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = lines
            .iter()
            .map(|line| {
                let catalog = &catalog;
                s.spawn(move || catalog.check_line(line).len())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, expected);
}

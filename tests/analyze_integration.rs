mod common;

use common::{branchy_python, FixtureRepo, StubLinter, StubRegistry};
use pretty_assertions::assert_eq;
use repo_analyzer::config::OutputFormat;
use repo_analyzer::core::{LinterStatus, Severity};
use repo_analyzer::io::writers::{write_reports, HTML_REPORT, JSON_REPORT, MARKDOWN_REPORT};
use repo_analyzer::{AnalysisConfig, Error, RepositoryAnalyzer};
use std::fs;
use tempfile::TempDir;

fn fixture() -> FixtureRepo {
    let repo = FixtureRepo::new();
    let core = branchy_python(24, 600);
    let dump = format!("[{}0]", "0,".repeat(40_000));
    repo.commit(
        &[
            ("app/core.py", core.as_str()),
            ("app/util.py", "def helper(x):\n    return x + 1\n"),
            ("requirements.txt", "flask==1.0\nrich>=13.0\nmissing-pkg==0.1\n"),
            ("README.md", "# Fixture\n\nA sample project.\n"),
            ("data/dump.json", dump.as_str()),
        ],
        "initial import",
    );
    for i in 1..12 {
        let revised = format!("{}# revision {}\n", core, i);
        repo.commit(&[("app/core.py", revised.as_str())], &format!("revision {}", i));
    }
    repo
}

fn analyzer() -> RepositoryAnalyzer {
    let config = AnalysisConfig {
        max_file_size: 64 * 1024,
        token_encoding: "estimate".into(),
        max_workers: 2,
        ..Default::default()
    };
    RepositoryAnalyzer::new(config)
        .unwrap()
        .with_linter(Box::new(StubLinter::with_codes(&[
            "D100-doc",
            "D101-doc",
            "E501-style",
            "F401",
        ])))
        .with_registry(Box::new(StubRegistry::with(&[
            ("flask", "2.0.1"),
            ("rich", "13.0.0"),
        ])))
}

#[test]
fn test_full_run_over_local_clone() {
    let repo = fixture();
    let result = analyzer().analyze_url(&repo.url()).unwrap();
    let analysis = &result.analysis;

    assert_eq!(result.repo_name, "fixture");

    let stats = &analysis.basic_stats;
    assert_eq!(stats.total_files, 4);
    assert_eq!(stats.skipped_files, 1);
    assert_eq!(stats.extensions[0].extension, ".py");

    let quality = &analysis.code_quality;
    assert_eq!(quality.metrics.documentation_issues, 2);
    assert_eq!(quality.metrics.style_issues, 1);
    assert_eq!(quality.metrics.bug_risks, 1);
    assert_eq!(quality.linter, LinterStatus::Completed { issues: 4 });

    assert_eq!(analysis.hot_spots.len(), 1);
    let spot = &analysis.hot_spots[0];
    assert_eq!(spot.file, "app/core.py");
    assert_eq!(spot.complexity, 25);
    assert_eq!(spot.changes, 12);
    assert_eq!(spot.severity, Severity::High);
    assert!(spot.recommendation.contains("modules"));

    let deps = &analysis.dependencies;
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0].name, "flask");
    assert!(deps[0].outdated);
    assert_eq!(deps[1].name, "rich");
    assert!(!deps[1].outdated);

    let debt = &analysis.tech_debt;
    let names: Vec<_> = debt.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Code Organization", "Documentation", "Testing"]);
    // 25 * 2 + 2 * 1.5 + 25 * 1.5
    assert_eq!(debt.total_hours, 90.5);
}

#[test]
fn test_subdirectory_url_limits_scan() {
    let repo = fixture();
    let url = format!("{}/tree/main/app", repo.url());
    let result = analyzer().analyze_url(&url).unwrap();

    let stats = &result.analysis.basic_stats;
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.skipped_files, 0);
    // paths stay relative to the repository root
    assert_eq!(result.analysis.hot_spots[0].file, "app/core.py");
    assert!(result.analysis.dependencies.is_empty());
}

#[test]
fn test_missing_subdirectory_is_fatal() {
    let repo = fixture();
    let url = format!("{}/tree/main/nope", repo.url());
    let err = analyzer().analyze_url(&url).unwrap_err();
    assert!(matches!(err, Error::SubdirectoryNotFound { .. }));
}

#[test]
fn test_scratch_clone_removed_after_success_and_failure() {
    let repo = fixture();
    let scratch = TempDir::new().unwrap();
    let analyzer = analyzer().with_scratch_dir(scratch.path());
    let leftovers = || fs::read_dir(scratch.path()).unwrap().count();

    analyzer.analyze_url(&repo.url()).unwrap();
    assert_eq!(leftovers(), 0);

    let missing = format!("{}/tree/main/nope", repo.url());
    assert!(analyzer.analyze_url(&missing).is_err());
    assert_eq!(leftovers(), 0);
}

#[test]
fn test_unreachable_repository_is_fatal() {
    let temp = TempDir::new().unwrap();
    let url = temp.path().join("absent").to_string_lossy().into_owned();
    let err = analyzer().analyze_url(&url).unwrap_err();
    assert!(matches!(err, Error::Clone { .. }));
}

#[test]
fn test_reports_written_for_run() {
    let repo = fixture();
    let result = analyzer().analyze_url(&repo.url()).unwrap();
    let out = TempDir::new().unwrap();

    write_reports(&result, out.path(), OutputFormat::Json).unwrap();

    let markdown = fs::read_to_string(out.path().join(MARKDOWN_REPORT)).unwrap();
    assert!(markdown.starts_with("# Repository Analysis Report: fixture"));
    assert!(markdown.contains("### app/core.py"));
    assert!(markdown.contains("### flask"));

    let html = fs::read_to_string(out.path().join(HTML_REPORT)).unwrap();
    assert!(html.contains("app/core.py"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(JSON_REPORT)).unwrap()).unwrap();
    assert_eq!(json["analysis"]["hot_spots"][0]["changes"], 12);
}

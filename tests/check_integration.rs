use fragcheck::{ChangelogChecker, Error, RepositoryHost, TriggerInput, ViolationKind};
use std::cell::Cell;
use std::fs;
use tempfile::TempDir;

const POLICY: &str = r#"
[tool.astropy-bot.towncrier_changelog]
enabled = true
changelog_skip_label = "no-changelog-entry-needed"
verify_pr_number = true

[tool.towncrier]
package = "astropy"
filename = "CHANGES.rst"
directory = "docs/changes"

[[tool.towncrier.type]]
directory = "feature"
name = "New Features"
showcontent = true

[[tool.towncrier.type]]
directory = "bugfix"
name = "Bug Fixes"
showcontent = true
"#;

/// in-memory code host that counts remote calls
struct FakeHost {
    pyproject: String,
    files: Vec<String>,
    calls: Cell<usize>,
}

impl FakeHost {
    fn new(pyproject: &str, files: &[&str]) -> Self {
        Self {
            pyproject: pyproject.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            calls: Cell::new(0),
        }
    }
}

impl RepositoryHost for FakeHost {
    fn fetch_file(&self, repo: &str, path: &str) -> fragcheck::Result<String> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(repo, "astropy/astropy");
        assert_eq!(path, "pyproject.toml");
        Ok(self.pyproject.clone())
    }

    fn list_pull_request_files(&self, repo: &str, number: u64) -> fragcheck::Result<Vec<String>> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(repo, "astropy/astropy");
        assert_eq!(number, 42);
        Ok(self.files.clone())
    }
}

fn write_payload(temp_dir: &TempDir, author: &str, labels: &[&str]) -> std::path::PathBuf {
    let payload = serde_json::json!({
        "number": 42,
        "pull_request": {
            "user": { "login": author },
            "base": { "repo": { "full_name": "astropy/astropy" } },
            "labels": labels.iter().map(|l| serde_json::json!({ "name": l })).collect::<Vec<_>>(),
        }
    });

    let path = temp_dir.path().join("event.json");
    fs::write(&path, payload.to_string()).unwrap();
    path
}

fn pull_request_input(temp_dir: &TempDir, author: &str, labels: &[&str]) -> TriggerInput {
    TriggerInput::new("pull_request").event_path(write_payload(temp_dir, author, labels))
}

#[test]
fn test_non_pull_request_event_is_noop() {
    let host = FakeHost::new(POLICY, &[]);

    for event_name in ["push", "issue_comment", "workflow_dispatch"] {
        let report = ChangelogChecker::run(&TriggerInput::new(event_name), &host).unwrap();
        assert!(report.verdict.is_pass());
        assert_eq!(report.verdict.message(), format!("No-op for {}", event_name));
    }

    assert_eq!(host.calls.get(), 0);
}

#[test]
fn test_valid_fragment_passes() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(
        POLICY,
        &["astropy/io/fits/hdu.py", "docs/changes/42.bugfix.rst"],
    );

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(
        report.verdict.message(),
        "Changelog file (docs/changes/42.bugfix.rst) correctly added for PR 42."
    );
    assert!(report.notes.contains(&"Base repository: astropy/astropy".to_string()));
    assert!(report.notes.contains(&"PR author: octocat".to_string()));
    assert_eq!(host.calls.get(), 2);
}

#[test]
fn test_missing_fragment_fails() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["other/42.feature.rst", "42.feature.rst"]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert_eq!(
        report.verdict.violation_kind(),
        Some(ViolationKind::MissingFragment)
    );
    assert_eq!(
        report.verdict.message(),
        "No changelog file was added in the correct directories for PR 42"
    );
}

#[test]
fn test_unconfigured_type_fails() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["docs/changes/42.doc.rst"]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert_eq!(report.verdict.violation_kind(), Some(ViolationKind::UnknownType));
    assert!(report.verdict.message().contains("not one of the configured types"));
}

#[test]
fn test_number_mismatch_fails() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["docs/changes/999.feature.rst"]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert_eq!(
        report.verdict.violation_kind(),
        Some(ViolationKind::NumberMismatch)
    );
}

#[test]
fn test_disabled_policy_passes_regardless_of_files() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new("[tool.astropy-bot.towncrier_changelog]\nenabled = false\n", &[]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(
        report.verdict.message(),
        "Skipping towncrier changelog plugin as disabled in config"
    );
    // the file list is never requested
    assert_eq!(host.calls.get(), 1);
}

#[test]
fn test_automation_author_passes() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["setup.py"]);

    let report = ChangelogChecker::run(
        &pull_request_input(&temp_dir, "pre-commit-ci[bot]", &[]),
        &host,
    )
    .unwrap();

    assert!(report.verdict.is_pass());
    assert!(report.verdict.message().contains("pre-commit-ci[bot]"));
}

#[test]
fn test_noop_label_passes_and_skips_whatsnew() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["setup.py"]);

    let report = ChangelogChecker::run(
        &pull_request_input(
            &temp_dir,
            "octocat",
            &["skip-changelog-checks", "whatsnew-needed"],
        ),
        &host,
    )
    .unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(
        report.verdict.message(),
        "Skipping towncrier changelog check because \"skip-changelog-checks\" label is set"
    );
}

#[test]
fn test_skip_label_with_fragment_fails() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["docs/changes/42.feature.rst"]);

    let report = ChangelogChecker::run(
        &pull_request_input(&temp_dir, "octocat", &["no-changelog-entry-needed"]),
        &host,
    )
    .unwrap();

    assert_eq!(
        report.verdict.violation_kind(),
        Some(ViolationKind::SkipLabelContradiction)
    );
    assert_eq!(
        report.verdict.message(),
        "Changelog exists when \"no-changelog-entry-needed\" label is set"
    );
}

#[test]
fn test_skip_label_without_fragment_passes() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["astropy/units/core.py"]);

    let report = ChangelogChecker::run(
        &pull_request_input(&temp_dir, "octocat", &["no-changelog-entry-needed"]),
        &host,
    )
    .unwrap();

    assert!(report.verdict.is_pass());
}

#[test]
fn test_whatsnew_entry_checks() {
    let labels = ["whatsnew-needed"];

    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(
        POLICY,
        &["docs/changes/42.feature.rst", "docs/whatsnew/7.0.rst"],
    );
    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &labels), &host).unwrap();
    assert!(report.verdict.is_pass());
    assert!(
        report
            .notes
            .contains(&"\"whatsnew-needed\" present and docs/whatsnew/7.0.rst is modified: OK".to_string())
    );

    let host = FakeHost::new(POLICY, &["docs/changes/42.feature.rst"]);
    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &labels), &host).unwrap();
    assert_eq!(
        report.verdict.violation_kind(),
        Some(ViolationKind::MissingWhatsNew)
    );

    let host = FakeHost::new(
        POLICY,
        &[
            "docs/changes/42.feature.rst",
            "docs/whatsnew/7.0.rst",
            "docs/whatsnew/7.1.rst",
        ],
    );
    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &labels), &host).unwrap();
    assert_eq!(
        report.verdict.violation_kind(),
        Some(ViolationKind::TooManyWhatsNew)
    );
}

#[test]
fn test_missing_policy_section_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new("[tool.other-bot.towncrier_changelog]\nenabled = true\n", &[]);

    let err = ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host)
        .unwrap_err();

    assert!(matches!(err, Error::MissingSection { .. }));
    assert_eq!(
        err.to_string(),
        "Missing [tool.astropy-bot.towncrier_changelog] section."
    );
}

#[test]
fn test_disabled_policy_passes_with_broken_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let policy = r#"
[tool.astropy-bot.towncrier_changelog]
enabled = false
whatsnew_pattern = "("
"#;
    let host = FakeHost::new(policy, &[]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(
        report.verdict.message(),
        "Skipping towncrier changelog plugin as disabled in config"
    );
    assert_eq!(host.calls.get(), 1);
}

#[test]
fn test_automation_author_passes_without_towncrier_table() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new("[tool.astropy-bot.towncrier_changelog]\nenabled = true\n", &[]);

    let report = ChangelogChecker::run(
        &pull_request_input(&temp_dir, "pre-commit-ci[bot]", &[]),
        &host,
    )
    .unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(
        report.verdict.message(),
        "Skipping towncrier changelog check for bot \"pre-commit-ci[bot]\""
    );
    assert_eq!(host.calls.get(), 1);
}

#[test]
fn test_noop_label_passes_with_singlefile_typo() {
    let temp_dir = TempDir::new().unwrap();
    let policy = POLICY.replace("directory = \"docs/changes\"", "singlefile = true");
    let host = FakeHost::new(&policy, &["setup.py"]);

    let report = ChangelogChecker::run(
        &pull_request_input(&temp_dir, "octocat", &["skip-changelog-checks"]),
        &host,
    )
    .unwrap();

    assert!(report.verdict.is_pass());
    assert_eq!(host.calls.get(), 1);

    // the same policy still fails for a pull request that needs the full check
    let err = ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { .. }));
}

#[test]
fn test_exemptions_pass_with_otherwise_invalid_policy() {
    let broken_pattern = r#"
[tool.astropy-bot.towncrier_changelog]
enabled = true
whatsnew_pattern = "("

[tool.towncrier]
package = "astropy"
"#;
    let missing_towncrier = "[tool.astropy-bot.towncrier_changelog]\nenabled = true\n";
    let singlefile_typo = r#"
[tool.astropy-bot.towncrier_changelog]
enabled = true

[tool.towncrier]
singlefile = true
"#;

    for policy in [broken_pattern, missing_towncrier, singlefile_typo] {
        let disabled = policy.replace("enabled = true", "enabled = false");
        let cases: [(&str, &str, &[&str]); 3] = [
            (disabled.as_str(), "octocat", &[]),
            (policy, "meeseeksmachine", &[]),
            (policy, "octocat", &["skip-changelog-checks"]),
        ];

        for (pyproject, author, labels) in cases {
            let temp_dir = TempDir::new().unwrap();
            let host = FakeHost::new(pyproject, &[]);
            let report =
                ChangelogChecker::run(&pull_request_input(&temp_dir, author, labels), &host)
                    .unwrap();
            assert!(report.verdict.is_pass(), "{} / {}", author, pyproject);
            assert_eq!(host.calls.get(), 1);
        }

        let temp_dir = TempDir::new().unwrap();
        let host = FakeHost::new(policy, &[]);
        assert!(
            ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).is_err()
        );
    }
}

#[test]
fn test_custom_bot_username() {
    let temp_dir = TempDir::new().unwrap();
    let policy = POLICY.replace("astropy-bot", "sunpy-bot");
    let host = FakeHost::new(&policy, &["docs/changes/42.feature.rst"]);

    let input = pull_request_input(&temp_dir, "octocat", &[]).bot_username("sunpy-bot");
    let report = ChangelogChecker::run(&input, &host).unwrap();

    assert!(report.verdict.is_pass());
    assert!(report.notes.contains(&"Bot username: sunpy-bot".to_string()));
}

#[test]
fn test_local_config_file_overrides_remote() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("pyproject.toml");
    fs::write(
        &config_path,
        POLICY.replace("docs/changes", "changelog"),
    )
    .unwrap();

    // remote policy would reject this path
    let host = FakeHost::new(POLICY, &["changelog/42.feature.rst"]);
    let input = pull_request_input(&temp_dir, "octocat", &[]).config_file(Some(config_path));
    let report = ChangelogChecker::run(&input, &host).unwrap();

    assert!(report.verdict.is_pass());
    // only the file list went to the host
    assert_eq!(host.calls.get(), 1);
}

#[test]
fn test_section_directories_from_package() {
    let policy = r#"
[tool.astropy-bot.towncrier_changelog]
enabled = true

[tool.towncrier]
package = "sunpy"
package_dir = "."

[[tool.towncrier.section]]
name = ""
path = ""

[[tool.towncrier.section]]
name = "sunpy.map"
path = "map"
"#;

    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(policy, &["sunpy/map/newsfragments/42.removal.rst"]);
    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();

    assert!(report.verdict.is_pass());
}

#[test]
fn test_report_serializes_for_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let host = FakeHost::new(POLICY, &["README.rst"]);

    let report =
        ChangelogChecker::run(&pull_request_input(&temp_dir, "octocat", &[]), &host).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["verdict"]["status"], "fail");
    assert_eq!(json["verdict"]["violation"]["kind"], "missing_fragment");
    assert!(json["notes"].as_array().unwrap().len() >= 4);
}

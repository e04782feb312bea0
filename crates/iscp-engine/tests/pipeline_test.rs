use std::cell::RefCell;
use std::fs::File;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use iscp_config::Config;
use iscp_engine::{Pipeline, Publisher};
use iscp_vcs::{CommandOutput, CommandRunner, CommandSpec, GitClient, VcsError};

const DATASET: &str = "\
name,email,phone,city
Alice,alice@example.com,15551234567,Pune
Bob,bob-at-example.com,12345,Delhi
Carol,,,Mumbai
";

/// Answers every git command with success, optionally failing one subcommand
#[derive(Default)]
struct FakeGit {
    calls: RefCell<Vec<Vec<String>>>,
    fail_on: Option<&'static str>,
}

impl CommandRunner for FakeGit {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, VcsError> {
        self.calls.borrow_mut().push(spec.args.clone());
        let sub = spec.args.first().map(String::as_str).unwrap_or_default();
        let code = if self.fail_on == Some(sub) { 1 } else { 0 };
        let stdout = if sub == "status" { "A  README.md\n" } else { "" };
        Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: if code == 0 { String::new() } else { "error: failed to push some refs".to_string() },
        })
    }
}

fn workspace(csv: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("iscp_pii_dataset_-_Sheet1.csv"), csv).unwrap();
    dir
}

fn publishing_config() -> Config {
    let mut config = Config::default();
    config.publish.user = Some("octocat".to_string());
    config
}

fn read_sheet(path: &Path) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range("Sheet1").unwrap()
}

fn string(s: &str) -> Data {
    Data::String(s.to_string())
}

#[test]
fn test_package_masks_and_bundles() {
    let dir = workspace(DATASET);
    let pipeline = Pipeline::new(Config::default(), dir.path());

    let report = pipeline.package().unwrap();

    assert_eq!(report.masking.rows, 3);
    assert_eq!(report.masking.emails_masked, 1);
    assert_eq!(report.masking.phones_masked, 1);
    assert_eq!(report.columns, 4);
    assert!(report.published.is_none());

    let range = read_sheet(&dir.path().join("iscp_pii_dataset_cleaned.xlsx"));
    assert_eq!(range.get_size(), (4, 4));
    assert_eq!(range.get((0, 1)), Some(&string("email")));
    assert_eq!(range.get((1, 1)), Some(&string("***@example.com")));
    assert_eq!(range.get((1, 2)), Some(&string("15551******")));
    assert_eq!(range.get((2, 1)), Some(&string("bob-at-example.com")));
    assert_eq!(range.get((2, 2)), Some(&Data::Float(12345.0)));
    assert_eq!(range.get((3, 1)), Some(&Data::Empty));
    assert_eq!(range.get((3, 3)), Some(&string("Mumbai")));

    let diagram = std::fs::read_to_string(dir.path().join("architecture.mmd")).unwrap();
    assert_eq!(diagram, iscp_export::ARCHITECTURE_DIAGRAM);
    let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.contains("# ISCP PII Project"));

    let archive_path = dir.path().join("iscp_pii_project.zip");
    let archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["README.md", "architecture.mmd", "iscp_pii_dataset_cleaned.xlsx"]
    );
    assert_eq!(report.archive_entries.len(), 3);

    assert_eq!(report.outputs.len(), 4);
    let archive_output = report.output(&archive_path).unwrap();
    assert_eq!(archive_output.blake3.len(), 64);
    assert!(archive_output.size_bytes > 0);
}

#[test]
fn test_dataset_without_pii_columns_is_unchanged() {
    let dir = workspace("id,city\n1,Pune\n2,Delhi\n");
    let pipeline = Pipeline::new(Config::default(), dir.path());

    let cleaned = pipeline.clean().unwrap();

    assert_eq!(cleaned.rows, 2);
    assert_eq!(cleaned.masking.emails_masked + cleaned.masking.phones_masked, 0);

    let range = read_sheet(&cleaned.spreadsheet);
    assert_eq!(range.get_size(), (3, 2));
    assert_eq!(range.get((1, 0)), Some(&Data::Float(1.0)));
    assert_eq!(range.get((2, 1)), Some(&string("Delhi")));
}

#[test]
fn test_trimmed_fields_are_masked() {
    let dir = workspace("name, email , phone\nAlice, alice@example.com , 15551234567 \n");
    let mut config = Config::default();
    config.dataset.trim = true;

    let cleaned = Pipeline::new(config, dir.path()).clean().unwrap();

    assert_eq!(cleaned.masking.emails_masked, 1);
    assert_eq!(cleaned.masking.phones_masked, 1);
    let range = read_sheet(&cleaned.spreadsheet);
    assert_eq!(range.get((0, 1)), Some(&string("email")));
    assert_eq!(range.get((1, 1)), Some(&string("***@example.com")));
    assert_eq!(range.get((1, 2)), Some(&string("15551******")));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(Config::default(), dir.path());

    let err = pipeline.package().unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to load dataset"));
    assert!(!dir.path().join("iscp_pii_dataset_cleaned.xlsx").exists());
}

#[test]
fn test_run_publishes_after_packaging() {
    let dir = workspace(DATASET);
    let pipeline = Pipeline::new(publishing_config(), dir.path());
    let runner = FakeGit::default();
    let publisher = Publisher::new(GitClient::new(&runner), "tok");

    let report = pipeline.run(&publisher).unwrap();

    let published = report.published.unwrap();
    assert_eq!(published.url, "https://github.com/octocat/iscp-pii-project");
    assert!(published.initialized);
    assert!(published.committed);

    let calls = runner.calls.borrow();
    assert_eq!(calls.first().unwrap(), &vec!["init".to_string()]);
    assert_eq!(
        calls.last().unwrap(),
        &vec!["push", "-u", "origin", "main", "--force"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );

    let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "/iscp_pii_dataset_-_Sheet1.csv\n");
}

#[test]
fn test_gitignore_entry_not_duplicated() {
    let dir = workspace(DATASET);
    std::fs::write(dir.path().join(".gitignore"), "target\n/iscp_pii_dataset_-_Sheet1.csv").unwrap();
    let pipeline = Pipeline::new(publishing_config(), dir.path());
    let runner = FakeGit::default();

    pipeline
        .publish(&Publisher::new(GitClient::new(&runner), "tok"))
        .unwrap();

    let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "target\n/iscp_pii_dataset_-_Sheet1.csv");
}

#[test]
fn test_publish_requires_user() {
    let dir = workspace(DATASET);
    let pipeline = Pipeline::new(Config::default(), dir.path());
    let runner = FakeGit::default();

    let err = pipeline
        .publish(&Publisher::new(GitClient::new(&runner), "tok"))
        .unwrap_err();

    assert!(err.to_string().contains("publish.user"));
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn test_push_failure_surfaces_exit_status() {
    let dir = workspace(DATASET);
    let pipeline = Pipeline::new(publishing_config(), dir.path());
    let runner = FakeGit {
        fail_on: Some("push"),
        ..Default::default()
    };

    let err = pipeline
        .run(&Publisher::new(GitClient::new(&runner), "tok"))
        .unwrap_err();

    let vcs = err.downcast_ref::<VcsError>().unwrap();
    assert!(matches!(vcs, VcsError::CommandFailed { code: Some(1), .. }));
    assert!(format!("{:#}", err).contains("failed to push some refs"));
}

#[test]
fn test_report_serializes() {
    let dir = workspace(DATASET);
    let report = Pipeline::new(Config::default(), dir.path()).package().unwrap();

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["masking"]["emails_masked"], 1);
    assert_eq!(json["outputs"].as_array().unwrap().len(), 4);
    assert!(json.get("published").is_none());
    assert!(json["started_at"].is_i64());
}

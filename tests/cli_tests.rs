//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BIN: &str = "repo-debugger";

/// Fixture directory with one source file and one image.
struct TestProject {
    dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp project");
        fs::write(dir.path().join("a.py"), "print(1)").expect("write a.py");
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
            .expect("write logo.png");
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn command(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-debugger"));
    cmd.current_dir(cwd)
        .env_remove("OPENAI_API_KEY")
        .env_remove("REPO_DEBUGGER_API_BASE")
        .env_remove("REPO_DEBUGGER_API_KEY_ENV")
        .env_remove("REPO_DEBUGGER_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let project = TestProject::new();
    command(project.root())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(BIN));
}

#[test]
fn test_cli_help() {
    let project = TestProject::new();
    command(project.root())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<PROMPT>"))
        .stdout(predicate::str::contains("--directory"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn test_prompt_is_required() {
    let project = TestProject::new();
    command(project.root()).assert().failure().stderr(predicate::str::contains("<PROMPT>"));
}

#[test]
fn test_missing_credential_fails_before_request() {
    let project = TestProject::new();
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/chat/completions").expect(0).create();

    command(project.root())
        .env("REPO_DEBUGGER_API_BASE", server.url())
        .args(["--directory", ".", "why does it crash?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY is not set"));

    mock.assert();
}

#[test]
fn test_print_prompt_skips_images_and_needs_no_credential() {
    let project = TestProject::new();
    command(project.root())
        .args(["-d", ".", "--print-prompt", "prints the wrong number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py:\nprint(1)\n"))
        .stdout(predicate::str::contains("My issue is as follows: prints the wrong number"))
        .stdout(predicate::str::contains("logo.png").not());
}

#[test]
fn test_exclude_ext_extends_defaults() {
    let project = TestProject::new();
    fs::write(project.root().join("notes.md"), "# notes").expect("write notes");

    command(project.root())
        .args(["--exclude-ext", "md", "--print-prompt", "issue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py:"))
        .stdout(predicate::str::contains("notes.md").not());
}

#[test]
fn test_config_file_is_picked_up_from_working_directory() {
    let project = TestProject::new();
    fs::write(project.root().join("repo-debugger.toml"), "excluded_extensions = [\".py\"]\n")
        .expect("write config");

    command(project.root())
        .args(["--print-prompt", "issue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py:").not())
        .stdout(predicate::str::contains("logo.png:"))
        .stdout(predicate::str::contains("Error reading file logo.png"));
}

#[test]
fn test_missing_directory_is_reported() {
    let project = TestProject::new();
    command(project.root())
        .args(["-d", "does-not-exist", "--print-prompt", "issue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory does not exist"));
}

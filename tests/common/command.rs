use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_jot_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// An initialized repository with one tracked file (`wug.txt`, "version 1")
/// committed on master.
#[fixture]
pub fn tracked_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir;

    write_file(FileSpec::new(
        dir.path().join("wug.txt"),
        "version 1\n".to_string(),
    ));
    run_jot_command(dir.path(), &["add", "wug.txt"])
        .assert()
        .success();
    jot_commit(dir.path(), "add wug").assert().success();

    dir
}

pub fn run_jot_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("jot").expect("Failed to find jot binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Commit with a pinned author date so commit ids are reproducible.
pub fn jot_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_jot_command(dir, &["commit", message]);
    cmd.env("JOT_AUTHOR_DATE", "Sat, 01 Jul 2023 12:00:00 -0800");
    cmd
}

/// The head commit id, parsed from the first `commit <id>` line of `log`.
pub fn head_commit_id(dir: &Path) -> String {
    let output = run_jot_command(dir, &["log"])
        .output()
        .expect("Failed to run log");
    let stdout = String::from_utf8(output.stdout).expect("log output is not UTF-8");

    stdout
        .lines()
        .find_map(|line| line.strip_prefix("commit "))
        .expect("log printed no commit line")
        .to_string()
}

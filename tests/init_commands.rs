use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{init_repository_dir, repository_dir, run_jot_command};

#[rstest]
fn init_creates_the_state_directory_with_a_master_branch(repository_dir: TempDir) {
    run_jot_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let state = repository_dir.path().join(".jot");
    assert!(state.join("objects").is_dir());
    assert!(state.join("refs").join("heads").join("master").is_file());
    assert!(state.join("HEAD").is_file());
    assert!(state.join("stage").is_file());
}

#[rstest]
fn every_repository_starts_from_the_same_root_commit(init_repository_dir: TempDir) {
    run_jot_command(init_repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^===\ncommit [0-9a-f]{40}\n").unwrap())
        .stdout(predicate::str::contains("Date: Wed Dec 31 16:00:00 1969 -0800"))
        .stdout(predicate::str::contains("initial commit"));
}

#[rstest]
fn init_inside_an_existing_repository_is_refused(init_repository_dir: TempDir) {
    run_jot_command(init_repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A Jot version-control system already exists in the current directory.",
        ));
}

#[rstest]
fn commands_before_init_report_the_missing_repository(repository_dir: TempDir) {
    run_jot_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::eq("Not in an initialized Jot directory.\n"));
}

#[rstest]
fn unknown_subcommands_and_bad_operands_are_reported(repository_dir: TempDir) {
    run_jot_command(repository_dir.path(), &["frobnicate"])
        .assert()
        .success()
        .stdout(predicate::eq("No command with that name exists.\n"));

    run_jot_command(repository_dir.path(), &[])
        .assert()
        .success()
        .stdout(predicate::eq("Please enter a command.\n"));
}

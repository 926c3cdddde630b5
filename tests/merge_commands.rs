use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{
    head_commit_id, jot_commit, run_jot_command, tracked_repository_dir,
};
use common::file::{FileSpec, read_file, write_file};

fn commit_file(dir: &std::path::Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_jot_command(dir, &["add", name]).assert().success();
    jot_commit(dir, message).assert().success();
}

/// A fork: `side` is created at the shared commit, then `side` gains
/// `theirs.txt` and master gains `ours.txt`.
fn diverge(dir: &std::path::Path) {
    run_jot_command(dir, &["branch", "side"]).assert().success();
    commit_file(dir, "ours.txt", "ours\n", "master adds ours");
    run_jot_command(dir, &["checkout", "side"]).assert().success();
    commit_file(dir, "theirs.txt", "theirs\n", "side adds theirs");
    run_jot_command(dir, &["checkout", "master"])
        .assert()
        .success();
}

#[rstest]
fn merging_an_ancestor_does_nothing(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "more.txt", "more\n", "master moves on");
    let head = head_commit_id(dir.path());

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "Given branch is an ancestor of the current branch.\n",
        ));
    pretty_assertions::assert_eq!(head_commit_id(dir.path()), head);
}

#[rstest]
fn merging_a_descendant_fast_forwards(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    run_jot_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "ahead.txt", "ahead\n", "side moves on");
    let side_head = head_commit_id(dir.path());
    run_jot_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::eq("Current branch fast-forwarded.\n"));

    pretty_assertions::assert_eq!(head_commit_id(dir.path()), side_head);
    pretty_assertions::assert_eq!(read_file(&dir.path().join("ahead.txt")), "ahead\n");
}

#[rstest]
fn a_true_merge_takes_the_given_side_and_records_two_parents(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    diverge(dir.path());

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Encountered a merge conflict.").not());

    pretty_assertions::assert_eq!(read_file(&dir.path().join("ours.txt")), "ours\n");
    pretty_assertions::assert_eq!(read_file(&dir.path().join("theirs.txt")), "theirs\n");
    pretty_assertions::assert_eq!(read_file(&dir.path().join("wug.txt")), "version 1\n");

    run_jot_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"Merge: [0-9a-f]{7} [0-9a-f]{7}\n").unwrap(),
        )
        .stdout(predicate::str::contains("Merged side into master."));
}

#[rstest]
fn log_follows_only_the_primary_parent_after_a_merge(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    diverge(dir.path());
    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success();

    run_jot_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("master adds ours"))
        .stdout(predicate::str::contains("side adds theirs").not());
}

#[rstest]
fn a_deletion_on_the_given_side_is_taken(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    run_jot_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    run_jot_command(dir.path(), &["rm", "wug.txt"])
        .assert()
        .success();
    jot_commit(dir.path(), "side drops wug").assert().success();
    run_jot_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    commit_file(dir.path(), "ours.txt", "ours\n", "master adds ours");

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success();

    assert!(!dir.path().join("wug.txt").exists());
    pretty_assertions::assert_eq!(read_file(&dir.path().join("ours.txt")), "ours\n");
}

#[rstest]
fn divergent_edits_materialize_conflict_markers(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "wug.txt", "master version\n", "master edits wug");
    run_jot_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "wug.txt", "side version\n", "side edits wug");
    run_jot_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::eq("Encountered a merge conflict.\n"));

    pretty_assertions::assert_eq!(
        read_file(&dir.path().join("wug.txt")),
        "<<<<<<< HEAD\n\
         master version\n\
         =======\n\
         side version\n\
         >>>>>>>\n"
    );
    // the conflicted result is committed as the merge commit
    run_jot_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged side into master."));
}

#[rstest]
fn merge_preconditions_are_reported(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    run_jot_command(dir.path(), &["merge", "nope"])
        .assert()
        .success()
        .stdout(predicate::eq("A branch with that name does not exist.\n"));

    run_jot_command(dir.path(), &["merge", "master"])
        .assert()
        .success()
        .stdout(predicate::eq("Cannot merge a branch with itself.\n"));

    write_file(FileSpec::new(
        dir.path().join("pending.txt"),
        "staged\n".to_string(),
    ));
    run_jot_command(dir.path(), &["add", "pending.txt"])
        .assert()
        .success();
    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::eq("You have uncommitted changes.\n"));
}

#[rstest]
fn merge_protects_untracked_files_from_being_clobbered(tracked_repository_dir: TempDir) {
    let dir = tracked_repository_dir;
    run_jot_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    run_jot_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "shared.txt", "committed\n", "side adds shared");
    run_jot_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("shared.txt"),
        "precious\n".to_string(),
    ));

    run_jot_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "There is an untracked file in the way; delete it, or add and commit it first.\n",
        ));
    pretty_assertions::assert_eq!(read_file(&dir.path().join("shared.txt")), "precious\n");
}

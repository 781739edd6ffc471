//! Integration tests for the `rv` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a small but complete content pack.
fn test_content() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("dialogues")).unwrap();
    fs::write(
        dir.path().join("items.json"),
        r#"[{"id": "key", "name": "Iron key"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("interactables.json"),
        r#"[{
    "id": "door",
    "rules": [{"actions": [{"type": "start_dialogue", "dialogue_id": "intro"}]}]
}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("dialogues/intro.json"),
        r#"{
    "nodes": {
        "start": {"speaker": "Mara", "text": "You came back.", "nextNodeId": "ask"},
        "ask": {
            "speaker": "Mara",
            "text": "Will you stay?",
            "choices": [
                {"text": "Stay", "nextNodeId": "stay",
                 "commands": [{"command": "flag", "args": ["set", "stayed"]}]},
                {"text": "Leave", "nextNodeId": "end"}
            ]
        },
        "stay": {
            "speaker": "Mara",
            "text": "Good.",
            "commands": [{"command": "popup", "args": ["Mara", "smiles"]}]
        }
    }
}"#,
    )
    .unwrap();
    dir
}

fn rv() -> Command {
    Command::cargo_bin("rv").unwrap()
}

fn dir_arg(dir: &TempDir) -> String {
    dir.path().to_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_content() {
    let dir = test_content();
    rv().args(["check", "-d", &dir_arg(&dir)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All checks passed")
                .and(predicate::str::contains("1 dialogue, 1 interactable, 1 item")),
        );
}

#[test]
fn check_reports_broken_references() {
    let dir = test_content();
    fs::write(
        dir.path().join("dialogues/ghost.json"),
        r#"{"nodes": {"start": {"text": "Boo", "nextNodeId": "nowhere"}}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("reverie.json"),
        r#"{"start_dialogue": "missing"}"#,
    )
    .unwrap();

    rv().args(["check", "-d", &dir_arg(&dir)])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("nowhere")
                .and(predicate::str::contains("missing dialogue 'missing'"))
                .and(predicate::str::contains("error: 2 errors")),
        );
}

#[test]
fn check_fails_for_missing_directory() {
    let dir = TempDir::new().unwrap();
    rv().args(["check", "-d", dir.path().join("nope").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("content directory not found"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_follows_choices_from_stdin() {
    let dir = test_content();
    rv().args(["play", "intro", "-d", &dir_arg(&dir)])
        .write_stdin("\n1\n\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("You came back.")
                .and(predicate::str::contains("1) Stay"))
                .and(predicate::str::contains("2) Leave"))
                .and(predicate::str::contains("Good."))
                .and(predicate::str::contains("Mara smiles"))
                .and(predicate::str::contains("(end of dialogue)")),
        );
}

#[test]
fn play_reads_a_script_file() {
    let dir = test_content();
    let script = dir.path().join("leave.txt");
    fs::write(&script, "\n2\n").unwrap();

    rv().args(["play", "intro", "-d", &dir_arg(&dir), "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Will you stay?")
                .and(predicate::str::contains("Good.").not())
                .and(predicate::str::contains("(end of dialogue)")),
        );
}

#[test]
fn play_hints_on_bad_choice() {
    let dir = test_content();
    rv().args(["play", "intro", "-d", &dir_arg(&dir)])
        .write_stdin("\n7\nq\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("enter a number from 1 to 2")
                .and(predicate::str::contains("(dialogue left open)")),
        );
}

#[test]
fn play_unknown_dialogue_fails() {
    let dir = test_content();
    rv().args(["play", "nobody", "-d", &dir_arg(&dir)])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not start dialogue 'nobody'"));
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

#[test]
fn play_writes_a_save_that_save_show_prints() {
    let dir = test_content();
    let save = dir.path().join("slot1.json");

    rv().args(["play", "intro", "-d", &dir_arg(&dir), "--save"])
        .arg(&save)
        .write_stdin("\n1\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&save).unwrap()).unwrap();
    assert_eq!(json["version"], 1);

    rv().args(["save", "show"])
        .arg(&save)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("stayed")
                .and(predicate::str::contains("true"))
                .and(predicate::str::contains("Reality")),
        );
}

#[test]
fn loaded_save_feeds_the_next_session() {
    let dir = test_content();
    let save = dir.path().join("slot1.json");
    rv().args(["play", "intro", "-d", &dir_arg(&dir), "--save"])
        .arg(&save)
        .write_stdin("\n1\n\n")
        .assert()
        .success();

    let resumed = dir.path().join("slot2.json");
    rv().args(["play", "intro", "-d", &dir_arg(&dir), "--load"])
        .arg(&save)
        .arg("--save")
        .arg(&resumed)
        .write_stdin("\n2\n")
        .assert()
        .success();

    rv().args(["save", "show"])
        .arg(&resumed)
        .assert()
        .success()
        .stdout(predicate::str::contains("stayed"));
}

#[test]
fn save_show_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    rv().args(["save", "show"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to access"));
}

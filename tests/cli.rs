use assert_cmd::Command;
use predicates::prelude::*;

fn markpad() -> Command {
    Command::cargo_bin("markpad").unwrap()
}

#[test]
fn test_help_lists_usage_and_shortcuts() {
    markpad()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"))
        .stdout(predicate::str::contains("--read-only"))
        .stdout(predicate::str::contains("Ctrl+Space"));
}

#[test]
fn test_version() {
    markpad()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("markpad "))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_option_fails() {
    markpad()
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown option: --bogus"));
}

#[test]
fn test_invalid_tab_width_fails() {
    markpad().args(["--tab-width", "0"]).assert().failure();
    markpad().args(["--tab-width", "wide"]).assert().failure();
}

#[test]
fn test_extra_argument_fails() {
    markpad()
        .args(["a.txt", "b.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected argument: b.txt"));
}

mod support;

use assert_cmd::Command;
use predicates::str::contains;

use support::TestEnv;

#[test]
fn tm_help_works() {
    Command::cargo_bin("tm")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Task Manager"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init",
        "add",
        "list",
        "remove",
        "archive",
        "compact",
        "find",
        "plist",
        "premove",
        "parchive",
        "preactivate",
        "pcompact",
    ];

    for cmd in subcommands {
        Command::cargo_bin("tm")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn non_numeric_id_is_a_usage_error() {
    let env = TestEnv::new();
    let ws = env.init_workspace("proj");

    env.tm(&ws).args(["remove", "abc"]).assert().code(2);
    env.tm(&ws).args(["list", "-p", "two"]).assert().code(2);
}

#[test]
fn home_flag_overrides_env() {
    let env = TestEnv::new();
    let other_home = tempfile::tempdir().expect("tempdir");
    let ws = env.dir("proj");

    env.tm(&ws)
        .arg("init")
        .arg("--home")
        .arg(other_home.path())
        .assert()
        .success();

    assert!(other_home.path().join("workspaces.json").exists());
    assert!(env.registry().is_empty());
}

mod support;

use predicates::str::contains;
use tm::model::TaskStatus;

use support::TestEnv;

#[test]
fn init_creates_storage_and_registers() {
    let env = TestEnv::new();
    let ws = env.dir("proj");

    env.tm(&ws)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("registered with id 1"));

    assert!(ws.join(".tm/tasks.json").exists());
    let registry = env.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].name, "proj");
}

#[test]
fn init_twice_is_a_no_op() {
    let env = TestEnv::new();
    let ws = env.init_workspace("proj");

    env.tm(&ws)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("nothing to do"));
    assert_eq!(env.registry().len(), 1);
}

#[test]
fn init_registers_existing_storage() {
    let env = TestEnv::new();
    let ws = env.dir("proj");
    std::fs::create_dir_all(ws.join(".tm")).expect("mkdir");
    std::fs::write(ws.join(".tm/tasks.json"), r#"[{"id": 4, "text": "kept", "status": "active"}]"#)
        .expect("write tasks");

    let data = env.json(&ws, &["init"]);
    assert_eq!(data["data"]["registered"], true);
    assert_eq!(data["data"]["created_storage"], false);
    assert_eq!(env.tasks(&ws)[0].id, 4);
}

#[test]
fn plist_shows_status() {
    let env = TestEnv::new();
    let first = env.init_workspace("first");
    env.init_workspace("second");
    env.tm(&first).args(["parchive", "2"]).assert().success();

    env.tm(&first)
        .arg("plist")
        .assert()
        .success()
        .stdout(contains("1: first"))
        .stdout(contains("second"))
        .stdout(contains("[archived]"));
}

#[test]
fn premove_renumbers_and_deletes_storage() {
    let env = TestEnv::new();
    let first = env.init_workspace("ws1");
    let second = env.init_workspace("ws2");
    env.init_workspace("ws3");

    env.tm(&first)
        .args(["premove", "2"])
        .assert()
        .success()
        .stdout(contains("Workspace 2 removed"));

    assert!(!second.join(".tm").exists());
    let registry: Vec<(u32, String)> = env
        .registry()
        .into_iter()
        .map(|ws| (ws.id, ws.name))
        .collect();
    assert_eq!(registry, vec![(1, "ws1".to_string()), (2, "ws3".to_string())]);
}

#[test]
fn premove_missing_id_is_not_found() {
    let env = TestEnv::new();
    let ws = env.init_workspace("proj");

    env.tm(&ws).args(["premove", "8"]).assert().code(3);
    assert_eq!(env.registry().len(), 1);
}

#[test]
fn parchive_and_preactivate_cascade() {
    let env = TestEnv::new();
    let ws = env.init_workspace("proj");
    env.tm(&ws).args(["add", "one"]).assert().success();
    env.tm(&ws).args(["add", "two"]).assert().success();
    env.tm(&ws).args(["archive", "2"]).assert().success();

    env.tm(&ws)
        .args(["parchive", "1"])
        .assert()
        .success()
        .stdout(contains("tasks hidden: 1"));
    let statuses: Vec<TaskStatus> = env.tasks(&ws).iter().map(|t| t.status).collect();
    assert_eq!(statuses, vec![TaskStatus::Hidden, TaskStatus::Archived]);

    env.tm(&ws)
        .args(["parchive", "1"])
        .assert()
        .code(2)
        .stderr(contains("already archived"))
        .stderr(contains("hint: tm preactivate 1"));

    env.tm(&ws).args(["preactivate", "1"]).assert().success();
    let statuses: Vec<TaskStatus> = env.tasks(&ws).iter().map(|t| t.status).collect();
    assert_eq!(statuses, vec![TaskStatus::Active, TaskStatus::Archived]);

    env.tm(&ws).args(["preactivate", "1"]).assert().code(2);
}

#[test]
fn add_reactivates_archived_workspace() {
    let env = TestEnv::new();
    let ws = env.init_workspace("proj");
    env.tm(&ws).args(["add", "old"]).assert().success();
    env.tm(&ws).args(["parchive", "1"]).assert().success();

    env.tm(&ws)
        .args(["add", "new"])
        .assert()
        .success()
        .stdout(contains("has been reactivated"));

    assert!(env.registry()[0].is_active());
    let tasks = env.tasks(&ws);
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Active));
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn pcompact_moves_archived_workspaces_to_band() {
    let env = TestEnv::new();
    let first = env.init_workspace("a");
    env.init_workspace("b");
    env.init_workspace("c");
    env.tm(&first).args(["parchive", "1"]).assert().success();
    env.tm(&first).args(["premove", "2"]).assert().success();

    let data = env.json(&first, &["pcompact"]);
    assert_eq!(data["data"]["summary"]["archived"], 1);

    let registry: Vec<(u32, String)> = env
        .registry()
        .into_iter()
        .map(|ws| (ws.id, ws.name))
        .collect();
    assert_eq!(registry, vec![(1, "c".to_string()), (1000, "a".to_string())]);
}

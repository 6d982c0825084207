use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todolist-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, tasks: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(tasks).unwrap()).unwrap();
}

#[test]
fn list_shows_tasks_stars_and_remaining_count() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list.json");
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "walk the dog",
            "isDone": false,
            "priority": 1,
            "deadline": null
        },
        {
            "id": "todo-2",
            "name": "water plants",
            "isDone": true,
            "priority": 3,
            "deadline": null
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("walk the dog"));
    assert!(stdout.contains("water plants"));
    assert!(stdout.contains("★★★"));
    assert!(stdout.contains("1 task(s) remaining"));
}

#[test]
fn list_by_deadline_orders_missing_deadlines_last() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-sorted.json");
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "first none",
            "isDone": false,
            "priority": 3,
            "deadline": null
        },
        {
            "id": "todo-2",
            "name": "late task",
            "isDone": false,
            "priority": 3,
            "deadline": "2099-01-03T00:00:00Z"
        },
        {
            "id": "todo-3",
            "name": "second none",
            "isDone": false,
            "priority": 3,
            "deadline": null
        },
        {
            "id": "todo-4",
            "name": "early task",
            "isDone": false,
            "priority": 3,
            "deadline": "2099-01-01T00:00:00Z"
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list", "--by-deadline"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let early = stdout.find("early task").unwrap();
    let late = stdout.find("late task").unwrap();
    let first_none = stdout.find("first none").unwrap();
    let second_none = stdout.find("second none").unwrap();
    assert!(early < late);
    assert!(late < first_none);
    assert!(first_none < second_none);
}

#[test]
fn list_marks_overdue_tasks() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-overdue.json");
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "long past due",
            "isDone": false,
            "priority": 2,
            "deadline": "2020-01-01T00:00:00Z"
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("overdue"));
}

#[test]
fn list_marks_due_soon_tasks() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-due-soon.json");
    let tomorrow = (OffsetDateTime::now_utc() + Duration::days(1))
        .format(&Rfc3339)
        .unwrap();
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "due tomorrow",
            "isDone": false,
            "priority": 2,
            "deadline": tomorrow
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("due soon"));
}

#[test]
fn list_does_not_persist_derived_flags() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-no-flags.json");
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "long past due",
            "isDone": false,
            "priority": 2,
            "deadline": "2020-01-01T00:00:00Z"
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(!after.contains("isOverdue"));
    assert!(!after.contains("isDueSoon"));
}

#[test]
fn list_recovers_from_corrupt_store() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-corrupt.json");
    std::fs::write(&store_path, "{definitely not an array").unwrap();

    let output = Command::new(exe)
        .args(["list"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 task(s) remaining"));
}

#[test]
fn list_json_outputs_records_with_derived_flags() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let store_path = temp_path("cli-list-json.json");
    let content = serde_json::json!([
        {
            "id": "todo-1",
            "name": "long past due",
            "isDone": false,
            "priority": 2,
            "deadline": "2020-01-01T00:00:00Z"
        }
    ]);
    write_store(&store_path, &content);

    let output = Command::new(exe)
        .args(["list", "--json"])
        .env("TODOLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let tasks = payload.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "long past due");
    assert_eq!(tasks[0]["isOverdue"], true);
    assert_eq!(tasks[0]["isDueSoon"], false);
}

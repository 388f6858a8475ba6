use std::path::Path;
use std::process::{Command, Output};

fn noteseed(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_noteseed"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_seed_prints_three_lines_to_stdout() {
    let dir = tempfile::tempdir().unwrap();

    let output = noteseed(dir.path(), &["seed", "--database", "seed.sqlite"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Created User 'hardcoded'");
    assert!(lines[1].starts_with("Created Note '"));
    assert_eq!(lines[2], "Created HistoryEntry");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_seed_failure_prints_one_stderr_line_and_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("noteseed.toml"), "auto_alias = false\n").unwrap();

    let output = noteseed(
        dir.path(),
        &["--config", "noteseed.toml", "seed", "--database", "seed.sqlite"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("alias"));
}

#[test]
fn test_stats_leaves_database_schema_alone() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = noteseed(dir.path(), &["seed", "--database", "seed.sqlite"]);
    assert_eq!(seeded.status.code(), Some(0));
    let before = std::fs::read(dir.path().join("seed.sqlite")).unwrap();

    let output = noteseed(dir.path(), &["stats", "--database", "seed.sqlite", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["users"], 3);
    assert_eq!(std::fs::read(dir.path().join("seed.sqlite")).unwrap(), before);
}

#[test]
fn test_stats_on_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = noteseed(dir.path(), &["stats", "--database", "absent.sqlite"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("absent.sqlite").exists());
}

//! Files that outlive a session

use std::fs;

use tempfile::TempDir;

use crate::common::run_script;

#[test]
fn test_history_carries_over_sessions() {
    let dir = TempDir::new().unwrap();
    run_script(&dir, &["a = 1", "", "exit()"]);
    let out = run_script(&dir, &["history", "exit()"]);

    assert!(out.contains("📂 History loaded."));
    assert!(out.contains("🕓 Command History:"));
    assert!(out.contains("] a = 1\n"));

    // the second session rewrote the file with the loaded entry
    let saved = fs::read_to_string(dir.path().join("repl_history.txt")).unwrap();
    assert_eq!(saved.lines().count(), 1);
}

#[test]
fn test_token_logs_split_by_outcome() {
    let dir = TempDir::new().unwrap();
    run_script(&dir, &["total = 2 + 3", "", "total / 0", "", "exit()"]);

    let tokens = fs::read_to_string(dir.path().join("tokens.txt")).unwrap();
    assert_eq!(tokens, "total: IDENTIFIER\n=: OPERATOR\n2: NUMBER\n+: OPERATOR\n3: NUMBER\n");
    let errors = fs::read_to_string(dir.path().join("error_tokens.txt")).unwrap();
    assert_eq!(errors, "total: IDENTIFIER\n/: OPERATOR\n0: NUMBER\n");
}

#[test]
fn test_token_logs_append_across_sessions() {
    let dir = TempDir::new().unwrap();
    run_script(&dir, &["x = 1", "", "exit()"]);
    run_script(&dir, &["y = 2", "", "exit()"]);
    let out = run_script(&dir, &["tokens", "exit()"]);

    let listing = format!(
        "📦 Tokens in {}:\nx: IDENTIFIER\n=: OPERATOR\n1: NUMBER\ny: IDENTIFIER\n=: OPERATOR\n2: NUMBER\n",
        dir.path().join("tokens.txt").display()
    );
    assert!(out.contains(&listing));
}

#[test]
fn test_unwritable_history_is_reported() {
    let dir = TempDir::new().unwrap();
    // a directory where the history file should be
    fs::create_dir(dir.path().join("repl_history.txt")).unwrap();
    let out = run_script(&dir, &["exit()"]);
    assert!(out.contains("❌ Error loading history:"));
    assert!(out.contains("❌ Error saving history:"));
    assert!(out.ends_with("👋 Goodbye!\n"));
}

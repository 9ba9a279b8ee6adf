//! Scripted REPL sessions

use tempfile::TempDir;

use crate::common::run_script;

#[test]
fn test_assign_then_read_back() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["x = 5", "", "x * 3", "", "exit()"]);
    assert!(out.contains("🎯 Output:\n15\n"));
    assert!(out.ends_with("💾 History saved.\n👋 Goodbye!\n"));
}

#[test]
fn test_print_shares_the_console() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["for i in range(3) {", "  print(i)", "}", "", "exit()"]);
    assert!(out.contains("0\n1\n2\n"));
    assert!(!out.contains("🎯 Output:"));
}

#[test]
fn test_commands_ignore_case_and_padding() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["  HeLp  ", "ENV", "EXIT()"]);
    assert!(out.contains("📘 Available Commands:"));
    assert!(out.contains("🔹 error_tokens → Show error tokens"));
    assert!(out.contains("Environment is empty."));
    assert!(out.ends_with("👋 Goodbye!\n"));
}

#[test]
fn test_env_and_clear() {
    let dir = TempDir::new().unwrap();
    let out = run_script(
        &dir,
        &["name = 'ada'", "langs = ['x', 'y']", "", "env", "clear", "env", "name", "", "exit()"],
    );
    assert!(out.contains("🌍 Current Environment:\nname: ada\nlangs: ['x', 'y']\n"));
    assert!(out.contains("🧹 Environment cleared.\nEnvironment is empty.\n"));
    assert!(out.contains("⚠ Error: NameError: name 'name' is not defined"));
}

#[test]
fn test_stats_counts_evaluations() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["1 + 1", "", "nope", "", "stats", "exit()"]);
    assert!(out.contains("• Commands Executed: 1\n"));
    assert!(out.contains("• History Entries : 2\n"));
    assert!(out.contains("• Errors Raised   : 1\n"));
}

#[test]
fn test_missing_token_files() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["tokens", "error_tokens", "exit()"]);
    assert!(out.contains(&format!("No tokens found in {}.", dir.path().join("tokens.txt").display())));
    assert!(out.contains(&format!(
        "No tokens found in {}.",
        dir.path().join("error_tokens.txt").display()
    )));
}

#[test]
fn test_debug_session() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["debug", "a = 4", "", "a ** 2", "DONE", "exit()"]);
    assert!(out.contains("Debug Step 1:\n>>> a = 4\n"));
    assert!(out.contains("Debug Step 2:\n>>> a ** 2\nTokens:\n  a: IDENTIFIER\n  *: OPERATOR\n  *: OPERATOR\n  2: NUMBER\nResult:\n16\n"));
    assert!(out.contains("Environment snapshot:\n  a: 4\n"));
    assert!(!out.contains("Debug Step 3:"));
}

#[test]
fn test_eof_without_exit() {
    let dir = TempDir::new().unwrap();
    let out = run_script(&dir, &["x = 1"]);
    assert!(out.ends_with("\n⛔ EOF received. Exiting...\n💾 History saved.\n"));
}

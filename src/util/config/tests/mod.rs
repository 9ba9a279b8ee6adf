//! Config tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::util::config::{load, load_from, locate, parse, Config, ConfigError, ReplConfig};
use crate::util::logger::LogLevel;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.repl.prompt, ">>> ");
    assert_eq!(config.repl.continuation_prompt, "... ");
    assert!(config.repl.colors);
    assert_eq!(config.repl.history_file, PathBuf::from("repl_history.txt"));
    assert_eq!(config.repl.tokens_file, PathBuf::from("tokens.txt"));
    assert_eq!(config.repl.error_tokens_file, PathBuf::from("error_tokens.txt"));
    assert_eq!(config.log.level, LogLevel::Warn);
}

#[test]
fn test_empty_text_is_default() {
    assert_eq!(parse("").unwrap(), Config::default());
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = parse(
        r#"
[repl]
prompt = "λ "
colors = false

[log]
level = "debug"
"#,
    )
    .unwrap();
    assert_eq!(config.repl.prompt, "λ ");
    assert!(!config.repl.colors);
    assert_eq!(config.repl.continuation_prompt, ReplConfig::default().continuation_prompt);
    assert_eq!(config.log.level, LogLevel::Debug);
}

#[test]
fn test_bad_level_is_rejected() {
    assert!(parse("[log]\nlevel = \"loud\"\n").is_err());
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[repl]\nhistory_file = \"/tmp/h.txt\"\n").unwrap();
    let config = load_from(&path).unwrap();
    assert_eq!(config.repl.history_file, PathBuf::from("/tmp/h.txt"));
}

#[test]
fn test_parse_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[repl\n").unwrap();
    let err = load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_explicit_path_must_exist() {
    let err = locate(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
    assert!(load(Some(Path::new("/definitely/not/here.toml"))).is_err());
}

#[test]
fn test_explicit_path_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("explicit.toml");
    fs::write(&path, "[repl]\nprompt = \"$ \"\n").unwrap();
    assert_eq!(locate(Some(&path)).unwrap(), Some(path.clone()));
    assert_eq!(load(Some(&path)).unwrap().repl.prompt, "$ ");
}

//! History unit tests

use super::*;
use tempfile::TempDir;

#[cfg(test)]
mod add_tests {
    use super::*;

    #[test]
    fn test_add_prefixes_timestamp() {
        let mut history = CommandHistory::new();
        history.add("x = 5");
        let entry = &history.entries()[0];
        // "[HH:MM:SS] x = 5"
        assert_eq!(entry.len(), "[00:00:00] x = 5".len());
        assert!(entry.starts_with('['));
        assert_eq!(&entry[3..4], ":");
        assert_eq!(&entry[6..7], ":");
        assert!(entry.ends_with("] x = 5"));
    }

    #[test]
    fn test_add_keeps_multiline_code() {
        let mut history = CommandHistory::new();
        history.add("a = 1\nb = 2");
        assert!(history.entries()[0].ends_with("a = 1\nb = 2"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = CommandHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");

        let mut history = CommandHistory::new();
        history.add("x = 5");
        history.add("x + 1");
        history.save(&path).unwrap();

        let mut reloaded = CommandHistory::new();
        assert_eq!(reloaded.load(&path).unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_save_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        let mut history = CommandHistory::new();
        history.add("1");
        history.add("2");
        history.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches('\n').count(), 2);
        assert!(content.ends_with("] 2\n"));
    }

    #[test]
    fn test_save_empty_history_writes_single_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        CommandHistory::new().save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n");
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        fs::write(&path, "old entry\n").unwrap();
        let mut history = CommandHistory::new();
        history.add("new");
        history.save(&path).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("old entry"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut history = CommandHistory::new();
        let outcome = history.load(&dir.path().join("absent.txt")).unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(history.is_empty());
    }

    #[test]
    fn test_load_trims_and_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        fs::write(&path, "  [10:00:00] a  \n\n   \n[10:00:01] b\n").unwrap();

        let mut history = CommandHistory::new();
        history.add("existing");
        assert_eq!(history.load(&path).unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(&history.entries()[1..], &["[10:00:00] a".to_string(), "[10:00:01] b".to_string()]);
    }

    #[test]
    fn test_load_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // a directory exists but cannot be read as a file
        let err = CommandHistory::new().load(dir.path()).unwrap_err();
        assert!(matches!(err, HistoryError::Load { .. }));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = CommandHistory::new()
            .save(&dir.path().join("missing/history.txt"))
            .unwrap_err();
        assert!(matches!(err, HistoryError::Save { .. }));
    }
}

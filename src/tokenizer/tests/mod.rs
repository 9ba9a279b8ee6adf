//! Tokenizer unit tests

use super::*;
use proptest::prelude::*;

fn pairs(code: &str) -> Vec<(String, TokenClass)> {
    tokenize(code).into_iter().map(|t| (t.text, t.class)).collect()
}

fn expected(items: &[(&str, TokenClass)]) -> Vec<(String, TokenClass)> {
    items.iter().map(|(t, c)| (t.to_string(), *c)).collect()
}

#[cfg(test)]
mod classify_tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        for word in KEYWORDS {
            assert_eq!(classify(word), TokenClass::Keyword);
        }
        // only the fixed set counts
        assert_eq!(classify("elif"), TokenClass::Identifier);
        assert_eq!(classify("True"), TokenClass::Identifier);
    }

    #[test]
    fn test_classify_operators_and_symbols() {
        assert_eq!(classify("+"), TokenClass::Operator);
        assert_eq!(classify("|"), TokenClass::Operator);
        assert_eq!(classify("("), TokenClass::Symbol);
        assert_eq!(classify(";"), TokenClass::Symbol);
        assert_eq!(classify(","), TokenClass::Symbol);
    }

    #[test]
    fn test_classify_numbers_and_identifiers() {
        assert_eq!(classify("42"), TokenClass::Number);
        assert_eq!(classify("_private"), TokenClass::Identifier);
        assert_eq!(classify("x1"), TokenClass::Identifier);
        // a word starting with a digit is neither
        assert_eq!(classify("1abc"), TokenClass::Symbol);
        assert_eq!(classify("é"), TokenClass::Symbol);
    }

    #[test]
    fn test_class_display_is_upper_case() {
        assert_eq!(TokenClass::Keyword.to_string(), "KEYWORD");
        assert_eq!(TokenClass::Identifier.to_string(), "IDENTIFIER");
        let token = Token {
            text: "x".to_string(),
            class: TokenClass::Identifier,
        };
        assert_eq!(token.to_string(), "x: IDENTIFIER");
    }
}

#[cfg(test)]
mod tokenize_tests {
    use super::*;

    #[test]
    fn test_tokenize_assignment() {
        assert_eq!(
            pairs("x = 5"),
            expected(&[
                ("x", TokenClass::Identifier),
                ("=", TokenClass::Operator),
                ("5", TokenClass::Number),
            ])
        );
    }

    #[test]
    fn test_tokenize_function_header() {
        assert_eq!(
            pairs("def f(a): return a+1"),
            expected(&[
                ("def", TokenClass::Keyword),
                ("f", TokenClass::Identifier),
                ("(", TokenClass::Symbol),
                ("a", TokenClass::Identifier),
                (")", TokenClass::Symbol),
                (":", TokenClass::Symbol),
                ("return", TokenClass::Keyword),
                ("a", TokenClass::Identifier),
                ("+", TokenClass::Operator),
                ("1", TokenClass::Number),
            ])
        );
    }

    #[test]
    fn test_no_multi_character_operators() {
        assert_eq!(
            pairs("a == b"),
            expected(&[
                ("a", TokenClass::Identifier),
                ("=", TokenClass::Operator),
                ("=", TokenClass::Operator),
                ("b", TokenClass::Identifier),
            ])
        );
    }

    #[test]
    fn test_float_splits_on_dot() {
        assert_eq!(
            pairs("3.14"),
            expected(&[
                ("3", TokenClass::Number),
                (".", TokenClass::Symbol),
                ("14", TokenClass::Number),
            ])
        );
    }

    #[test]
    fn test_quotes_and_comments_are_not_special() {
        assert_eq!(
            pairs("'hi' # note"),
            expected(&[("hi", TokenClass::Identifier), ("note", TokenClass::Identifier)])
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
    }
}

#[cfg(test)]
mod token_log_tests {
    use super::*;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> TokenLog {
        TokenLog::new(dir.path().join("tokens.txt"), dir.path().join("error_tokens.txt"))
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        assert_eq!(log.read(TokenLogKind::Success).unwrap(), TokenLogContents::Missing);
    }

    #[test]
    fn test_append_creates_and_accumulates() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(TokenLogKind::Success, &tokenize("x = 5")).unwrap();
        log.append(TokenLogKind::Success, &tokenize("x")).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("tokens.txt")).unwrap();
        assert_eq!(contents, "x: IDENTIFIER\n=: OPERATOR\n5: NUMBER\nx: IDENTIFIER\n");
        assert_eq!(
            log.read(TokenLogKind::Success).unwrap(),
            TokenLogContents::Lines(vec![
                "x: IDENTIFIER".to_string(),
                "=: OPERATOR".to_string(),
                "5: NUMBER".to_string(),
                "x: IDENTIFIER".to_string(),
            ])
        );
        // the error log is untouched
        assert_eq!(log.read(TokenLogKind::Error).unwrap(), TokenLogContents::Missing);
    }

    #[test]
    fn test_append_empty_batch_creates_file() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(TokenLogKind::Error, &[]).unwrap();
        assert_eq!(log.read(TokenLogKind::Error).unwrap(), TokenLogContents::Lines(vec![]));
    }

    #[test]
    fn test_append_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let log = TokenLog::new(dir.path().join("no/such/tokens.txt"), dir.path().join("e.txt"));
        let err = log.append(TokenLogKind::Success, &tokenize("x")).unwrap_err();
        assert!(matches!(err, TokenLogError::Write { .. }));
    }
}

#[cfg(test)]
mod tokenize_props {
    use super::*;

    proptest! {
        #[test]
        fn tokens_appear_in_source_order(code in "[ -~\n]{0,64}") {
            let mut rest = code.as_str();
            for token in tokenize(&code) {
                prop_assert!(!token.text.is_empty());
                let at = rest.find(&token.text);
                prop_assert!(at.is_some());
                rest = &rest[at.unwrap_or(0) + token.text.len()..];
            }
        }

        #[test]
        fn class_matches_classify(code in "[a-z0-9_+=(),. ]{0,48}") {
            for token in tokenize(&code) {
                prop_assert_eq!(token.class, classify(&token.text));
            }
        }

        #[test]
        fn whitespace_never_tokenizes(code in "[ \t\n]{0,16}") {
            prop_assert!(tokenize(&code).is_empty());
        }
    }
}

//! Whole programs through the library entry points

use std::fs;

use snippet_repl::runtime::{ErrorKind, Interpreter, ScriptError, Value};
use snippet_repl::{eval, run_file};
use tempfile::TempDir;

use crate::common::Captured;

#[test]
fn test_eval_expression() {
    assert_eq!(eval("sum(range(10))").unwrap(), Some(Value::Int(45)));
    assert_eq!(eval("x = 1").unwrap(), None);
    assert_eq!(eval("None").unwrap(), None);
}

#[test]
fn test_eval_error_keeps_script_error() {
    let err = eval("1 // 0").unwrap_err();
    let script = err.downcast_ref::<ScriptError>().unwrap();
    assert_eq!(script.kind, ErrorKind::ZeroDivisionError);
}

#[test]
fn test_run_file_missing() {
    let err = run_file(std::path::Path::new("/no/such/program.snip")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}

#[test]
fn test_run_file_executes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ok.snip");
    fs::write(&path, "total = 0\nfor i in range(5) { total += i }\n").unwrap();
    run_file(&path).unwrap();
}

#[test]
fn test_fizzbuzz_program() {
    let out = Captured::default();
    let mut interpreter = Interpreter::with_output(Box::new(out.clone()));
    interpreter
        .exec(
            r#"
def fizz(n) {
    if n % 15 == 0 { return "FizzBuzz" }
    elif n % 3 == 0 { return "Fizz" }
    elif n % 5 == 0 { return "Buzz" }
    return str(n)
}
for i in range(1, 16) { print(fizz(i)) }
"#,
        )
        .unwrap();
    let lines: Vec<String> = out.text().lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[2], "Fizz");
    assert_eq!(lines[4], "Buzz");
    assert_eq!(lines[14], "FizzBuzz");
}

#[test]
fn test_word_count_program() {
    let mut interpreter = Interpreter::with_output(Box::new(Captured::default()));
    interpreter
        .exec(
            r#"
counts = {}
for word in "a b a c b a".split() {
    counts[word] = counts.get(word, 0) + 1
}
"#,
        )
        .unwrap();
    assert_eq!(interpreter.eval("counts").unwrap().to_string(), "{'a': 3, 'b': 2, 'c': 1}");
    assert_eq!(interpreter.eval("sorted(counts.keys())").unwrap().to_string(), "['a', 'b', 'c']");
}

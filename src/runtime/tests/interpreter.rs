//! Interpreter tests

use super::capturing_interpreter;
use crate::runtime::{ErrorKind, Interpreter, Value};

fn eval(source: &str) -> Value {
    let (mut interp, _) = capturing_interpreter();
    interp.eval(source).expect("evaluates")
}

fn eval_str(source: &str) -> String {
    eval(source).to_string()
}

fn error_kind(
    interp: &mut Interpreter,
    source: &str,
) -> ErrorKind {
    interp.run(source).unwrap_err().kind
}

#[cfg(test)]
mod arithmetic_tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval("2 + 3 * 4"), Value::Int(14));
        assert_eq!(eval("2 ** 10"), Value::Int(1024));
        assert_eq!(eval("-2 ** 2"), Value::Int(-4));
    }

    #[test]
    fn test_true_division_yields_float() {
        assert_eq!(eval_str("7 / 2"), "3.5");
        assert_eq!(eval_str("4 / 2"), "2.0");
    }

    #[test]
    fn test_floor_division_and_modulo_round_down() {
        assert_eq!(eval("-7 // 2"), Value::Int(-4));
        assert_eq!(eval("-7 % 3"), Value::Int(2));
        assert_eq!(eval("7 % -3"), Value::Int(-2));
        assert_eq!(eval_str("7.5 // 2"), "3.0");
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(eval("1 == 1.0"), Value::Bool(true));
        assert_eq!(eval("True + 1"), Value::Int(2));
        assert_eq!(eval("1 < 2.5"), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("1 / 0").unwrap_err();
        assert_eq!(err.to_string(), "ZeroDivisionError: division by zero");
        assert_eq!(error_kind(&mut interp, "1 // 0"), ErrorKind::ZeroDivisionError);
        assert_eq!(error_kind(&mut interp, "1.0 % 0"), ErrorKind::ZeroDivisionError);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(error_kind(&mut interp, "9223372036854775807 + 1"), ErrorKind::OverflowError);
        assert_eq!(error_kind(&mut interp, "2 ** 64"), ErrorKind::OverflowError);
    }

    #[test]
    fn test_string_and_list_operators() {
        assert_eq!(eval_str("'ab' + 'cd'"), "abcd");
        assert_eq!(eval_str("'ab' * 3"), "ababab");
        assert_eq!(eval_str("[1] + [2, 3]"), "[1, 2, 3]");
        assert_eq!(eval_str("[0] * 3"), "[0, 0, 0]");
        assert_eq!(eval("'b' in 'abc'"), Value::Bool(true));
        assert_eq!(eval("4 not in [1, 2]"), Value::Bool(true));
    }

    #[test]
    fn test_mismatched_operands() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("1 + 'a'").unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: unsupported operand type(s) for +: 'int' and 'str'"
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        assert_eq!(eval("0 or 'x'"), Value::str("x"));
        assert_eq!(eval("0 and undefined_name"), Value::Int(0));
        assert_eq!(eval("not []"), Value::Bool(true));
    }
}

#[cfg(test)]
mod statement_tests {
    use super::*;

    #[test]
    fn test_assignment_then_expression() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(interp.run("x = 5").unwrap(), None);
        assert_eq!(interp.run("x * 2").unwrap(), Some(Value::Int(10)));
        assert_eq!(interp.globals().get("x"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_augmented_assignment() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("n = 1; n += 4; n *= 3; n -= 1").unwrap();
        assert_eq!(interp.eval("n").unwrap(), Value::Int(14));
        interp.exec("xs = [1, 2]; xs[0] += 10").unwrap();
        assert_eq!(interp.eval("xs").unwrap().to_string(), "[11, 2]");
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let (mut interp, _) = capturing_interpreter();
        interp
            .exec("total = 0\ni = 0\nwhile True {\n  i += 1\n  if i > 10 { break }\n  if i % 2 == 0 { continue }\n  total += i\n}")
            .unwrap();
        assert_eq!(interp.eval("total").unwrap(), Value::Int(25));
    }

    #[test]
    fn test_for_over_range_and_dict() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("s = 0\nfor i in range(5) { s += i }").unwrap();
        assert_eq!(interp.eval("s").unwrap(), Value::Int(10));
        interp
            .exec("d = {'a': 1, 'b': 2}\nkeys = ''\nfor k in d { keys += k }")
            .unwrap();
        assert_eq!(interp.eval("keys").unwrap(), Value::str("ab"));
    }

    #[test]
    fn test_functions_and_recursion() {
        let (mut interp, _) = capturing_interpreter();
        interp
            .exec("def fact(n) {\n  if n <= 1 { return 1 }\n  return n * fact(n - 1)\n}")
            .unwrap();
        assert_eq!(interp.eval("fact(10)").unwrap(), Value::Int(3628800));
        assert_eq!(interp.eval("fact").unwrap().to_string(), "<function fact>");
    }

    #[test]
    fn test_function_locals_do_not_leak() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("x = 1\ndef f() { x = 2; return x }\ny = f()").unwrap();
        assert_eq!(interp.eval("x").unwrap(), Value::Int(1));
        assert_eq!(interp.eval("y").unwrap(), Value::Int(2));
        assert!(interp.globals().contains("f"));
    }

    #[test]
    fn test_function_without_return_yields_none() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("def noop() { pass }").unwrap();
        assert_eq!(interp.run("noop()").unwrap(), Some(Value::None));
    }

    #[test]
    fn test_wrong_arity() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("def f(a) { return a }").unwrap();
        let err = interp.run("f(1, 2)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: f() takes 1 positional argument but 2 were given"
        );
    }

    #[test]
    fn test_unbounded_recursion() {
        // test threads get a small stack by default
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let (mut interp, _) = capturing_interpreter();
                interp.exec("def forever(n) { return forever(n + 1) }").unwrap();
                assert_eq!(error_kind(&mut interp, "forever(0)"), ErrorKind::RecursionError);
                // the interpreter is usable afterwards
                assert_eq!(interp.eval("1 + 1").unwrap(), Value::Int(2));
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_del_removes_binding() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("a = 1; del a").unwrap();
        assert!(!interp.globals().contains("a"));
        assert_eq!(error_kind(&mut interp, "del a"), ErrorKind::NameError);
    }

    #[test]
    fn test_undefined_name() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("undefined_var").unwrap_err();
        assert_eq!(err.to_string(), "NameError: name 'undefined_var' is not defined");
    }

    #[test]
    fn test_runtime_error_carries_line() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("a = 1\nb = a / 0").unwrap_err();
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_partial_execution_keeps_earlier_bindings() {
        let (mut interp, _) = capturing_interpreter();
        assert!(interp.run("a = 1\nb = missing").is_err());
        assert_eq!(interp.eval("a").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_clear_drops_bindings() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("a = 1; b = 2").unwrap();
        interp.clear();
        assert!(interp.globals().is_empty());
        assert_eq!(error_kind(&mut interp, "a"), ErrorKind::NameError);
    }

    #[test]
    fn test_eval_rejects_statements() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(interp.eval("x = 1").unwrap_err().kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn test_environment_keeps_insertion_order() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("b = 1; a = 2; b = 3").unwrap();
        let names: Vec<&str> = interp.globals().names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}

#[cfg(test)]
mod builtin_tests {
    use super::*;

    #[test]
    fn test_print_writes_to_output() {
        let (mut interp, captured) = capturing_interpreter();
        assert_eq!(interp.run("print('hi', 1, [2])").unwrap(), Some(Value::None));
        interp.exec("for i in range(2) { print(i) }").unwrap();
        assert_eq!(captured.text(), "hi 1 [2]\n0\n1\n");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(eval("int('42')"), Value::Int(42));
        assert_eq!(eval("int(3.9)"), Value::Int(3));
        assert_eq!(eval_str("float('1.5')"), "1.5");
        assert_eq!(eval_str("str(1.0)"), "1.0");
        assert_eq!(eval("bool('')"), Value::Bool(false));
        assert_eq!(eval_str("repr('a')"), "'a'");
        assert_eq!(eval_str("type(1)"), "<class 'int'>");
    }

    #[test]
    fn test_invalid_int_literal() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("int('abc')").unwrap_err();
        assert_eq!(
            err.to_string(),
            "ValueError: invalid literal for int() with base 10: 'abc'"
        );
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(eval("len([1, 2, 3])"), Value::Int(3));
        assert_eq!(eval("len('héllo')"), Value::Int(5));
        assert_eq!(eval("sum([1, 2, 3])"), Value::Int(6));
        assert_eq!(eval_str("sum([1, 2.5])"), "3.5");
        assert_eq!(eval("min(3, 1, 2)"), Value::Int(1));
        assert_eq!(eval("max([3, 1, 2])"), Value::Int(3));
        assert_eq!(eval("abs(-5)"), Value::Int(5));
        assert_eq!(eval_str("sorted([3, 1, 2])"), "[1, 2, 3]");
        assert_eq!(eval_str("range(5, 0, -2)"), "[5, 3, 1]");
    }

    #[test]
    fn test_max_of_empty_sequence() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(error_kind(&mut interp, "max([])"), ErrorKind::ValueError);
    }

    #[test]
    fn test_builtins_are_not_environment_bindings() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(interp.eval("len").unwrap().to_string(), "<built-in function len>");
        assert!(interp.globals().is_empty());
    }

    #[test]
    fn test_user_binding_shadows_builtin() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("len = 3").unwrap();
        assert_eq!(interp.eval("len").unwrap(), Value::Int(3));
        interp.clear();
        assert_eq!(interp.eval("len('ab')").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_list_methods() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("xs = [1]\nxs.append(2)\nys = xs").unwrap();
        assert_eq!(interp.eval("ys").unwrap().to_string(), "[1, 2]");
        assert_eq!(interp.eval("xs.pop()").unwrap(), Value::Int(2));
        assert_eq!(interp.eval("xs.pop(0)").unwrap(), Value::Int(1));
        assert_eq!(error_kind(&mut interp, "xs.pop()"), ErrorKind::IndexError);
    }

    #[test]
    fn test_dict_methods() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("d = {'a': 1}\nd['b'] = 2").unwrap();
        assert_eq!(interp.eval("d").unwrap().to_string(), "{'a': 1, 'b': 2}");
        assert_eq!(interp.eval("d.keys()").unwrap().to_string(), "['a', 'b']");
        assert_eq!(interp.eval("d.items()").unwrap().to_string(), "[['a', 1], ['b', 2]]");
        assert_eq!(interp.eval("d.get('z', 0)").unwrap(), Value::Int(0));
        assert_eq!(interp.run("d['z']").unwrap_err().to_string(), "KeyError: 'z'");
    }

    #[test]
    fn test_string_methods() {
        assert_eq!(eval_str("'  Hi '.strip().upper()"), "HI");
        assert_eq!(eval_str("'a,b'.split(',')"), "['a', 'b']");
        assert_eq!(eval_str("'-'.join(['x', 'y'])"), "x-y");
        assert_eq!(eval_str("'aXa'.replace('a', 'b')"), "bXb");
    }

    #[test]
    fn test_unknown_method() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("[].nope()").unwrap_err();
        assert_eq!(err.to_string(), "AttributeError: 'list' object has no attribute 'nope'");
    }

    #[test]
    fn test_indexing() {
        assert_eq!(eval("[1, 2, 3][-1]"), Value::Int(3));
        assert_eq!(eval("'abc'[1]"), Value::str("b"));
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("[1][5]").unwrap_err();
        assert_eq!(err.to_string(), "IndexError: list index out of range");
        assert_eq!(error_kind(&mut interp, "5[0]"), ErrorKind::TypeError);
    }

    #[test]
    fn test_calling_a_non_function() {
        let (mut interp, _) = capturing_interpreter();
        let err = interp.run("5()").unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 'int' object is not callable");
    }
}

#[cfg(test)]
mod robustness_tests {
    use super::*;

    fn error_text(source: &str) -> String {
        let (mut interp, _) = capturing_interpreter();
        interp.run(source).unwrap_err().to_string()
    }

    #[test]
    fn test_huge_repetition_overflows() {
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(error_kind(&mut interp, "[0] * 10**18"), ErrorKind::OverflowError);
        assert_eq!(error_kind(&mut interp, "'ab' * 10**18"), ErrorKind::OverflowError);
        assert_eq!(error_kind(&mut interp, "10**18 * [0]"), ErrorKind::OverflowError);
        assert_eq!(eval_str("[] * 10**18"), "[]");
        assert_eq!(eval_str("'' * 10**18"), "");
        assert_eq!(eval_str("'ab' * 3"), "ababab");
        assert_eq!(eval_str("[1] * -2"), "[]");
    }

    #[test]
    fn test_self_referential_containers_render() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("a = [1]\na.append(a)\nd = {}\nd['k'] = d").unwrap();
        assert_eq!(interp.eval("str(a)").unwrap(), Value::str("[1, [...]]"));
        assert_eq!(interp.eval("repr(d)").unwrap(), Value::str("{'k': {...}}"));
        assert_eq!(interp.eval("a == a").unwrap(), Value::Bool(true));
        assert_eq!(interp.eval("d == d").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_distinct_cycles_compare_without_crashing() {
        let (mut interp, _) = capturing_interpreter();
        interp.exec("a = [1]\na.append(a)\nb = [1]\nb.append(b)").unwrap();
        assert_eq!(interp.eval("a == b").unwrap(), Value::Bool(false));
        let err = interp.run("a < b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursionError);
    }

    #[test]
    fn test_sorted_with_nan_keeps_a_total_order() {
        let (mut interp, _) = capturing_interpreter();
        interp
            .exec(
                "xs = [float('nan')]\n\
                 i = 0\n\
                 while i < 30 { xs.append((i * 7) % 30); xs.append(i / 4); i += 1 }\n\
                 ys = sorted(xs)",
            )
            .unwrap();
        assert_eq!(interp.eval("len(ys)").unwrap(), Value::Int(61));
        assert_eq!(interp.eval("ys[0]").unwrap(), Value::Int(0));
        assert_eq!(interp.eval("str(ys[-1])").unwrap(), Value::str("nan"));
        assert_eq!(interp.eval("ys[-2]").unwrap(), Value::Int(29));
    }

    #[test]
    fn test_sorted_rejects_unorderable_items() {
        assert_eq!(
            error_text("sorted([1, 'a'])"),
            "TypeError: '<' not supported between instances of 'str' and 'int'"
        );
        let (mut interp, _) = capturing_interpreter();
        assert_eq!(error_kind(&mut interp, "sorted([{}, {}])"), ErrorKind::TypeError);
        assert_eq!(eval_str("sorted([[2, 'b'], [1, 'z'], [2, 'a']])"), "[[1, 'z'], [2, 'a'], [2, 'b']]");
    }

    #[test]
    fn test_nan_orderings_are_false() {
        assert_eq!(eval("float('nan') < 1"), Value::Bool(false));
        assert_eq!(eval("float('nan') >= 1"), Value::Bool(false));
        assert_eq!(eval("1 > float('nan')"), Value::Bool(false));
        assert_eq!(eval("float('nan') == float('nan')"), Value::Bool(false));
    }

    #[test]
    fn test_deep_parentheses_are_a_syntax_error() {
        let source = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let text = error_text(&source);
        assert!(text.starts_with("SyntaxError"), "{}", text);
        assert!(text.contains("too many nested parentheses"), "{}", text);

        let nested = format!("{}1{}", "(".repeat(60), ")".repeat(60));
        assert_eq!(eval(&nested), Value::Int(1));
    }

    #[test]
    fn test_deep_blocks_are_a_syntax_error() {
        let source = format!("{}pass{}", "if True { ".repeat(300), " }".repeat(300));
        let text = error_text(&source);
        assert!(text.contains("too many statically nested blocks"), "{}", text);

        let (mut interp, _) = capturing_interpreter();
        let nested = format!("{}x = 1{}", "if True { ".repeat(30), " }".repeat(30));
        interp.exec(&nested).unwrap();
        assert_eq!(interp.eval("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_long_operator_chain_is_a_syntax_error() {
        let source = vec!["1"; 301].join(" + ");
        let text = error_text(&source);
        assert!(text.contains("expression too complex"), "{}", text);
        assert_eq!(eval(&vec!["1"; 150].join(" + ")), Value::Int(150));
    }
}

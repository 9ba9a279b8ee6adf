//! Builtin functions and methods
//!
//! Builtins live in a static registry, outside the shared environment, so
//! clearing or listing the environment never touches them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::error::{ErrorKind, ScriptError, ScriptResult};
use super::interpreter::Interpreter;
use super::value::{Key, Value, MAX_NESTING};
use crate::script_bail;

/// Largest list `range()` will materialize
pub const MAX_RANGE_LEN: i64 = 10_000_000;

pub type BuiltinFn = fn(&mut Interpreter, Vec<Value>) -> ScriptResult<Value>;

/// Builtin function definition
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Builtin registry
pub static BUILTINS: Lazy<BuiltinRegistry> = Lazy::new(|| {
    let mut registry = BuiltinRegistry::new();
    registry.init();
    registry
});

#[derive(Default)]
pub struct BuiltinRegistry {
    functions: HashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &'static str,
        func: BuiltinFn,
    ) {
        self.functions.insert(name, Builtin { name, func });
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Builtin> {
        self.functions.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn init(&mut self) {
        self.register("print", builtin_print);
        self.register("len", builtin_len);
        self.register("str", builtin_str);
        self.register("repr", builtin_repr);
        self.register("int", builtin_int);
        self.register("float", builtin_float);
        self.register("bool", builtin_bool);
        self.register("type", builtin_type);
        self.register("abs", builtin_abs);
        self.register("min", builtin_min);
        self.register("max", builtin_max);
        self.register("sum", builtin_sum);
        self.register("range", builtin_range);
        self.register("sorted", builtin_sorted);
    }
}

fn expect_args(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> ScriptResult<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("exactly {}", min)
        } else if args.len() < min {
            format!("at least {}", min)
        } else {
            format!("at most {}", max)
        };
        script_bail!(
            TypeError,
            "{}() takes {} argument{} ({} given)",
            name,
            expected,
            if min == max && min == 1 { "" } else { "s" },
            args.len()
        );
    }
    Ok(())
}

fn builtin_print(
    interp: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    let line: Vec<String> = args.iter().map(Value::to_string).collect();
    interp.write_output(&format!("{}\n", line.join(" ")))?;
    Ok(Value::None)
}

fn builtin_len(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("len", &args, 1, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Dict(entries) => entries.borrow().len(),
        other => script_bail!(TypeError, "object of type '{}' has no len()", other.type_name()),
    };
    Ok(Value::Int(len as i64))
}

fn builtin_str(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("str", &args, 0, 1)?;
    Ok(match args.first() {
        Some(value) => Value::str(&value.to_string()),
        None => Value::str(""),
    })
}

fn builtin_repr(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("repr", &args, 1, 1)?;
    Ok(Value::str(&args[0].repr()))
}

fn builtin_int(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("int", &args, 0, 1)?;
    let value = match args.first() {
        None => return Ok(Value::Int(0)),
        Some(value) => value,
    };
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::Float(f) => {
            if f.is_nan() {
                script_bail!(ValueError, "cannot convert float NaN to integer");
            }
            let truncated = f.trunc();
            if truncated.is_infinite() || truncated.abs() >= 9.2e18 {
                script_bail!(OverflowError, "cannot convert float {} to integer", f);
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ScriptError::value(format!("invalid literal for int() with base 10: {}", value.repr()))),
        other => script_bail!(
            TypeError,
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ),
    }
}

fn builtin_float(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("float", &args, 0, 1)?;
    let value = match args.first() {
        None => return Ok(Value::Float(0.0)),
        Some(value) => value,
    };
    match value {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ScriptError::value(format!("could not convert string to float: {}", value.repr()))),
        other => match other.as_float() {
            Some(f) => Ok(Value::Float(f)),
            None => script_bail!(
                TypeError,
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ),
        },
    }
}

fn builtin_bool(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("bool", &args, 0, 1)?;
    Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
}

fn builtin_type(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("type", &args, 1, 1)?;
    Ok(Value::str(&format!("<class '{}'>", args[0].type_name())))
}

fn builtin_abs(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("abs", &args, 1, 1)?;
    match &args[0] {
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => match other.as_int() {
            Some(i) => i.checked_abs().map(Value::Int).ok_or_else(ScriptError::overflow),
            None => script_bail!(TypeError, "bad operand type for abs(): '{}'", other.type_name()),
        },
    }
}

/// Arguments of min()/max(): a single iterable, or two or more values
fn extremum_candidates(
    name: &str,
    args: Vec<Value>,
) -> ScriptResult<Vec<Value>> {
    let candidates = match args.len() {
        0 => script_bail!(TypeError, "{} expected at least 1 argument, got 0", name),
        1 => args[0].iter_values()?,
        _ => args,
    };
    if candidates.is_empty() {
        script_bail!(ValueError, "{}() arg is an empty sequence", name);
    }
    Ok(candidates)
}

fn pick_extremum(
    name: &str,
    args: Vec<Value>,
    wanted: Ordering,
) -> ScriptResult<Value> {
    let mut candidates = extremum_candidates(name, args)?.into_iter();
    let mut best = match candidates.next() {
        Some(first) => first,
        None => script_bail!(ValueError, "{}() arg is an empty sequence", name),
    };
    let op = if wanted == Ordering::Less { "<" } else { ">" };
    for candidate in candidates {
        if candidate.compare(&best, op)? == wanted {
            best = candidate;
        }
    }
    Ok(best)
}

fn builtin_min(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    pick_extremum("min", args, Ordering::Less)
}

fn builtin_max(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    pick_extremum("max", args, Ordering::Greater)
}

fn builtin_sum(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("sum", &args, 1, 2)?;
    let mut total = args.get(1).cloned().unwrap_or(Value::Int(0));
    for item in args[0].iter_values()? {
        total = match (&total, &item) {
            (Value::Float(_), _) | (_, Value::Float(_)) => match (total.as_float(), item.as_float()) {
                (Some(a), Some(b)) => Value::Float(a + b),
                _ => script_bail!(
                    TypeError,
                    "unsupported operand type(s) for +: '{}' and '{}'",
                    total.type_name(),
                    item.type_name()
                ),
            },
            _ => match (total.as_int(), item.as_int()) {
                (Some(a), Some(b)) => Value::Int(a.checked_add(b).ok_or_else(ScriptError::overflow)?),
                _ => script_bail!(
                    TypeError,
                    "unsupported operand type(s) for +: '{}' and '{}'",
                    total.type_name(),
                    item.type_name()
                ),
            },
        };
    }
    Ok(total)
}

fn builtin_range(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("range", &args, 1, 3)?;
    let mut ints = Vec::with_capacity(args.len());
    for arg in &args {
        match (arg, arg.as_int()) {
            (Value::Float(_), _) | (_, None) => script_bail!(
                TypeError,
                "'{}' object cannot be interpreted as an integer",
                arg.type_name()
            ),
            (_, Some(i)) => ints.push(i),
        }
    }
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => unreachable!("argument count checked above"),
    };
    if step == 0 {
        script_bail!(ValueError, "range() arg 3 must not be zero");
    }

    let span = if step > 0 {
        (stop as i128 - start as i128).max(0)
    } else {
        (start as i128 - stop as i128).max(0)
    };
    let len = (span + step.unsigned_abs() as i128 - 1) / step.unsigned_abs() as i128;
    if len > MAX_RANGE_LEN as i128 {
        script_bail!(ValueError, "range() of {} items is too large", len);
    }

    let items = (0..len as i64).map(|i| Value::Int(start + i * step)).collect();
    Ok(Value::list(items))
}

fn builtin_sorted(
    _: &mut Interpreter,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    expect_args("sorted", &args, 1, 1)?;
    let items = args[0].iter_values()?;
    if items.len() < 2 {
        return Ok(Value::list(items));
    }
    // every item must be orderable against the first before sorting starts
    for item in &items[1..] {
        item.compare(&items[0], "<")?;
    }

    let mut keyed = Vec::with_capacity(items.len());
    for item in items {
        keyed.push((SortKey::of(&item, 0)?, item));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Value::list(keyed.into_iter().map(|(_, item)| item).collect()))
}

/// Total order used by `sorted()`
///
/// Agrees with `<` wherever `<` is defined. NaN sorts after every number;
/// mismatched types nested inside lists order as numbers, then strings,
/// then lists.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Num(NumKey),
    Str(Rc<str>),
    List(Vec<SortKey>),
}

impl SortKey {
    fn of(
        value: &Value,
        depth: usize,
    ) -> ScriptResult<SortKey> {
        match value {
            Value::Float(f) => Ok(SortKey::Num(NumKey::float(*f))),
            Value::Str(s) => Ok(SortKey::Str(s.clone())),
            Value::List(items) => {
                if depth >= MAX_NESTING {
                    script_bail!(RecursionError, "maximum recursion depth exceeded in comparison");
                }
                let keys = items
                    .borrow()
                    .iter()
                    .map(|item| SortKey::of(item, depth + 1))
                    .collect::<ScriptResult<Vec<_>>>()?;
                Ok(SortKey::List(keys))
            }
            other => match other.as_int() {
                Some(i) => Ok(SortKey::Num(NumKey::int(i))),
                None => script_bail!(
                    TypeError,
                    "'<' not supported between instances of '{}' and '{}'",
                    other.type_name(),
                    other.type_name()
                ),
            },
        }
    }
}

/// A number ordered by its float value, ties broken by its exact integer part
#[derive(Debug, Clone, Copy)]
struct NumKey {
    approx: f64,
    exact: i128,
}

impl NumKey {
    fn int(i: i64) -> Self {
        Self {
            approx: i as f64,
            exact: i as i128,
        }
    }

    fn float(f: f64) -> Self {
        Self {
            // -0.0 == 0.0
            approx: if f == 0.0 { 0.0 } else { f },
            exact: f as i128,
        }
    }
}

impl Ord for NumKey {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.approx
            .total_cmp(&other.approx)
            .then(self.exact.cmp(&other.exact))
    }
}

impl PartialOrd for NumKey {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NumKey {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumKey {}

fn expect_str_arg(
    method: &str,
    value: &Value,
) -> ScriptResult<Rc<str>> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => script_bail!(
            TypeError,
            "{}() argument must be str, not '{}'",
            method,
            other.type_name()
        ),
    }
}

/// Dispatch `object.name(args)`
pub fn call_method(
    object: &Value,
    name: &str,
    args: Vec<Value>,
) -> ScriptResult<Value> {
    match (object, name) {
        (Value::List(items), "append") => {
            expect_args("append", &args, 1, 1)?;
            items.borrow_mut().extend(args);
            Ok(Value::None)
        }
        (Value::List(items), "pop") => {
            expect_args("pop", &args, 0, 1)?;
            let mut items = items.borrow_mut();
            if items.is_empty() {
                script_bail!(IndexError, "pop from empty list");
            }
            let idx = match args.first() {
                None => items.len() - 1,
                Some(index) => normalize_index(index, items.len(), "pop index")?,
            };
            Ok(items.remove(idx))
        }
        (Value::Dict(entries), "keys") => {
            expect_args("keys", &args, 0, 0)?;
            Ok(Value::list(entries.borrow().keys().map(Value::from).collect()))
        }
        (Value::Dict(entries), "values") => {
            expect_args("values", &args, 0, 0)?;
            Ok(Value::list(entries.borrow().values().cloned().collect()))
        }
        (Value::Dict(entries), "items") => {
            expect_args("items", &args, 0, 0)?;
            let pairs = entries
                .borrow()
                .iter()
                .map(|(k, v)| Value::list(vec![Value::from(k), v.clone()]))
                .collect();
            Ok(Value::list(pairs))
        }
        (Value::Dict(entries), "get") => {
            expect_args("get", &args, 1, 2)?;
            let key = args[0].to_key()?;
            let found = entries.borrow().get(&key).cloned();
            Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
        }
        (Value::Str(s), "upper") => {
            expect_args("upper", &args, 0, 0)?;
            Ok(Value::str(&s.to_uppercase()))
        }
        (Value::Str(s), "lower") => {
            expect_args("lower", &args, 0, 0)?;
            Ok(Value::str(&s.to_lowercase()))
        }
        (Value::Str(s), "strip") => {
            expect_args("strip", &args, 0, 0)?;
            Ok(Value::str(s.trim()))
        }
        (Value::Str(s), "split") => {
            expect_args("split", &args, 0, 1)?;
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::None) => s.split_whitespace().map(Value::str).collect(),
                Some(sep) => {
                    let sep = expect_str_arg("split", sep)?;
                    if sep.is_empty() {
                        script_bail!(ValueError, "empty separator");
                    }
                    s.split(&*sep).map(Value::str).collect()
                }
            };
            Ok(Value::list(parts))
        }
        (Value::Str(s), "join") => {
            expect_args("join", &args, 1, 1)?;
            let mut parts = Vec::new();
            for item in args[0].iter_values()? {
                match item {
                    Value::Str(part) => parts.push(part.to_string()),
                    other => script_bail!(
                        TypeError,
                        "sequence item {}: expected str instance, {} found",
                        parts.len(),
                        other.type_name()
                    ),
                }
            }
            Ok(Value::str(&parts.join(&**s)))
        }
        (Value::Str(s), "replace") => {
            expect_args("replace", &args, 2, 2)?;
            let old = expect_str_arg("replace", &args[0])?;
            let new = expect_str_arg("replace", &args[1])?;
            Ok(Value::str(&s.replace(&*old, &new)))
        }
        (other, _) => Err(ScriptError::new(
            ErrorKind::AttributeError,
            format!("'{}' object has no attribute '{}'", other.type_name(), name),
        )),
    }
}

/// Resolve a possibly negative index against `len`
pub fn normalize_index(
    index: &Value,
    len: usize,
    what: &str,
) -> ScriptResult<usize> {
    let i = match (index, index.as_int()) {
        (Value::Float(_), _) | (_, None) => script_bail!(
            TypeError,
            "indices must be integers, not '{}'",
            index.type_name()
        ),
        (_, Some(i)) => i,
    };
    let resolved = if i < 0 { i + len as i64 } else { i };
    if resolved < 0 || resolved >= len as i64 {
        script_bail!(IndexError, "{} out of range", what);
    }
    Ok(resolved as usize)
}

/// Build a dict value from evaluated pairs
pub fn build_dict(pairs: Vec<(Value, Value)>) -> ScriptResult<Value> {
    let mut entries: IndexMap<Key, Value> = IndexMap::with_capacity(pairs.len());
    for (k, v) in pairs {
        entries.insert(k.to_key()?, v);
    }
    Ok(Value::dict(entries))
}

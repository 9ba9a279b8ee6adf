//! Runtime values
//!
//! `Display` renders the user-facing form (`str()`), [`Value::repr`] the quoted
//! form used inside containers.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::ast::FunctionDef;
use super::builtins::Builtin;
use super::error::{ScriptError, ScriptResult};
use crate::script_bail;

/// Container depth past which rendering and comparison stop descending
pub const MAX_NESTING: usize = 200;

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type DictRef = Rc<RefCell<IndexMap<Key, Value>>>;

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(ListRef),
    Dict(DictRef),
    Function(Rc<FunctionDef>),
    Builtin(&'static Builtin),
}

/// Hashable subset of values usable as dict keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    None,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn dict(entries: IndexMap<Key, Value>) -> Value {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin_function_or_method",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Builtin(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(entries) => !entries.borrow().is_empty(),
            Value::Function(_) | Value::Builtin(_) => true,
        }
    }

    /// Numeric view; bools count as integers
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            other => other.as_int().map(|i| i as f64),
        }
    }

    pub fn to_key(&self) -> ScriptResult<Key> {
        match self {
            Value::None => Ok(Key::None),
            Value::Bool(b) => Ok(Key::Bool(*b)),
            Value::Int(i) => Ok(Key::Int(*i)),
            Value::Str(s) => Ok(Key::Str(s.clone())),
            other => Err(ScriptError::type_error(format!(
                "unhashable type: '{}'",
                other.type_name()
            ))),
        }
    }

    /// Quoted representation, as shown inside lists and dicts
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, true, &mut Vec::new());
        out
    }

    /// Append the rendered value to `out`. `open` holds the containers being
    /// rendered further up; meeting one again prints `[...]` or `{...}`.
    fn render(
        &self,
        out: &mut String,
        quoted: bool,
        open: &mut Vec<*const ()>,
    ) {
        match self {
            Value::None => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(x) => out.push_str(&format_float(*x)),
            Value::Str(s) if quoted => out.push_str(&quote(s)),
            Value::Str(s) => out.push_str(s),
            Value::List(items) => {
                let ptr = Rc::as_ptr(items).cast::<()>();
                if open.contains(&ptr) || open.len() >= MAX_NESTING {
                    out.push_str("[...]");
                    return;
                }
                open.push(ptr);
                out.push('[');
                for (idx, item) in items.borrow().iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    item.render(out, true, open);
                }
                out.push(']');
                open.pop();
            }
            Value::Dict(entries) => {
                let ptr = Rc::as_ptr(entries).cast::<()>();
                if open.contains(&ptr) || open.len() >= MAX_NESTING {
                    out.push_str("{...}");
                    return;
                }
                open.push(ptr);
                out.push('{');
                for (idx, (key, value)) in entries.borrow().iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    Value::from(key).render(out, true, open);
                    out.push_str(": ");
                    value.render(out, true, open);
                }
                out.push('}');
                open.pop();
            }
            Value::Function(def) => {
                out.push_str("<function ");
                out.push_str(&def.name);
                out.push('>');
            }
            Value::Builtin(builtin) => {
                out.push_str("<built-in function ");
                out.push_str(builtin.name);
                out.push('>');
            }
        }
    }

    /// Ordering for `<`-style comparisons; `op` only feeds the error message
    pub fn compare(
        &self,
        other: &Value,
        op: &str,
    ) -> ScriptResult<Ordering> {
        self.compare_at(other, op, 0)
    }

    fn compare_at(
        &self,
        other: &Value,
        op: &str,
        depth: usize,
    ) -> ScriptResult<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                if depth >= MAX_NESTING {
                    script_bail!(RecursionError, "maximum recursion depth exceeded in comparison");
                }
                let (a, b) = (a.borrow(), b.borrow());
                for (x, y) in a.iter().zip(b.iter()) {
                    if !x.eq_at(y, depth + 1) {
                        return x.compare_at(y, op, depth + 1);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            // NaN has no partial order; fall back to the IEEE total order
            (Value::Float(_), _) | (_, Value::Float(_)) => match (self.as_float(), other.as_float()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))),
                _ => Err(unorderable(self, other, op)),
            },
            _ => match (self.as_int(), other.as_int()) {
                (Some(a), Some(b)) => Ok(a.cmp(&b)),
                _ => Err(unorderable(self, other, op)),
            },
        }
    }

    /// Items visited by `for` loops and iterable builtins
    pub fn iter_values(&self) -> ScriptResult<Vec<Value>> {
        match self {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.encode_utf8(&mut [0; 4]))).collect()),
            Value::Dict(entries) => Ok(entries.borrow().keys().map(Value::from).collect()),
            other => Err(ScriptError::type_error(format!(
                "'{}' object is not iterable",
                other.type_name()
            ))),
        }
    }
}

fn unorderable(
    lhs: &Value,
    rhs: &Value,
    op: &str,
) -> ScriptError {
    ScriptError::type_error(format!(
        "'{}' not supported between instances of '{}' and '{}'",
        op,
        lhs.type_name(),
        rhs.type_name()
    ))
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        match key {
            Key::None => Value::None,
            Key::Bool(b) => Value::Bool(*b),
            Key::Int(i) => Value::Int(*i),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.eq_at(other, 0)
    }
}

impl Value {
    /// Equality that gives up (unequal) on containers nested past
    /// [`MAX_NESTING`], so cyclic values terminate
    fn eq_at(
        &self,
        other: &Value,
        depth: usize,
    ) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                depth < MAX_NESTING
                    && a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.eq_at(y, depth + 1))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                depth < MAX_NESTING
                    && a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.eq_at(y, depth + 1)))
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Float(_), _) | (_, Value::Float(_)) => match (self.as_float(), other.as_float()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            _ => match (self.as_int(), other.as_int()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => {
                let mut out = String::new();
                other.render(&mut out, false, &mut Vec::new());
                f.write_str(&out)
            }
        }
    }
}

//! Operator semantics
//!
//! Integers are checked i64: overflow raises instead of wrapping. `/` always
//! yields a float, `//` and `%` floor toward negative infinity.

use super::ast::{BinaryOp, UnaryOp};
use super::builtins::normalize_index;
use super::error::{ScriptError, ScriptResult};
use super::value::Value;
use crate::script_bail;

/// Longest list or string a repetition may build
pub const MAX_SEQUENCE_LEN: usize = 10_000_000;

pub fn binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
) -> ScriptResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::Ne => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            if is_nan(lhs) || is_nan(rhs) {
                return Ok(Value::Bool(false));
            }
            let ordering = lhs.compare(rhs, op.symbol())?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        BinaryOp::In => contains(rhs, lhs).map(Value::Bool),
        BinaryOp::NotIn => contains(rhs, lhs).map(|found| Value::Bool(!found)),
        BinaryOp::Add => match (lhs, rhs) {
            (Value::Str(a), Value::Str(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::str(&joined))
            }
            (Value::List(a), Value::List(b)) => {
                let mut joined = a.borrow().clone();
                joined.extend(b.borrow().iter().cloned());
                Ok(Value::list(joined))
            }
            _ => arithmetic(op, lhs, rhs),
        },
        BinaryOp::Mul => match (lhs, rhs) {
            (Value::Str(s), n) | (n, Value::Str(s)) if is_int(n) => {
                let count = repeat_count(s.len(), n)?;
                Ok(Value::str(&s.repeat(count)))
            }
            (Value::List(items), n) | (n, Value::List(items)) if is_int(n) => {
                let items = items.borrow();
                let count = repeat_count(items.len(), n)?;
                let mut repeated = Vec::with_capacity(items.len() * count);
                for _ in 0..count {
                    repeated.extend(items.iter().cloned());
                }
                Ok(Value::list(repeated))
            }
            _ => arithmetic(op, lhs, rhs),
        },
        _ => arithmetic(op, lhs, rhs),
    }
}

fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_nan())
}

fn is_int(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Bool(_))
}

/// How many copies `seq * n` makes; the result may hold at most
/// [`MAX_SEQUENCE_LEN`] items
fn repeat_count(
    len: usize,
    n: &Value,
) -> ScriptResult<usize> {
    let count = usize::try_from(n.as_int().unwrap_or(0).max(0)).map_err(|_| ScriptError::overflow())?;
    if len == 0 {
        return Ok(0);
    }
    match len.checked_mul(count) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(count),
        _ => script_bail!(OverflowError, "repeated sequence is too long"),
    }
}

fn arithmetic(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
) -> ScriptResult<Value> {
    if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        return int_arithmetic(op, a, b);
    }
    if let (Some(a), Some(b)) = (lhs.as_float(), rhs.as_float()) {
        return float_arithmetic(op, a, b);
    }
    script_bail!(
        TypeError,
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        lhs.type_name(),
        rhs.type_name()
    )
}

fn int_arithmetic(
    op: BinaryOp,
    a: i64,
    b: i64,
) -> ScriptResult<Value> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                script_bail!(ZeroDivisionError, "division by zero");
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                script_bail!(ZeroDivisionError, "integer division or modulo by zero");
            }
            a.checked_div(b).map(|q| {
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    q - 1
                } else {
                    q
                }
            })
        }
        BinaryOp::Mod => {
            if b == 0 {
                script_bail!(ZeroDivisionError, "integer modulo by zero");
            }
            let r = a.wrapping_rem(b);
            Some(if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r })
        }
        BinaryOp::Pow => {
            if b < 0 {
                if a == 0 {
                    script_bail!(ZeroDivisionError, "0.0 cannot be raised to a negative power");
                }
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp))
        }
        _ => unreachable!("comparison operators are handled before arithmetic"),
    };
    result.map(Value::Int).ok_or_else(ScriptError::overflow)
}

fn float_arithmetic(
    op: BinaryOp,
    a: f64,
    b: f64,
) -> ScriptResult<Value> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                script_bail!(ZeroDivisionError, "float division by zero");
            }
            a / b
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                script_bail!(ZeroDivisionError, "float floor division by zero");
            }
            (a / b).floor()
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                script_bail!(ZeroDivisionError, "float modulo by zero");
            }
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
        BinaryOp::Pow => {
            if a == 0.0 && b < 0.0 {
                script_bail!(ZeroDivisionError, "0.0 cannot be raised to a negative power");
            }
            a.powf(b)
        }
        _ => unreachable!("comparison operators are handled before arithmetic"),
    };
    Ok(Value::Float(result))
}

pub fn unary(
    op: UnaryOp,
    operand: &Value,
) -> ScriptResult<Value> {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Pos, Value::Float(f)) => Ok(Value::Float(*f)),
        (UnaryOp::Neg, value) if value.as_int().is_some() => value
            .as_int()
            .and_then(i64::checked_neg)
            .map(Value::Int)
            .ok_or_else(ScriptError::overflow),
        (UnaryOp::Pos, value) if value.as_int().is_some() => Ok(Value::Int(value.as_int().unwrap_or(0))),
        (op, value) => script_bail!(
            TypeError,
            "bad operand type for unary {}: '{}'",
            if op == UnaryOp::Neg { "-" } else { "+" },
            value.type_name()
        ),
    }
}

/// `item in container`
pub fn contains(
    container: &Value,
    item: &Value,
) -> ScriptResult<bool> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_ref())),
            other => script_bail!(
                TypeError,
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|candidate| candidate == item)),
        Value::Dict(entries) => Ok(entries.borrow().contains_key(&item.to_key()?)),
        other => script_bail!(TypeError, "argument of type '{}' is not iterable", other.type_name()),
    }
}

/// `object[index]`
pub fn get_item(
    object: &Value,
    index: &Value,
) -> ScriptResult<Value> {
    match object {
        Value::List(items) => {
            let items = items.borrow();
            let idx = normalize_index(index, items.len(), "list index")?;
            Ok(items[idx].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let idx = normalize_index(index, chars.len(), "string index")?;
            Ok(Value::str(chars[idx].encode_utf8(&mut [0; 4])))
        }
        Value::Dict(entries) => {
            let key = index.to_key()?;
            match entries.borrow().get(&key) {
                Some(value) => Ok(value.clone()),
                None => Err(ScriptError::key(index.repr())),
            }
        }
        other => script_bail!(TypeError, "'{}' object is not subscriptable", other.type_name()),
    }
}

/// `object[index] = value`
pub fn set_item(
    object: &Value,
    index: &Value,
    value: Value,
) -> ScriptResult<()> {
    match object {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let idx = normalize_index(index, items.len(), "list assignment index")?;
            items[idx] = value;
            Ok(())
        }
        Value::Dict(entries) => {
            let key = index.to_key()?;
            entries.borrow_mut().insert(key, value);
            Ok(())
        }
        other => script_bail!(
            TypeError,
            "'{}' object does not support item assignment",
            other.type_name()
        ),
    }
}

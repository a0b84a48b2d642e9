//! String functions.
//!
//! Arguments coerce through the standard value-to-string rendering, so a
//! null argument behaves as the empty string.

use crate::error::{EngineError, Result};
use crate::value::Value;

use super::{FunctionRegistry, ScalarFunction};

/// Hard cap on REPEAT output.
const MAX_REPEAT_BYTES: usize = 10 * 1024 * 1024;

/// The whitespace set TRIM and friends strip.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r'];

pub(crate) fn register(registry: &FunctionRegistry) {
    registry.register(ScalarFunction::fixed("upper", 1, upper));
    registry.register(ScalarFunction::fixed("lower", 1, lower));
    registry.register(ScalarFunction::variadic("concat", 1, concat));
    registry.register(ScalarFunction::fixed("length", 1, length));
    registry.register(ScalarFunction::fixed("trim", 1, trim));
    registry.register(ScalarFunction::fixed("ltrim", 1, ltrim));
    registry.register(ScalarFunction::fixed("rtrim", 1, rtrim));
    registry.register(ScalarFunction::ranged("substring", 2, 3, substring));
    registry.register(ScalarFunction::fixed("replace", 3, replace));
    registry.register(ScalarFunction::fixed("split", 2, split));
    registry.register(ScalarFunction::fixed("reverse", 1, reverse));
    registry.register(ScalarFunction::fixed("contains", 2, contains));
    registry.register(ScalarFunction::fixed("starts_with", 2, starts_with));
    registry.register(ScalarFunction::fixed("ends_with", 2, ends_with));
    registry.register(ScalarFunction::fixed("repeat", 2, repeat));
}

fn upper(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(args[0].render().to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(args[0].render().to_lowercase()))
}

fn concat(args: &[Value]) -> Result<Value> {
    let mut out = String::new();
    for arg in args {
        out.push_str(&arg.render());
    }
    Ok(Value::Str(out))
}

/// Byte count, not character count.
fn length(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(args[0].render().len() as i64))
}

fn trim(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(String::from(
        args[0].render().trim_matches(TRIM_CHARS),
    )))
}

fn ltrim(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(String::from(
        args[0].render().trim_start_matches(TRIM_CHARS),
    )))
}

fn rtrim(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(String::from(
        args[0].render().trim_end_matches(TRIM_CHARS),
    )))
}

/// 1-indexed, character-aware substring, clamped to the input bounds.
/// A negative length or a start past the end yields the empty string.
fn substring(args: &[Value]) -> Result<Value> {
    let text = args[0].render();
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len() as i64;

    let start = args[1].to_i64()?;
    let begin = (start - 1).max(0);
    if begin >= total {
        return Ok(Value::Str(String::new()));
    }

    let end = match args.get(2) {
        Some(len_arg) => {
            let len = len_arg.to_i64()?;
            if len < 0 {
                return Ok(Value::Str(String::new()));
            }
            (begin + len).min(total)
        }
        None => total,
    };

    let out: String = chars[begin as usize..end as usize].iter().collect();
    Ok(Value::Str(out))
}

/// Replaces every occurrence of the needle.
fn replace(args: &[Value]) -> Result<Value> {
    let text = args[0].render();
    let from = args[1].render();
    if from.is_empty() {
        return Ok(Value::Str(text));
    }
    let to = args[2].render();
    Ok(Value::Str(text.replace(&from, &to)))
}

fn split(args: &[Value]) -> Result<Value> {
    let text = args[0].render();
    let separator = args[1].render();
    if separator.is_empty() {
        return Err(EngineError::InvalidArgument(String::from(
            "SPLIT separator cannot be empty",
        )));
    }
    Ok(Value::StrList(
        text.split(&separator).map(String::from).collect(),
    ))
}

fn reverse(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(args[0].render().chars().rev().collect()))
}

fn contains(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0].render().contains(&args[1].render())))
}

fn starts_with(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0].render().starts_with(&args[1].render())))
}

fn ends_with(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0].render().ends_with(&args[1].render())))
}

fn repeat(args: &[Value]) -> Result<Value> {
    let text = args[0].render();
    let count = args[1].to_i64()?;
    if count < 0 {
        return Err(EngineError::InvalidArgument(String::from(
            "REPEAT count must be non-negative",
        )));
    }
    let count = count as usize;
    let bytes = text.len().checked_mul(count);
    if !bytes.is_some_and(|b| b <= MAX_REPEAT_BYTES) {
        return Err(EngineError::InvalidArgument(format!(
            "REPEAT result would exceed {MAX_REPEAT_BYTES} bytes"
        )));
    }
    Ok(Value::Str(text.repeat(count)))
}

//! Numeric functions.
//!
//! Arithmetic happens in 64-bit floats; results come back as integers
//! where the inputs were integers and the operation cannot produce a
//! fraction.

use rand::RngExt;

use crate::error::{EngineError, Result};
use crate::value::Value;

use super::{FunctionRegistry, ScalarFunction};

pub(crate) fn register(registry: &FunctionRegistry) {
    registry.register(ScalarFunction::fixed("abs", 1, abs));
    registry.register(ScalarFunction::ranged("round", 1, 2, round));
    registry.register(ScalarFunction::fixed("floor", 1, floor));
    registry.register(ScalarFunction::fixed("ceil", 1, ceil));
    registry.register(ScalarFunction::fixed("mod", 2, modulo));
    registry.register(ScalarFunction::fixed("sqrt", 1, sqrt));
    registry.register(ScalarFunction::fixed("pow", 2, pow));
    registry.register(ScalarFunction::fixed("sign", 1, sign));
    registry.register(ScalarFunction::fixed("trunc", 1, trunc));
    registry.register(ScalarFunction::fixed("random", 0, random));
    registry.register(ScalarFunction::fixed("min", 2, min));
    registry.register(ScalarFunction::fixed("max", 2, max));
}

fn abs(args: &[Value]) -> Result<Value> {
    match &args[0] {
        Value::Int(n) => match n.checked_abs() {
            Some(abs) => Ok(Value::Int(abs)),
            None => Ok(Value::Float((*n as f64).abs())),
        },
        other => Ok(Value::Float(other.to_f64()?.abs())),
    }
}

fn round(args: &[Value]) -> Result<Value> {
    let x = args[0].to_f64()?;
    let decimals = match args.get(1) {
        Some(d) => d.to_i64()?,
        None => 0,
    };
    let factor = 10f64.powi(decimals as i32);
    let rounded = (x * factor).round() / factor;
    if matches!(args[0], Value::Int(_)) && decimals >= 0 {
        return Ok(args[0].clone());
    }
    Ok(Value::Float(rounded))
}

fn floor(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(args[0].to_f64()?.floor() as i64))
}

fn ceil(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(args[0].to_f64()?.ceil() as i64))
}

fn modulo(args: &[Value]) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        if *b == 0 {
            return Err(EngineError::DivisionByZero(String::from("MOD")));
        }
        return Ok(Value::Int(a % b));
    }
    let (a, b) = (args[0].to_f64()?, args[1].to_f64()?);
    if b == 0.0 {
        return Err(EngineError::DivisionByZero(String::from("MOD")));
    }
    Ok(Value::Float(a % b))
}

fn sqrt(args: &[Value]) -> Result<Value> {
    let x = args[0].to_f64()?;
    if x < 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "SQRT of negative number {x}"
        )));
    }
    Ok(Value::Float(x.sqrt()))
}

fn pow(args: &[Value]) -> Result<Value> {
    Ok(Value::Float(args[0].to_f64()?.powf(args[1].to_f64()?)))
}

/// Returns −1, 0, or +1 as a float.
fn sign(args: &[Value]) -> Result<Value> {
    let x = args[0].to_f64()?;
    let sign = if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    };
    Ok(Value::Float(sign))
}

fn trunc(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(args[0].to_f64()?.trunc() as i64))
}

/// Uniform in [0, 1).
fn random(_args: &[Value]) -> Result<Value> {
    let mut rng = rand::rng();
    Ok(Value::Float(rng.random::<f64>()))
}

fn min(args: &[Value]) -> Result<Value> {
    let (a, b) = (args[0].to_f64()?, args[1].to_f64()?);
    Ok(if a <= b { args[0].clone() } else { args[1].clone() })
}

fn max(args: &[Value]) -> Result<Value> {
    let (a, b) = (args[0].to_f64()?, args[1].to_f64()?);
    Ok(if a >= b { args[0].clone() } else { args[1].clone() })
}

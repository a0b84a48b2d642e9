//! Date and time functions, backed by `chrono`.
//!
//! Timestamp arguments accept both timestamp values and strings in the
//! accepted formats; zone-less inputs are treated as UTC.

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Timelike, Utc};

use crate::error::{EngineError, Result};
use crate::value::Value;

use super::{FunctionRegistry, ScalarFunction};

pub(crate) fn register(registry: &FunctionRegistry) {
    registry.register(ScalarFunction::fixed("now", 0, now));
    registry.register(ScalarFunction::fixed("current_date", 0, current_date));
    registry.register(ScalarFunction::fixed("current_time", 0, current_time));
    registry.register(ScalarFunction::fixed("date_trunc", 2, date_trunc));
    registry.register(ScalarFunction::fixed("date_part", 2, date_part));
    registry.register(ScalarFunction::fixed("date_add", 3, date_add));
    registry.register(ScalarFunction::fixed("date_sub", 3, date_sub));
    registry.register(ScalarFunction::fixed("date_diff", 2, date_diff));
    registry.register(ScalarFunction::fixed("year", 1, year));
    registry.register(ScalarFunction::fixed("month", 1, month));
}

/// Current instant as an RFC-3339 string.
fn now(_args: &[Value]) -> Result<Value> {
    Ok(Value::Str(Utc::now().to_rfc3339()))
}

fn current_date(_args: &[Value]) -> Result<Value> {
    Ok(Value::Str(Utc::now().format("%Y-%m-%d").to_string()))
}

fn current_time(_args: &[Value]) -> Result<Value> {
    Ok(Value::Str(Utc::now().format("%H:%M:%S").to_string()))
}

fn date_trunc(args: &[Value]) -> Result<Value> {
    let unit = args[0].render().to_lowercase();
    let ts = args[1].to_timestamp()?;

    let (year, month, day, hour) = match unit.as_str() {
        "year" => (ts.year(), 1, 1, 0),
        "month" => (ts.year(), ts.month(), 1, 0),
        "day" => (ts.year(), ts.month(), ts.day(), 0),
        "hour" => (ts.year(), ts.month(), ts.day(), ts.hour()),
        other => {
            return Err(EngineError::InvalidArgument(format!(
                "unknown DATE_TRUNC unit: {other}"
            )));
        }
    };

    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .map(Value::Timestamp)
        .ok_or_else(|| EngineError::InvalidDate(ts.to_rfc3339()))
}

fn date_part(args: &[Value]) -> Result<Value> {
    let unit = args[0].render().to_lowercase();
    let ts = args[1].to_timestamp()?;

    let part = match unit.as_str() {
        "year" => i64::from(ts.year()),
        "month" => i64::from(ts.month()),
        "day" => i64::from(ts.day()),
        "hour" => i64::from(ts.hour()),
        "minute" => i64::from(ts.minute()),
        "second" => i64::from(ts.second()),
        other => {
            return Err(EngineError::InvalidArgument(format!(
                "unknown DATE_PART unit: {other}"
            )));
        }
    };
    Ok(Value::Int(part))
}

fn date_add(args: &[Value]) -> Result<Value> {
    shift(&args[0], args[1].to_i64()?, &args[2].render())
}

fn date_sub(args: &[Value]) -> Result<Value> {
    let amount = args[1].to_i64()?;
    let amount = amount
        .checked_neg()
        .ok_or_else(|| EngineError::InvalidNumber(amount.to_string()))?;
    shift(&args[0], amount, &args[2].render())
}

/// Shifts a timestamp by a signed amount of the given unit.
fn shift(date: &Value, amount: i64, unit: &str) -> Result<Value> {
    let ts = date.to_timestamp()?;

    let shifted = match unit.to_lowercase().as_str() {
        "year" => shift_months(ts, amount.checked_mul(12)),
        "month" => shift_months(ts, Some(amount)),
        "day" => ts.checked_add_signed(Duration::days(amount)),
        "hour" => ts.checked_add_signed(Duration::hours(amount)),
        other => {
            return Err(EngineError::InvalidArgument(format!(
                "unknown date unit: {other}"
            )));
        }
    };

    shifted
        .map(Value::Timestamp)
        .ok_or_else(|| EngineError::InvalidDate(format!("date shift out of range: {amount} {unit}")))
}

fn shift_months(ts: DateTime<Utc>, months: Option<i64>) -> Option<DateTime<Utc>> {
    let months = months?;
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        ts.checked_add_months(Months::new(magnitude))
    } else {
        ts.checked_sub_months(Months::new(magnitude))
    }
}

/// Signed whole days of `a - b`.
fn date_diff(args: &[Value]) -> Result<Value> {
    let a = args[0].to_timestamp()?;
    let b = args[1].to_timestamp()?;
    Ok(Value::Int((a - b).num_days()))
}

fn year(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(i64::from(args[0].to_timestamp()?.year())))
}

fn month(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(i64::from(args[0].to_timestamp()?.month())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::global;

    fn call(name: &str, args: &[Value]) -> Value {
        global()
            .call(name, args)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"))
    }

    fn s(text: &str) -> Value {
        Value::Str(String::from(text))
    }

    fn ts(value: &Value) -> DateTime<Utc> {
        match value {
            Value::Timestamp(ts) => *ts,
            other => panic!("expected timestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_now_is_rfc3339() {
        match call("now", &[]) {
            Value::Str(text) => {
                DateTime::parse_from_rfc3339(&text).expect("NOW output must parse");
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_date_trunc() {
        let input = s("2024-06-15T13:45:10");
        let truncated = ts(&call("date_trunc", &[s("month"), input.clone()]));
        assert_eq!(truncated.to_rfc3339(), "2024-06-01T00:00:00+00:00");

        let truncated = ts(&call("date_trunc", &[s("hour"), input]));
        assert_eq!(truncated.to_rfc3339(), "2024-06-15T13:00:00+00:00");
    }

    #[test]
    fn test_date_trunc_rejects_unknown_unit() {
        assert!(global()
            .call("date_trunc", &[s("week"), s("2024-06-15")])
            .is_err());
    }

    #[test]
    fn test_date_part() {
        let input = s("2024-06-15 13:45:10");
        assert_eq!(call("date_part", &[s("year"), input.clone()]), Value::Int(2024));
        assert_eq!(call("date_part", &[s("minute"), input]), Value::Int(45));
    }

    #[test]
    fn test_date_add_and_sub() {
        let base = s("2024-01-31");
        // Month arithmetic clamps to the end of February.
        let shifted = ts(&call("date_add", &[base.clone(), Value::Int(1), s("month")]));
        assert_eq!(shifted.format("%Y-%m-%d").to_string(), "2024-02-29");

        let shifted = ts(&call("date_sub", &[base, Value::Int(31), s("day")]));
        assert_eq!(shifted.format("%Y-%m-%d").to_string(), "2023-12-31");
    }

    #[test]
    fn test_date_diff_is_signed() {
        assert_eq!(
            call("date_diff", &[s("2024-03-10"), s("2024-03-01")]),
            Value::Int(9)
        );
        assert_eq!(
            call("date_diff", &[s("2024-03-01"), s("2024-03-10")]),
            Value::Int(-9)
        );
    }

    #[test]
    fn test_year_month() {
        assert_eq!(call("year", &[s("2024-06-15")]), Value::Int(2024));
        assert_eq!(call("month", &[s("2024-06-15")]), Value::Int(6));
    }

    #[test]
    fn test_unparseable_date_is_error() {
        assert!(matches!(
            global().call("year", &[s("yesterday")]),
            Err(EngineError::InvalidDate(_))
        ));
    }
}

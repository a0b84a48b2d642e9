//! LIKE pattern matching.
//!
//! Patterns compile once per distinct pattern string into an anchored
//! regex (`%` → any run, `_` → any single character, everything else
//! literal) and live in a process-wide cache.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

use crate::error::{EngineError, Result};

static PATTERN_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

/// Tests `text` against a LIKE `pattern`.
pub fn like_match(text: &str, pattern: &str) -> Result<bool> {
    let cache = PATTERN_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.is_match(text));
    }

    let regex = Regex::new(&translate(pattern))
        .map_err(|e| EngineError::InvalidArgument(format!("bad LIKE pattern: {e}")))?;
    let matched = regex.is_match(text);
    cache.insert(String::from(pattern), regex);
    Ok(matched)
}

/// Translates a LIKE pattern into an anchored regex.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    for c in pattern.chars() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    out
}

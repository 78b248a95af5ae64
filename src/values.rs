//! Stateless constraint checks shared by schema and simple-schema validators.
//!
//! Each check returns the violation it found, if any. Paths and locations
//! are only used to render messages.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Number, Value};

use crate::messages::Violation;
use crate::types::display_value;

/// A JSON number viewed either as an exact integer or as a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    pub fn from_number(n: &Number) -> Num {
        if let Some(i) = n.as_i64() {
            Num::Int(i as i128)
        } else if let Some(u) = n.as_u64() {
            Num::Int(u as i128)
        } else {
            let f = n.as_f64().unwrap_or(f64::NAN);
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 {
                Num::Int(f as i128)
            } else {
                Num::Float(f)
            }
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    pub fn as_int(self) -> Option<i128> {
        match self {
            Num::Int(i) => Some(i),
            Num::Float(_) => None,
        }
    }

    pub fn compare(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Deep equality where numbers compare by value, so `1 == 1.0`.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            Num::from_number(x).compare(Num::from_number(y)) == Some(Ordering::Equal)
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).map(|w| json_equal(v, w)).unwrap_or(false))
        }
        _ => a == b,
    }
}

/// A `pattern` compiled once at build time.
///
/// An invalid expression is kept with its compile error so that it can be
/// reported against the value instead of aborting the build.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, String>,
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Regex::new(source).map_err(|e| e.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// True when the expression compiles and matches; invalid never matches.
    pub fn matches(&self, s: &str) -> bool {
        match &self.compiled {
            Ok(re) => re.is_match(s),
            Err(_) => false,
        }
    }

    pub fn check(&self, path: &str, location: &str, s: &str) -> Option<Violation> {
        match &self.compiled {
            Ok(re) if re.is_match(s) => None,
            Ok(_) => Some(Violation::PatternMismatch {
                path: path.to_string(),
                location: location.to_string(),
                pattern: self.source.clone(),
            }),
            Err(reason) => Some(Violation::InvalidPattern {
                path: path.to_string(),
                location: location.to_string(),
                pattern: self.source.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// True when `pattern` compiles.
pub fn is_valid_pattern(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}

/// Length is counted in Unicode scalar values.
pub fn max_length(path: &str, location: &str, s: &str, max: u64) -> Option<Violation> {
    (s.chars().count() as u64 > max).then(|| Violation::TooLong {
        path: path.to_string(),
        location: location.to_string(),
        max,
    })
}

pub fn min_length(path: &str, location: &str, s: &str, min: u64) -> Option<Violation> {
    ((s.chars().count() as u64) < min).then(|| Violation::TooShort {
        path: path.to_string(),
        location: location.to_string(),
        min,
    })
}

pub fn max_items(path: &str, location: &str, len: usize, max: u64) -> Option<Violation> {
    (len as u64 > max).then(|| Violation::TooManyItems {
        path: path.to_string(),
        location: location.to_string(),
        max,
    })
}

pub fn min_items(path: &str, location: &str, len: usize, min: u64) -> Option<Violation> {
    ((len as u64) < min).then(|| Violation::TooFewItems {
        path: path.to_string(),
        location: location.to_string(),
        min,
    })
}

pub fn unique_items(path: &str, location: &str, items: &[Value]) -> Option<Violation> {
    let duplicated = items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| json_equal(a, b)));
    duplicated.then(|| Violation::DuplicateItems {
        path: path.to_string(),
        location: location.to_string(),
    })
}

/// Membership in `allowed`. The case-insensitive form only relaxes string
/// comparisons.
pub fn enum_of(
    path: &str,
    location: &str,
    data: &Value,
    allowed: &[Value],
    case_sensitive: bool,
) -> Option<Violation> {
    let found = allowed.iter().any(|candidate| match (candidate, data) {
        (Value::String(a), Value::String(b)) if !case_sensitive => a.to_lowercase() == b.to_lowercase(),
        _ => json_equal(candidate, data),
    });
    (!found).then(|| Violation::NotInEnum {
        path: path.to_string(),
        location: location.to_string(),
        allowed: display_value(&Value::Array(allowed.to_vec())),
    })
}

/// `data <= max`, or `data < max` when exclusive.
pub(crate) fn maximum(
    path: &str,
    location: &str,
    data: Num,
    max: Num,
    exclusive: bool,
) -> Option<Violation> {
    let ok = match data.compare(max) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => !exclusive,
        _ => false,
    };
    if ok {
        return None;
    }
    let (path, location, max) = (path.to_string(), location.to_string(), max.as_f64());
    Some(if exclusive {
        Violation::AboveExclusiveMaximum { path, location, max }
    } else {
        Violation::AboveMaximum { path, location, max }
    })
}

/// `data >= min`, or `data > min` when exclusive.
pub(crate) fn minimum(
    path: &str,
    location: &str,
    data: Num,
    min: Num,
    exclusive: bool,
) -> Option<Violation> {
    let ok = match data.compare(min) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => !exclusive,
        _ => false,
    };
    if ok {
        return None;
    }
    let (path, location, min) = (path.to_string(), location.to_string(), min.as_f64());
    Some(if exclusive {
        Violation::BelowExclusiveMinimum { path, location, min }
    } else {
        Violation::BelowMinimum { path, location, min }
    })
}

/// `data` is an integral multiple of `factor`.
///
/// Integers are checked exactly. Floats are divided (or, for factors below
/// one, multiplied by the inverse) and the quotient is accepted within a
/// relative tolerance of an integer. A non-positive factor is a schema
/// error, reported as such.
pub(crate) fn multiple_of(
    path: &str,
    location: &str,
    data: Num,
    factor: Num,
) -> Option<Violation> {
    let f = factor.as_f64();
    if f <= 0.0 || f.is_nan() {
        return Some(Violation::MultipleOfNotPositive {
            path: path.to_string(),
            location: location.to_string(),
            factor: f,
        });
    }

    let ok = match (data, factor) {
        (Num::Int(d), Num::Int(m)) => d % m == 0,
        _ => {
            let d = data.as_f64();
            let quotient = if f < 1.0 { (1.0 / f) * d } else { d / f };
            let delta = (quotient - quotient.round()).abs();
            delta <= 1e-9 * quotient.abs().max(1.0)
        }
    };
    (!ok).then(|| Violation::NotMultipleOf {
        path: path.to_string(),
        location: location.to_string(),
        factor: f,
    })
}

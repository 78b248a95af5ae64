//! String format registry.
//!
//! Formats are looked up by name. The default registry covers the Swagger
//! 2.0 formats; callers may register their own checkers.

use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, OnceLock};

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use chrono::{DateTime, NaiveDate};
use regex::Regex;

/// Lookup of format name to checker.
///
/// Implementations are shared across threads for the lifetime of a validation.
pub trait FormatRegistry: Send + Sync {
    /// True when a checker is registered under `name`.
    fn contains(&self, name: &str) -> bool;

    /// True when `value` satisfies the format `name`.
    ///
    /// Unregistered names never validate.
    fn validates(&self, name: &str, value: &str) -> bool;
}

type Checker = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Name to checker map, seeded with the built-in formats.
#[derive(Clone)]
pub struct Formats {
    checkers: HashMap<String, Checker>,
}

impl fmt::Debug for Formats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.checkers.keys().collect();
        names.sort();
        f.debug_struct("Formats").field("names", &names).finish()
    }
}

impl Default for Formats {
    fn default() -> Self {
        let mut formats = Formats::empty();
        formats.register("date", is_date);
        formats.register("date-time", is_date_time);
        formats.register("uuid", |s| uuid::Uuid::parse_str(s).is_ok());
        formats.register("uuid3", |s| uuid_version(s) == Some(3));
        formats.register("uuid4", |s| uuid_version(s) == Some(4));
        formats.register("uuid5", |s| uuid_version(s) == Some(5));
        formats.register("email", is_email);
        formats.register("hostname", is_hostname);
        formats.register("ipv4", |s| s.parse::<Ipv4Addr>().is_ok());
        formats.register("ipv6", |s| s.parse::<Ipv6Addr>().is_ok());
        formats.register("uri", |s| url::Url::parse(s).is_ok());
        formats.register("byte", |s| Base64.decode(s).is_ok());
        formats.register("bsonobjectid", |s| {
            s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
        });
        formats.register("duration", is_duration);
        formats.register("password", |_| true);
        formats.register("binary", |_| true);
        // Numeric formats also appear on string-typed parameters.
        formats.register("int32", |s| s.parse::<i32>().is_ok());
        formats.register("int64", |s| s.parse::<i64>().is_ok());
        formats.register("uint32", |s| s.parse::<u32>().is_ok());
        formats.register("uint64", |s| s.parse::<u64>().is_ok());
        formats.register("float", |s| s.parse::<f32>().is_ok());
        formats.register("double", |s| s.parse::<f64>().is_ok());
        formats
    }
}

impl Formats {
    /// A registry with no formats at all.
    pub fn empty() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Register (or replace) the checker for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, checker: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.checkers.insert(name.into(), Arc::new(checker));
        self
    }
}

impl FormatRegistry for Formats {
    fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    fn validates(&self, name: &str, value: &str) -> bool {
        self.checkers.get(name).map(|c| c(value)).unwrap_or(false)
    }
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}

fn uuid_version(s: &str) -> Option<usize> {
    uuid::Uuid::parse_str(s).ok().map(|u| u.get_version_num())
}

fn is_email(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

fn is_hostname(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*\.?$").ok()
    })
    .as_ref()
    .map(|re| re.is_match(s))
    .unwrap_or(false)
}

fn is_duration(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+(\.\d+)?\s*(ns|us|µs|ms|s|m|h|d|w)\s*)+$").ok()
    })
    .as_ref()
    .map(|re| re.is_match(s))
    .unwrap_or(false)
}

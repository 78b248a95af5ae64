//! Core types shared by the value and document validators.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// True when the number has no fractional part, whatever its representation.
pub fn number_is_integer(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64()
        .map(|f| f.is_finite() && f.fract() == 0.0)
        .unwrap_or(false)
}

/// True for the "zero value" of a JSON kind: null, false, 0 and "".
pub fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Render a float the way diagnostics print numbers: shortest round-trip
/// digits, switching to exponent notation below 1e-4 and from 1e6 upwards.
///
/// `255.0` renders as `255`, `2147483648.0` as `2.147483648e+09`.
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:e}", f);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        format!("{}", f)
    }
}

/// Render any JSON value in the compact list form used by enum messages:
/// strings unquoted, arrays as `[a b]`, objects as `map[k:v]` with sorted keys.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", parts.join(" "))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let parts: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", k, display_value(&map[k])))
                .collect();
            format!("map[{}]", parts.join(" "))
        }
    }
}

/// Direction of the payload being validated.
///
/// Only a request scope turns on read-only rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    /// Create direction from a request flag (true = Request, false = Response).
    pub fn from_request_flag(is_request: bool) -> Self {
        if is_request {
            Direction::Request
        } else {
            Direction::Response
        }
    }
}

/// Options threaded through every validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Keep running structural checks after meta-schema or reference failures.
    pub continue_on_errors: bool,
    /// Report distinct path templates that normalize to the same shape.
    pub strict_path_param_uniqueness: bool,
    /// A schema carrying `items` must declare `type: array`.
    pub enable_object_array_type_check: bool,
    /// A schema declaring `type: array` must carry `items`.
    pub enable_array_must_have_items_check: bool,
    /// Swagger 2.0 extensions to draft 4: `type: file` and `x-nullable`.
    pub swagger_dialect: bool,
    /// Payload scope; `Some(Direction::Request)` rejects read-only properties.
    pub scope: Option<Direction>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            continue_on_errors: false,
            strict_path_param_uniqueness: true,
            enable_object_array_type_check: false,
            enable_array_must_have_items_check: false,
            swagger_dialect: true,
            scope: None,
        }
    }
}

impl ValidatorOptions {
    /// Create options with the defaults listed on each field.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continue_on_errors(mut self, enabled: bool) -> Self {
        self.continue_on_errors = enabled;
        self
    }

    pub fn strict_path_param_uniqueness(mut self, enabled: bool) -> Self {
        self.strict_path_param_uniqueness = enabled;
        self
    }

    pub fn enable_object_array_type_check(mut self, enabled: bool) -> Self {
        self.enable_object_array_type_check = enabled;
        self
    }

    pub fn enable_array_must_have_items_check(mut self, enabled: bool) -> Self {
        self.enable_array_must_have_items_check = enabled;
        self
    }

    pub fn swagger_dialect(mut self, enabled: bool) -> Self {
        self.swagger_dialect = enabled;
        self
    }

    pub fn scope(mut self, direction: Direction) -> Self {
        self.scope = Some(direction);
        self
    }
}

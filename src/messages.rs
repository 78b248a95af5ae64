//! Diagnostic vocabulary for value validation.
//!
//! Downstream tooling matches on these strings, so the `Display` shapes are
//! part of the public contract. Document-level messages live in `spec.rs`.

use thiserror::Error;

use crate::error::SchemaError;
use crate::types::format_number;

/// Render the subject of a message: `path in location`, or either part alone.
pub(crate) fn subject(path: &str, location: &str) -> String {
    match (path.is_empty(), location.is_empty()) {
        (_, true) => path.to_string(),
        (true, false) => format!("in {}", location),
        (false, false) => format!("{} in {}", path, location),
    }
}

fn with_data(data: &Option<String>) -> String {
    match data {
        Some(d) => format!(": {:?}", d),
        None => String::new(),
    }
}

fn integer_format(format: &str) -> String {
    if format.is_empty() {
        "(default format)".to_string()
    } else {
        format!("with format {}", format)
    }
}

/// Which figure failed an integer-format range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Checked,
    Maximum,
    Minimum,
    MultipleOf,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Boundary::Checked => "Checked",
            Boundary::Maximum => "Maximum boundary",
            Boundary::Minimum => "Minimum boundary",
            Boundary::MultipleOf => "MultipleOf",
        })
    }
}

/// A single failed constraint on a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("{} is required", subject(.path, .location))]
    Required { path: String, location: String },

    #[error("{} must be of type {expected}{}", subject(.path, .location), with_data(.data))]
    InvalidType {
        path: String,
        location: String,
        expected: String,
        /// The offending value, shown only when it is a string.
        data: Option<String>,
    },

    #[error("{name} is an invalid type name")]
    InvalidTypeName { path: String, name: String },

    #[error("{} should be at most {max} chars long", subject(.path, .location))]
    TooLong {
        path: String,
        location: String,
        max: u64,
    },

    #[error("{} should be at least {min} chars long", subject(.path, .location))]
    TooShort {
        path: String,
        location: String,
        min: u64,
    },

    #[error("{} should match '{pattern}'", subject(.path, .location))]
    PatternMismatch {
        path: String,
        location: String,
        pattern: String,
    },

    #[error("{} should match '{pattern}, but pattern is invalid: {reason}'", subject(.path, .location))]
    InvalidPattern {
        path: String,
        location: String,
        pattern: String,
        reason: String,
    },

    #[error("{} should be one of {allowed}", subject(.path, .location))]
    NotInEnum {
        path: String,
        location: String,
        allowed: String,
    },

    #[error("{} should be a multiple of {}", subject(.path, .location), num(.factor))]
    NotMultipleOf {
        path: String,
        location: String,
        factor: f64,
    },

    #[error(
        "{} must be of type number, because: factor in multipleOf must be positive: {}",
        subject(.path, .location),
        num(.factor)
    )]
    MultipleOfNotPositive {
        path: String,
        location: String,
        factor: f64,
    },

    #[error("{} should be less than or equal to {}", subject(.path, .location), num(.max))]
    AboveMaximum {
        path: String,
        location: String,
        max: f64,
    },

    #[error("{} should be less than {}", subject(.path, .location), num(.max))]
    AboveExclusiveMaximum {
        path: String,
        location: String,
        max: f64,
    },

    #[error("{} should be greater than or equal to {}", subject(.path, .location), num(.min))]
    BelowMinimum {
        path: String,
        location: String,
        min: f64,
    },

    #[error("{} should be greater than {}", subject(.path, .location), num(.min))]
    BelowExclusiveMinimum {
        path: String,
        location: String,
        min: f64,
    },

    #[error("{boundary} value must be of type integer {} in {path}", integer_format(.format))]
    OutOfFormatRange {
        path: String,
        boundary: Boundary,
        format: String,
    },

    #[error("{} shouldn't contain duplicates", subject(.path, .location))]
    DuplicateItems { path: String, location: String },

    #[error("{} should have at most {max} items", subject(.path, .location))]
    TooManyItems {
        path: String,
        location: String,
        max: u64,
    },

    #[error("{} should have at least {min} items", subject(.path, .location))]
    TooFewItems {
        path: String,
        location: String,
        min: u64,
    },

    #[error("{} can't have additional items", subject(.path, .location))]
    AdditionalItems { path: String, location: String },

    #[error("{path}.{key} in {location} is a forbidden property")]
    ForbiddenProperty {
        path: String,
        key: String,
        location: String,
    },

    #[error("{} should have at most {max} properties", subject(.path, .location))]
    TooManyProperties {
        path: String,
        location: String,
        max: u64,
    },

    #[error("{} should have at least {min} properties", subject(.path, .location))]
    TooFewProperties {
        path: String,
        location: String,
        min: u64,
    },

    #[error("{} is readOnly", subject(.path, .location))]
    ReadOnly { path: String, location: String },

    #[error("\"{path}\" must validate at least one schema (anyOf)")]
    AnyOf { path: String },

    #[error("\"{path}\" must validate one and only one schema (oneOf). {}", one_of_outcome(.matched))]
    OneOf { path: String, matched: usize },

    #[error("\"{path}\" must validate all the schemas (allOf){}", none_validated_suffix(.none_validated))]
    AllOf { path: String, none_validated: bool },

    #[error("\"{path}\" must not validate the schema (not)")]
    Not { path: String },

    #[error("\"{path}\" has a dependency on {key}")]
    Dependency { path: String, key: String },

    #[error("invalid ref \"{reference}\"")]
    InvalidRef { path: String, reference: String },

    #[error("could not resolve reference in {path} to $ref {reference}: {reason}")]
    UnresolvedRef {
        path: String,
        reference: String,
        reason: String,
    },
}

fn num(f: &f64) -> String {
    format_number(*f)
}

fn none_validated_suffix(none: &bool) -> &'static str {
    if *none {
        ". None validated"
    } else {
        ""
    }
}

fn one_of_outcome(matched: &usize) -> String {
    if *matched == 0 {
        "Found none valid".to_string()
    } else {
        format!("Found {} valid alternatives", matched)
    }
}

impl Violation {
    /// Dot-delimited path of the value the violation is about.
    pub fn path(&self) -> &str {
        match self {
            Violation::Required { path, .. }
            | Violation::InvalidType { path, .. }
            | Violation::InvalidTypeName { path, .. }
            | Violation::TooLong { path, .. }
            | Violation::TooShort { path, .. }
            | Violation::PatternMismatch { path, .. }
            | Violation::InvalidPattern { path, .. }
            | Violation::NotInEnum { path, .. }
            | Violation::NotMultipleOf { path, .. }
            | Violation::MultipleOfNotPositive { path, .. }
            | Violation::AboveMaximum { path, .. }
            | Violation::AboveExclusiveMaximum { path, .. }
            | Violation::BelowMinimum { path, .. }
            | Violation::BelowExclusiveMinimum { path, .. }
            | Violation::OutOfFormatRange { path, .. }
            | Violation::DuplicateItems { path, .. }
            | Violation::TooManyItems { path, .. }
            | Violation::TooFewItems { path, .. }
            | Violation::AdditionalItems { path, .. }
            | Violation::ForbiddenProperty { path, .. }
            | Violation::TooManyProperties { path, .. }
            | Violation::TooFewProperties { path, .. }
            | Violation::ReadOnly { path, .. }
            | Violation::AnyOf { path }
            | Violation::OneOf { path, .. }
            | Violation::AllOf { path, .. }
            | Violation::Not { path }
            | Violation::Dependency { path, .. }
            | Violation::InvalidRef { path, .. }
            | Violation::UnresolvedRef { path, .. } => path,
        }
    }
}

impl From<Violation> for SchemaError {
    fn from(v: Violation) -> Self {
        SchemaError::new(v.path(), v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_forms() {
        assert_eq!(subject("pet.name", "body"), "pet.name in body");
        assert_eq!(subject("limit", ""), "limit");
        assert_eq!(subject("", "body"), "in body");
    }

    #[test]
    fn type_message_shows_string_data_only() {
        let v = Violation::InvalidType {
            path: "requestBody.default".into(),
            location: "body".into(),
            expected: "object".into(),
            data: Some("string".into()),
        };
        assert_eq!(
            v.to_string(),
            "requestBody.default in body must be of type object: \"string\""
        );

        let v = Violation::InvalidType {
            path: "age".into(),
            location: "query".into(),
            expected: "integer".into(),
            data: None,
        };
        assert_eq!(v.to_string(), "age in query must be of type integer");
    }

    #[test]
    fn numeric_messages() {
        let v = Violation::AboveMaximum {
            path: "param5".into(),
            location: "query".into(),
            max: 2147483647.0,
        };
        assert_eq!(
            v.to_string(),
            "param5 in query should be less than or equal to 2.147483647e+09"
        );

        let v = Violation::MultipleOfNotPositive {
            path: "negFactor".into(),
            location: "query".into(),
            factor: -300.0,
        };
        assert_eq!(
            v.to_string(),
            "negFactor in query must be of type number, because: factor in multipleOf must be positive: -300"
        );

        let v = Violation::OutOfFormatRange {
            path: "param2".into(),
            boundary: Boundary::Checked,
            format: "int32".into(),
        };
        assert_eq!(
            v.to_string(),
            "Checked value must be of type integer with format int32 in param2"
        );

        let v = Violation::OutOfFormatRange {
            path: "inlineMaxInt".into(),
            boundary: Boundary::Maximum,
            format: String::new(),
        };
        assert_eq!(
            v.to_string(),
            "Maximum boundary value must be of type integer (default format) in inlineMaxInt"
        );
    }

    #[test]
    fn composition_messages() {
        let v = Violation::OneOf {
            path: "paths./fixture.get.parameters".into(),
            matched: 0,
        };
        assert_eq!(
            v.to_string(),
            "\"paths./fixture.get.parameters\" must validate one and only one schema (oneOf). Found none valid"
        );
        let v = Violation::OneOf {
            path: "pet".into(),
            matched: 2,
        };
        assert!(v.to_string().ends_with("Found 2 valid alternatives"));

        let v = Violation::AllOf {
            path: "pet".into(),
            none_validated: true,
        };
        assert_eq!(
            v.to_string(),
            "\"pet\" must validate all the schemas (allOf). None validated"
        );
    }

    #[test]
    fn required_and_forbidden_at_root() {
        let v = Violation::Required {
            path: ".paths".into(),
            location: "body".into(),
        };
        assert_eq!(v.to_string(), ".paths in body is required");

        let v = Violation::ForbiddenProperty {
            path: "definitions.InvalidZone.items".into(),
            key: "name".into(),
            location: "body".into(),
        };
        assert_eq!(
            v.to_string(),
            "definitions.InvalidZone.items.name in body is a forbidden property"
        );
    }

    #[test]
    fn violation_converts_with_path() {
        let err: SchemaError = Violation::ReadOnly {
            path: "id".into(),
            location: "body".into(),
        }
        .into();
        assert_eq!(err.path, "id");
        assert_eq!(err.message, "id in body is readOnly");
    }
}

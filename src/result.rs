//! Error and warning accumulation.

use serde::Serialize;
use serde_json::Value;

use crate::error::{SchemaError, ValidateError};

/// A schema-declared default for a value that was absent from the payload.
///
/// Recorded during validation; applying it is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defaulter {
    /// Dot-delimited path of the object holding the missing property.
    pub path: String,
    /// Name of the missing property.
    pub property: String,
    /// The default value declared by the property schema.
    pub value: Value,
}

/// Outcome of one validation call.
///
/// Errors and warnings keep their first-insertion order and are deduplicated
/// on exact message text. `match_count` counts passing sub-checks and is used
/// to rank failed alternatives in `anyOf`/`oneOf`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    errors: Vec<SchemaError>,
    warnings: Vec<SchemaError>,
    #[serde(skip)]
    match_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    defaulters: Vec<Defaulter>,
}

fn push_unique(bucket: &mut Vec<SchemaError>, err: SchemaError) {
    if !bucket.iter().any(|e| e.message == err.message) {
        bucket.push(err);
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single error.
    pub fn from_error(err: impl Into<SchemaError>) -> Self {
        let mut result = Self::new();
        result.add_error(err);
        result
    }

    pub fn add_error(&mut self, err: impl Into<SchemaError>) {
        push_unique(&mut self.errors, err.into());
    }

    pub fn add_errors<I, E>(&mut self, errs: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<SchemaError>,
    {
        for err in errs {
            self.add_error(err);
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<SchemaError>) {
        push_unique(&mut self.warnings, warning.into());
    }

    /// Merge another result: errors into errors, warnings into warnings.
    ///
    /// Match counts are summed and defaulters appended.
    pub fn merge(&mut self, other: ValidationResult) {
        for err in other.errors {
            push_unique(&mut self.errors, err);
        }
        for warning in other.warnings {
            push_unique(&mut self.warnings, warning);
        }
        self.match_count += other.match_count;
        self.defaulters.extend(other.defaulters);
    }

    /// Merge another result, promoting its warnings to errors.
    pub fn merge_as_errors(&mut self, other: ValidationResult) {
        for err in other.errors.into_iter().chain(other.warnings) {
            push_unique(&mut self.errors, err);
        }
        self.match_count += other.match_count;
    }

    /// Merge another result, demoting its errors to warnings.
    pub fn merge_as_warnings(&mut self, other: ValidationResult) {
        for warning in other.errors.into_iter().chain(other.warnings) {
            push_unique(&mut self.warnings, warning);
        }
        self.match_count += other.match_count;
    }

    pub fn add_defaulter(&mut self, defaulter: Defaulter) {
        self.defaulters.push(defaulter);
    }

    /// Record one more passing sub-check.
    pub fn inc(&mut self) {
        self.match_count += 1;
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_errors_or_warnings(&self) -> bool {
        self.has_errors() || self.has_warnings()
    }

    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[SchemaError] {
        &self.warnings
    }

    /// Error messages in insertion order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Warning messages in insertion order.
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn defaulters(&self) -> &[Defaulter] {
        &self.defaulters
    }

    /// Convert into `Ok(())` when valid, `ValidateError::Invalid` otherwise.
    pub fn into_error(self) -> Result<(), ValidateError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidateError::Invalid {
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(m: &str) -> SchemaError {
        SchemaError::new("", m)
    }

    #[test]
    fn merge_deduplicates_messages() {
        let mut a = ValidationResult::from_error(msg("one error"));
        let b = ValidationResult::from_error(msg("one error"));
        a.merge(b);
        assert_eq!(a.error_messages(), vec!["one error"]);
    }

    #[test]
    fn merge_keeps_insertion_order() {
        let mut a = ValidationResult::new();
        a.add_error(msg("first"));
        a.add_error(msg("second"));
        let mut b = ValidationResult::new();
        b.add_error(msg("third"));
        b.add_error(msg("first"));
        a.merge(b);
        assert_eq!(a.error_messages(), vec!["first", "second", "third"]);
    }

    #[test]
    fn merge_sums_match_counts_and_defaulters() {
        let mut a = ValidationResult::new();
        a.inc();
        let mut b = ValidationResult::new();
        b.inc();
        b.inc();
        b.add_defaulter(Defaulter {
            path: "pet".into(),
            property: "status".into(),
            value: json!("available"),
        });
        a.merge(b);
        assert_eq!(a.match_count(), 3);
        assert_eq!(a.defaulters().len(), 1);
        assert!(a.is_valid());
    }

    #[test]
    fn merge_as_warnings_never_invalidates() {
        let mut a = ValidationResult::new();
        let mut b = ValidationResult::from_error(msg("bad"));
        b.add_warning(msg("meh"));
        a.merge_as_warnings(b);
        assert!(a.is_valid());
        assert!(a.has_warnings());
        assert_eq!(a.warning_messages(), vec!["bad", "meh"]);
    }

    #[test]
    fn merge_as_errors_promotes_warnings() {
        let mut a = ValidationResult::new();
        let mut b = ValidationResult::new();
        b.add_warning(msg("meh"));
        a.merge_as_errors(b);
        assert!(a.has_errors());
        assert!(!a.has_warnings());
    }

    #[test]
    fn warnings_do_not_affect_validity() {
        let mut r = ValidationResult::new();
        r.add_warning(msg("unused"));
        assert!(r.is_valid());
        assert!(r.has_errors_or_warnings());
        assert!(r.into_error().is_ok());
    }

    #[test]
    fn into_error_carries_errors() {
        let mut r = ValidationResult::new();
        r.add_error(msg("a"));
        r.add_error(msg("b"));
        match r.into_error() {
            Err(ValidateError::Invalid { errors }) => assert_eq!(errors.len(), 2),
            _ => panic!("expected invalid"),
        }
    }
}

//! Validators for one category of constraint each.
//!
//! The dispatcher only calls a validator for the value kinds it concerns,
//! so each `validate` can assume its kind and return early otherwise.

use std::sync::Arc;

use serde_json::Value;

use crate::messages::{Boundary, Violation};
use crate::result::ValidationResult;
use crate::schema::{CommonValidations, Schema, SchemaOrArray, SchemaOrBool};
use crate::types::{is_zero_value, number_is_integer, Direction};
use crate::validator::{SchemaValidator, Shared, ValidationContext};
use crate::values::{self, Num, Pattern};

const JSON_TYPES: &[&str] = &[
    "null", "boolean", "integer", "number", "string", "array", "object",
];

/// Declared `type` membership.
pub(crate) struct TypeValidator {
    types: Vec<String>,
    nullable: bool,
    swagger: bool,
}

impl TypeValidator {
    pub fn new(schema: &Schema, swagger_dialect: bool) -> Self {
        Self {
            types: schema.schema_type.names().to_vec(),
            nullable: swagger_dialect && schema.nullable,
            swagger: swagger_dialect,
        }
    }

    fn known(&self, name: &str) -> bool {
        JSON_TYPES.contains(&name) || (self.swagger && name == "file")
    }

    fn matches(&self, name: &str, data: &Value) -> bool {
        match (name, data) {
            ("null", Value::Null) => true,
            ("boolean", Value::Bool(_)) => true,
            ("integer", Value::Number(n)) => number_is_integer(n),
            ("number", Value::Number(_)) => true,
            ("string", Value::String(_)) => true,
            ("array", Value::Array(_)) => true,
            ("object", Value::Object(_)) => true,
            // Uploads carry no JSON representation to check.
            ("file", value) => self.swagger && !value.is_null(),
            _ => false,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        for name in self.types.iter().filter(|t| !self.known(t)) {
            result.add_error(Violation::InvalidTypeName {
                path: ctx.path().to_string(),
                name: name.clone(),
            });
        }
        if !result.is_valid() {
            return result;
        }

        if data.is_null() && self.nullable {
            return result;
        }
        if !self.types.iter().any(|t| self.matches(t, data)) {
            result.add_error(Violation::InvalidType {
                path: ctx.path().to_string(),
                location: ctx.location().to_string(),
                expected: self.types.join(","),
                data: data.as_str().map(str::to_string),
            });
        }
        result
    }
}

/// Range of a fixed-width integer format, when `format` names one.
fn integer_range(format: &str) -> Option<(i128, i128)> {
    let range = match format {
        "int8" => (i8::MIN as i128, i8::MAX as i128),
        "int16" => (i16::MIN as i128, i16::MAX as i128),
        "int32" => (i32::MIN as i128, i32::MAX as i128),
        "int64" => (i64::MIN as i128, i64::MAX as i128),
        "uint8" => (0, u8::MAX as i128),
        "uint16" => (0, u16::MAX as i128),
        "uint32" => (0, u32::MAX as i128),
        "uint64" => (0, u64::MAX as i128),
        _ => return None,
    };
    Some(range)
}

/// The integer format an integer schema is checked against. `range` is
/// `None` for the default format, where only integrality is required.
struct IntegerFormat {
    name: String,
    range: Option<(i128, i128)>,
}

impl IntegerFormat {
    fn fits(&self, n: Num) -> bool {
        match (n.as_int(), self.range) {
            (Some(i), Some((lo, hi))) => lo <= i && i <= hi,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn violation(&self, path: &str, boundary: Boundary) -> Violation {
        Violation::OutOfFormatRange {
            path: path.to_string(),
            boundary,
            format: self.name.clone(),
        }
    }
}

/// minimum/maximum/multipleOf, with fixed-width range checks for integers.
pub(crate) struct NumericValidator {
    maximum: Option<Num>,
    exclusive_maximum: bool,
    minimum: Option<Num>,
    exclusive_minimum: bool,
    multiple_of: Option<Num>,
    integer_format: Option<IntegerFormat>,
}

impl NumericValidator {
    pub fn needed(schema: &Schema) -> bool {
        schema.validations.has_numeric_checks()
            || (schema.schema_type.contains("integer")
                && schema.format.as_deref().and_then(integer_range).is_some())
    }

    pub fn new(schema: &Schema) -> Self {
        let v = &schema.validations;
        let integer_format = schema.schema_type.contains("integer").then(|| {
            let format = schema.format.as_deref().unwrap_or("");
            match integer_range(format) {
                Some(range) => IntegerFormat {
                    name: format.to_string(),
                    range: Some(range),
                },
                None => IntegerFormat {
                    name: String::new(),
                    range: None,
                },
            }
        });
        Self {
            maximum: v.maximum.as_ref().map(Num::from_number),
            exclusive_maximum: v.exclusive_maximum,
            minimum: v.minimum.as_ref().map(Num::from_number),
            exclusive_minimum: v.exclusive_minimum,
            multiple_of: v.multiple_of.as_ref().map(Num::from_number),
            integer_format,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Value::Number(n) = data else {
            return result;
        };
        let value = Num::from_number(n);
        let (path, location) = (ctx.path(), ctx.location());

        if let Some(format) = &self.integer_format {
            let bounds = [
                (Boundary::Maximum, self.maximum),
                (Boundary::Minimum, self.minimum),
                (Boundary::MultipleOf, self.multiple_of),
            ];
            for (boundary, bound) in bounds {
                if matches!(bound, Some(b) if !format.fits(b)) {
                    result.add_error(format.violation(path, boundary));
                }
            }
            if format.range.is_some() && !format.fits(value) {
                result.add_error(format.violation(path, Boundary::Checked));
            }
        }

        if let Some(max) = self.maximum {
            result.add_errors(values::maximum(path, location, value, max, self.exclusive_maximum));
        }
        if let Some(min) = self.minimum {
            result.add_errors(values::minimum(path, location, value, min, self.exclusive_minimum));
        }
        if let Some(factor) = self.multiple_of {
            result.add_errors(values::multiple_of(path, location, value, factor));
        }
        result
    }
}

/// maxLength/minLength/pattern.
pub(crate) struct StringValidator {
    max_length: Option<u64>,
    min_length: Option<u64>,
    pattern: Option<Pattern>,
}

impl StringValidator {
    pub fn new(validations: &CommonValidations) -> Self {
        Self {
            max_length: validations.max_length,
            min_length: validations.min_length,
            pattern: validations.pattern.as_deref().map(Pattern::new),
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Some(s) = data.as_str() else {
            return result;
        };
        let (path, location) = (ctx.path(), ctx.location());
        if let Some(max) = self.max_length {
            result.add_errors(values::max_length(path, location, s, max));
        }
        if let Some(min) = self.min_length {
            result.add_errors(values::min_length(path, location, s, min));
        }
        if let Some(pattern) = &self.pattern {
            result.add_errors(pattern.check(path, location, s));
        }
        result
    }
}

/// Named string format, looked up in the context's registry.
pub(crate) struct FormatValidator {
    name: String,
}

impl FormatValidator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let Some(s) = data.as_str() else {
            return ValidationResult::new();
        };
        let formats = ctx.formats();
        if !formats.contains(&self.name) {
            return ValidationResult::from_error(Violation::InvalidTypeName {
                path: ctx.path().to_string(),
                name: self.name.clone(),
            });
        }
        if formats.validates(&self.name, s) {
            return ValidationResult::new();
        }
        ValidationResult::from_error(Violation::InvalidType {
            path: ctx.path().to_string(),
            location: ctx.location().to_string(),
            expected: self.name.clone(),
            data: Some(s.to_string()),
        })
    }
}

/// Element schemas of an array.
enum Items {
    Single(Box<SchemaValidator>),
    Tuple(Vec<SchemaValidator>),
}

/// What to do with tuple elements beyond the positional schemas.
enum AdditionalItems {
    Allow,
    Forbid,
    Schema(Box<SchemaValidator>),
}

/// maxItems/minItems/uniqueItems plus element validation.
pub(crate) struct SliceValidator {
    max_items: Option<u64>,
    min_items: Option<u64>,
    unique_items: bool,
    items: Option<Items>,
    additional: AdditionalItems,
}

impl SliceValidator {
    pub fn needed(schema: &Schema) -> bool {
        schema.validations.has_array_checks() || schema.items.is_some()
    }

    pub fn build(schema: &Schema, shared: &Arc<Shared>) -> Self {
        let items = match &schema.items {
            Some(SchemaOrArray::Single(s)) => {
                Some(Items::Single(Box::new(SchemaValidator::build(s, shared))))
            }
            Some(SchemaOrArray::Tuple(schemas)) => Some(Items::Tuple(
                schemas
                    .iter()
                    .map(|s| SchemaValidator::build(s, shared))
                    .collect(),
            )),
            None => None,
        };
        let additional = match &schema.additional_items {
            None | Some(SchemaOrBool::Bool(true)) => AdditionalItems::Allow,
            Some(SchemaOrBool::Bool(false)) => AdditionalItems::Forbid,
            Some(SchemaOrBool::Schema(s)) => {
                AdditionalItems::Schema(Box::new(SchemaValidator::build(s, shared)))
            }
        };
        Self {
            max_items: schema.validations.max_items,
            min_items: schema.validations.min_items,
            unique_items: schema.validations.unique_items,
            items,
            additional,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        let Some(elements) = data.as_array() else {
            return result;
        };
        let (path, location) = (ctx.path(), ctx.location());

        if let Some(max) = self.max_items {
            result.add_errors(values::max_items(path, location, elements.len(), max));
        }
        if let Some(min) = self.min_items {
            result.add_errors(values::min_items(path, location, elements.len(), min));
        }
        if self.unique_items {
            result.add_errors(values::unique_items(path, location, elements));
        }

        match &self.items {
            Some(Items::Single(validator)) => {
                for (i, element) in elements.iter().enumerate() {
                    result.merge(validator.validate(element, &ctx.at_index(i)));
                }
            }
            Some(Items::Tuple(validators)) => {
                for (i, (element, validator)) in elements.iter().zip(validators).enumerate() {
                    result.merge(validator.validate(element, &ctx.at_index(i)));
                }
                let extra = elements.iter().enumerate().skip(validators.len());
                match &self.additional {
                    AdditionalItems::Allow => {}
                    AdditionalItems::Forbid => {
                        if elements.len() > validators.len() {
                            result.add_error(Violation::AdditionalItems {
                                path: path.to_string(),
                                location: location.to_string(),
                            });
                        }
                    }
                    AdditionalItems::Schema(validator) => {
                        for (i, element) in extra {
                            result.merge(validator.validate(element, &ctx.at_index(i)));
                        }
                    }
                }
            }
            None => {}
        }
        result
    }
}

/// Membership in a fixed list of values.
pub(crate) struct EnumValidator {
    values: Vec<Value>,
    case_sensitive: bool,
}

impl EnumValidator {
    pub fn new(values: &[Value], case_sensitive: bool) -> Self {
        Self {
            values: values.to_vec(),
            case_sensitive,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.add_errors(values::enum_of(
            ctx.path(),
            ctx.location(),
            data,
            &self.values,
            self.case_sensitive,
        ));
        result
    }
}

/// Rejects non-zero values for read-only properties in request payloads.
pub(crate) struct ReadOnlyValidator;

impl ReadOnlyValidator {
    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        if ctx.scope() == Some(Direction::Request) && !is_zero_value(data) {
            return ValidationResult::from_error(Violation::ReadOnly {
                path: ctx.path().to_string(),
                location: ctx.location().to_string(),
            });
        }
        ValidationResult::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::formats::Formats;
    use crate::types::ValidatorOptions;
    use crate::validate_against_schema;
    use serde_json::{json, Value};

    fn messages(schema: Value, data: Value) -> Vec<String> {
        validate_against_schema(&schema, &data, &Formats::default(), &ValidatorOptions::default())
            .unwrap()
            .error_messages()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn type_mismatch_lists_all_types() {
        assert_eq!(
            messages(json!({"type": ["integer", "null"]}), json!("x")),
            vec!["in body must be of type integer,null: \"x\""]
        );
        assert!(messages(json!({"type": ["integer", "null"]}), json!(null)).is_empty());
        assert!(messages(json!({"type": "integer"}), json!(3.0)).is_empty());
        assert_eq!(
            messages(json!({"type": "integer"}), json!(3.5)),
            vec!["in body must be of type integer"]
        );
    }

    #[test]
    fn unknown_type_names() {
        assert_eq!(
            messages(json!({"type": "bugz"}), json!("x")),
            vec!["bugz is an invalid type name"]
        );
        assert!(messages(json!({"type": "file"}), json!("upload")).is_empty());
    }

    #[test]
    fn file_type_needs_swagger_dialect() {
        let options = ValidatorOptions::new().swagger_dialect(false);
        let result = validate_against_schema(
            &json!({"type": "file"}),
            &json!("upload"),
            &Formats::default(),
            &options,
        )
        .unwrap();
        assert_eq!(result.error_messages(), vec!["file is an invalid type name"]);
    }

    #[test]
    fn int32_boundaries() {
        let schema = json!({"type": "integer", "format": "int32", "maximum": 2147483647});
        assert!(messages(schema.clone(), json!(2147483647)).is_empty());
        assert!(messages(schema.clone(), json!(2147483647.0)).is_empty());
        assert_eq!(
            messages(schema.clone(), json!(2147483648u64)),
            vec![
                "Checked value must be of type integer with format int32 in ",
                "in body should be less than or equal to 2.147483647e+09",
            ]
        );
        assert!(!messages(schema, json!(2147483648.0)).is_empty());
    }

    #[test]
    fn unrepresentable_bounds() {
        let got = messages(
            json!({"type": "integer", "format": "uint8", "maximum": 300, "minimum": -1}),
            json!(5),
        );
        assert_eq!(
            got,
            vec![
                "Maximum boundary value must be of type integer with format uint8 in ",
                "Minimum boundary value must be of type integer with format uint8 in ",
            ]
        );

        let got = messages(json!({"type": "integer", "maximum": 10.5}), json!(5));
        assert_eq!(
            got,
            vec!["Maximum boundary value must be of type integer (default format) in "]
        );
    }

    #[test]
    fn numeric_bounds_on_numbers() {
        assert_eq!(
            messages(json!({"minimum": 0, "exclusiveMinimum": true}), json!(0)),
            vec!["in body should be greater than 0"]
        );
        assert_eq!(
            messages(json!({"multipleOf": 0.1}), json!(9.34)),
            vec!["in body should be a multiple of 0.1"]
        );
        assert!(messages(json!({"multipleOf": 0.1}), json!(9.3)).is_empty());
        assert!(messages(json!({"maximum": 10}), json!("eleven")).is_empty());
    }

    #[test]
    fn string_constraints() {
        let schema = json!({"properties": {"code": {"minLength": 2, "maxLength": 3, "pattern": "^[A-Z]+$"}}});
        assert!(messages(schema.clone(), json!({"code": "AB"})).is_empty());
        assert_eq!(
            messages(schema.clone(), json!({"code": "abcd"})),
            vec![
                "code in body should be at most 3 chars long",
                "code in body should match '^[A-Z]+$'",
            ]
        );
        assert!(messages(schema, json!({"code": 12})).is_empty());
    }

    #[test]
    fn formats_from_registry() {
        let schema = json!({"properties": {"id": {"type": "string", "format": "uuid"}}});
        assert_eq!(
            messages(schema.clone(), json!({"id": "mycustomer"})),
            vec!["id in body must be of type uuid: \"mycustomer\""]
        );
        assert!(messages(schema, json!({"id": "a8098c1a-f86e-11da-bd1a-00112444be1e"})).is_empty());
        assert_eq!(
            messages(json!({"format": "no-such-format"}), json!("x")),
            vec!["no-such-format is an invalid type name"]
        );
    }

    #[test]
    fn array_constraints() {
        let schema = json!({
            "properties": {
                "tags": {
                    "type": "array",
                    "minItems": 1,
                    "maxItems": 3,
                    "uniqueItems": true,
                    "items": {"type": "string"}
                }
            }
        });
        assert!(messages(schema.clone(), json!({"tags": ["a", "b"]})).is_empty());
        assert_eq!(
            messages(schema.clone(), json!({"tags": ["a", "a", 1, "b"]})),
            vec![
                "tags in body should have at most 3 items",
                "tags in body shouldn't contain duplicates",
                "tags.2 in body must be of type string",
            ]
        );
        assert_eq!(
            messages(schema, json!({"tags": []})),
            vec!["tags in body should have at least 1 items"]
        );
    }

    #[test]
    fn tuple_items_and_additional_items() {
        let schema = json!({
            "items": [{"type": "integer"}, {"type": "string"}],
            "additionalItems": false
        });
        assert!(messages(schema.clone(), json!([1, "a"])).is_empty());
        assert!(messages(schema.clone(), json!([1])).is_empty());
        assert_eq!(
            messages(schema, json!([1, "a", true])),
            vec!["in body can't have additional items"]
        );

        let schema = json!({
            "items": [{"type": "integer"}],
            "additionalItems": {"type": "boolean"}
        });
        assert!(messages(schema.clone(), json!([1, true, false])).is_empty());
        assert_eq!(
            messages(schema, json!([1, "x"])),
            vec!["1 in body must be of type boolean: \"x\""]
        );
    }

    #[test]
    fn enum_membership() {
        assert_eq!(
            messages(json!({"enum": ["a", "b"]}), json!("c")),
            vec!["in body should be one of [a b]"]
        );
        assert!(messages(json!({"enum": [1, 2]}), json!(2.0)).is_empty());
        assert!(messages(
            json!({"enum": ["Red"], "x-enum-case-insensitive": true}),
            json!("RED")
        )
        .is_empty());
    }
}

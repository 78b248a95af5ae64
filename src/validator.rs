//! Value validation against compiled schemas.
//!
//! A [`SchemaValidator`] is compiled once from a [`Schema`] and can then be
//! shared between threads. Each node holds only the checks its schema
//! declares, run in a fixed order; `$ref` nodes compile their target on first
//! use.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, trace};

use crate::composition::CompositionValidator;
use crate::error::{RefError, ValidateError};
use crate::formats::FormatRegistry;
use crate::messages::Violation;
use crate::object::ObjectValidator;
use crate::primitives::{
    EnumValidator, FormatValidator, NumericValidator, ReadOnlyValidator, SliceValidator,
    StringValidator, TypeValidator,
};
use crate::resolver::{LocalRefResolver, RefResolver};
use crate::result::ValidationResult;
use crate::schema::Schema;
use crate::types::{Direction, ValidatorOptions};

/// Nested `$ref` hops allowed within one validation call.
const MAX_REF_DEPTH: usize = 256;

/// Per-call inputs: where the value sits and how to check formats.
///
/// The path and location only feed diagnostics.
#[derive(Clone)]
pub struct ValidationContext<'a> {
    path: String,
    location: &'a str,
    formats: &'a dyn FormatRegistry,
    scope: Option<Direction>,
    ref_depth: usize,
    /// References entered since the last step into a child value.
    expanding: Vec<String>,
}

impl<'a> ValidationContext<'a> {
    /// Root context: empty path, location `body`, no scope.
    pub fn new(formats: &'a dyn FormatRegistry) -> Self {
        Self {
            path: String::new(),
            location: "body",
            formats,
            scope: None,
            ref_depth: 0,
            expanding: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_location(mut self, location: &'a str) -> Self {
        self.location = location;
        self
    }

    pub fn with_scope(mut self, scope: Option<Direction>) -> Self {
        self.scope = scope;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn location(&self) -> &str {
        self.location
    }

    pub fn formats(&self) -> &'a dyn FormatRegistry {
        self.formats
    }

    pub fn scope(&self) -> Option<Direction> {
        self.scope
    }

    /// Context for the property `key` of the current value.
    pub fn descend(&self, key: &str) -> Self {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        Self {
            path,
            expanding: Vec::new(),
            ..self.clone()
        }
    }

    /// Context for the array element at `index`.
    pub fn at_index(&self, index: usize) -> Self {
        self.descend(&index.to_string())
    }

    /// Same value, different path.
    pub fn at_path(&self, path: String) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }

    fn through_ref(&self, reference: &str) -> Self {
        let mut expanding = self.expanding.clone();
        expanding.push(reference.to_string());
        Self {
            ref_depth: self.ref_depth + 1,
            expanding,
            ..self.clone()
        }
    }

    fn is_expanding(&self, reference: &str) -> bool {
        self.expanding.iter().any(|r| r == reference)
    }
}

/// State shared by every node compiled from the same root.
pub(crate) struct Shared {
    resolver: Arc<dyn RefResolver>,
    options: ValidatorOptions,
}

impl Shared {
    pub(crate) fn options(&self) -> &ValidatorOptions {
        &self.options
    }
}

/// A compiled schema node.
pub struct SchemaValidator {
    shared: Arc<Shared>,
    checks: Vec<Check>,
    nullable: bool,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.checks.iter().map(Check::name).collect();
        f.debug_struct("SchemaValidator")
            .field("checks", &kinds)
            .field("nullable", &self.nullable)
            .finish()
    }
}

impl SchemaValidator {
    /// Compile `schema`; `$ref`s resolve as JSON pointers into `root`.
    pub fn new(schema: &Schema, root: Arc<Value>, options: ValidatorOptions) -> Self {
        Self::with_resolver(schema, Arc::new(LocalRefResolver::new(root)), options)
    }

    /// Compile `schema` with a caller-supplied `$ref` resolver.
    pub fn with_resolver(
        schema: &Schema,
        resolver: Arc<dyn RefResolver>,
        options: ValidatorOptions,
    ) -> Self {
        debug!(
            swagger_dialect = options.swagger_dialect,
            "building schema validator"
        );
        let shared = Arc::new(Shared { resolver, options });
        Self::build(schema, &shared)
    }

    /// Compile a raw schema that is also its own `$ref` root.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::InvalidSchema` if `schema` does not deserialize
    /// into a schema node.
    pub fn from_value(schema: &Value, options: ValidatorOptions) -> Result<Self, ValidateError> {
        let parsed = Schema::from_value(schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;
        Ok(Self::new(&parsed, Arc::new(schema.clone()), options))
    }

    pub(crate) fn build(schema: &Schema, shared: &Arc<Shared>) -> Self {
        // A reference replaces its node entirely; sibling keywords are ignored.
        if let Some(reference) = &schema.reference {
            return Self {
                shared: Arc::clone(shared),
                checks: vec![Check::Ref(RefCheck::new(reference, shared))],
                nullable: false,
            };
        }

        let options = shared.options();
        let mut checks = Vec::new();

        if let Some(shape) = ShapeCheck::from_schema(schema, options) {
            checks.push(Check::Shape(shape));
        }
        if !schema.schema_type.is_empty() {
            checks.push(Check::Type(TypeValidator::new(
                schema,
                options.swagger_dialect,
            )));
        }
        if schema.has_composition() {
            checks.push(Check::Composition(CompositionValidator::build(
                schema, shared,
            )));
        }
        if schema.validations.has_string_checks() {
            checks.push(Check::String(StringValidator::new(&schema.validations)));
        }
        if let Some(format) = &schema.format {
            checks.push(Check::Format(FormatValidator::new(format)));
        }
        if NumericValidator::needed(schema) {
            checks.push(Check::Numeric(NumericValidator::new(schema)));
        }
        if SliceValidator::needed(schema) {
            checks.push(Check::Slice(SliceValidator::build(schema, shared)));
        }
        if let Some(values) = &schema.validations.enum_values {
            checks.push(Check::Enum(EnumValidator::new(
                values,
                !schema.enum_case_insensitive,
            )));
        }
        if schema.has_object_checks() {
            checks.push(Check::Object(ObjectValidator::build(schema, shared)));
        }
        if schema.read_only {
            checks.push(Check::ReadOnly(ReadOnlyValidator));
        }

        Self {
            shared: Arc::clone(shared),
            checks,
            nullable: options.swagger_dialect && schema.nullable,
        }
    }

    pub fn options(&self) -> &ValidatorOptions {
        self.shared.options()
    }

    /// Validate `data` at the position described by `ctx`.
    ///
    /// Every applicable check runs; the match count grows by one for each
    /// check that passed plus one for the node itself.
    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        for check in &self.checks {
            if !check.applies(data) {
                continue;
            }
            if data.is_null() && self.nullable && matches!(check, Check::Enum(_)) {
                continue;
            }
            let outcome = check.validate(data, ctx);
            let passed = outcome.is_valid();
            result.merge(outcome);
            if passed {
                result.inc();
            }
        }
        result.inc();
        result
    }

    /// Validate `data` as a whole payload: root path, location `body`, and
    /// the scope from the options.
    pub fn validate_root(&self, data: &Value, formats: &dyn FormatRegistry) -> ValidationResult {
        let ctx = ValidationContext::new(formats).with_scope(self.options().scope);
        self.validate(data, &ctx)
    }
}

/// Validate a payload against a raw schema.
///
/// `$ref`s inside `schema` resolve against `schema` itself.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` if the schema cannot be compiled.
/// Data problems are reported in the returned result, never as `Err`.
pub fn validate_against_schema(
    schema: &Value,
    data: &Value,
    formats: &dyn FormatRegistry,
    options: &ValidatorOptions,
) -> Result<ValidationResult, ValidateError> {
    let validator = SchemaValidator::from_value(schema, options.clone())?;
    let result = validator.validate_root(data, formats);
    debug!(
        errors = result.errors().len(),
        warnings = result.warnings().len(),
        "validated value"
    );
    Ok(result)
}

/// One category of constraint, selected at build time.
enum Check {
    Ref(RefCheck),
    Shape(ShapeCheck),
    Type(TypeValidator),
    Composition(CompositionValidator),
    String(StringValidator),
    Format(FormatValidator),
    Numeric(NumericValidator),
    Slice(SliceValidator),
    Enum(EnumValidator),
    Object(ObjectValidator),
    ReadOnly(ReadOnlyValidator),
}

impl Check {
    fn name(&self) -> &'static str {
        match self {
            Check::Ref(_) => "ref",
            Check::Shape(_) => "shape",
            Check::Type(_) => "type",
            Check::Composition(_) => "composition",
            Check::String(_) => "string",
            Check::Format(_) => "format",
            Check::Numeric(_) => "numeric",
            Check::Slice(_) => "slice",
            Check::Enum(_) => "enum",
            Check::Object(_) => "object",
            Check::ReadOnly(_) => "readOnly",
        }
    }

    /// Whether the check concerns values of this JSON kind.
    fn applies(&self, data: &Value) -> bool {
        match self {
            Check::Ref(_)
            | Check::Shape(_)
            | Check::Type(_)
            | Check::Composition(_)
            | Check::Enum(_) => true,
            Check::String(_) | Check::Format(_) => data.is_string(),
            Check::Numeric(_) => data.is_number(),
            Check::Slice(_) => data.is_array(),
            Check::Object(_) => data.is_object(),
            Check::ReadOnly(_) => !data.is_null(),
        }
    }

    fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        match self {
            Check::Ref(c) => c.validate(data, ctx),
            Check::Shape(c) => c.validate(ctx),
            Check::Type(c) => c.validate(data, ctx),
            Check::Composition(c) => c.validate(data, ctx),
            Check::String(c) => c.validate(data, ctx),
            Check::Format(c) => c.validate(data, ctx),
            Check::Numeric(c) => c.validate(data, ctx),
            Check::Slice(c) => c.validate(data, ctx),
            Check::Enum(c) => c.validate(data, ctx),
            Check::Object(c) => c.validate(data, ctx),
            Check::ReadOnly(c) => c.validate(data, ctx),
        }
    }
}

/// A `$ref` node; the target is compiled on first use and kept.
struct RefCheck {
    reference: String,
    shared: Arc<Shared>,
    target: OnceLock<Result<SchemaValidator, RefError>>,
}

impl RefCheck {
    fn new(reference: &str, shared: &Arc<Shared>) -> Self {
        Self {
            reference: reference.to_string(),
            shared: Arc::clone(shared),
            target: OnceLock::new(),
        }
    }

    fn target(&self) -> &Result<SchemaValidator, RefError> {
        self.target.get_or_init(|| {
            trace!(reference = %self.reference, "compiling referenced schema");
            let mut seen = vec![self.reference.clone()];
            let mut value = self.shared.resolver.resolve(&self.reference)?;
            // Collapse chains of bare references, refusing loops.
            while let Some(next) = value.get("$ref").and_then(Value::as_str) {
                if seen.iter().any(|r| r == next) {
                    return Err(RefError::InvalidTarget {
                        reference: self.reference.clone(),
                        message: format!("circular $ref chain through {}", next),
                    });
                }
                seen.push(next.to_string());
                value = self.shared.resolver.resolve(next)?;
            }
            let schema = Schema::from_value(&value).map_err(|e| RefError::InvalidTarget {
                reference: self.reference.clone(),
                message: e.to_string(),
            })?;
            Ok(SchemaValidator::build(&schema, &self.shared))
        })
    }

    fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        if ctx.ref_depth >= MAX_REF_DEPTH {
            return ValidationResult::from_error(Violation::UnresolvedRef {
                path: ctx.path().to_string(),
                reference: self.reference.clone(),
                reason: "too many nested references".to_string(),
            });
        }
        // Re-entering a reference without stepping into the value never ends.
        if ctx.is_expanding(&self.reference) {
            return ValidationResult::from_error(Violation::UnresolvedRef {
                path: ctx.path().to_string(),
                reference: self.reference.clone(),
                reason: "circular $ref".to_string(),
            });
        }
        match self.target() {
            Ok(validator) => validator.validate(data, &ctx.through_ref(&self.reference)),
            Err(err) => ValidationResult::from_error(ref_violation(ctx.path(), err)),
        }
    }
}

pub(crate) fn ref_violation(path: &str, err: &RefError) -> Violation {
    match err {
        RefError::Unsupported { reference } => Violation::InvalidRef {
            path: path.to_string(),
            reference: reference.clone(),
        },
        RefError::MissingKey { reference, .. } | RefError::InvalidTarget { reference, .. } => {
            Violation::UnresolvedRef {
                path: path.to_string(),
                reference: reference.clone(),
                reason: err.to_string(),
            }
        }
    }
}

/// Opt-in checks on how array schemas are declared.
struct ShapeCheck {
    items_without_type: bool,
    items_on_non_array: bool,
    array_without_items: bool,
}

impl ShapeCheck {
    fn from_schema(schema: &Schema, options: &ValidatorOptions) -> Option<Self> {
        let has_items = schema.items.is_some();
        let is_array = schema.schema_type.contains("array");
        let check = Self {
            items_without_type: options.enable_object_array_type_check
                && has_items
                && schema.schema_type.is_empty(),
            items_on_non_array: options.enable_object_array_type_check
                && has_items
                && !schema.schema_type.is_empty()
                && !is_array,
            array_without_items: options.enable_array_must_have_items_check
                && is_array
                && !schema.has_items(),
        };
        (check.items_without_type || check.items_on_non_array || check.array_without_items)
            .then_some(check)
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        if self.items_without_type {
            result.add_error(Violation::Required {
                path: "type".to_string(),
                location: ctx.path().to_string(),
            });
        }
        if self.items_on_non_array {
            result.add_error(Violation::InvalidType {
                path: ctx.path().to_string(),
                location: ctx.location().to_string(),
                expected: "array".to_string(),
                data: None,
            });
        }
        if self.array_without_items {
            result.add_error(Violation::Required {
                path: "items".to_string(),
                location: ctx.path().to_string(),
            });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Formats;
    use serde_json::json;

    fn check(schema: Value, data: Value) -> ValidationResult {
        validate_against_schema(&schema, &data, &Formats::default(), &ValidatorOptions::default())
            .unwrap()
    }

    #[test]
    fn context_paths() {
        let formats = Formats::default();
        let root = ValidationContext::new(&formats);
        assert_eq!(root.path(), "");
        assert_eq!(root.location(), "body");
        let pet = root.descend("pet");
        assert_eq!(pet.path(), "pet");
        assert_eq!(pet.descend("tags").at_index(2).path(), "pet.tags.2");
        let query = ValidationContext::new(&formats)
            .with_path("limit")
            .with_location("query");
        assert_eq!(query.location(), "query");
    }

    #[test]
    fn valid_payload() {
        let result = check(
            json!({
                "type": "object",
                "required": ["name"],
                "properties": {"name": {"type": "string"}}
            }),
            json!({"name": "rex"}),
        );
        assert!(result.is_valid());
        assert!(result.match_count() > 0);
    }

    #[test]
    fn missing_required_property_at_root() {
        let result = check(
            json!({"type": "object", "required": ["name"]}),
            json!({}),
        );
        assert_eq!(result.error_messages(), vec![".name in body is required"]);
    }

    #[test]
    fn nested_type_mismatch() {
        let result = check(
            json!({
                "type": "object",
                "properties": {"pet": {"properties": {"age": {"type": "integer"}}}}
            }),
            json!({"pet": {"age": "old"}}),
        );
        assert_eq!(
            result.error_messages(),
            vec!["pet.age in body must be of type integer: \"old\""]
        );
    }

    #[test]
    fn refs_resolve_against_the_schema_root() {
        let schema = json!({
            "definitions": {"Name": {"type": "string", "minLength": 2}},
            "properties": {"name": {"$ref": "#/definitions/Name"}}
        });
        assert!(check(schema.clone(), json!({"name": "ok"})).is_valid());
        let result = check(schema, json!({"name": "x"}));
        assert_eq!(
            result.error_messages(),
            vec!["name in body should be at least 2 chars long"]
        );
    }

    #[test]
    fn recursive_refs() {
        let schema = json!({
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "value": {"type": "integer"},
                        "next": {"$ref": "#/definitions/Node"}
                    }
                }
            },
            "$ref": "#/definitions/Node"
        });
        assert!(check(schema.clone(), json!({"value": 1, "next": {"value": 2}})).is_valid());
        let result = check(schema, json!({"value": 1, "next": {"next": {"value": "x"}}}));
        assert_eq!(
            result.error_messages(),
            vec!["next.next.value in body must be of type integer: \"x\""]
        );
    }

    #[test]
    fn unresolvable_refs_are_diagnostics() {
        let result = check(json!({"$ref": "#/definitions/Missing"}), json!(1));
        assert_eq!(result.errors().len(), 1);
        assert!(result.error_messages()[0]
            .starts_with("could not resolve reference in  to $ref #/definitions/Missing"));

        let result = check(json!({"$ref": "other.json#/Pet"}), json!(1));
        assert_eq!(result.error_messages(), vec!["invalid ref \"other.json#/Pet\""]);
    }

    #[test]
    fn circular_ref_chain_is_reported() {
        let schema = json!({
            "definitions": {
                "A": {"$ref": "#/definitions/B"},
                "B": {"$ref": "#/definitions/A"}
            },
            "$ref": "#/definitions/A"
        });
        let result = check(schema, json!(1));
        assert!(!result.is_valid());
    }

    #[test]
    fn ref_cycle_through_composition_is_cut() {
        let schema = json!({
            "definitions": {
                "A": {"anyOf": [{"$ref": "#/definitions/A"}, {"$ref": "#/definitions/A"}]}
            },
            "$ref": "#/definitions/A"
        });
        let result = check(schema, json!(1));
        assert_eq!(
            result.error_messages(),
            vec![
                "\"\" must validate at least one schema (anyOf)",
                "could not resolve reference in  to $ref #/definitions/A: circular $ref",
            ]
        );
    }

    #[test]
    fn recursion_through_child_values_is_not_a_cycle() {
        let schema = json!({
            "definitions": {
                "node": {
                    "allOf": [{"type": "object"}],
                    "properties": {"next": {"allOf": [{"$ref": "#/definitions/node"}]}}
                }
            },
            "$ref": "#/definitions/node"
        });
        assert!(check(schema.clone(), json!({"next": {"next": {}}})).is_valid());
        assert!(check(schema, json!({"next": {"next": 3}}))
            .error_messages()
            .contains(&"next.next in body must be of type object"));
    }

    #[test]
    fn null_skips_kind_checks() {
        let result = check(json!({"type": "string", "minLength": 3}), json!(null));
        assert_eq!(result.error_messages(), vec!["in body must be of type string"]);

        let result = check(
            json!({"type": "string", "x-nullable": true, "enum": ["a"]}),
            json!(null),
        );
        assert!(result.is_valid());
    }

    #[test]
    fn nullable_is_ignored_without_dialect() {
        let schema = json!({"type": "string", "x-nullable": true});
        let options = ValidatorOptions::new().swagger_dialect(false);
        let result =
            validate_against_schema(&schema, &json!(null), &Formats::default(), &options).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn read_only_only_in_request_scope() {
        let schema = json!({"properties": {"id": {"type": "integer", "readOnly": true}}});
        let formats = Formats::default();

        let response = ValidatorOptions::new().scope(Direction::Response);
        let result = validate_against_schema(&schema, &json!({"id": 1}), &formats, &response)
            .unwrap();
        assert!(result.is_valid());

        let request = ValidatorOptions::new().scope(Direction::Request);
        let result =
            validate_against_schema(&schema, &json!({"id": 1}), &formats, &request).unwrap();
        assert_eq!(result.error_messages(), vec!["id in body is readOnly"]);

        let result =
            validate_against_schema(&schema, &json!({"id": 0}), &formats, &request).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn array_shape_checks_are_opt_in() {
        let schema = json!({
            "properties": {
                "zones": {"type": "array"},
                "names": {"type": "object", "items": {"type": "string"}}
            }
        });
        let data = json!({"zones": [], "names": {}});
        assert!(check(schema.clone(), data.clone()).is_valid());

        let options = ValidatorOptions::new()
            .enable_array_must_have_items_check(true)
            .enable_object_array_type_check(true);
        let result =
            validate_against_schema(&schema, &data, &Formats::default(), &options).unwrap();
        let messages = result.error_messages();
        assert!(messages.contains(&"items in zones is required"));
        assert!(messages.contains(&"names in body must be of type array"));
    }

    #[test]
    fn invalid_schema_is_an_error() {
        let err = validate_against_schema(
            &json!({"type": 5}),
            &json!(1),
            &Formats::default(),
            &ValidatorOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidateError::InvalidSchema { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validator_is_shareable_across_threads() {
        let validator = Arc::new(
            SchemaValidator::from_value(
                &json!({"type": "array", "items": {"type": "integer", "maximum": 10}}),
                ValidatorOptions::default(),
            )
            .unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let validator = Arc::clone(&validator);
                std::thread::spawn(move || {
                    let formats = Formats::default();
                    validator
                        .validate_root(&json!([1, 2, i * 5]), &formats)
                        .is_valid()
                })
            })
            .collect();
        let verdicts: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(verdicts, vec![true, true, true, false]);
    }
}

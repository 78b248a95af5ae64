//! Checks that `default` and `example` literals satisfy the schema they sit on.
//!
//! The same walk runs twice, once per [`ValueKind`]. Each failing literal is
//! reported with a wrapper message naming the field, followed by the
//! underlying violations.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::document::{Document, OperationEntry, Response};
use crate::formats::FormatRegistry;
use crate::resolver::{LocalRefResolver, RefResolver};
use crate::result::ValidationResult;
use crate::schema::{Schema, SchemaOrArray, SimpleSchema};
use crate::simple::{HeaderValidator, ItemsValidator, ParamValidator};
use crate::spec::DocumentMessage;
use crate::types::ValidatorOptions;
use crate::validator::{SchemaValidator, ValidationContext};
use crate::values::is_valid_pattern;

/// Which literal is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Default,
    Example,
}

impl ValueKind {
    /// The keyword holding the literal.
    pub fn key(self) -> &'static str {
        match self {
            ValueKind::Default => "default",
            ValueKind::Example => "example",
        }
    }

    fn of_schema(self, schema: &Schema) -> Option<&Value> {
        match self {
            ValueKind::Default => schema.default.as_ref(),
            ValueKind::Example => schema.example.as_ref(),
        }
    }

    fn of_simple(self, simple: &SimpleSchema) -> Option<&Value> {
        match self {
            ValueKind::Default => simple.default.as_ref(),
            ValueKind::Example => simple.example.as_ref(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Walks parameters, responses and definitions of one document.
pub(crate) struct ValueWalker<'a> {
    doc: &'a Document,
    resolver: Arc<dyn RefResolver>,
    formats: &'a dyn FormatRegistry,
    options: &'a ValidatorOptions,
    kind: ValueKind,
}

impl<'a> ValueWalker<'a> {
    pub fn new(
        doc: &'a Document,
        raw: &Value,
        formats: &'a dyn FormatRegistry,
        options: &'a ValidatorOptions,
        kind: ValueKind,
    ) -> Self {
        Self {
            doc,
            resolver: Arc::new(LocalRefResolver::new(Arc::new(raw.clone()))),
            formats,
            options,
            kind,
        }
    }

    /// Returns `(errors, warnings)`.
    pub fn validate(&self) -> (ValidationResult, ValidationResult) {
        let mut errors = ValidationResult::new();
        let mut warnings = ValidationResult::new();

        for entry in self.doc.operations() {
            self.validate_parameters(&entry, &mut errors, &mut warnings);
            match &entry.operation.responses {
                Some(responses) => {
                    for (name, code, declared) in responses.named() {
                        self.validate_response(&entry, &name, code, declared, &mut errors, &mut warnings);
                    }
                }
                None => {
                    if let Some(id) = entry.operation.operation_id.as_deref().filter(|id| !id.is_empty()) {
                        errors.add_error(DocumentMessage::NoValidResponse {
                            operation: id.to_string(),
                        });
                    }
                }
            }
        }

        for (name, schema) in &self.doc.definitions {
            let path = format!("definitions.{}", name);
            let red = self.validate_schema(&path, "body", schema);
            if red.has_errors_or_warnings() {
                errors.add_error(DocumentMessage::InvalidValue {
                    kind: self.kind,
                    name: path,
                    location: "body".to_string(),
                });
                errors.merge(red);
            }
        }

        (errors, warnings)
    }

    fn validate_parameters(
        &self,
        entry: &OperationEntry<'_>,
        errors: &mut ValidationResult,
        warnings: &mut ValidationResult,
    ) {
        for param in self.doc.params_for(entry) {
            let literal = self.kind.of_simple(&param.simple);
            if self.kind == ValueKind::Default && literal.is_some() && param.required {
                warnings.add_warning(DocumentMessage::RequiredWithDefault {
                    name: param.name.clone(),
                    location: param.location.clone(),
                });
            }

            if let (Some(value), None) = (literal, &param.schema) {
                let red = ParamValidator::new(param, self.options).validate(value, self.formats);
                if red.has_errors_or_warnings() {
                    errors.add_error(self.invalid_value(&param.name, &param.location));
                    errors.merge(red);
                }
            }

            if let Some(items) = param.simple.items.as_deref() {
                let red = self.validate_items(&param.name, &param.location, items);
                if red.has_errors_or_warnings() {
                    errors.add_error(DocumentMessage::InvalidItemsValue {
                        kind: self.kind,
                        name: param.name.clone(),
                        location: param.location.clone(),
                    });
                    errors.merge(red);
                }
            }

            if let Some(schema) = &param.schema {
                let red = self.validate_schema(&param.name, &param.location, schema);
                if red.has_errors_or_warnings() {
                    errors.add_error(self.invalid_value(&param.name, &param.location));
                    errors.merge(red);
                }
            }
        }
    }

    fn invalid_value(&self, name: &str, location: &str) -> DocumentMessage {
        DocumentMessage::InvalidValue {
            kind: self.kind,
            name: name.to_string(),
            location: location.to_string(),
        }
    }

    fn validate_response(
        &self,
        entry: &OperationEntry<'_>,
        response_name: &str,
        code: &str,
        declared: &Response,
        errors: &mut ValidationResult,
        warnings: &mut ValidationResult,
    ) {
        // Broken response references are reported by the reference check.
        let Ok(response) = self.doc.resolve_response(declared) else {
            return;
        };
        let operation = entry.label();

        for (header_name, header) in &response.headers {
            if let Some(value) = self.kind.of_simple(&header.simple) {
                let red = HeaderValidator::new(header_name, header, self.options)
                    .validate(value, self.formats);
                if red.has_errors_or_warnings() {
                    errors.add_error(DocumentMessage::InvalidHeaderValue {
                        kind: self.kind,
                        operation: operation.clone(),
                        header: header_name.clone(),
                        response: response_name.to_string(),
                    });
                    errors.merge(red);
                }
            }
            if let Some(items) = header.simple.items.as_deref() {
                let red = self.validate_items(header_name, "header", items);
                if red.has_errors_or_warnings() {
                    errors.add_error(DocumentMessage::InvalidHeaderItemsValue {
                        kind: self.kind,
                        operation: operation.clone(),
                        header: header_name.clone(),
                        response: response_name.to_string(),
                    });
                    errors.merge(red);
                }
            }
            if let Some(pattern) = &header.simple.validations.pattern {
                if let Err(reason) = regex::Regex::new(pattern) {
                    errors.add_error(DocumentMessage::InvalidHeaderPattern {
                        operation: operation.clone(),
                        header: header_name.clone(),
                        response: response_name.to_string(),
                        pattern: pattern.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
        }

        if let Some(schema) = &response.schema {
            let red = self.validate_schema(code, "response", schema);
            if red.has_errors_or_warnings() {
                errors.add_error(DocumentMessage::InvalidResponseValue {
                    kind: self.kind,
                    operation: operation.clone(),
                    response: response_name.to_string(),
                });
                errors.merge(red);
            }
        }

        if self.kind == ValueKind::Example && !response.examples.is_empty() {
            match (&response.schema, response.examples.get("application/json")) {
                (Some(schema), Some(example)) => {
                    let ctx = ValidationContext::new(self.formats).with_path(entry.path);
                    errors.merge(self.compile(schema).validate(example, &ctx));
                }
                (Some(_), None) => {
                    warnings.add_warning(DocumentMessage::UnsupportedExampleMediaType {
                        operation,
                        response: response_name.to_string(),
                    });
                }
                (None, _) => {
                    warnings.add_warning(DocumentMessage::ExamplesWithoutSchema {
                        operation,
                        response: response_name.to_string(),
                    });
                }
            }
        }
    }

    fn compile(&self, schema: &Schema) -> SchemaValidator {
        SchemaValidator::with_resolver(schema, Arc::clone(&self.resolver), self.options.clone())
    }

    /// Check the literal on `schema` and on every nested schema, skipping
    /// `$ref`s so that shared definitions are checked once, where declared.
    fn validate_schema(&self, path: &str, location: &str, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::new();
        if schema.reference.is_some() {
            return result;
        }

        if let Some(value) = self.kind.of_schema(schema) {
            let ctx = ValidationContext::new(self.formats)
                .with_path(format!("{}.{}", path, self.kind.key()))
                .with_location(location);
            result.merge(self.compile(schema).validate(value, &ctx));
        }

        match &schema.items {
            Some(SchemaOrArray::Single(items)) => {
                result.merge(self.validate_schema(&format!("{}.items", path), location, items));
            }
            Some(SchemaOrArray::Tuple(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}.items[{}]", path, i);
                    result.merge(self.validate_schema(&item_path, location, item));
                }
            }
            None => {}
        }

        if let Some(pattern) = &schema.validations.pattern {
            if !is_valid_pattern(pattern) {
                result.add_error(DocumentMessage::InvalidSchemaPattern {
                    path: path.to_string(),
                    location: location.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }

        if let Some(additional) = schema.additional_items.as_ref().and_then(|a| a.schema()) {
            result.merge(self.validate_schema(&format!("{}.additionalItems", path), location, additional));
        }
        for (name, property) in schema.properties.iter().chain(&schema.pattern_properties) {
            result.merge(self.validate_schema(&format!("{}.{}", path, name), location, property));
        }
        if let Some(additional) = schema.additional_properties.as_ref().and_then(|a| a.schema()) {
            result.merge(self.validate_schema(
                &format!("{}.additionalProperties", path),
                location,
                additional,
            ));
        }
        for (i, branch) in schema.all_of.iter().enumerate() {
            result.merge(self.validate_schema(&format!("{}.allOf[{}]", path, i), location, branch));
        }
        result
    }

    /// Check the literal on an `items` chain; nested levels are addressed
    /// as `path[0].default`.
    fn validate_items(&self, path: &str, location: &str, items: &SimpleSchema) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(value) = self.kind.of_simple(items) {
            let validator = ItemsValidator::new(path, location, items, self.options);
            result.merge(validator.validate(0, value, self.formats));
        }
        if let Some(nested) = items.items.as_deref() {
            let nested_path = format!("{}[0].{}", path, self.kind.key());
            result.merge(self.validate_items(&nested_path, location, nested));
        }
        if let Some(pattern) = &items.validations.pattern {
            if !is_valid_pattern(pattern) {
                result.add_error(DocumentMessage::InvalidSchemaPattern {
                    path: path.to_string(),
                    location: location.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Formats;
    use serde_json::json;

    fn walk(raw: Value, kind: ValueKind) -> (Vec<String>, Vec<String>) {
        let doc = Document::from_value(&raw).unwrap();
        let formats = Formats::default();
        let options = ValidatorOptions::default();
        let (errors, warnings) = ValueWalker::new(&doc, &raw, &formats, &options, kind).validate();
        let owned = |r: &ValidationResult, w: bool| -> Vec<String> {
            let messages = if w { r.warning_messages() } else { r.error_messages() };
            messages.into_iter().map(String::from).collect()
        };
        (owned(&errors, false), owned(&warnings, true))
    }

    fn with_operation(operation: Value, definitions: Value) -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"get": operation}},
            "definitions": definitions
        })
    }

    #[test]
    fn param_default_mismatch() {
        let raw = with_operation(
            json!({
                "operationId": "listPets",
                "parameters": [
                    {"name": "limit", "in": "query", "type": "integer", "default": "ten"}
                ],
                "responses": {"200": {"description": "ok"}}
            }),
            json!({}),
        );
        let (errors, warnings) = walk(raw, ValueKind::Default);
        assert_eq!(
            errors,
            vec![
                "default value for limit in query does not validate its schema",
                "limit in query must be of type integer: \"ten\"",
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn required_param_with_default_warns() {
        let raw = with_operation(
            json!({
                "operationId": "listPets",
                "parameters": [
                    {"name": "limit", "in": "query", "type": "integer", "required": true, "default": 10}
                ],
                "responses": {"200": {"description": "ok"}}
            }),
            json!({}),
        );
        let (errors, warnings) = walk(raw, ValueKind::Default);
        assert!(errors.is_empty());
        assert_eq!(
            warnings,
            vec!["limit in query has a default value and is required as parameter"]
        );
    }

    #[test]
    fn definition_defaults_are_checked_recursively() {
        let raw = with_operation(
            json!({"operationId": "listPets", "responses": {"200": {"description": "ok"}}}),
            json!({
                "Pet": {
                    "type": "object",
                    "properties": {
                        "age": {"type": "integer", "minimum": 0, "default": -1}
                    }
                }
            }),
        );
        let (errors, _) = walk(raw, ValueKind::Default);
        assert_eq!(
            errors,
            vec![
                "default value for definitions.Pet in body does not validate its schema",
                "definitions.Pet.age.default in body should be greater than or equal to 0",
            ]
        );
    }

    #[test]
    fn response_header_and_schema_examples() {
        let raw = with_operation(
            json!({
                "operationId": "listPets",
                "responses": {
                    "200": {
                        "description": "ok",
                        "headers": {
                            "X-Rate": {"type": "integer", "example": "fast"}
                        },
                        "schema": {"type": "array", "items": {"type": "string"}},
                        "examples": {"application/json": ["a", 1]}
                    },
                    "default": {
                        "description": "error",
                        "examples": {"text/plain": "boom"}
                    }
                }
            }),
            json!({}),
        );
        let (errors, warnings) = walk(raw, ValueKind::Example);
        assert_eq!(
            errors,
            vec![
                "in operation \"listPets\", example value in header X-Rate for response 200 does not validate its schema",
                "X-Rate in header must be of type integer: \"fast\"",
                "/pets.1 in body must be of type string",
            ]
        );
        assert_eq!(
            warnings,
            vec!["Examples provided without schema in operation \"listPets\", default response:"]
        );
    }

    #[test]
    fn missing_responses() {
        let raw = with_operation(json!({"operationId": "listPets"}), json!({}));
        let (errors, _) = walk(raw, ValueKind::Default);
        assert_eq!(errors, vec!["operation \"listPets\" has no valid response"]);
    }

    #[test]
    fn invalid_patterns_are_reported() {
        let raw = with_operation(
            json!({
                "operationId": "listPets",
                "parameters": [{
                    "name": "body", "in": "body",
                    "schema": {"type": "string", "pattern": "a(b"}
                }],
                "responses": {"200": {"description": "ok"}}
            }),
            json!({}),
        );
        let (errors, _) = walk(raw, ValueKind::Default);
        assert_eq!(
            errors,
            vec![
                "default value for body in body does not validate its schema",
                "body in body has invalid pattern: \"a(b\"",
            ]
        );
    }
}

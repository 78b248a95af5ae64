//! Validators for literal values declared against simple schemas: non-body
//! parameters, response headers and their `items`.
//!
//! A simple schema is converted once to the equivalent full schema and run
//! through the regular dispatcher, so the primitive checks and their messages
//! are shared with body validation.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::document::{Header, Parameter};
use crate::formats::FormatRegistry;
use crate::messages::Violation;
use crate::result::ValidationResult;
use crate::schema::SimpleSchema;
use crate::types::ValidatorOptions;
use crate::validator::{SchemaValidator, ValidationContext};

fn compile(simple: &SimpleSchema, options: &ValidatorOptions) -> SchemaValidator {
    // Simple schemas never carry `$ref`, the root is never consulted.
    SchemaValidator::new(&simple.to_schema(), Arc::new(Value::Null), options.clone())
}

/// Separator for a non-`multi` collection format; csv when unset.
fn separator(collection_format: Option<&str>) -> Option<char> {
    match collection_format.unwrap_or("csv") {
        "csv" => Some(','),
        "ssv" => Some(' '),
        "tsv" => Some('\t'),
        "pipes" => Some('|'),
        _ => None,
    }
}

/// Split a serialized collection into its elements.
///
/// Elements of numeric or boolean item types are parsed when they can be;
/// anything else stays a string so the type check reports it.
fn split_collection(raw: &str, simple: &SimpleSchema) -> Option<Value> {
    let sep = separator(simple.collection_format.as_deref())?;
    if raw.is_empty() {
        return Some(Value::Array(Vec::new()));
    }
    let items_type = simple.items_type_name();
    let elements = raw
        .split(sep)
        .map(|part| match items_type {
            "integer" | "number" | "boolean" => {
                serde_json::from_str(part).unwrap_or_else(|_| Value::String(part.to_string()))
            }
            _ => Value::String(part.to_string()),
        })
        .collect();
    Some(Value::Array(elements))
}

/// Normalize a literal: a string given for an array parameter is split
/// according to its collection format.
fn normalize<'v>(data: &'v Value, simple: &SimpleSchema) -> Cow<'v, Value> {
    if let (Value::String(raw), "array") = (data, simple.type_name()) {
        if let Some(split) = split_collection(raw, simple) {
            return Cow::Owned(split);
        }
    }
    Cow::Borrowed(data)
}

/// Validates values for one non-body parameter.
#[derive(Debug)]
pub struct ParamValidator {
    name: String,
    location: String,
    required: bool,
    allow_empty_value: bool,
    simple: SimpleSchema,
    validator: SchemaValidator,
}

impl ParamValidator {
    pub fn new(param: &Parameter, options: &ValidatorOptions) -> Self {
        Self {
            name: param.name.clone(),
            location: param.location.clone(),
            required: param.required,
            allow_empty_value: param.allow_empty_value,
            simple: param.simple.clone(),
            validator: compile(&param.simple, options),
        }
    }

    pub fn validate(&self, data: &Value, formats: &dyn FormatRegistry) -> ValidationResult {
        let empty = match data {
            Value::Null => true,
            Value::String(s) => s.is_empty() && !self.allow_empty_value,
            _ => false,
        };
        if self.required && empty {
            return ValidationResult::from_error(Violation::Required {
                path: self.name.clone(),
                location: self.location.clone(),
            });
        }
        let ctx = ValidationContext::new(formats)
            .with_path(self.name.as_str())
            .with_location(&self.location);
        self.validator.validate(&normalize(data, &self.simple), &ctx)
    }
}

/// Validates values for one response header.
#[derive(Debug)]
pub struct HeaderValidator {
    name: String,
    simple: SimpleSchema,
    validator: SchemaValidator,
}

impl HeaderValidator {
    pub fn new(name: &str, header: &Header, options: &ValidatorOptions) -> Self {
        Self {
            name: name.to_string(),
            simple: header.simple.clone(),
            validator: compile(&header.simple, options),
        }
    }

    pub fn validate(&self, data: &Value, formats: &dyn FormatRegistry) -> ValidationResult {
        let ctx = ValidationContext::new(formats)
            .with_path(self.name.as_str())
            .with_location("header");
        self.validator.validate(&normalize(data, &self.simple), &ctx)
    }
}

/// Validates single elements against an `items` definition.
///
/// The element at `index` is reported as `path.index`.
#[derive(Debug)]
pub struct ItemsValidator {
    path: String,
    location: String,
    simple: SimpleSchema,
    validator: SchemaValidator,
}

impl ItemsValidator {
    pub fn new(
        path: &str,
        location: &str,
        items: &SimpleSchema,
        options: &ValidatorOptions,
    ) -> Self {
        Self {
            path: path.to_string(),
            location: location.to_string(),
            simple: items.clone(),
            validator: compile(items, options),
        }
    }

    pub fn validate(
        &self,
        index: usize,
        data: &Value,
        formats: &dyn FormatRegistry,
    ) -> ValidationResult {
        let ctx = ValidationContext::new(formats)
            .with_path(format!("{}.{}", self.path, index))
            .with_location(&self.location);
        self.validator.validate(&normalize(data, &self.simple), &ctx)
    }
}

//! Structural validation of a whole Swagger 2.0 document.
//!
//! The document is first checked against the embedded meta-schema, then every
//! `$ref` is resolved, and only then is it read into the typed model for the
//! graph-shaped checks that a schema cannot express.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::defaults::{ValueKind, ValueWalker};
use crate::document::{collect_refs, escape_pointer, Document, OperationEntry};
use crate::error::{SchemaError, ValidateError};
use crate::formats::FormatRegistry;
use crate::meta;
use crate::resolver::navigate_pointer;
use crate::result::ValidationResult;
use crate::schema::{Schema, SchemaOrArray};
use crate::types::ValidatorOptions;
use crate::validator::ref_violation;
use crate::values::{is_valid_pattern, Pattern};

/// Findings about the document itself rather than about a value.
///
/// Like [`Violation`](crate::Violation), the `Display` shapes are stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentMessage {
    #[error("spec is not a valid swagger 2.0 document: {reason}")]
    Unreadable { reason: String },

    #[error("{id:?} is defined {count} times")]
    DuplicateOperationId { id: String, count: usize },

    #[error("definition {name:?} has circular ancestry: [{}]", .ancestors.join(" "))]
    CircularAncestry { name: String, ancestors: Vec<String> },

    #[error("definition {name:?} contains duplicate properties: [{}]", .properties.join(" "))]
    DuplicateProperties {
        name: String,
        properties: Vec<String>,
    },

    #[error("path {path} overlaps with {other}")]
    PathOverlap { path: String, other: String },

    #[error("path stripped from path parameters {stripped} contains {{,}} or white space. This is probably no what you want.")]
    GarbledStrippedPath { stripped: String },

    #[error("in path {path:?}, param {param:?} contains {{,}} or white space. Albeit not stricly illegal, this is probably no what you want")]
    GarbledPathParam { path: String, param: String },

    #[error("params in path {path:?} must be unique: {first:?} conflicts with {second:?}")]
    NonUniquePathParams {
        path: String,
        first: String,
        second: String,
    },

    #[error("{path:?} contains an empty path parameter")]
    EmptyPathParameter { path: String },

    #[error("path param {param:?} has no parameter definition")]
    UndeclaredPathParam { param: String },

    #[error("path param {param:?} is not present in path {path:?}")]
    PathParamNotInPath { param: String, path: String },

    #[error("duplicate parameter name {name:?} for {location:?} in operation {operation:?}")]
    DuplicateParameter {
        name: String,
        location: String,
        operation: String,
    },

    #[error("operation {operation:?} has invalid pattern in param {param:?}: {pattern:?}")]
    InvalidParamPattern {
        operation: String,
        param: String,
        pattern: String,
    },

    #[error("operation {operation:?} has more than 1 body param (accepted: {accepted:?}, dropped: {dropped:?})")]
    MultipleBodyParams {
        operation: String,
        accepted: String,
        dropped: String,
    },

    #[error("operation {operation:?} has both formData and body parameters. Only one such In: type may be used for a given operation")]
    BodyAndFormData { operation: String },

    #[error("in operation {operation:?},path param {param:?} must be declared as required")]
    PathParamNotRequired { operation: String, param: String },

    #[error("param {param:?} for {operation:?} is a collection without an element type (array requires item definition)")]
    ParamWithoutItems { param: String, operation: String },

    #[error("header {header:?} for {operation:?} is a collection without an element type (array requires items definition)")]
    HeaderWithoutItems { header: String, operation: String },

    #[error("{prefix} for {operation:?} is a collection without an element type (array requires items definition)")]
    SchemaWithoutItems { prefix: String, operation: String },

    #[error("{prefix} for {operation:?} has invalid items pattern: {pattern:?}")]
    InvalidItemsPattern {
        prefix: String,
        operation: String,
        pattern: String,
    },

    #[error("definition {name:?} is a collection without an element type (array requires items definition)")]
    DefinitionWithoutItems { name: String },

    #[error("{property:?} is present in required but not defined as property in definition {definition:?}")]
    RequiredNotDefined {
        property: String,
        definition: String,
    },

    #[error("Pattern {pattern:?} is invalid")]
    InvalidPatternKey { pattern: String },

    #[error("{name} in {location} has a default value and is required as parameter")]
    RequiredWithDefault { name: String, location: String },

    #[error("{kind} value for {name} in {location} does not validate its schema")]
    InvalidValue {
        kind: ValueKind,
        name: String,
        location: String,
    },

    #[error("{kind} value for {name}.items in {location} does not validate its schema")]
    InvalidItemsValue {
        kind: ValueKind,
        name: String,
        location: String,
    },

    #[error("in operation {operation:?}, {kind} value in header {header} for {response} does not validate its schema")]
    InvalidHeaderValue {
        kind: ValueKind,
        operation: String,
        header: String,
        response: String,
    },

    #[error("in operation {operation:?}, {kind} value in header.items {header} for {response} does not validate its schema")]
    InvalidHeaderItemsValue {
        kind: ValueKind,
        operation: String,
        header: String,
        response: String,
    },

    #[error("in operation {operation:?}, header {header} for {response} has invalid pattern {pattern:?}: {reason}")]
    InvalidHeaderPattern {
        operation: String,
        header: String,
        response: String,
        pattern: String,
        reason: String,
    },

    #[error("in operation {operation:?}, {kind} value in {response} does not validate its schema")]
    InvalidResponseValue {
        kind: ValueKind,
        operation: String,
        response: String,
    },

    #[error("{path} in {location} has invalid pattern: {pattern:?}")]
    InvalidSchemaPattern {
        path: String,
        location: String,
        pattern: String,
    },

    #[error("operation {operation:?} has no valid response")]
    NoValidResponse { operation: String },

    #[error("No validation attempt for examples for media types other than application/json, in operation {operation:?}, {response}:")]
    UnsupportedExampleMediaType { operation: String, response: String },

    #[error("Examples provided without schema in operation {operation:?}, {response}:")]
    ExamplesWithoutSchema { operation: String, response: String },

    #[error("{kind} {pointer:?} is not used anywhere")]
    Unused { kind: &'static str, pointer: String },

    #[error("spec has no valid path defined")]
    NoValidPath,
}

impl From<DocumentMessage> for SchemaError {
    fn from(message: DocumentMessage) -> Self {
        SchemaError::new("", message.to_string())
    }
}

/// Path template parameters, braces included, segment by segment.
///
/// `/pets/{id}/{kind}.json` yields `{id}` and `{kind}`; `{}` is not a parameter.
pub fn extract_path_params(path: &str) -> Vec<String> {
    path.split('/')
        .flat_map(segment_params)
        .map(|(start, end, segment)| segment[start..end].to_string())
        .collect()
}

/// Byte ranges of `{name}` groups in one segment, innermost-open first.
fn segment_params(segment: &str) -> Vec<(usize, usize, &str)> {
    let mut found = Vec::new();
    let mut open = None;
    for (i, c) in segment.char_indices() {
        match c {
            '{' => open = Some(i),
            '}' => {
                if let Some(start) = open.take() {
                    if i > start + 1 {
                        found.push((start, i + 1, segment));
                    }
                }
            }
            _ => {}
        }
    }
    found
}

/// The path with every parameter removed and empty segments dropped, so that
/// `/pets/{id}` and `/pets/{name}` normalize to the same shape.
pub fn strip_path_params(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut stripped = String::with_capacity(segment.len());
            let mut last = 0;
            for (start, end, _) in segment_params(segment) {
                stripped.push_str(&segment[last..start]);
                last = end;
            }
            stripped.push_str(&segment[last..]);
            stripped
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_garbled(s: &str) -> bool {
    s.chars().any(|c| c == '{' || c == '}' || c.is_whitespace())
}

/// Validates whole documents.
pub struct SpecValidator<'a> {
    formats: &'a dyn FormatRegistry,
    options: ValidatorOptions,
}

impl<'a> SpecValidator<'a> {
    pub fn new(formats: &'a dyn FormatRegistry, options: ValidatorOptions) -> Self {
        Self { formats, options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate a raw document, returning `(errors, warnings)`.
    pub fn validate(&self, raw: &Value) -> (ValidationResult, ValidationResult) {
        let mut errors = ValidationResult::new();
        let mut warnings = ValidationResult::new();
        let stop_early = !self.options.continue_on_errors;

        debug!("checking document against the Swagger 2.0 schema");
        match meta::validate_document_shape(raw, self.formats) {
            Ok(result) => errors.merge(result),
            Err(e) => errors.add_error(DocumentMessage::Unreadable {
                reason: e.to_string(),
            }),
        }
        if stop_early && errors.has_errors() {
            return (errors, warnings);
        }

        debug!("resolving references");
        errors.merge(check_references(raw));
        if stop_early && errors.has_errors() {
            return (errors, warnings);
        }

        let doc = match Document::from_value(raw) {
            Ok(doc) => doc,
            Err(e) => {
                errors.add_error(DocumentMessage::Unreadable {
                    reason: e.to_string(),
                });
                return (errors, warnings);
            }
        };

        debug!("checking operations and definitions");
        errors.merge(check_duplicate_operation_ids(&doc));
        errors.merge(check_duplicate_property_names(&doc));
        errors.merge(self.check_parameters(&doc, &mut warnings));
        errors.merge(check_items(&doc));
        errors.merge(check_required_definitions(&doc));

        debug!("validating defaults and examples");
        for kind in [ValueKind::Default, ValueKind::Example] {
            let walker = ValueWalker::new(&doc, raw, self.formats, &self.options, kind);
            let (walk_errors, walk_warnings) = walker.validate();
            errors.merge(walk_errors);
            warnings.merge(walk_warnings);
        }
        errors.merge(check_empty_path_params(&doc));

        warnings.merge(check_referenced(&doc, raw));
        if doc.paths.0.is_empty() {
            warnings.add_warning(DocumentMessage::NoValidPath);
        }

        debug!(
            errors = errors.errors().len(),
            warnings = warnings.warnings().len(),
            "validated document"
        );
        (errors, warnings)
    }

    fn check_parameters(&self, doc: &Document, warnings: &mut ValidationResult) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut known_paths: HashMap<&str, HashMap<String, &str>> = HashMap::new();

        for entry in doc.operations() {
            let path = entry.path;
            let label = entry.label();

            let stripped = strip_path_params(path);
            if is_garbled(&stripped) {
                warnings.add_warning(DocumentMessage::GarbledStrippedPath {
                    stripped: stripped.clone(),
                });
            }
            if self.options.strict_path_param_uniqueness {
                let seen = known_paths.entry(entry.method).or_default();
                match seen.get(&stripped) {
                    Some(other) if *other != path => {
                        result.add_error(DocumentMessage::PathOverlap {
                            path: path.to_string(),
                            other: other.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(stripped, path);
                    }
                }
            }

            check_duplicate_parameters(doc, &entry, &label, &mut result);

            // Each extra body param is reported against the one before it.
            let mut previous_body: Option<&str> = None;
            let mut has_form_data = false;
            let mut declared_path_params = Vec::new();
            for param in doc.params_for(&entry) {
                if let Some(pattern) = &param.simple.validations.pattern {
                    if !is_valid_pattern(pattern) {
                        result.add_error(DocumentMessage::InvalidParamPattern {
                            operation: label.clone(),
                            param: param.name.clone(),
                            pattern: pattern.clone(),
                        });
                    }
                }
                match param.location.as_str() {
                    "body" => {
                        if let Some(previous) = previous_body {
                            result.add_error(DocumentMessage::MultipleBodyParams {
                                operation: label.clone(),
                                accepted: previous.to_string(),
                                dropped: param.name.clone(),
                            });
                        }
                        previous_body = Some(param.name.as_str());
                    }
                    "formData" => has_form_data = true,
                    "path" => {
                        declared_path_params.push(param.name.as_str());
                        if !param.required {
                            result.add_error(DocumentMessage::PathParamNotRequired {
                                operation: label.clone(),
                                param: param.name.clone(),
                            });
                        }
                    }
                    _ => {}
                }
            }
            if previous_body.is_some() && has_form_data {
                result.add_error(DocumentMessage::BodyAndFormData {
                    operation: label.clone(),
                });
            }

            let template_params = extract_path_params(path);
            for (i, param) in template_params.iter().enumerate() {
                if let Some(first) = template_params[..i].iter().find(|p| *p == param) {
                    result.add_error(DocumentMessage::NonUniquePathParams {
                        path: path.to_string(),
                        first: first.clone(),
                        second: param.clone(),
                    });
                }
                if param.chars().any(char::is_whitespace) {
                    warnings.add_warning(DocumentMessage::GarbledPathParam {
                        path: path.to_string(),
                        param: param.clone(),
                    });
                }
            }
            result.merge(check_path_param_presence(
                path,
                &template_params,
                &declared_path_params,
            ));
        }
        result
    }
}

/// Every `$ref` in the raw document must point at something.
fn check_references(raw: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();
    for site in collect_refs(raw) {
        if let Err(err) = navigate_pointer(raw, &site.reference) {
            result.add_error(ref_violation(&site.path, &err));
        }
    }
    result
}

fn check_duplicate_operation_ids(doc: &Document) -> ValidationResult {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for entry in doc.operations() {
        if let Some(id) = entry.operation.operation_id.as_deref() {
            if !id.is_empty() {
                *counts.entry(id).or_default() += 1;
            }
        }
    }
    let mut result = ValidationResult::new();
    for (id, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        result.add_error(DocumentMessage::DuplicateOperationId {
            id: id.to_string(),
            count,
        });
    }
    result
}

/// Parameters declared directly on an operation must be unique by location and name.
fn check_duplicate_parameters(
    doc: &Document,
    entry: &OperationEntry<'_>,
    label: &str,
    result: &mut ValidationResult,
) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for declared in &entry.operation.parameters {
        let Ok(param) = doc.resolve_parameter(declared) else {
            continue;
        };
        if !seen.insert((param.location.as_str(), param.name.as_str())) {
            result.add_error(DocumentMessage::DuplicateParameter {
                name: param.name.clone(),
                location: param.location.clone(),
                operation: label.to_string(),
            });
        }
    }
}

/// Template placeholders and declared path parameters must match one to one.
fn check_path_param_presence(path: &str, template: &[String], declared: &[&str]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for placeholder in template {
        if !declared.iter().any(|name| *placeholder == format!("{{{}}}", name)) {
            result.add_error(DocumentMessage::UndeclaredPathParam {
                param: placeholder.clone(),
            });
        }
    }
    for name in declared {
        let placeholder = format!("{{{}}}", name);
        if !template.contains(&placeholder) {
            result.add_error(DocumentMessage::PathParamNotInPath {
                param: name.to_string(),
                path: path.to_string(),
            });
        }
    }
    result
}

/// Follow a chain of `$ref`s to a concrete schema.
///
/// Returns the schema and the first reference followed, if any. Broken or
/// looping chains give `None`; they are reported by the reference check.
fn follow_refs<'d>(doc: &'d Document, schema: &'d Schema) -> Option<(&'d Schema, Option<&'d str>)> {
    let first = schema.reference.as_deref();
    let mut current = schema;
    let mut visited = HashSet::new();
    while let Some(reference) = current.reference.as_deref() {
        if !visited.insert(reference) {
            return None;
        }
        current = doc.resolve_definition(reference).ok()?;
    }
    Some((current, first))
}

fn check_duplicate_property_names(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (name, schema) in &doc.definitions {
        if schema.all_of.is_empty() {
            continue;
        }
        let mut known_ancestors = HashSet::from([format!("#/definitions/{}", escape_pointer(name))]);
        let ancestors = circular_ancestry(doc, name, schema, &mut known_ancestors);
        if !ancestors.is_empty() {
            result.add_error(DocumentMessage::CircularAncestry {
                name: name.clone(),
                ancestors,
            });
            continue;
        }

        let mut known_properties = HashSet::new();
        let mut expanded = HashSet::new();
        let duplicates =
            duplicate_properties(doc, name, schema, &mut known_properties, &mut expanded);
        if !duplicates.is_empty() {
            result.add_error(DocumentMessage::DuplicateProperties {
                name: name.clone(),
                properties: duplicates,
            });
        }
    }
    result
}

fn circular_ancestry(
    doc: &Document,
    name: &str,
    schema: &Schema,
    known: &mut HashSet<String>,
) -> Vec<String> {
    if schema.reference.is_none() && schema.all_of.is_empty() {
        return Vec::new();
    }
    let Some((resolved, first_ref)) = follow_refs(doc, schema) else {
        return Vec::new();
    };
    // `known` holds the chain from the definition down to this node only.
    let entered = match first_ref {
        Some(reference) if !known.insert(reference.to_string()) => {
            return vec![reference.to_string()];
        }
        Some(reference) => Some(reference),
        None => None,
    };
    let current = first_ref.unwrap_or(name);
    let mut ancestors = Vec::new();
    for child in &resolved.all_of {
        if child.reference.is_some() || !child.all_of.is_empty() {
            ancestors = circular_ancestry(doc, current, child, known);
            if !ancestors.is_empty() {
                break;
            }
        }
    }
    if let Some(reference) = entered {
        known.remove(reference);
    }
    ancestors
}

/// Properties declared more than once across the `allOf` tree.
///
/// An ancestor shared by several branches contributes its properties once.
fn duplicate_properties<'d>(
    doc: &'d Document,
    name: &str,
    schema: &'d Schema,
    known: &mut HashSet<String>,
    expanded: &mut HashSet<&'d str>,
) -> Vec<String> {
    let Some((resolved, first_ref)) = follow_refs(doc, schema) else {
        return Vec::new();
    };
    if let Some(reference) = first_ref {
        if !expanded.insert(reference) {
            return Vec::new();
        }
    }
    let current = first_ref.unwrap_or(name);
    if !resolved.all_of.is_empty() {
        let mut duplicates = Vec::new();
        for child in &resolved.all_of {
            duplicates.extend(duplicate_properties(doc, current, child, known, expanded));
        }
        return duplicates;
    }
    let mut duplicates = Vec::new();
    for property in resolved.properties.keys() {
        if !known.insert(property.clone()) {
            duplicates.push(format!("{}.{}", current, property));
        }
    }
    duplicates
}

/// Array schemas must say what their elements are.
fn check_items(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    for entry in doc.operations() {
        let label = entry.label();
        for param in doc.params_for(&entry) {
            if let Some(schema) = &param.schema {
                let prefix = format!("body param {:?}", param.name);
                result.merge(check_schema_items(schema, &prefix, &label));
                continue;
            }
            let mut current = Some(&param.simple);
            while let Some(simple) = current {
                if simple.type_name() != "array" {
                    break;
                }
                if simple.items_type_name().is_empty() {
                    result.add_error(DocumentMessage::ParamWithoutItems {
                        param: param.name.clone(),
                        operation: label.clone(),
                    });
                    break;
                }
                current = simple.items.as_deref();
            }
        }

        let Some(responses) = &entry.operation.responses else {
            continue;
        };
        for (_, _, declared) in responses.named() {
            let Ok(response) = doc.resolve_response(declared) else {
                continue;
            };
            for (header_name, header) in &response.headers {
                if header.simple.type_name() == "array" && header.simple.items_type_name().is_empty() {
                    result.add_error(DocumentMessage::HeaderWithoutItems {
                        header: header_name.clone(),
                        operation: label.clone(),
                    });
                }
            }
            if let Some(schema) = &response.schema {
                result.merge(check_schema_items(schema, "response body", &label));
            }
        }
    }

    for (name, schema) in &doc.definitions {
        if schema.schema_type.contains("array") && !schema.has_items() {
            result.add_error(DocumentMessage::DefinitionWithoutItems { name: name.clone() });
        }
    }
    result
}

fn check_schema_items(schema: &Schema, prefix: &str, operation: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    if !schema.schema_type.contains("array") {
        return result;
    }
    if !schema.has_items() {
        result.add_error(DocumentMessage::SchemaWithoutItems {
            prefix: prefix.to_string(),
            operation: operation.to_string(),
        });
        return result;
    }
    if let Some(items) = schema.single_items() {
        if let Some(pattern) = &items.validations.pattern {
            if !is_valid_pattern(pattern) {
                result.add_error(DocumentMessage::InvalidItemsPattern {
                    prefix: prefix.to_string(),
                    operation: operation.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }
        result.merge(check_schema_items(items, prefix, operation));
    }
    result
}

/// Names listed in `required` must be declared somewhere the object can hold them.
fn check_required_definitions(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (name, schema) in &doc.definitions {
        for property in &schema.required {
            result.merge(check_required_property(doc, property, name, schema));
        }
        let item_schemas: Vec<&Schema> = match &schema.items {
            Some(SchemaOrArray::Single(items)) => vec![items.as_ref()],
            Some(SchemaOrArray::Tuple(items)) => items.iter().collect(),
            None => Vec::new(),
        };
        for items in item_schemas {
            for property in &items.required {
                result.merge(check_required_property(doc, property, name, items));
            }
        }
    }
    result
}

fn declares_property(doc: &Document, schema: &Schema, property: &str, depth: usize) -> bool {
    if depth > doc.definitions.len() + 1 {
        return false;
    }
    let Some((resolved, _)) = follow_refs(doc, schema) else {
        return false;
    };
    resolved.properties.contains_key(property)
        || resolved
            .all_of
            .iter()
            .any(|branch| declares_property(doc, branch, property, depth + 1))
}

fn check_required_property(
    doc: &Document,
    property: &str,
    definition: &str,
    schema: &Schema,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    if declares_property(doc, schema, property, 0) {
        return result;
    }
    for source in schema.pattern_properties.keys() {
        let pattern = Pattern::new(source);
        if !pattern.is_valid() {
            result.add_error(DocumentMessage::InvalidPatternKey {
                pattern: source.clone(),
            });
            return result;
        }
        if pattern.matches(property) {
            return result;
        }
    }
    if schema.additional_properties.as_ref().is_some_and(|ap| ap.allows()) {
        return result;
    }
    result.add_error(DocumentMessage::RequiredNotDefined {
        property: property.to_string(),
        definition: definition.to_string(),
    });
    result
}

fn check_empty_path_params(doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    for path in doc.paths.0.keys().filter(|path| path.contains("{}")) {
        result.add_error(DocumentMessage::EmptyPathParameter { path: path.clone() });
    }
    result
}

/// Named parameters, responses and definitions nobody refers to.
fn check_referenced(doc: &Document, raw: &Value) -> ValidationResult {
    let used: HashSet<String> = collect_refs(raw).into_iter().map(|site| site.reference).collect();
    let mut result = ValidationResult::new();
    let sections = [
        ("parameter", "parameters", doc.parameters.keys().collect::<Vec<_>>()),
        ("response", "responses", doc.responses.keys().collect()),
        ("definition", "definitions", doc.definitions.keys().collect()),
    ];
    for (kind, section, names) in sections {
        for name in names {
            let pointer = format!("#/{}/{}", section, escape_pointer(name));
            if !used.contains(&pointer) {
                result.add_warning(DocumentMessage::Unused { kind, pointer });
            }
        }
    }
    result
}

/// Validate a whole document.
///
/// Returns the warnings when the document is valid.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` carrying every error found.
pub fn validate_spec(
    document: &Value,
    formats: &dyn FormatRegistry,
    options: &ValidatorOptions,
) -> Result<ValidationResult, ValidateError> {
    let (errors, warnings) = SpecValidator::new(formats, options.clone()).validate(document);
    errors.into_error()?;
    Ok(warnings)
}

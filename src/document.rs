//! Typed view of a Swagger 2.0 document.
//!
//! Only the parts the structural checks look at are modelled. Vendor
//! extensions (`x-*`) are skipped wherever they may appear as map keys.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::RefError;
use crate::schema::{Schema, SimpleSchema};

/// HTTP methods in the order operations are visited.
pub const METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

/// A Swagger 2.0 document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub swagger: String,
    pub host: Option<String>,
    pub base_path: Option<String>,
    pub paths: Paths,
    pub definitions: IndexMap<String, Schema>,
    pub parameters: IndexMap<String, Parameter>,
    pub responses: IndexMap<String, Response>,
}

/// Path templates to path items, in document order.
#[derive(Debug, Clone, Default)]
pub struct Paths(pub IndexMap<String, PathItem>);

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();
        for (template, value) in raw {
            if template.starts_with("x-") {
                continue;
            }
            let item = PathItem::deserialize(value).map_err(D::Error::custom)?;
            items.insert(template, item);
        }
        Ok(Paths(items))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub parameters: Vec<Parameter>,
    pub responses: Option<Responses>,
}

/// A parameter, or a `$ref` to one under `#/parameters`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameter {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub description: Option<String>,
    pub required: bool,
    pub allow_empty_value: bool,
    /// Only set for body parameters.
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub simple: SimpleSchema,
}

impl Parameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }
}

/// `default` plus status-code responses.
#[derive(Debug, Clone, Default)]
pub struct Responses {
    pub default: Option<Response>,
    pub codes: IndexMap<String, Response>,
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut responses = Responses::default();
        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let response = Response::deserialize(value).map_err(D::Error::custom)?;
            if key == "default" {
                responses.default = Some(response);
            } else {
                responses.codes.insert(key, response);
            }
        }
        Ok(responses)
    }
}

impl Responses {
    /// Every response with its display name: `default response` or
    /// `response 200`, and the bare key (`default` or `200`).
    pub fn named(&self) -> Vec<(String, &str, &Response)> {
        let mut out = Vec::new();
        if let Some(default) = &self.default {
            out.push(("default response".to_string(), "default", default));
        }
        for (code, response) in &self.codes {
            out.push((format!("response {}", code), code.as_str(), response));
        }
        out
    }
}

/// A response, or a `$ref` to one under `#/responses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub description: String,
    pub schema: Option<Schema>,
    pub headers: IndexMap<String, Header>,
    pub examples: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    pub description: Option<String>,
    #[serde(flatten)]
    pub simple: SimpleSchema,
}

/// One operation with where it was declared.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    pub method: &'static str,
    pub path: &'a str,
    pub item: &'a PathItem,
    pub operation: &'a Operation,
}

impl OperationEntry<'_> {
    /// The operation id, or `METHOD path` for anonymous operations.
    pub fn label(&self) -> String {
        match self.operation.operation_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{} {}", self.method.to_uppercase(), self.path),
        }
    }
}

/// A `$ref` found while walking the raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSite {
    /// Dot-delimited location of the object holding the `$ref`.
    pub path: String,
    pub reference: String,
}

/// Unescape one JSON pointer segment.
pub fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Escape a key for use as one JSON pointer segment.
pub fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn lookup<'a, T>(
    map: &'a IndexMap<String, T>,
    prefix: &str,
    reference: &str,
) -> Result<&'a T, RefError> {
    let Some(name) = reference.strip_prefix(prefix) else {
        return Err(RefError::Unsupported {
            reference: reference.to_string(),
        });
    };
    let key = unescape_pointer(name);
    map.get(&key).ok_or_else(|| RefError::MissingKey {
        reference: reference.to_string(),
        key,
    })
}

impl Document {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Document::deserialize(value)
    }

    /// Every operation, path by path, methods in [`METHODS`] order.
    pub fn operations(&self) -> Vec<OperationEntry<'_>> {
        let mut out = Vec::new();
        for (path, item) in &self.paths.0 {
            for method in METHODS {
                if let Some(operation) = item.operation(method) {
                    out.push(OperationEntry {
                        method,
                        path,
                        item,
                        operation,
                    });
                }
            }
        }
        out
    }

    /// Follow `$ref`s under `#/parameters` until a concrete parameter.
    pub fn resolve_parameter<'a>(&'a self, param: &'a Parameter) -> Result<&'a Parameter, RefError> {
        let mut current = param;
        let mut hops = 0;
        while let Some(reference) = &current.reference {
            hops += 1;
            if hops > self.parameters.len() + 1 {
                return Err(RefError::InvalidTarget {
                    reference: reference.clone(),
                    message: "circular $ref chain".to_string(),
                });
            }
            current = lookup(&self.parameters, "#/parameters/", reference)?;
        }
        Ok(current)
    }

    /// Follow `$ref`s under `#/responses` until a concrete response.
    pub fn resolve_response<'a>(&'a self, response: &'a Response) -> Result<&'a Response, RefError> {
        let mut current = response;
        let mut hops = 0;
        while let Some(reference) = &current.reference {
            hops += 1;
            if hops > self.responses.len() + 1 {
                return Err(RefError::InvalidTarget {
                    reference: reference.clone(),
                    message: "circular $ref chain".to_string(),
                });
            }
            current = lookup(&self.responses, "#/responses/", reference)?;
        }
        Ok(current)
    }

    /// The named definition a `#/definitions/...` reference points to.
    pub fn resolve_definition(&self, reference: &str) -> Result<&Schema, RefError> {
        lookup(&self.definitions, "#/definitions/", reference)
    }

    /// Effective parameters of an operation: path-item parameters overridden
    /// by operation parameters with the same name and location.
    ///
    /// Unresolvable references are skipped; they are reported separately.
    pub fn params_for<'a>(&'a self, entry: &OperationEntry<'a>) -> Vec<&'a Parameter> {
        let mut merged: IndexMap<(String, String), &'a Parameter> = IndexMap::new();
        let declared = entry
            .item
            .parameters
            .iter()
            .chain(&entry.operation.parameters);
        for param in declared {
            if let Ok(resolved) = self.resolve_parameter(param) {
                let key = (resolved.location.clone(), resolved.name.clone());
                merged.insert(key, resolved);
            }
        }
        merged.into_values().collect()
    }
}

/// Keys whose children are names rather than schema keywords.
const NAMED_CHILDREN: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "parameters",
    "responses",
    "paths",
    "headers",
    "securityDefinitions",
];

/// Keys holding literal values that may look like references.
fn is_literal_key(key: &str) -> bool {
    matches!(key, "default" | "example" | "examples" | "enum") || key.starts_with("x-")
}

/// Collect every `$ref` string in a raw document, skipping literal values
/// (defaults, examples, enums and vendor extensions).
pub fn collect_refs(document: &Value) -> Vec<RefSite> {
    let mut sites = Vec::new();
    walk_refs(document, "", false, &mut sites);
    sites
}

fn walk_refs(value: &Value, path: &str, names: bool, sites: &mut Vec<RefSite>) {
    match value {
        Value::Object(map) => {
            if !names {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    sites.push(RefSite {
                        path: path.to_string(),
                        reference: reference.clone(),
                    });
                }
            }
            for (key, child) in map {
                if !names && (key == "$ref" || is_literal_key(key)) {
                    continue;
                }
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                let child_names = !names && NAMED_CHILDREN.contains(&key.as_str());
                walk_refs(child, &child_path, child_names, sites);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk_refs(item, &format!("{}.{}", path, i), false, sites);
            }
        }
        _ => {}
    }
}

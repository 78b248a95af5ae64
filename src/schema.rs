//! Typed schema models.
//!
//! [`Schema`] is the JSON-Schema draft 4 node with the Swagger 2.0
//! additions. [`SimpleSchema`] is the restricted form used by non-body
//! parameters, response headers and their `items`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Constraints shared by full and simple schemas.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonValidations {
    pub maximum: Option<Number>,
    pub exclusive_maximum: bool,
    pub minimum: Option<Number>,
    pub exclusive_minimum: bool,
    pub multiple_of: Option<Number>,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
    pub unique_items: bool,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
}

impl CommonValidations {
    pub fn has_numeric_checks(&self) -> bool {
        self.maximum.is_some() || self.minimum.is_some() || self.multiple_of.is_some()
    }

    pub fn has_string_checks(&self) -> bool {
        self.max_length.is_some() || self.min_length.is_some() || self.pattern.is_some()
    }

    pub fn has_array_checks(&self) -> bool {
        self.max_items.is_some() || self.min_items.is_some() || self.unique_items
    }
}

/// One or several declared type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(pub Vec<String>);

impl TypeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TypeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(name) => TypeSet(vec![name]),
            Repr::Many(names) => TypeSet(names),
        })
    }
}

/// `items`: one schema for every element, or a positional tuple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrArray {
    Tuple(Vec<Schema>),
    Single(Box<Schema>),
}

/// `additionalProperties` / `additionalItems`: a flag or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

impl SchemaOrBool {
    /// True unless the policy is the literal `false`.
    pub fn allows(&self) -> bool {
        !matches!(self, SchemaOrBool::Bool(false))
    }

    pub fn schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrBool::Schema(s) => Some(s),
            SchemaOrBool::Bool(_) => None,
        }
    }
}

/// A `dependencies` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Properties(Vec<String>),
    Schema(Box<Schema>),
}

/// A schema node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: TypeSet,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    #[serde(flatten)]
    pub validations: CommonValidations,
    pub items: Option<SchemaOrArray>,
    pub additional_items: Option<SchemaOrBool>,
    pub max_properties: Option<u64>,
    pub min_properties: Option<u64>,
    pub required: Vec<String>,
    pub properties: IndexMap<String, Schema>,
    pub pattern_properties: IndexMap<String, Schema>,
    pub additional_properties: Option<SchemaOrBool>,
    pub dependencies: IndexMap<String, Dependency>,
    pub all_of: Vec<Schema>,
    pub any_of: Vec<Schema>,
    pub one_of: Vec<Schema>,
    pub not: Option<Box<Schema>>,
    pub discriminator: Option<String>,
    pub read_only: bool,
    #[serde(rename = "x-nullable")]
    pub nullable: bool,
    #[serde(rename = "x-enum-case-insensitive")]
    pub enum_case_insensitive: bool,
}

impl Schema {
    /// Deserialize a schema node from a raw JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Schema::deserialize(value)
    }

    pub fn has_composition(&self) -> bool {
        !self.all_of.is_empty()
            || !self.any_of.is_empty()
            || !self.one_of.is_empty()
            || self.not.is_some()
            || !self.dependencies.is_empty()
    }

    pub fn has_object_checks(&self) -> bool {
        self.max_properties.is_some()
            || self.min_properties.is_some()
            || !self.required.is_empty()
            || !self.properties.is_empty()
            || !self.pattern_properties.is_empty()
            || self.additional_properties.is_some()
    }

    pub fn has_items(&self) -> bool {
        match &self.items {
            Some(SchemaOrArray::Tuple(schemas)) => !schemas.is_empty(),
            Some(SchemaOrArray::Single(_)) => true,
            None => false,
        }
    }

    /// The single item schema, when `items` is not a tuple.
    pub fn single_items(&self) -> Option<&Schema> {
        match &self.items {
            Some(SchemaOrArray::Single(s)) => Some(s),
            _ => None,
        }
    }
}

/// The non-recursive schema form of parameters, headers and items.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimpleSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub items: Option<Box<SimpleSchema>>,
    pub collection_format: Option<String>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    #[serde(flatten)]
    pub validations: CommonValidations,
}

impl SimpleSchema {
    pub fn type_name(&self) -> &str {
        self.schema_type.as_deref().unwrap_or("")
    }

    /// The declared type of the element schema, empty when there is none.
    pub fn items_type_name(&self) -> &str {
        self.items.as_deref().map(SimpleSchema::type_name).unwrap_or("")
    }

    /// The equivalent full schema, so simple values run through the same checks.
    pub fn to_schema(&self) -> Schema {
        Schema {
            schema_type: TypeSet(self.schema_type.iter().cloned().collect()),
            format: self.format.clone(),
            default: self.default.clone(),
            example: self.example.clone(),
            validations: self.validations.clone(),
            items: self
                .items
                .as_deref()
                .map(|items| SchemaOrArray::Single(Box::new(items.to_schema()))),
            ..Schema::default()
        }
    }
}

//! Object (map) validation.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::messages::Violation;
use crate::result::{Defaulter, ValidationResult};
use crate::schema::{Schema, SchemaOrBool};
use crate::validator::{SchemaValidator, Shared, ValidationContext};
use crate::values::Pattern;

/// Policy for keys matched by neither `properties` nor `patternProperties`.
enum AdditionalProperties {
    Allow,
    Forbid,
    Schema(Box<SchemaValidator>),
}

struct Property {
    validator: SchemaValidator,
    default: Option<Value>,
}

/// minProperties/maxProperties, required keys, and per-key schemas.
pub(crate) struct ObjectValidator {
    max_properties: Option<u64>,
    min_properties: Option<u64>,
    required: Vec<String>,
    properties: IndexMap<String, Property>,
    pattern_properties: Vec<(Pattern, SchemaValidator)>,
    additional: AdditionalProperties,
}

impl ObjectValidator {
    pub fn build(schema: &Schema, shared: &Arc<Shared>) -> Self {
        let properties = schema
            .properties
            .iter()
            .map(|(name, property)| {
                let compiled = Property {
                    validator: SchemaValidator::build(property, shared),
                    default: property.default.clone(),
                };
                (name.clone(), compiled)
            })
            .collect();
        let pattern_properties = schema
            .pattern_properties
            .iter()
            .map(|(pattern, property)| {
                (Pattern::new(pattern), SchemaValidator::build(property, shared))
            })
            .collect();
        let additional = match &schema.additional_properties {
            None | Some(SchemaOrBool::Bool(true)) => AdditionalProperties::Allow,
            Some(SchemaOrBool::Bool(false)) => AdditionalProperties::Forbid,
            Some(SchemaOrBool::Schema(s)) => {
                AdditionalProperties::Schema(Box::new(SchemaValidator::build(s, shared)))
            }
        };
        Self {
            max_properties: schema.max_properties,
            min_properties: schema.min_properties,
            required: schema.required.clone(),
            properties,
            pattern_properties,
            additional,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.validate_map(data.as_object(), ctx)
    }

    /// Validate a map; `None` is treated as an empty object.
    pub fn validate_map(
        &self,
        map: Option<&Map<String, Value>>,
        ctx: &ValidationContext<'_>,
    ) -> ValidationResult {
        let empty = Map::new();
        let map = map.unwrap_or(&empty);
        let (path, location) = (ctx.path(), ctx.location());
        let mut result = ValidationResult::new();

        let count = map.len() as u64;
        if let Some(max) = self.max_properties {
            if count > max {
                result.add_error(Violation::TooManyProperties {
                    path: path.to_string(),
                    location: location.to_string(),
                    max,
                });
            }
        }
        if let Some(min) = self.min_properties {
            if count < min {
                result.add_error(Violation::TooFewProperties {
                    path: path.to_string(),
                    location: location.to_string(),
                    min,
                });
            }
        }

        // Required keys are always reported as `parent.key`, even at the root.
        for key in &self.required {
            if !map.contains_key(key) {
                result.add_error(Violation::Required {
                    path: format!("{}.{}", path, key),
                    location: location.to_string(),
                });
            }
        }

        for (key, property) in &self.properties {
            match map.get(key) {
                Some(value) => result.merge(property.validator.validate(value, &ctx.descend(key))),
                None => {
                    if let Some(default) = &property.default {
                        if !self.required.contains(key) {
                            result.add_defaulter(Defaulter {
                                path: path.to_string(),
                                property: key.clone(),
                                value: default.clone(),
                            });
                        }
                    }
                }
            }
        }

        for (pattern, _) in self.pattern_properties.iter().filter(|(p, _)| !p.is_valid()) {
            result.add_errors(pattern.check(path, location, ""));
        }

        for (key, value) in map {
            if self.properties.contains_key(key) {
                continue;
            }
            let mut matched = false;
            for (pattern, validator) in &self.pattern_properties {
                if pattern.matches(key) {
                    matched = true;
                    result.merge(validator.validate(value, &ctx.descend(key)));
                }
            }
            if matched {
                continue;
            }
            match &self.additional {
                AdditionalProperties::Allow => {}
                AdditionalProperties::Forbid => result.add_error(Violation::ForbiddenProperty {
                    path: path.to_string(),
                    key: key.clone(),
                    location: location.to_string(),
                }),
                AdditionalProperties::Schema(validator) => {
                    result.merge(validator.validate(value, &ctx.descend(key)));
                }
            }
        }

        result
    }
}

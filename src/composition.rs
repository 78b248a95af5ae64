//! Schema composition: allOf, anyOf, oneOf, not and dependencies.
//!
//! Branches see the same value and path as the node that holds them. When
//! no alternative of `anyOf`/`oneOf` passes, the errors of the failed branch
//! with the highest match count are kept alongside the summary message, since
//! that branch came closest to matching.

use std::sync::Arc;

use serde_json::Value;

use crate::messages::Violation;
use crate::result::ValidationResult;
use crate::schema::{Dependency, Schema};
use crate::validator::{SchemaValidator, Shared, ValidationContext};

enum DependencyCheck {
    Properties(Vec<String>),
    Schema(Box<SchemaValidator>),
}

pub(crate) struct CompositionValidator {
    all_of: Vec<SchemaValidator>,
    any_of: Vec<SchemaValidator>,
    one_of: Vec<SchemaValidator>,
    not: Option<Box<SchemaValidator>>,
    dependencies: Vec<(String, DependencyCheck)>,
}

fn build_all(schemas: &[Schema], shared: &Arc<Shared>) -> Vec<SchemaValidator> {
    schemas
        .iter()
        .map(|s| SchemaValidator::build(s, shared))
        .collect()
}

/// Keep `candidate` if it matched more than the current best.
fn keep_best(best: &mut Option<ValidationResult>, candidate: ValidationResult) {
    let better = best
        .as_ref()
        .map_or(true, |b| candidate.match_count() > b.match_count());
    if better {
        *best = Some(candidate);
    }
}

impl CompositionValidator {
    pub fn build(schema: &Schema, shared: &Arc<Shared>) -> Self {
        let dependencies = schema
            .dependencies
            .iter()
            .map(|(key, dependency)| {
                let check = match dependency {
                    Dependency::Properties(names) => DependencyCheck::Properties(names.clone()),
                    Dependency::Schema(s) => {
                        DependencyCheck::Schema(Box::new(SchemaValidator::build(s, shared)))
                    }
                };
                (key.clone(), check)
            })
            .collect();
        Self {
            all_of: build_all(&schema.all_of, shared),
            any_of: build_all(&schema.any_of, shared),
            one_of: build_all(&schema.one_of, shared),
            not: schema
                .not
                .as_deref()
                .map(|s| Box::new(SchemaValidator::build(s, shared))),
            dependencies,
        }
    }

    pub fn validate(&self, data: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !self.any_of.is_empty() {
            self.validate_any_of(data, ctx, &mut result);
        }
        if !self.one_of.is_empty() {
            self.validate_one_of(data, ctx, &mut result);
        }
        if !self.all_of.is_empty() {
            self.validate_all_of(data, ctx, &mut result);
        }
        if let Some(not) = &self.not {
            if not.validate(data, ctx).is_valid() {
                result.add_error(Violation::Not {
                    path: ctx.path().to_string(),
                });
            }
        }
        if let Value::Object(map) = data {
            for (key, check) in &self.dependencies {
                if !map.contains_key(key) {
                    continue;
                }
                match check {
                    DependencyCheck::Schema(validator) => {
                        let dep_ctx = ctx.at_path(format!("{}.{}", ctx.path(), key));
                        result.merge(validator.validate(data, &dep_ctx));
                    }
                    DependencyCheck::Properties(names) => {
                        for name in names.iter().filter(|n| !map.contains_key(*n)) {
                            result.add_error(Violation::Dependency {
                                path: ctx.path().to_string(),
                                key: name.clone(),
                            });
                        }
                    }
                }
            }
        }
        result.inc();
        result
    }

    fn validate_any_of(
        &self,
        data: &Value,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) {
        let mut best_failure = None;
        for validator in &self.any_of {
            let outcome = validator.validate(data, ctx);
            if outcome.is_valid() {
                result.merge(outcome);
                return;
            }
            keep_best(&mut best_failure, outcome);
        }
        result.add_error(Violation::AnyOf {
            path: ctx.path().to_string(),
        });
        if let Some(best) = best_failure {
            result.merge(best);
        }
    }

    fn validate_one_of(
        &self,
        data: &Value,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) {
        let mut matched = 0;
        let mut first_success = None;
        let mut best_failure = None;
        for validator in &self.one_of {
            let outcome = validator.validate(data, ctx);
            if outcome.is_valid() {
                matched += 1;
                best_failure = None;
                if first_success.is_none() {
                    first_success = Some(outcome);
                }
            } else if matched == 0 {
                keep_best(&mut best_failure, outcome);
            }
        }
        if matched == 1 {
            if let Some(success) = first_success {
                result.merge(success);
            }
            return;
        }
        result.add_error(Violation::OneOf {
            path: ctx.path().to_string(),
            matched,
        });
        if let Some(best) = best_failure {
            result.merge(best);
        }
    }

    fn validate_all_of(
        &self,
        data: &Value,
        ctx: &ValidationContext<'_>,
        result: &mut ValidationResult,
    ) {
        let mut passed = 0;
        for validator in &self.all_of {
            let outcome = validator.validate(data, ctx);
            if outcome.is_valid() {
                passed += 1;
            }
            result.merge(outcome);
        }
        if passed != self.all_of.len() {
            result.add_error(Violation::AllOf {
                path: ctx.path().to_string(),
                none_validated: passed == 0,
            });
        }
    }
}

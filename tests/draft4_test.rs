//! Verdicts on plain draft 4 schemas, cross-checked against the `jsonschema` crate.

use jsonschema::Draft;
use serde_json::{json, Value};
use swagger_validate::{validate_against_schema, Formats, ValidatorOptions};

fn draft4() -> ValidatorOptions {
    ValidatorOptions::new().swagger_dialect(false)
}

/// Every instance must get the same verdict from both validators.
fn agree(schema: Value, instances: &[Value]) {
    let reference = jsonschema::options()
        .with_draft(Draft::Draft4)
        .build(&schema)
        .unwrap();
    let formats = Formats::default();
    for instance in instances {
        let ours = validate_against_schema(&schema, instance, &formats, &draft4()).unwrap();
        assert_eq!(
            ours.is_valid(),
            reference.is_valid(instance),
            "schema {} on {}: {:?}",
            schema,
            instance,
            ours.error_messages()
        );
    }
}

mod keywords {
    use super::*;

    #[test]
    fn types() {
        agree(
            json!({ "type": ["string", "null"] }),
            &[json!("a"), json!(null), json!(1), json!({}), json!([])],
        );
        agree(
            json!({ "type": "integer" }),
            &[json!(1), json!(-7), json!(1.5), json!("1"), json!(true)],
        );
        agree(
            json!({ "type": "number" }),
            &[json!(1), json!(1.5), json!("1.5"), json!(null)],
        );
    }

    #[test]
    fn strings() {
        agree(
            json!({ "type": "string", "minLength": 2, "maxLength": 4, "pattern": "^[a-zé]+$" }),
            &[json!("ab"), json!("a"), json!("abcde"), json!("éé"), json!("AB"), json!(12)],
        );
    }

    #[test]
    fn numbers() {
        agree(
            json!({ "minimum": 1, "maximum": 10, "exclusiveMaximum": true }),
            &[json!(1), json!(0), json!(9.5), json!(10), json!("11")],
        );
        agree(
            json!({ "multipleOf": 3 }),
            &[json!(9), json!(10), json!(0), json!(-6)],
        );
    }

    #[test]
    fn enums() {
        agree(
            json!({ "enum": ["red", 1, { "a": [1, 2] }, null] }),
            &[json!("red"), json!("blue"), json!(1), json!({ "a": [1, 2] }), json!({ "a": [2, 1] }), json!(null)],
        );
    }

    #[test]
    fn objects() {
        agree(
            json!({
                "type": "object",
                "required": ["id"],
                "properties": { "id": { "type": "integer" }, "name": { "type": "string" } },
                "patternProperties": { "^x-": { "type": "boolean" } },
                "additionalProperties": false,
                "minProperties": 1,
                "maxProperties": 3
            }),
            &[
                json!({ "id": 1 }),
                json!({ "id": 1, "name": "rex", "x-a": true }),
                json!({ "id": 1, "x-a": "yes" }),
                json!({ "id": 1, "other": 2 }),
                json!({ "name": "rex" }),
                json!({ "id": 1, "name": "a", "x-a": true, "x-b": false }),
                json!({}),
            ],
        );
        agree(
            json!({ "additionalProperties": { "type": "string" } }),
            &[json!({ "a": "x" }), json!({ "a": 1 }), json!([1])],
        );
    }

    #[test]
    fn arrays() {
        agree(
            json!({ "items": { "type": "integer" }, "minItems": 1, "maxItems": 3, "uniqueItems": true }),
            &[json!([1]), json!([]), json!([1, 2, 3, 4]), json!([1, 1]), json!([1, "a"]), json!("x")],
        );
        agree(
            json!({ "items": [{ "type": "string" }, { "type": "integer" }], "additionalItems": false }),
            &[json!(["a", 1]), json!(["a"]), json!(["a", 1, 2]), json!([1, "a"])],
        );
        agree(
            json!({ "items": [{ "type": "string" }], "additionalItems": { "type": "boolean" } }),
            &[json!(["a", true, false]), json!(["a", 1])],
        );
    }

    #[test]
    fn dependencies() {
        agree(
            json!({
                "dependencies": {
                    "card": ["billing"],
                    "bank": { "required": ["routing"] }
                }
            }),
            &[
                json!({}),
                json!({ "card": 1, "billing": 2 }),
                json!({ "card": 1 }),
                json!({ "bank": 1, "routing": 2 }),
                json!({ "bank": 1 }),
            ],
        );
    }
}

mod composition {
    use super::*;

    #[test]
    fn all_any_one_not() {
        agree(
            json!({ "allOf": [{ "type": "integer" }, { "minimum": 2 }] }),
            &[json!(3), json!(1), json!("3")],
        );
        agree(
            json!({ "anyOf": [{ "type": "string" }, { "minimum": 2 }] }),
            &[json!("a"), json!(3), json!(1)],
        );
        agree(
            json!({ "oneOf": [{ "type": "integer" }, { "minimum": 2 }] }),
            &[json!(1), json!(3), json!(2.5), json!(1.5)],
        );
        agree(
            json!({ "not": { "type": "string" } }),
            &[json!(1), json!("a"), json!(null)],
        );
    }

    #[test]
    fn nested_composition() {
        agree(
            json!({
                "oneOf": [
                    { "type": "object", "required": ["cat"] },
                    { "type": "object", "required": ["dog"], "not": { "required": ["cat"] } }
                ]
            }),
            &[json!({ "cat": 1 }), json!({ "dog": 1 }), json!({ "cat": 1, "dog": 1 }), json!({})],
        );
    }
}

mod references {
    use super::*;

    #[test]
    fn definitions_and_recursion() {
        agree(
            json!({
                "definitions": {
                    "tree": {
                        "type": "object",
                        "required": ["value"],
                        "properties": {
                            "value": { "type": "integer" },
                            "children": { "type": "array", "items": { "$ref": "#/definitions/tree" } }
                        }
                    }
                },
                "$ref": "#/definitions/tree"
            }),
            &[
                json!({ "value": 1 }),
                json!({ "value": 1, "children": [{ "value": 2, "children": [] }] }),
                json!({ "value": 1, "children": [{ "children": [] }] }),
                json!({ "value": 1, "children": [{ "value": "x" }] }),
            ],
        );
    }

    #[test]
    fn escaped_pointer_segments() {
        agree(
            json!({
                "definitions": { "a/b": { "type": "string" }, "c~d": { "type": "integer" } },
                "properties": {
                    "slash": { "$ref": "#/definitions/a~1b" },
                    "tilde": { "$ref": "#/definitions/c~0d" }
                }
            }),
            &[
                json!({ "slash": "x", "tilde": 1 }),
                json!({ "slash": 1 }),
                json!({ "tilde": "x" }),
            ],
        );
    }
}

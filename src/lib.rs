//! Swagger 2.0 Validation
//!
//! Validates JSON values against JSON-Schema draft 4 schemas with the Swagger
//! 2.0 additions, and validates whole Swagger 2.0 documents for internal
//! consistency.
//!
//! # Validating a value
//!
//! ```
//! use swagger_validate::{validate_against_schema, Formats, ValidatorOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer", "minimum": 0 }
//!     }
//! });
//!
//! let result = validate_against_schema(
//!     &schema,
//!     &json!({"age": -1}),
//!     &Formats::default(),
//!     &ValidatorOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     result.error_messages(),
//!     vec![
//!         ".name in body is required",
//!         "age in body should be greater than or equal to 0",
//!     ]
//! );
//! ```
//!
//! # Validating a document
//!
//! ```
//! use swagger_validate::{Formats, SpecValidator, ValidatorOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "swagger": "2.0",
//!     "info": { "title": "pets", "version": "1.0" },
//!     "paths": {
//!         "/pets": { "get": { "operationId": "listPets", "responses": { "200": { "description": "ok" } } } },
//!         "/dogs": { "get": { "operationId": "listPets", "responses": { "200": { "description": "ok" } } } }
//!     }
//! });
//!
//! let formats = Formats::default();
//! let (errors, _warnings) = SpecValidator::new(&formats, ValidatorOptions::default()).validate(&doc);
//! assert_eq!(errors.error_messages(), vec!["\"listPets\" is defined 2 times"]);
//! ```
//!
//! # Message Vocabulary
//!
//! Diagnostics are plain strings with stable shapes, for example:
//!
//! | Finding | Message |
//! |---------|---------|
//! | Missing property | `pet.name in body is required` |
//! | Bound | `age in body should be less than or equal to 10` |
//! | Composition | `"" must validate one and only one schema (oneOf). Found none valid` |
//! | Document | `path /pets/{id} overlaps with /pets/{name}` |

mod composition;
mod defaults;
mod document;
mod error;
mod formats;
mod loader;
mod messages;
mod meta;
mod object;
mod primitives;
mod resolver;
mod result;
mod schema;
mod simple;
mod spec;
mod types;
mod validator;
mod values;

pub use defaults::ValueKind;
pub use document::{
    collect_refs, Document, Header, Operation, OperationEntry, Parameter, PathItem, Paths,
    RefSite, Response, Responses,
};
pub use error::{LoadError, RefError, SchemaError, ValidateError};
pub use formats::{FormatRegistry, Formats};
pub use loader::{is_url, load_document, load_document_auto, load_document_str, load_yaml_str};
pub use messages::{Boundary, Violation};
pub use meta::{swagger_schema, validate_document_shape};
pub use resolver::{navigate_pointer, LocalRefResolver, RefResolver};
pub use result::{Defaulter, ValidationResult};
pub use schema::{CommonValidations, Dependency, Schema, SchemaOrArray, SchemaOrBool, SimpleSchema, TypeSet};
pub use simple::{HeaderValidator, ItemsValidator, ParamValidator};
pub use spec::{extract_path_params, strip_path_params, validate_spec, DocumentMessage, SpecValidator};
pub use types::{Direction, ValidatorOptions};
pub use validator::{validate_against_schema, SchemaValidator, ValidationContext};

#[cfg(feature = "remote")]
pub use loader::load_document_url;

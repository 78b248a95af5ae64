//! The Swagger 2.0 meta-schema, compiled once per process.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::debug;

use crate::error::ValidateError;
use crate::formats::FormatRegistry;
use crate::result::ValidationResult;
use crate::schema::Schema;
use crate::types::ValidatorOptions;
use crate::validator::{SchemaValidator, ValidationContext};

const SWAGGER_SCHEMA: &str = include_str!("../schemas/swagger-2.0.json");

static SWAGGER_VALIDATOR: OnceLock<Result<SchemaValidator, String>> = OnceLock::new();

/// The raw meta-schema document.
pub fn swagger_schema() -> Result<Value, ValidateError> {
    serde_json::from_str(SWAGGER_SCHEMA).map_err(|e| ValidateError::InvalidSchema {
        message: format!("embedded Swagger 2.0 schema: {}", e),
    })
}

fn compile() -> Result<SchemaValidator, String> {
    debug!("compiling Swagger 2.0 meta-schema");
    let raw = swagger_schema().map_err(|e| e.to_string())?;
    let schema = Schema::from_value(&raw).map_err(|e| e.to_string())?;
    // The meta-schema is plain draft 4.
    let options = ValidatorOptions::new().swagger_dialect(false);
    Ok(SchemaValidator::new(&schema, Arc::new(raw), options))
}

/// The compiled meta-schema validator, shared by every document validation.
pub fn swagger_validator() -> Result<&'static SchemaValidator, ValidateError> {
    SWAGGER_VALIDATOR
        .get_or_init(compile)
        .as_ref()
        .map_err(|message| ValidateError::InvalidSchema {
            message: message.clone(),
        })
}

/// Check a raw document against the meta-schema.
///
/// Findings carry no location, so a missing top-level field reads
/// `.info is required`.
pub fn validate_document_shape(
    document: &Value,
    formats: &dyn FormatRegistry,
) -> Result<ValidationResult, ValidateError> {
    let validator = swagger_validator()?;
    let ctx = ValidationContext::new(formats).with_location("");
    Ok(validator.validate(document, &ctx))
}

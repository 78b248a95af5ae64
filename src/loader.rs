//! Document loading from files, strings and HTTP URLs.
//!
//! Documents may be JSON or YAML. YAML is converted to the JSON data model
//! with every mapping key rendered as a string, so `200:` under `responses`
//! becomes the key `"200"`.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn is_yaml_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

/// Load a document from a file path.
///
/// `.yaml` and `.yml` files are read as YAML, anything else as JSON with a
/// YAML fallback.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist, or a parse
/// error if the content is neither JSON nor YAML.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml_name(&path.to_string_lossy()) {
        load_yaml_str(&content)
    } else {
        load_document_str(&content)
    }
}

/// Load a document from a string, JSON first and YAML second.
///
/// The YAML reading is only kept when it yields a mapping or a sequence;
/// otherwise the JSON error is reported.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` or `LoadError::InvalidYaml`.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    let json_err = match serde_json::from_str(content) {
        Ok(value) => return Ok(value),
        Err(source) => source,
    };
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Err(LoadError::InvalidJson { source: json_err });
    }
    match load_yaml_str(content)? {
        value @ (Value::Object(_) | Value::Array(_)) => Ok(value),
        _ => Err(LoadError::InvalidJson { source: json_err }),
    }
}

/// Load a YAML document.
///
/// # Errors
///
/// Returns `LoadError::InvalidYaml` if the content isn't valid YAML.
pub fn load_yaml_str(content: &str) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })?;
    Ok(yaml_to_json(yaml))
}

fn yaml_to_json(yaml: serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match yaml_to_json(key) {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default). URLs ending in
/// `.yaml`/`.yml`, or served with a YAML content type, are read as YAML.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or a parse error
/// if the body is neither JSON nor YAML.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let response = client.get(url).send().map_err(network_error)?;

    // Check for HTTP errors before parsing
    let response = response.error_for_status().map_err(network_error)?;

    let yaml_content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("yaml"));

    let body = response.text().map_err(network_error)?;
    if yaml_content_type || is_yaml_name(url.split(['?', '#']).next().unwrap_or(url)) {
        load_yaml_str(&body)
    } else {
        load_document_str(&body)
    }
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from either a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn load_document_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"swagger": "2.0"}}"#).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc["swagger"], "2.0");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/swagger.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{not valid json").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_yaml_by_extension() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "swagger: '2.0'\npaths:\n  /pets:\n    get:\n      responses:\n        200:\n          description: ok").unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc["swagger"], "2.0");
        assert_eq!(
            doc["paths"]["/pets"]["get"]["responses"]["200"]["description"],
            "ok"
        );
    }

    #[test]
    fn load_document_invalid_yaml() {
        let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "swagger: [unclosed").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(LoadError::InvalidYaml { .. })));
    }

    #[test]
    fn load_document_str_json_then_yaml() {
        let doc = load_document_str(r#"{"swagger": "2.0"}"#).unwrap();
        assert_eq!(doc["swagger"], "2.0");

        let doc = load_document_str("swagger: '2.0'\nbasePath: /v1\n").unwrap();
        assert_eq!(doc, json!({"swagger": "2.0", "basePath": "/v1"}));
    }

    #[test]
    fn load_document_str_rejects_scalars() {
        let result = load_document_str("not a document");
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn yaml_scalars_convert() {
        let doc = load_yaml_str("a: 1\nb: 2.5\nc: true\nd: ~\n3: x\n").unwrap();
        assert_eq!(doc, json!({"a": 1, "b": 2.5, "c": true, "d": null, "3": "x"}));
    }

    #[test]
    fn is_url_https() {
        assert!(is_url("https://example.com/swagger.json"));
    }

    #[test]
    fn is_url_http() {
        assert!(is_url("http://example.com/swagger.json"));
    }

    #[test]
    fn is_url_file_path() {
        assert!(!is_url("/path/to/swagger.json"));
        assert!(!is_url("./swagger.json"));
        assert!(!is_url("swagger.json"));
    }

    #[test]
    fn load_document_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"swagger": "2.0"}}"#).unwrap();

        let doc = load_document_auto(file.path().to_str().unwrap()).unwrap();
        assert_eq!(doc["swagger"], "2.0");
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_document_url_json() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/swagger.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"swagger": "2.0"}"#)
                .create();

            let doc = load_document_url(&format!("{}/swagger.json", server.url())).unwrap();
            assert_eq!(doc["swagger"], "2.0");
            mock.assert();
        }

        #[test]
        fn load_document_url_yaml() {
            let mut server = mockito::Server::new();
            server
                .mock("GET", "/swagger.yaml")
                .with_status(200)
                .with_header("content-type", "text/plain")
                .with_body("swagger: '2.0'\n")
                .create();

            let doc = load_document_url(&format!("{}/swagger.yaml", server.url())).unwrap();
            assert_eq!(doc["swagger"], "2.0");
        }

        #[test]
        fn load_document_url_404() {
            let mut server = mockito::Server::new();
            server.mock("GET", "/missing.json").with_status(404).create();

            let result = load_document_url(&format!("{}/missing.json", server.url()));
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }

        #[test]
        fn load_document_auto_url() {
            let mut server = mockito::Server::new();
            server
                .mock("GET", "/swagger.json")
                .with_status(200)
                .with_body(r#"{"swagger": "2.0"}"#)
                .create();

            let result = load_document_auto(&format!("{}/swagger.json", server.url()));
            assert!(result.is_ok());
        }
    }
}

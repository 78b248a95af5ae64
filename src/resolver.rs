//! `$ref` resolution.
//!
//! Only same-document references are followed: a `$ref` is a JSON pointer
//! fragment (`#/definitions/Pet`) into the document the schema came from.

use std::sync::Arc;

use serde_json::Value;

use crate::error::RefError;

/// Resolves a `$ref` string to the schema node it names.
///
/// Resolvers are shared by every validator compiled from the same root, so
/// they must be usable from several threads at once.
pub trait RefResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<Value, RefError>;
}

/// Resolver over a single in-memory document.
#[derive(Debug, Clone)]
pub struct LocalRefResolver {
    root: Arc<Value>,
}

impl LocalRefResolver {
    pub fn new(root: Arc<Value>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

impl RefResolver for LocalRefResolver {
    fn resolve(&self, reference: &str) -> Result<Value, RefError> {
        navigate_pointer(&self.root, reference).cloned()
    }
}

/// Follow a `#/a/b` fragment into `document`.
///
/// Pointer segments are unescaped (`~1` is `/`, `~0` is `~`). Array segments
/// are decimal indices. Anything not starting with `#` is unsupported.
pub fn navigate_pointer<'a>(document: &'a Value, reference: &str) -> Result<&'a Value, RefError> {
    let Some(fragment) = reference.strip_prefix('#') else {
        return Err(RefError::Unsupported {
            reference: reference.to_string(),
        });
    };
    let path = fragment.trim_start_matches('/');
    if path.is_empty() {
        return Ok(document);
    }

    let mut current = document;
    for part in path.split('/') {
        let key = part.replace("~1", "/").replace("~0", "~");
        let next = match current {
            Value::Object(map) => map.get(&key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| RefError::MissingKey {
            reference: reference.to_string(),
            key: key.clone(),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn navigates_definitions() {
        let doc = json!({"definitions": {"Pet": {"type": "object"}}});
        let pet = navigate_pointer(&doc, "#/definitions/Pet").unwrap();
        assert_eq!(pet, &json!({"type": "object"}));
    }

    #[test]
    fn unescapes_path_segments() {
        let doc = json!({"paths": {"/pets/{id}": {"get": {"parameters": [{"name": "id"}]}}}});
        let param = navigate_pointer(&doc, "#/paths/~1pets~1{id}/get/parameters/0").unwrap();
        assert_eq!(param["name"], "id");
    }

    #[test]
    fn root_fragment_is_document() {
        let doc = json!({"type": "string"});
        assert_eq!(navigate_pointer(&doc, "#").unwrap(), &doc);
    }

    #[test]
    fn reports_missing_key() {
        let doc = json!({"definitions": {}});
        let err = navigate_pointer(&doc, "#/definitions/Pett").unwrap_err();
        assert_eq!(
            err,
            RefError::MissingKey {
                reference: "#/definitions/Pett".into(),
                key: "Pett".into()
            }
        );
    }

    #[test]
    fn rejects_remote_refs() {
        let resolver = LocalRefResolver::new(Arc::new(json!({})));
        let err = resolver.resolve("pet.json#/Pet").unwrap_err();
        assert!(matches!(err, RefError::Unsupported { .. }));
    }
}

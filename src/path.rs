//! Dot-path key updates: resolve "a.b.0.c" style paths to scalars and
//! rewrite them in place.

use crate::error::{Error, Result};
use crate::scalar::{coerce, typed_value};
use crate::value::Value;
use crate::yaml::{Document, Node, Scalar};
use serde::Serialize;

/// One applied update, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    /// The dot path of the updated scalar.
    pub key: String,
    /// The value before the update.
    pub old: Value,
    /// The value after the update.
    pub new: Value,
}

/// Resolve a dot path to the scalar it addresses.
///
/// Mapping nodes consume a segment as a key, sequence nodes as a zero-based
/// integer index. The path must land on a scalar.
pub(crate) fn resolve(root: &Node, path: &str) -> Result<Scalar> {
    let mut current = root.clone();
    for segment in path.split('.') {
        current = step(&current, segment, path)?;
    }
    match current {
        Node::Scalar(scalar) => Ok(scalar),
        _ => Err(Error::TypeMismatch {
            path: path.to_string(),
        }),
    }
}

fn step(node: &Node, segment: &str, path: &str) -> Result<Node> {
    match node {
        Node::Mapping(map) => map.get(segment).ok_or_else(|| Error::KeyNotFound {
            key: segment.to_string(),
            path: path.to_string(),
        }),
        Node::Sequence(seq) => {
            let index: usize = segment.parse().map_err(|_| Error::InvalidIndex {
                segment: segment.to_string(),
                path: path.to_string(),
            })?;
            seq.get(index).ok_or_else(|| Error::IndexOutOfRange {
                index,
                path: path.to_string(),
            })
        }
        Node::Scalar(_) => Err(Error::CannotTraverseScalar {
            segment: segment.to_string(),
            path: path.to_string(),
        }),
    }
}

/// Apply a batch of `(path, new value)` updates to a document.
///
/// All paths are resolved before any scalar is touched, so a bad path leaves
/// the document unmodified. Updates whose target already holds the new value
/// are skipped and do not appear in the returned changes.
pub fn update_keys(doc: &Document, updates: &[(String, String)]) -> Result<Vec<Change>> {
    let Some(root) = doc.body() else {
        // An empty file cannot satisfy any path.
        return match updates.first() {
            Some((path, _)) => {
                let key = path.split('.').next().unwrap_or(path).to_string();
                Err(Error::KeyNotFound {
                    key,
                    path: path.clone(),
                })
            }
            None => Ok(Vec::new()),
        };
    };

    let mut resolved = Vec::with_capacity(updates.len());
    for (path, new_text) in updates {
        let scalar = resolve(&root, path)?;
        let coerced = coerce(new_text, scalar.kind());
        resolved.push((path, scalar, coerced));
    }

    let mut changes = Vec::new();
    for (path, mut scalar, coerced) in resolved {
        let old_text = scalar.value();
        if old_text == coerced.text {
            continue;
        }
        let old = typed_value(scalar.kind(), &old_text);
        scalar.set_value(&coerced.text, coerced.kind);
        changes.push(Change {
            key: path.clone(),
            old,
            new: coerced.value,
        });
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_update_nested_key() {
        let doc = Document::parse("app:\n  image:\n    tag: v1.0.0\n").unwrap();
        let changes = update_keys(&doc, &updates(&[("app.image.tag", "v2.0.0")])).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, "app.image.tag");
        assert_eq!(changes[0].old, Value::String("v1.0.0".into()));
        assert_eq!(changes[0].new, Value::String("v2.0.0".into()));
        assert_eq!(doc.dump(), "app:\n  image:\n    tag: v2.0.0\n");
    }

    #[test]
    fn test_integer_preserved() {
        let doc = Document::parse("replicas: 3\n").unwrap();
        let changes = update_keys(&doc, &updates(&[("replicas", "5")])).unwrap();
        assert_eq!(changes[0].old, Value::Int(3));
        assert_eq!(changes[0].new, Value::Int(5));
        assert_eq!(doc.dump(), "replicas: 5\n");
    }

    #[test]
    fn test_coercion_falls_back_to_string() {
        let doc = Document::parse("port: 8080\n").unwrap();
        let changes = update_keys(&doc, &updates(&[("port", "not-a-number")])).unwrap();
        assert_eq!(changes[0].new, Value::String("not-a-number".into()));
        assert_eq!(doc.dump(), "port: not-a-number\n");
    }

    #[test]
    fn test_sequence_index() {
        let doc = Document::parse("servers:\n  - host: a\n  - host: b\n").unwrap();
        update_keys(&doc, &updates(&[("servers.1.host", "c")])).unwrap();
        assert_eq!(doc.dump(), "servers:\n  - host: a\n  - host: c\n");
    }

    #[test]
    fn test_idempotent_update_reports_nothing() {
        let doc = Document::parse("tag: v1\n").unwrap();
        let changes = update_keys(&doc, &updates(&[("tag", "v1")])).unwrap();
        assert!(changes.is_empty());
        assert_eq!(doc.dump(), "tag: v1\n");
    }

    #[test]
    fn test_key_not_found() {
        let doc = Document::parse("a:\n  b: 1\n").unwrap();
        let err = update_keys(&doc, &updates(&[("a.missing", "2")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key 'missing' not found in path 'a.missing'"
        );
    }

    #[test]
    fn test_failed_batch_leaves_document_unmodified() {
        let doc = Document::parse("a: 1\nb: 2\n").unwrap();
        let err = update_keys(&doc, &updates(&[("a", "10"), ("missing", "x")])).unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { .. }));
        assert_eq!(doc.dump(), "a: 1\nb: 2\n");
    }

    #[test]
    fn test_invalid_index() {
        let doc = Document::parse("items:\n  - a\n").unwrap();
        let err = update_keys(&doc, &updates(&[("items.first", "b")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected integer index for list, got 'first' in path 'items.first'"
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let doc = Document::parse("items:\n  - a\n").unwrap();
        let err = update_keys(&doc, &updates(&[("items.3", "b")])).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, .. }));
    }

    #[test]
    fn test_cannot_traverse_scalar() {
        let doc = Document::parse("a: 1\n").unwrap();
        let err = update_keys(&doc, &updates(&[("a.b", "2")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot traverse into scalar at 'b' in path 'a.b'"
        );
    }

    #[test]
    fn test_path_to_collection_rejected() {
        let doc = Document::parse("a:\n  b: 1\n").unwrap();
        let err = update_keys(&doc, &updates(&[("a", "x")])).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_fill_null_value() {
        let doc = Document::parse("tag:\n").unwrap();
        let changes = update_keys(&doc, &updates(&[("tag", "v1")])).unwrap();
        assert_eq!(changes[0].old, Value::Null);
        assert_eq!(changes[0].new, Value::String("v1".into()));
        assert_eq!(doc.dump(), "tag: v1\n");
    }
}

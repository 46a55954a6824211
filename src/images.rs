//! Container image tag updates for Helm values and Kustomize files.
//!
//! Instead of addressing tags by path, this walks the whole document looking
//! for the mapping shapes those tools use to describe an image.

use crate::path::Change;
use crate::scalar::{coerce, typed_value};
use crate::yaml::{Document, Mapping, Node};
use tracing::debug;

/// A mapping shape that names an image and its tag.
#[derive(Debug, Clone, Copy)]
pub struct ImagePattern {
    /// Key holding the image name or repository.
    pub name_key: &'static str,
    /// Key holding the tag, updated on a match.
    pub tag_key: &'static str,
}

/// Recognized image shapes: Helm values ("repository"/"tag") and Kustomize
/// image overrides ("name"/"newTag").
pub const IMAGE_PATTERNS: &[ImagePattern] = &[
    ImagePattern {
        name_key: "repository",
        tag_key: "tag",
    },
    ImagePattern {
        name_key: "name",
        tag_key: "newTag",
    },
];

/// Update the tag of every image mapping matching `image_name`.
///
/// The name matches on equality, or when the value in the file ends with
/// `/<image_name>` so a registry-qualified repository still matches a bare
/// name. A document without any match simply reports no changes.
pub fn update_image_tags(doc: &Document, image_name: &str, new_tag: &str) -> Vec<Change> {
    let mut changes = Vec::new();
    if let Some(root) = doc.body() {
        walk(&root, String::new(), image_name, new_tag, &mut changes);
    }
    changes
}

fn walk(node: &Node, path: String, image_name: &str, new_tag: &str, changes: &mut Vec<Change>) {
    match node {
        Node::Mapping(map) => {
            apply_patterns(map, &path, image_name, new_tag, changes);
            for entry in map.entries() {
                if let (Some(key), Some(value)) = (entry.key_text(), entry.value()) {
                    walk(&value, join(&path, &key), image_name, new_tag, changes);
                }
            }
        }
        Node::Sequence(seq) => {
            for (index, item) in seq.items().enumerate() {
                walk(
                    &item,
                    join(&path, &index.to_string()),
                    image_name,
                    new_tag,
                    changes,
                );
            }
        }
        Node::Scalar(_) => {}
    }
}

fn apply_patterns(
    map: &Mapping,
    path: &str,
    image_name: &str,
    new_tag: &str,
    changes: &mut Vec<Change>,
) {
    for pattern in IMAGE_PATTERNS {
        let Some(Node::Scalar(name)) = map.get(pattern.name_key) else {
            continue;
        };
        if !name_matches(&name.value(), image_name) {
            continue;
        }
        let Some(Node::Scalar(mut tag)) = map.get(pattern.tag_key) else {
            continue;
        };
        let coerced = coerce(new_tag, tag.kind());
        let old_text = tag.value();
        if old_text == coerced.text {
            continue;
        }
        let key = join(path, pattern.tag_key);
        debug!(%key, old = %old_text, new = %coerced.text, "updating image tag");
        let old = typed_value(tag.kind(), &old_text);
        tag.set_value(&coerced.text, coerced.kind);
        changes.push(Change {
            key,
            old,
            new: coerced.value,
        });
    }
}

fn name_matches(candidate: &str, image_name: &str) -> bool {
    candidate == image_name || candidate.ends_with(&format!("/{image_name}"))
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

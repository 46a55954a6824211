//! Format-preserving updates for YAML files.
//!
//! This crate parses YAML into a lossless syntax tree, rewrites individual
//! scalar values in place, and serializes the tree back out. Comments,
//! indentation, quoting styles, blank lines and key order all survive a
//! round trip untouched; only the updated scalars change.
//!
//! Two update operations are provided:
//!
//! * [`update_keys`] addresses scalars by dot path ("app.image.tag",
//!   "servers.0.host") and rewrites them, coercing the incoming text to the
//!   type already in the file.
//! * [`update_image_tags`] walks the whole document for the image mappings
//!   Helm and Kustomize use and bumps the tag wherever the image name
//!   matches.
//!
//! # Example
//!
//! ```
//! use yaml_bump::{update_keys, Document};
//!
//! let doc = Document::parse("app:\n  replicas: 3  # keep in sync\n").unwrap();
//! let changes = update_keys(
//!     &doc,
//!     &[("app.replicas".to_string(), "5".to_string())],
//! ).unwrap();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(doc.dump(), "app:\n  replicas: 5  # keep in sync\n");
//! ```

#![deny(missing_docs)]

mod config;
mod diff;
mod error;
mod images;
mod indent;
mod lex;
mod parse;
mod path;
mod scalar;
mod value;
mod yaml;

pub use crate::config::{Config, Mode, OutputFormat};
pub use crate::diff::diff;
pub use crate::error::{Error, Result};
pub use crate::images::{update_image_tags, ImagePattern, IMAGE_PATTERNS};
pub use crate::indent::{detect_indent, DEFAULT_INDENT};
pub use crate::lex::SyntaxKind;
pub use crate::parse::Parse;
pub use crate::path::{update_keys, Change};
pub use crate::scalar::{coerce, infer_kind, typed_value, Coerced, ScalarKind, ScalarStyle};
pub use crate::value::Value;
pub use crate::yaml::{
    Document, Lang, Mapping, MappingEntry, Node, Scalar, Sequence, SequenceEntry, Yaml,
};

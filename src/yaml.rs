//! Lossless YAML tree: typed wrappers over the rowan syntax tree, plus the
//! [`Document`] owner type used by the update operations.

use crate::error::{Error, Result};
use crate::indent::detect_indent;
use crate::lex::SyntaxKind;
use crate::parse::Parse;
use crate::scalar::{infer_kind, render_in_style, unquote, ScalarKind, ScalarStyle};
use rowan::ast::AstNode;
use rowan::GreenNodeBuilder;
use std::path::Path;
use std::str::FromStr;

/// YAML language type for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lang {}

impl rowan::Language for Lang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub(crate) type SyntaxNode = rowan::SyntaxNode<Lang>;
pub(crate) type SyntaxToken = rowan::SyntaxToken<Lang>;

/// A macro to create AST node wrappers.
macro_rules! ast_node {
    ($ast:ident, $kind:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $ast(SyntaxNode);

        impl std::fmt::Debug for $ast {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ast))
                    .field("syntax", &self.0)
                    .finish()
            }
        }

        impl AstNode for $ast {
            type Language = Lang;

            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self(syntax))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }

        impl From<SyntaxNode> for $ast {
            fn from(node: SyntaxNode) -> Self {
                $ast(node)
            }
        }

        impl std::fmt::Display for $ast {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.text())
            }
        }
    };
}

ast_node!(Yaml, ROOT, "The root of a parsed YAML file");
ast_node!(Mapping, MAPPING, "A YAML mapping (key-value pairs)");
ast_node!(MappingEntry, MAPPING_ENTRY, "A key-value pair in a mapping");
ast_node!(Sequence, SEQUENCE, "A YAML sequence (list)");
ast_node!(SequenceEntry, SEQUENCE_ENTRY, "An item in a sequence");
ast_node!(Scalar, SCALAR, "A YAML scalar value");

/// A node of the document tree: mapping, sequence, or scalar.
///
/// Traversal code matches exhaustively on this, so a new node kind cannot be
/// silently ignored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A mapping node
    Mapping(Mapping),
    /// A sequence node
    Sequence(Sequence),
    /// A scalar node
    Scalar(Scalar),
}

impl Node {
    /// Wrap a raw syntax node, if it is a mapping, sequence or scalar.
    pub fn cast(syntax: SyntaxNode) -> Option<Node> {
        match syntax.kind() {
            SyntaxKind::MAPPING => Some(Node::Mapping(Mapping(syntax))),
            SyntaxKind::SEQUENCE => Some(Node::Sequence(Sequence(syntax))),
            SyntaxKind::SCALAR => Some(Node::Scalar(Scalar(syntax))),
            _ => None,
        }
    }

    /// The underlying syntax node.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Node::Mapping(m) => m.syntax(),
            Node::Sequence(s) => s.syntax(),
            Node::Scalar(s) => s.syntax(),
        }
    }

    /// This node as a scalar, if it is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl Yaml {
    /// Parse YAML text into a lossless tree.
    pub fn parse(text: &str) -> Parse {
        Parse::parse_text(text)
    }

    /// The body of the first document: the top-level mapping, sequence or
    /// scalar. `None` for empty or comment-only files.
    pub fn body(&self) -> Option<Node> {
        self.0.children().find_map(Node::cast)
    }
}

impl FromStr for Yaml {
    type Err = Error;

    fn from_str(s: &str) -> Result<Yaml> {
        Yaml::parse(s).to_result()
    }
}

impl Mapping {
    /// The entries of this mapping, in document order.
    pub fn entries(&self) -> impl Iterator<Item = MappingEntry> {
        self.0.children().filter_map(MappingEntry::cast)
    }

    /// Look up a value by key text. First match wins; duplicate keys are not
    /// a contract this crate defines.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.entries()
            .find(|entry| entry.key_text().as_deref() == Some(key))
            .and_then(|entry| entry.value())
    }

    /// The key texts of this mapping, in document order.
    pub fn keys(&self) -> impl Iterator<Item = String> {
        self.entries().filter_map(|entry| entry.key_text())
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries()
            .any(|entry| entry.key_text().as_deref() == Some(key))
    }
}

impl MappingEntry {
    /// The key scalar of this entry.
    pub fn key(&self) -> Option<Scalar> {
        // The key is the scalar preceding the colon.
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(token) if token.kind() == SyntaxKind::COLON => {
                    return None
                }
                rowan::NodeOrToken::Node(node) => return Scalar::cast(node),
                _ => {}
            }
        }
        None
    }

    /// The unquoted key text.
    pub fn key_text(&self) -> Option<String> {
        self.key().map(|scalar| scalar.value())
    }

    /// The value node of this entry. An entry with a null value carries an
    /// empty scalar node; a colon-less flow entry like `{key}` carries the
    /// empty scalar right after its key.
    pub fn value(&self) -> Option<Node> {
        let mut past_key = false;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(token) if token.kind() == SyntaxKind::COLON => {
                    past_key = true;
                }
                rowan::NodeOrToken::Node(node) => {
                    if past_key {
                        if let Some(node) = Node::cast(node) {
                            return Some(node);
                        }
                    } else {
                        past_key = true;
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl Sequence {
    /// The entries of this sequence, in document order.
    pub fn entries(&self) -> impl Iterator<Item = SequenceEntry> {
        self.0.children().filter_map(SequenceEntry::cast)
    }

    /// The item nodes of this sequence, in document order.
    pub fn items(&self) -> impl Iterator<Item = Node> {
        self.entries().filter_map(|entry| entry.value())
    }

    /// Look up an item by position.
    pub fn get(&self, index: usize) -> Option<Node> {
        self.items().nth(index)
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items().count()
    }

    /// Whether the sequence has no items.
    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }
}

impl SequenceEntry {
    /// The item node of this entry.
    pub fn value(&self) -> Option<Node> {
        self.0.children().find_map(Node::cast)
    }
}

impl Scalar {
    /// The raw text of this scalar, quotes and escapes included.
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }

    /// The scalar's presentation style, from its first content token.
    pub fn style(&self) -> ScalarStyle {
        for token in self.tokens() {
            match token.kind() {
                SyntaxKind::SINGLE_QUOTED => return ScalarStyle::SingleQuoted,
                SyntaxKind::DOUBLE_QUOTED => return ScalarStyle::DoubleQuoted,
                SyntaxKind::BLOCK_HEADER => return ScalarStyle::Block,
                SyntaxKind::PLAIN | SyntaxKind::ALIAS => return ScalarStyle::Plain,
                _ => {}
            }
        }
        ScalarStyle::Plain
    }

    /// The logical string content: quotes stripped, escapes resolved,
    /// block-scalar lines joined. Empty for a null scalar.
    pub fn value(&self) -> String {
        let mut result = String::new();
        let mut block_strip: Option<usize> = None;
        for token in self.tokens() {
            match token.kind() {
                SyntaxKind::PLAIN | SyntaxKind::ALIAS => {
                    if !result.is_empty() {
                        result.push(' ');
                    }
                    result.push_str(token.text());
                }
                SyntaxKind::SINGLE_QUOTED | SyntaxKind::DOUBLE_QUOTED => {
                    if !result.is_empty() {
                        result.push(' ');
                    }
                    result.push_str(&unquote(token.text()).0);
                }
                SyntaxKind::BLOCK_TEXT => {
                    let text = token.text();
                    let strip = *block_strip
                        .get_or_insert_with(|| text.len() - text.trim_start().len());
                    if !result.is_empty() {
                        result.push('\n');
                    }
                    result.push_str(text.get(strip..).unwrap_or(text.trim_start()));
                }
                _ => {}
            }
        }
        result
    }

    /// The inferred primitive kind of this scalar.
    pub fn kind(&self) -> ScalarKind {
        infer_kind(self.style(), &self.value())
    }

    /// Whether this scalar holds no content (a null value).
    pub fn is_null(&self) -> bool {
        self.kind() == ScalarKind::Null
    }

    /// Replace this scalar's content in place, re-rendering `text` in the
    /// scalar's current quoting style. All layout around the scalar is
    /// untouched.
    pub fn set_value(&mut self, text: &str, kind: ScalarKind) {
        let rendered = render_in_style(text, self.style(), kind);
        let token_kind = if rendered.starts_with('\'') {
            SyntaxKind::SINGLE_QUOTED
        } else if rendered.starts_with('"') {
            SyntaxKind::DOUBLE_QUOTED
        } else {
            SyntaxKind::PLAIN
        };

        // A null scalar sits directly against its colon ("key:") or against
        // a trailing comment ("key: # note"), so the replacement must bring
        // its own separating spaces.
        let is_null = self.0.children_with_tokens().next().is_none();
        let space_before = is_null
            && matches!(
                self.0.prev_sibling_or_token(),
                Some(rowan::NodeOrToken::Token(ref token))
                    if token.kind() == SyntaxKind::COLON
            );
        let space_after = is_null
            && matches!(
                self.0.next_sibling_or_token(),
                Some(rowan::NodeOrToken::Token(ref token))
                    if token.kind() == SyntaxKind::COMMENT
            );
        // Block scalars own their line breaks; keep the last one so the
        // following line is not glued onto the new value.
        let trailing_newline = self
            .0
            .last_token()
            .filter(|token| token.kind() == SyntaxKind::NEWLINE)
            .map(|token| token.text().to_string());

        let mut tokens: Vec<(SyntaxKind, String)> = Vec::new();
        if space_before {
            tokens.push((SyntaxKind::WHITESPACE, " ".to_string()));
        }
        tokens.push((token_kind, rendered));
        if space_after {
            tokens.push((SyntaxKind::WHITESPACE, " ".to_string()));
        }
        if let Some(newline) = trailing_newline {
            tokens.push((SyntaxKind::NEWLINE, newline));
        }

        // splice_children detaches the range while walking sibling links, so
        // removing more than one child per call silently leaves the rest in
        // the tree. Drain and insert one child at a time instead.
        let count = self.0.children_with_tokens().count();
        for _ in 0..count {
            self.0.splice_children(0..1, Vec::new());
        }
        for (i, (kind, text)) in tokens.into_iter().enumerate() {
            if let Some(token) = detached_token(kind, &text) {
                self.0.splice_children(i..i, vec![token.into()]);
            }
        }
    }

    fn tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
    }
}

/// Builds a free-standing token by wrapping it in a throwaway root node.
fn detached_token(kind: SyntaxKind, text: &str) -> Option<SyntaxToken> {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::ROOT.into());
    builder.token(kind.into(), text);
    builder.finish_node();
    SyntaxNode::new_root_mut(builder.finish()).first_token()
}

/// One parsed YAML file: the lossless tree plus the indent width detected
/// from the raw text.
///
/// A `Document` is owned by whoever processes the file, mutated in place by
/// the update operations, and discarded after [`Document::dump`].
#[derive(Debug, Clone)]
pub struct Document {
    yaml: Yaml,
    indent: usize,
}

impl Document {
    /// Parse YAML text for format-preserving editing.
    ///
    /// A file holding only comments or blank lines parses successfully into
    /// an empty document; malformed YAML fails with [`Error::Parse`].
    pub fn parse(text: &str) -> Result<Document> {
        let indent = detect_indent(text);
        let yaml = Yaml::parse(text).to_result()?;
        Ok(Document { yaml, indent })
    }

    /// Load a document from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Document> {
        Document::parse(&std::fs::read_to_string(path)?)
    }

    /// Serialize the document. Byte-identical to the parsed input when no
    /// update was applied.
    pub fn dump(&self) -> String {
        self.yaml.to_string()
    }

    /// Write the document back to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.dump())?;
        Ok(())
    }

    /// The root node of the first document body, if any.
    pub fn body(&self) -> Option<Node> {
        self.yaml.body()
    }

    /// The underlying lossless tree.
    pub fn yaml(&self) -> &Yaml {
        &self.yaml
    }

    /// The indent width detected from the source text.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Whether the file held no YAML content at all.
    pub fn is_empty(&self) -> bool {
        self.body().is_none()
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Document> {
        Document::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(text: &str) -> Mapping {
        match Document::parse(text).unwrap().body().unwrap() {
            Node::Mapping(m) => m,
            other => panic!("expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_get() {
        let map = mapping("name: demo\nversion: 1.2\n");
        let Some(Node::Scalar(scalar)) = map.get("name") else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.value(), "demo");
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn test_nested_access() {
        let map = mapping("app:\n  image:\n    tag: v1\n");
        let Some(Node::Mapping(app)) = map.get("app") else {
            panic!()
        };
        let Some(Node::Mapping(image)) = app.get("image") else {
            panic!()
        };
        let Some(Node::Scalar(tag)) = image.get("tag") else {
            panic!()
        };
        assert_eq!(tag.value(), "v1");
        assert_eq!(tag.kind(), ScalarKind::String);
    }

    #[test]
    fn test_sequence_items() {
        let map = mapping("items:\n  - a\n  - b\n  - c\n");
        let Some(Node::Sequence(seq)) = map.get("items") else {
            panic!()
        };
        assert_eq!(seq.len(), 3);
        let Some(Node::Scalar(second)) = seq.get(1) else {
            panic!()
        };
        assert_eq!(second.value(), "b");
    }

    #[test]
    fn test_scalar_kinds() {
        let map = mapping("int: 3\nfloat: 3.5\nbool: true\nstr: v1\nquoted: '3'\nnull_: ~\n");
        let kind = |key: &str| match map.get(key) {
            Some(Node::Scalar(s)) => s.kind(),
            other => panic!("{:?}", other),
        };
        assert_eq!(kind("int"), ScalarKind::Integer);
        assert_eq!(kind("float"), ScalarKind::Float);
        assert_eq!(kind("bool"), ScalarKind::Boolean);
        assert_eq!(kind("str"), ScalarKind::String);
        assert_eq!(kind("quoted"), ScalarKind::String);
        assert_eq!(kind("null_"), ScalarKind::Null);
    }

    #[test]
    fn test_set_value_preserves_layout() {
        let doc = Document::parse("app:\n  replicas: 3  # scale me\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Mapping(app)) = map.get("app") else {
            panic!()
        };
        let Some(Node::Scalar(mut replicas)) = app.get("replicas") else {
            panic!()
        };
        replicas.set_value("5", ScalarKind::Integer);
        assert_eq!(doc.dump(), "app:\n  replicas: 5  # scale me\n");
    }

    #[test]
    fn test_set_value_preserves_quote_style() {
        let doc = Document::parse("tag: \"v1\"\nother: 'x'\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut tag)) = map.get("tag") else {
            panic!()
        };
        tag.set_value("v2", ScalarKind::String);
        let Some(Node::Scalar(mut other)) = map.get("other") else {
            panic!()
        };
        other.set_value("y", ScalarKind::String);
        assert_eq!(doc.dump(), "tag: \"v2\"\nother: 'y'\n");
    }

    #[test]
    fn test_set_value_on_null_adds_space() {
        let doc = Document::parse("tag:\nnext: 1\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut tag)) = map.get("tag") else {
            panic!()
        };
        assert!(tag.is_null());
        tag.set_value("v1", ScalarKind::String);
        assert_eq!(doc.dump(), "tag: v1\nnext: 1\n");
    }

    #[test]
    fn test_set_value_on_block_scalar_keeps_line_break() {
        let doc = Document::parse("cmd: |\n  echo hi\nnext: 1\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut cmd)) = map.get("cmd") else {
            panic!()
        };
        assert_eq!(cmd.value(), "echo hi");
        cmd.set_value("echo bye", ScalarKind::String);
        assert_eq!(doc.dump(), "cmd: echo bye\nnext: 1\n");
    }

    #[test]
    fn test_wrapped_scalar_folds_and_updates() {
        let doc =
            Document::parse("description: some text\n  wrapped continuation\nnext: 1\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut description)) = map.get("description") else {
            panic!()
        };
        assert_eq!(description.value(), "some text wrapped continuation");
        description.set_value("short", ScalarKind::String);
        assert_eq!(doc.dump(), "description: short\nnext: 1\n");
    }

    #[test]
    fn test_set_value_replaces_every_block_line() {
        let doc = Document::parse("script: |\n  one\n  two\n  three\nnext: 1\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut script)) = map.get("script") else {
            panic!()
        };
        script.set_value("gone", ScalarKind::String);
        assert_eq!(doc.dump(), "script: gone\nnext: 1\n");
    }

    #[test]
    fn test_set_value_on_null_before_comment() {
        let doc = Document::parse("tag: # pick one\n").unwrap();
        let Some(Node::Mapping(map)) = doc.body() else {
            panic!()
        };
        let Some(Node::Scalar(mut tag)) = map.get("tag") else {
            panic!()
        };
        tag.set_value("v1", ScalarKind::String);
        assert_eq!(doc.dump(), "tag: v1 # pick one\n");
    }

    #[test]
    fn test_quoted_key_lookup() {
        let map = mapping("\"key\": value\n");
        assert!(map.contains_key("key"));
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("# nothing here\n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.dump(), "# nothing here\n");
    }

    #[test]
    fn test_indent_detection_stored() {
        let doc = Document::parse("a:\n    b: 1\n").unwrap();
        assert_eq!(doc.indent(), 4);
    }
}

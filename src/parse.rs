//! Recursive-descent parser producing a lossless rowan syntax tree.
//!
//! Every token from the lexer is appended to the green tree exactly once and
//! in input order, so the text of the root node is always byte-identical to
//! the parsed input. Structure (mappings, sequences, entries, scalars) is
//! layered on top of the token stream from line indentation.

use crate::lex::{lex, SyntaxKind};
use crate::yaml::Yaml;
use rowan::{GreenNode, GreenNodeBuilder};

/// The result of a parse operation.
///
/// Holds the green tree and any parse errors; the tree is complete and
/// lossless even when errors were recorded.
#[derive(Debug, Clone)]
pub struct Parse {
    green_node: GreenNode,
    errors: Vec<String>,
}

impl Parse {
    /// Parse YAML text.
    pub fn parse_text(text: &str) -> Parse {
        Parser::new(text).parse()
    }

    /// The parse tree, backed by a mutable syntax tree so that scalars can
    /// be edited in place.
    pub fn tree(&self) -> Yaml {
        Yaml::from(rowan::SyntaxNode::new_root_mut(self.green_node.clone()))
    }

    /// Parse errors, if any.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether the parse had any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Convert to a `Result`, failing if there were any errors.
    pub fn to_result(self) -> Result<Yaml, crate::Error> {
        if self.has_errors() {
            Err(crate::Error::Parse(self.errors.join("; ")))
        } else {
            Ok(self.tree())
        }
    }
}

/// A lookahead summary of the next line carrying real content.
#[derive(Debug, Clone, Copy)]
struct ContentLine {
    /// Index of the first token of the line (its INDENT when present).
    line_start: usize,
    /// Index of the first non-indent token.
    token_idx: usize,
    /// Leading whitespace width.
    indent: usize,
    /// Kind of the first non-indent token.
    kind: SyntaxKind,
}

struct Parser {
    tokens: Vec<(SyntaxKind, String)>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<String>,
}

impl Parser {
    fn new(text: &str) -> Self {
        let tokens = lex(text)
            .into_iter()
            .map(|(kind, text)| (kind, text.to_string()))
            .collect();
        Parser {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn kind_at(&self, idx: usize) -> Option<SyntaxKind> {
        self.tokens.get(idx).map(|(kind, _)| *kind)
    }

    fn current(&self) -> Option<SyntaxKind> {
        self.kind_at(self.pos)
    }

    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.kind_at(self.pos + n)
    }

    fn bump(&mut self) {
        let (kind, text) = &self.tokens[self.pos];
        self.builder.token((*kind).into(), text);
        self.pos += 1;
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.current() == Some(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Consume tokens (trivia between structural lines) up to `idx`.
    fn bump_to(&mut self, idx: usize) {
        while self.pos < idx {
            self.bump();
        }
    }

    /// Find the next content-carrying line at or after token index `from`.
    /// Blank and comment-only lines are skipped. Returns `None` at EOF.
    fn peek_content_from(&self, from: usize) -> Option<ContentLine> {
        let mut i = from;
        loop {
            let line_start = i;
            let mut indent = 0;
            if self.kind_at(i) == Some(SyntaxKind::INDENT) {
                indent = self.tokens[i].1.len();
                i += 1;
            }
            match self.kind_at(i)? {
                SyntaxKind::NEWLINE => i += 1,
                SyntaxKind::COMMENT => {
                    i += 1;
                    if self.kind_at(i) == Some(SyntaxKind::NEWLINE) {
                        i += 1;
                    }
                }
                kind => {
                    return Some(ContentLine {
                        line_start,
                        token_idx: i,
                        indent,
                        kind,
                    })
                }
            }
        }
    }

    fn peek_content(&self) -> Option<ContentLine> {
        self.peek_content_from(self.pos)
    }

    /// Whether the line starting at token index `from` contains a mapping
    /// separator colon.
    fn line_has_colon(&self, from: usize) -> bool {
        let mut i = from;
        while let Some(kind) = self.kind_at(i) {
            match kind {
                SyntaxKind::NEWLINE | SyntaxKind::COMMENT => return false,
                SyntaxKind::COLON => return true,
                _ => i += 1,
            }
        }
        false
    }

    fn parse(mut self) -> Parse {
        self.builder.start_node(SyntaxKind::ROOT.into());

        // One body node is expected per document; further content without an
        // intervening document marker is malformed.
        let mut body_allowed = true;
        loop {
            let before = self.pos;
            match self.peek_content() {
                None => {
                    self.bump_to(self.tokens.len());
                    break;
                }
                Some(line) => {
                    self.bump_to(line.line_start);
                    match line.kind {
                        SyntaxKind::DOC_START => {
                            self.eat(SyntaxKind::INDENT);
                            self.bump();
                            self.eat(SyntaxKind::WHITESPACE);
                            self.eat(SyntaxKind::COMMENT);
                            self.eat(SyntaxKind::NEWLINE);
                            body_allowed = true;
                        }
                        SyntaxKind::DOC_END => {
                            self.eat(SyntaxKind::INDENT);
                            self.bump();
                            self.eat(SyntaxKind::WHITESPACE);
                            self.eat(SyntaxKind::COMMENT);
                            self.eat(SyntaxKind::NEWLINE);
                            body_allowed = false;
                        }
                        _ => {
                            if !body_allowed {
                                self.error(format!(
                                    "unexpected content at indent {} after document body",
                                    line.indent
                                ));
                            }
                            self.parse_block_node(line);
                            body_allowed = false;
                        }
                    }
                }
            }
            if self.pos == before {
                // Malformed input the grammar cannot place; consume one token
                // so the loop always advances.
                self.error("unparsable token".to_string());
                self.builder.start_node(SyntaxKind::ERROR.into());
                self.bump();
                self.builder.finish_node();
            }
        }

        self.builder.finish_node();
        Parse {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    /// Parse one block-level node whose first line is `line`. The cursor
    /// must be at that line's start.
    fn parse_block_node(&mut self, line: ContentLine) {
        match line.kind {
            SyntaxKind::DASH => self.parse_block_sequence(line.indent, false),
            SyntaxKind::LEFT_BRACKET | SyntaxKind::LEFT_BRACE => {
                self.eat(SyntaxKind::INDENT);
                if line.kind == SyntaxKind::LEFT_BRACKET {
                    self.parse_flow_sequence();
                } else {
                    self.parse_flow_mapping();
                }
                self.eat(SyntaxKind::WHITESPACE);
                self.eat(SyntaxKind::COMMENT);
                self.eat(SyntaxKind::NEWLINE);
            }
            _ if self.line_has_colon(line.token_idx) => {
                self.parse_block_mapping(line.indent, false)
            }
            _ => self.parse_scalar_block(line.indent),
        }
    }

    /// Parse a block mapping whose entries sit at `indent`. When
    /// `first_inline` is set the cursor is already at the first entry's key
    /// (a mapping starting on a sequence-item line).
    fn parse_block_mapping(&mut self, indent: usize, first_inline: bool) {
        self.builder.start_node(SyntaxKind::MAPPING.into());

        if first_inline {
            self.builder.start_node(SyntaxKind::MAPPING_ENTRY.into());
            self.parse_mapping_entry_body(indent);
            self.builder.finish_node();
        }

        while let Some(line) = self.peek_content() {
            if line.indent != indent
                || matches!(
                    line.kind,
                    SyntaxKind::DASH | SyntaxKind::DOC_START | SyntaxKind::DOC_END
                )
                || !self.line_has_colon(line.token_idx)
            {
                break;
            }
            self.bump_to(line.line_start);
            self.builder.start_node(SyntaxKind::MAPPING_ENTRY.into());
            self.eat(SyntaxKind::INDENT);
            self.parse_mapping_entry_body(indent);
            self.builder.finish_node();
        }

        self.builder.finish_node();
    }

    /// Parse `key: value` with the cursor at the key token. The trailing
    /// newline of the entry's last line is consumed into the entry.
    fn parse_mapping_entry_body(&mut self, indent: usize) {
        // Key
        match self.current() {
            Some(
                SyntaxKind::PLAIN
                | SyntaxKind::SINGLE_QUOTED
                | SyntaxKind::DOUBLE_QUOTED
                | SyntaxKind::ALIAS,
            ) => {
                self.builder.start_node(SyntaxKind::SCALAR.into());
                self.bump();
                self.builder.finish_node();
            }
            other => {
                self.error(format!("expected mapping key, found {:?}", other));
                self.recover_line();
                return;
            }
        }

        if self.current() == Some(SyntaxKind::WHITESPACE)
            && self.nth(1) == Some(SyntaxKind::COLON)
        {
            self.bump();
        }
        if !self.eat(SyntaxKind::COLON) {
            self.error("expected ':' after mapping key".to_string());
            self.recover_line();
            return;
        }

        self.parse_entry_value(indent);
    }

    /// Parse the value that follows a `:` or a `-`, including nested blocks.
    fn parse_entry_value(&mut self, indent: usize) {
        // An anchor or tag may be the only thing on the line, with the real
        // value nested underneath.
        let mut i = self.pos;
        loop {
            match self.kind_at(i) {
                Some(SyntaxKind::WHITESPACE) => i += 1,
                Some(SyntaxKind::ANCHOR | SyntaxKind::TAG) => i += 1,
                _ => break,
            }
        }
        let rest_is_line_end = matches!(
            self.kind_at(i),
            None | Some(SyntaxKind::NEWLINE) | Some(SyntaxKind::COMMENT)
        );

        if rest_is_line_end {
            // Consume the anchor/tag prefix (if any) into the entry.
            self.bump_to(i);
            self.parse_nested_or_null(indent, true);
        } else {
            self.eat(SyntaxKind::WHITESPACE);
            if self.scalar_continues(indent) {
                self.parse_scalar_block(indent);
            } else {
                self.parse_inline_value();
                self.eat(SyntaxKind::WHITESPACE);
                self.eat(SyntaxKind::COMMENT);
                self.eat(SyntaxKind::NEWLINE);
            }
        }
    }

    /// Whether the inline value at the cursor is a plain-style scalar whose
    /// text wraps onto deeper-indented continuation lines, as in
    /// `description: some text` followed by an indented colon-free line.
    fn scalar_continues(&self, indent: usize) -> bool {
        let mut i = self.pos;
        loop {
            match self.kind_at(i) {
                Some(
                    SyntaxKind::PLAIN
                    | SyntaxKind::SINGLE_QUOTED
                    | SyntaxKind::DOUBLE_QUOTED
                    | SyntaxKind::ANCHOR
                    | SyntaxKind::TAG
                    | SyntaxKind::ALIAS
                    | SyntaxKind::WHITESPACE,
                ) => i += 1,
                None | Some(SyntaxKind::COMMENT) | Some(SyntaxKind::NEWLINE) => break,
                // Flow or block syntax on the line rules out a plain wrap.
                _ => return false,
            }
        }
        if i == self.pos {
            return false;
        }
        matches!(
            self.peek_content_from(i),
            Some(line) if line.indent > indent
                && matches!(
                    line.kind,
                    SyntaxKind::PLAIN | SyntaxKind::SINGLE_QUOTED | SyntaxKind::DOUBLE_QUOTED
                )
                && !self.line_has_colon(line.token_idx)
        )
    }

    /// Value position at end of line: either a nested block on the following
    /// lines, or a null value represented by an empty scalar node (so that
    /// updates still have a mutation site).
    ///
    /// `dash_at_indent` allows a sequence at the same indent as the owner, as
    /// in `key:` followed by `- item`; for sequence items a same-indent dash
    /// is the next sibling, not nested content.
    fn parse_nested_or_null(&mut self, indent: usize, dash_at_indent: bool) {
        // Look past this line's end for the next content line.
        let mut i = self.pos;
        while matches!(
            self.kind_at(i),
            Some(SyntaxKind::WHITESPACE) | Some(SyntaxKind::COMMENT)
        ) {
            i += 1;
        }
        if self.kind_at(i) == Some(SyntaxKind::NEWLINE) {
            i += 1;
        }

        let nested = self.peek_content_from(i).filter(|line| {
            line.indent > indent
                || (dash_at_indent && line.kind == SyntaxKind::DASH && line.indent == indent)
        });

        match nested {
            Some(line) => {
                self.eat(SyntaxKind::WHITESPACE);
                self.eat(SyntaxKind::COMMENT);
                self.eat(SyntaxKind::NEWLINE);
                self.bump_to(line.line_start);
                match line.kind {
                    SyntaxKind::DASH => self.parse_block_sequence(line.indent, false),
                    _ if self.line_has_colon(line.token_idx) => {
                        self.parse_block_mapping(line.indent, false)
                    }
                    _ => self.parse_scalar_block(line.indent),
                }
            }
            None => {
                self.builder.start_node(SyntaxKind::SCALAR.into());
                self.builder.finish_node();
                self.eat(SyntaxKind::WHITESPACE);
                self.eat(SyntaxKind::COMMENT);
                self.eat(SyntaxKind::NEWLINE);
            }
        }
    }

    /// Parse an inline value starting at the cursor (never at whitespace).
    fn parse_inline_value(&mut self) {
        // Anchor/tag prefix.
        while matches!(
            self.current(),
            Some(SyntaxKind::ANCHOR) | Some(SyntaxKind::TAG)
        ) {
            self.bump();
            self.eat(SyntaxKind::WHITESPACE);
        }

        match self.current() {
            Some(SyntaxKind::BLOCK_HEADER) => self.parse_block_scalar(),
            Some(SyntaxKind::LEFT_BRACKET) => self.parse_flow_sequence(),
            Some(SyntaxKind::LEFT_BRACE) => self.parse_flow_mapping(),
            Some(
                SyntaxKind::PLAIN
                | SyntaxKind::SINGLE_QUOTED
                | SyntaxKind::DOUBLE_QUOTED
                | SyntaxKind::ALIAS,
            ) => {
                self.builder.start_node(SyntaxKind::SCALAR.into());
                self.bump();
                // Mixed runs like `foo 'bar'` arrive as several tokens.
                loop {
                    match self.current() {
                        Some(
                            SyntaxKind::PLAIN
                            | SyntaxKind::SINGLE_QUOTED
                            | SyntaxKind::DOUBLE_QUOTED,
                        ) => self.bump(),
                        Some(SyntaxKind::WHITESPACE)
                            if matches!(
                                self.nth(1),
                                Some(
                                    SyntaxKind::PLAIN
                                        | SyntaxKind::SINGLE_QUOTED
                                        | SyntaxKind::DOUBLE_QUOTED
                                )
                            ) =>
                        {
                            self.bump()
                        }
                        _ => break,
                    }
                }
                self.builder.finish_node();
            }
            other => {
                self.error(format!("expected value, found {:?}", other));
                self.builder.start_node(SyntaxKind::ERROR.into());
                if self.current().is_some() {
                    self.bump();
                }
                self.builder.finish_node();
            }
        }
    }

    /// Parse a literal/folded block scalar: header, then every raw line the
    /// lexer attributed to the block.
    fn parse_block_scalar(&mut self) {
        self.builder.start_node(SyntaxKind::SCALAR.into());
        self.bump(); // BLOCK_HEADER
        self.eat(SyntaxKind::WHITESPACE);
        self.eat(SyntaxKind::COMMENT);
        self.eat(SyntaxKind::NEWLINE);
        loop {
            match self.current() {
                Some(SyntaxKind::BLOCK_TEXT) => {
                    self.bump();
                    self.eat(SyntaxKind::NEWLINE);
                }
                // Blank lines inside the block arrive as bare newlines.
                Some(SyntaxKind::NEWLINE) if self.block_continues() => self.bump(),
                _ => break,
            }
        }
        self.builder.finish_node();
    }

    /// Whether upcoming bare newlines are still followed by block text.
    fn block_continues(&self) -> bool {
        let mut i = self.pos;
        while self.kind_at(i) == Some(SyntaxKind::NEWLINE) {
            i += 1;
        }
        self.kind_at(i) == Some(SyntaxKind::BLOCK_TEXT)
    }

    /// Parse a block sequence whose dashes sit at `indent`. When
    /// `first_inline` is set the cursor is already at the first item's dash.
    fn parse_block_sequence(&mut self, indent: usize, first_inline: bool) {
        self.builder.start_node(SyntaxKind::SEQUENCE.into());

        if first_inline {
            self.builder.start_node(SyntaxKind::SEQUENCE_ENTRY.into());
            self.parse_sequence_entry_body(indent);
            self.builder.finish_node();
        }

        while let Some(line) = self.peek_content() {
            if line.indent != indent || line.kind != SyntaxKind::DASH {
                break;
            }
            self.bump_to(line.line_start);
            self.builder.start_node(SyntaxKind::SEQUENCE_ENTRY.into());
            self.eat(SyntaxKind::INDENT);
            self.parse_sequence_entry_body(indent);
            self.builder.finish_node();
        }

        self.builder.finish_node();
    }

    /// Parse `- value` with the cursor at the dash.
    fn parse_sequence_entry_body(&mut self, indent: usize) {
        // Column where inline content after "- " starts; nested entries of a
        // mapping opened on this line are indented to that column.
        let mut item_indent = indent + 1;
        self.bump(); // DASH

        if self.current() == Some(SyntaxKind::WHITESPACE)
            && !matches!(
                self.nth(1),
                None | Some(SyntaxKind::NEWLINE) | Some(SyntaxKind::COMMENT)
            )
        {
            item_indent += self.tokens[self.pos].1.len();
            self.bump();
        }

        match self.current() {
            None | Some(SyntaxKind::WHITESPACE) | Some(SyntaxKind::NEWLINE)
            | Some(SyntaxKind::COMMENT) => {
                self.parse_nested_or_null(indent, false);
            }
            Some(SyntaxKind::DASH) => self.parse_block_sequence(item_indent, true),
            Some(
                SyntaxKind::PLAIN
                | SyntaxKind::SINGLE_QUOTED
                | SyntaxKind::DOUBLE_QUOTED
                | SyntaxKind::ALIAS,
            ) if self.line_has_colon(self.pos) => {
                self.parse_block_mapping(item_indent, true);
            }
            _ => {
                if self.scalar_continues(indent) {
                    self.parse_scalar_block(indent);
                } else {
                    self.parse_inline_value();
                    self.eat(SyntaxKind::WHITESPACE);
                    self.eat(SyntaxKind::COMMENT);
                    self.eat(SyntaxKind::NEWLINE);
                }
            }
        }
    }

    /// Parse a flow sequence `[a, b, ...]`, possibly spanning lines.
    fn parse_flow_sequence(&mut self) {
        self.builder.start_node(SyntaxKind::SEQUENCE.into());
        self.bump(); // LEFT_BRACKET
        loop {
            self.skip_flow_trivia();
            match self.current() {
                None => {
                    self.error("unterminated flow sequence".to_string());
                    break;
                }
                Some(SyntaxKind::RIGHT_BRACKET) => {
                    self.bump();
                    break;
                }
                Some(SyntaxKind::COMMA) => {
                    self.bump();
                }
                Some(_) => {
                    self.builder.start_node(SyntaxKind::SEQUENCE_ENTRY.into());
                    self.parse_flow_value();
                    self.builder.finish_node();
                }
            }
        }
        self.builder.finish_node();
    }

    /// Parse a flow mapping `{a: b, ...}`, possibly spanning lines.
    fn parse_flow_mapping(&mut self) {
        self.builder.start_node(SyntaxKind::MAPPING.into());
        self.bump(); // LEFT_BRACE
        loop {
            self.skip_flow_trivia();
            match self.current() {
                None => {
                    self.error("unterminated flow mapping".to_string());
                    break;
                }
                Some(SyntaxKind::RIGHT_BRACE) => {
                    self.bump();
                    break;
                }
                Some(SyntaxKind::COMMA) => {
                    self.bump();
                }
                Some(_) => {
                    self.builder.start_node(SyntaxKind::MAPPING_ENTRY.into());
                    // Key
                    self.builder.start_node(SyntaxKind::SCALAR.into());
                    if matches!(
                        self.current(),
                        Some(
                            SyntaxKind::PLAIN
                                | SyntaxKind::SINGLE_QUOTED
                                | SyntaxKind::DOUBLE_QUOTED
                        )
                    ) {
                        self.bump();
                    } else {
                        self.error(format!(
                            "expected flow mapping key, found {:?}",
                            self.current()
                        ));
                    }
                    self.builder.finish_node();
                    self.skip_flow_trivia();
                    if self.eat(SyntaxKind::COLON) {
                        self.skip_flow_trivia();
                        if matches!(
                            self.current(),
                            Some(SyntaxKind::COMMA) | Some(SyntaxKind::RIGHT_BRACE) | None
                        ) {
                            // `{key: }` style null value.
                            self.builder.start_node(SyntaxKind::SCALAR.into());
                            self.builder.finish_node();
                        } else {
                            self.parse_flow_value();
                        }
                    } else {
                        // `{key}`: a key with a null value.
                        self.builder.start_node(SyntaxKind::SCALAR.into());
                        self.builder.finish_node();
                    }
                    self.builder.finish_node();
                }
            }
        }
        self.builder.finish_node();
    }

    fn parse_flow_value(&mut self) {
        while matches!(
            self.current(),
            Some(SyntaxKind::ANCHOR) | Some(SyntaxKind::TAG)
        ) {
            self.bump();
            self.skip_flow_trivia();
        }
        match self.current() {
            Some(SyntaxKind::LEFT_BRACKET) => self.parse_flow_sequence(),
            Some(SyntaxKind::LEFT_BRACE) => self.parse_flow_mapping(),
            Some(
                SyntaxKind::PLAIN
                | SyntaxKind::SINGLE_QUOTED
                | SyntaxKind::DOUBLE_QUOTED
                | SyntaxKind::ALIAS,
            ) => {
                self.builder.start_node(SyntaxKind::SCALAR.into());
                self.bump();
                self.builder.finish_node();
            }
            other => {
                self.error(format!("expected flow value, found {:?}", other));
                self.builder.start_node(SyntaxKind::ERROR.into());
                if self.current().is_some() {
                    self.bump();
                }
                self.builder.finish_node();
            }
        }
    }

    /// Whitespace, newlines, indentation and comments are trivia inside flow
    /// collections.
    fn skip_flow_trivia(&mut self) {
        while matches!(
            self.current(),
            Some(
                SyntaxKind::WHITESPACE
                    | SyntaxKind::NEWLINE
                    | SyntaxKind::INDENT
                    | SyntaxKind::COMMENT
            )
        ) {
            self.bump();
        }
    }

    /// Parse a scalar occupying one or more lines at an indent deeper than
    /// `indent` (multi-line plain scalars).
    fn parse_scalar_block(&mut self, indent: usize) {
        self.builder.start_node(SyntaxKind::SCALAR.into());
        self.eat(SyntaxKind::INDENT);
        self.bump_scalar_line_tokens();
        self.eat(SyntaxKind::WHITESPACE);
        self.eat(SyntaxKind::COMMENT);
        self.eat(SyntaxKind::NEWLINE);

        while let Some(line) = self.peek_content() {
            let continues = line.indent > indent
                && matches!(
                    line.kind,
                    SyntaxKind::PLAIN | SyntaxKind::SINGLE_QUOTED | SyntaxKind::DOUBLE_QUOTED
                )
                && !self.line_has_colon(line.token_idx);
            if !continues {
                break;
            }
            self.bump_to(line.line_start);
            self.eat(SyntaxKind::INDENT);
            self.bump_scalar_line_tokens();
            self.eat(SyntaxKind::WHITESPACE);
            self.eat(SyntaxKind::COMMENT);
            self.eat(SyntaxKind::NEWLINE);
        }
        self.builder.finish_node();
    }

    fn bump_scalar_line_tokens(&mut self) {
        loop {
            match self.current() {
                Some(
                    SyntaxKind::PLAIN
                    | SyntaxKind::SINGLE_QUOTED
                    | SyntaxKind::DOUBLE_QUOTED
                    | SyntaxKind::ANCHOR
                    | SyntaxKind::TAG
                    | SyntaxKind::ALIAS,
                ) => self.bump(),
                Some(SyntaxKind::WHITESPACE)
                    if !matches!(
                        self.nth(1),
                        None | Some(SyntaxKind::NEWLINE) | Some(SyntaxKind::COMMENT)
                    ) =>
                {
                    self.bump()
                }
                _ => break,
            }
        }
    }

    /// Error recovery: consume the rest of the current line so parsing can
    /// resume at the next line.
    fn recover_line(&mut self) {
        while let Some(kind) = self.current() {
            self.bump();
            if kind == SyntaxKind::NEWLINE {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) {
        let parse = Parse::parse_text(text);
        assert_eq!(
            parse.tree().to_string(),
            text,
            "parse must preserve every byte (errors: {:?})",
            parse.errors()
        );
    }

    #[test]
    fn test_roundtrip_simple() {
        roundtrip("key: value\n");
        roundtrip("a: 1\nb: 2\n");
    }

    #[test]
    fn test_roundtrip_nested() {
        roundtrip("app:\n  image:\n    repository: ghcr.io/org/web\n    tag: v1.2.3\n");
    }

    #[test]
    fn test_roundtrip_comments_and_blanks() {
        roundtrip("# top\n\nkey: value  # inline\n\n# bottom\n");
    }

    #[test]
    fn test_roundtrip_sequences() {
        roundtrip("items:\n  - one\n  - two\n");
        roundtrip("images:\n- name: app\n  newTag: v1\n");
        roundtrip("matrix:\n  - - a\n    - b\n");
    }

    #[test]
    fn test_roundtrip_flow() {
        roundtrip("ports: [80, 443]\nmeta: {app: web, tier: frontend}\n");
        roundtrip("list: [\n  a,\n  b,\n]\n");
    }

    #[test]
    fn test_roundtrip_block_scalar() {
        roundtrip("script: |\n  echo hi\n  echo bye\nnext: 1\n");
        roundtrip("note: >\n  folded\n  text\n");
    }

    #[test]
    fn test_roundtrip_quoting() {
        roundtrip("a: 'single'\nb: \"double\"\nc: plain\n");
    }

    #[test]
    fn test_roundtrip_doc_markers() {
        roundtrip("---\na: 1\n---\nb: 2\n");
    }

    #[test]
    fn test_roundtrip_four_space_indent() {
        roundtrip("app:\n    name: demo\n    nested:\n        deep: true\n");
    }

    #[test]
    fn test_roundtrip_null_values() {
        roundtrip("a:\nb: 1\n");
        roundtrip("a:  # pending\nb: 1\n");
    }

    #[test]
    fn test_wrapped_plain_scalar_value() {
        let text = "description: some text\n  wrapped continuation\nnext: 1\n";
        let parse = Parse::parse_text(text);
        assert!(!parse.has_errors(), "errors: {:?}", parse.errors());
        assert_eq!(parse.tree().to_string(), text);
    }

    #[test]
    fn test_wrapped_scalar_in_sequence_item() {
        let text = "notes:\n  - first line\n    wraps here\n  - second\n";
        let parse = Parse::parse_text(text);
        assert!(!parse.has_errors(), "errors: {:?}", parse.errors());
        assert_eq!(parse.tree().to_string(), text);
    }

    #[test]
    fn test_roundtrip_anchors() {
        roundtrip("base: &defaults\n  a: 1\nmerged:\n  <<: *defaults\n");
    }

    #[test]
    fn test_no_trailing_newline() {
        roundtrip("key: value");
    }

    #[test]
    fn test_empty_and_comment_only() {
        roundtrip("");
        roundtrip("\n\n");
        roundtrip("# only a comment\n");
        let parse = Parse::parse_text("# only a comment\n");
        assert!(!parse.has_errors());
        assert!(parse.tree().body().is_none());
    }

    #[test]
    fn test_parse_error_reported() {
        let parse = Parse::parse_text("key: [unclosed\n");
        assert!(parse.has_errors());
        // Still lossless.
        assert_eq!(parse.tree().to_string(), "key: [unclosed\n");
    }
}

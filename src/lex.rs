//! Lexer for YAML configuration files.
//!
//! The lexer is line-oriented: indentation, comments and newlines are emitted
//! as ordinary tokens so that the parser can place every input byte into the
//! syntax tree. Losslessness falls out of that invariant rather than being
//! bolted on afterwards.

/// Lexical analysis: the variants are different kinds of "tokens".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Structural nodes
    /// Root node of the syntax tree
    ROOT = 0,
    /// A YAML mapping (key-value pairs)
    MAPPING,
    /// A key-value pair in a mapping
    MAPPING_ENTRY,
    /// A YAML sequence (list)
    SEQUENCE,
    /// An item in a sequence
    SEQUENCE_ENTRY,
    /// A YAML scalar value
    SCALAR,
    /// Parse error marker
    ERROR,

    // Tokens
    /// Leading whitespace that determines structure
    INDENT,
    /// Spaces and tabs between tokens
    WHITESPACE,
    /// Newline characters
    NEWLINE,
    /// Comments starting with '#'
    COMMENT,
    /// Sequence item marker '-'
    DASH,
    /// Mapping separator ':'
    COLON,
    /// Comma ',' in flow collections
    COMMA,
    /// Left bracket '['
    LEFT_BRACKET,
    /// Right bracket ']'
    RIGHT_BRACKET,
    /// Left brace '{'
    LEFT_BRACE,
    /// Right brace '}'
    RIGHT_BRACE,
    /// Document start marker '---'
    DOC_START,
    /// Document end marker '...'
    DOC_END,
    /// Plain (unquoted) scalar text
    PLAIN,
    /// Single-quoted scalar text, quotes included
    SINGLE_QUOTED,
    /// Double-quoted scalar text, quotes included
    DOUBLE_QUOTED,
    /// Block scalar header ('|', '>', with optional modifiers)
    BLOCK_HEADER,
    /// One raw line belonging to a block scalar
    BLOCK_TEXT,
    /// YAML anchor like '&name'
    ANCHOR,
    /// YAML alias like '*name'
    ALIAS,
    /// YAML tag like '!Ref' or '!!str'
    TAG,
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<(SyntaxKind, &'a str)>,
    /// Depth of open flow collections; newlines inside flow are trivia.
    flow_depth: usize,
    /// Minimum indent for lines that still belong to an open block scalar.
    block_indent: Option<usize>,
}

/// Tokenize YAML input. Concatenating the token texts reproduces the input.
pub(crate) fn lex(input: &str) -> Vec<(SyntaxKind, &str)> {
    let mut lexer = Lexer {
        input,
        pos: 0,
        tokens: Vec::new(),
        flow_depth: 0,
        block_indent: None,
    };
    while lexer.pos < lexer.input.len() {
        lexer.lex_line();
    }
    lexer.tokens
}

impl<'a> Lexer<'a> {
    fn push(&mut self, kind: SyntaxKind, start: usize, end: usize) {
        if end > start {
            self.tokens.push((kind, &self.input[start..end]));
        }
    }

    /// Lex one physical line, including its terminating newline.
    fn lex_line(&mut self) {
        use SyntaxKind::*;

        let line_start = self.pos;
        let rel_end = self.input[line_start..]
            .find('\n')
            .map(|i| line_start + i + 1)
            .unwrap_or(self.input.len());
        // Content excludes the newline (and a preceding '\r').
        let mut content_end = rel_end;
        if content_end > line_start && self.input.as_bytes()[content_end - 1] == b'\n' {
            content_end -= 1;
            if content_end > line_start && self.input.as_bytes()[content_end - 1] == b'\r' {
                content_end -= 1;
            }
        }
        let content = &self.input[line_start..content_end];

        // Lines inside an open block scalar are opaque text.
        if let Some(min_indent) = self.block_indent {
            let indent = leading_ws(content);
            if content.trim().is_empty() || indent >= min_indent {
                self.push(BLOCK_TEXT, line_start, content_end);
                self.push(NEWLINE, content_end, rel_end);
                self.pos = rel_end;
                return;
            }
            self.block_indent = None;
        }

        let indent = leading_ws(content);
        self.push(INDENT, line_start, line_start + indent);
        let mut pos = line_start + indent;

        if pos == content_end {
            self.push(NEWLINE, content_end, rel_end);
            self.pos = rel_end;
            return;
        }

        if self.input.as_bytes()[pos] == b'#' {
            self.push(COMMENT, pos, content_end);
            self.push(NEWLINE, content_end, rel_end);
            self.pos = rel_end;
            return;
        }

        // Document markers only at column zero, outside flow context.
        if indent == 0 && self.flow_depth == 0 {
            let rest = &self.input[pos..content_end];
            for (marker, kind) in [("---", DOC_START), ("...", DOC_END)] {
                if rest.starts_with(marker)
                    && matches!(rest.as_bytes().get(3), None | Some(b' ') | Some(b'\t'))
                {
                    self.push(kind, pos, pos + 3);
                    pos += 3;
                    break;
                }
            }
        }

        // True while the line so far holds only indent, dashes and spaces;
        // a '-' in that position is a sequence marker, not scalar content.
        let mut only_dashes = true;

        while pos < content_end {
            let bytes = self.input.as_bytes();
            let c = bytes[pos];
            let start = pos;
            match c {
                b' ' | b'\t' => {
                    while pos < content_end && matches!(bytes[pos], b' ' | b'\t') {
                        pos += 1;
                    }
                    self.push(WHITESPACE, start, pos);
                }
                b'#' => {
                    self.push(COMMENT, start, content_end);
                    pos = content_end;
                }
                b'-' if only_dashes && self.flow_depth == 0 && self.is_break_after(pos + 1) => {
                    self.push(DASH, start, start + 1);
                    pos += 1;
                }
                b':' if self.is_separator_colon(pos) => {
                    self.push(COLON, start, start + 1);
                    pos += 1;
                    only_dashes = false;
                }
                b'[' => {
                    self.push(LEFT_BRACKET, start, start + 1);
                    self.flow_depth += 1;
                    pos += 1;
                    only_dashes = false;
                }
                b'{' => {
                    self.push(LEFT_BRACE, start, start + 1);
                    self.flow_depth += 1;
                    pos += 1;
                    only_dashes = false;
                }
                b']' => {
                    self.push(RIGHT_BRACKET, start, start + 1);
                    self.flow_depth = self.flow_depth.saturating_sub(1);
                    pos += 1;
                    only_dashes = false;
                }
                b'}' => {
                    self.push(RIGHT_BRACE, start, start + 1);
                    self.flow_depth = self.flow_depth.saturating_sub(1);
                    pos += 1;
                    only_dashes = false;
                }
                b',' if self.flow_depth > 0 => {
                    self.push(COMMA, start, start + 1);
                    pos += 1;
                    only_dashes = false;
                }
                b'\'' => {
                    pos = self.scan_single_quoted(pos, content_end);
                    self.push(SINGLE_QUOTED, start, pos);
                    only_dashes = false;
                }
                b'"' => {
                    pos = self.scan_double_quoted(pos, content_end);
                    self.push(DOUBLE_QUOTED, start, pos);
                    only_dashes = false;
                }
                b'&' if pos + 1 < content_end && !bytes[pos + 1].is_ascii_whitespace() => {
                    pos = self.scan_name(pos + 1, content_end);
                    self.push(ANCHOR, start, pos);
                    only_dashes = false;
                }
                b'*' if pos + 1 < content_end && !bytes[pos + 1].is_ascii_whitespace() => {
                    pos = self.scan_name(pos + 1, content_end);
                    self.push(ALIAS, start, pos);
                    only_dashes = false;
                }
                b'!' => {
                    pos = self.scan_name(pos + 1, content_end);
                    self.push(TAG, start, pos);
                    only_dashes = false;
                }
                b'|' | b'>' if self.flow_depth == 0 => {
                    let mut look = pos + 1;
                    while look < content_end && matches!(bytes[look], b'+' | b'-' | b'0'..=b'9') {
                        look += 1;
                    }
                    // A header is only a header when nothing but whitespace
                    // (and a comment) follows; "key: >=1.2" is a plain scalar.
                    if look == content_end || matches!(bytes[look], b' ' | b'\t') {
                        pos = look;
                        self.push(BLOCK_HEADER, start, pos);
                        self.block_indent = Some(indent + 1);
                    } else {
                        pos = self.scan_plain(pos, content_end);
                        self.push(PLAIN, start, pos);
                    }
                    only_dashes = false;
                }
                _ => {
                    pos = self.scan_plain(pos, content_end);
                    if pos == start {
                        // Lone punctuation that matched nothing; take one
                        // char so the loop always advances.
                        pos = next_char_boundary(self.input, start, content_end);
                    }
                    self.push(PLAIN, start, pos);
                    only_dashes = false;
                }
            }
        }

        self.push(NEWLINE, content_end, rel_end);
        self.pos = rel_end;
    }

    /// Whether `pos` is at a space, tab, or the end of the line content.
    fn is_break_after(&self, pos: usize) -> bool {
        match self.input.as_bytes().get(pos) {
            None => true,
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => true,
            Some(_) => false,
        }
    }

    /// A ':' separates key from value only when followed by whitespace,
    /// end of line, or (in flow context) a flow delimiter.
    fn is_separator_colon(&self, pos: usize) -> bool {
        match self.input.as_bytes().get(pos + 1) {
            None => true,
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => true,
            Some(b',') | Some(b']') | Some(b'}') => self.flow_depth > 0,
            Some(_) => false,
        }
    }

    fn scan_single_quoted(&self, start: usize, end: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut pos = start + 1;
        while pos < end {
            if bytes[pos] == b'\'' {
                // Doubled quote is an escaped quote, not a terminator.
                if pos + 1 < end && bytes[pos + 1] == b'\'' {
                    pos += 2;
                    continue;
                }
                return pos + 1;
            }
            pos += 1;
        }
        end
    }

    fn scan_double_quoted(&self, start: usize, end: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut pos = start + 1;
        while pos < end {
            match bytes[pos] {
                b'\\' if pos + 1 < end => pos += 2,
                b'"' => return pos + 1,
                _ => pos += 1,
            }
        }
        end
    }

    fn scan_name(&self, start: usize, end: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut pos = start;
        while pos < end {
            let c = bytes[pos];
            if c.is_ascii_whitespace() || matches!(c, b',' | b'[' | b']' | b'{' | b'}') {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// Scan a plain scalar. Stops before a separator colon, before the
    /// whitespace run that precedes a trailing comment or the end of the
    /// line, and at flow delimiters when inside a flow collection.
    fn scan_plain(&self, start: usize, end: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut pos = start;
        let mut last_solid = start;
        while pos < end {
            let c = bytes[pos];
            if c == b':' && self.is_separator_colon(pos) {
                break;
            }
            if self.flow_depth > 0 && matches!(c, b',' | b'[' | b']' | b'{' | b'}') {
                break;
            }
            if matches!(c, b' ' | b'\t') {
                // Peek past the whitespace run.
                let mut look = pos;
                while look < end && matches!(bytes[look], b' ' | b'\t') {
                    look += 1;
                }
                if look >= end || bytes[look] == b'#' {
                    break;
                }
                pos += 1;
                continue;
            }
            pos += 1;
            last_solid = pos;
        }
        last_solid
    }
}

fn leading_ws(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}

fn next_char_boundary(input: &str, start: usize, end: usize) -> usize {
    let mut pos = start + 1;
    while pos < end && !input.is_char_boundary(pos) {
        pos += 1;
    }
    pos.min(end)
}

#[cfg(test)]
mod tests {
    use super::SyntaxKind::*;
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_lossless() {
        let inputs = [
            "key: value\n",
            "# comment\nkey: value  # trailing\n",
            "a:\n  b: 1\n  c: [x, y]\n",
            "list:\n  - one\n  - two\n",
            "block: |\n  line one\n  line two\nnext: 1\n",
            "empty:\nquoted: 'it''s'\ndouble: \"a\\\"b\"\n",
            "no trailing newline",
            "crlf: 1\r\nnext: 2\r\n",
            "weird:   spaced   out   \n",
        ];
        for input in inputs {
            let text: String = lex(input).iter().map(|(_, t)| *t).collect();
            assert_eq!(text, input, "lexing must preserve every byte");
        }
    }

    #[test]
    fn test_simple_mapping() {
        assert_eq!(
            kinds("key: value\n"),
            vec![PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE]
        );
    }

    #[test]
    fn test_colon_in_plain_scalar() {
        // "http://example.com" must stay one plain token.
        assert_eq!(
            kinds("url: http://example.com\n"),
            vec![PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE]
        );
    }

    #[test]
    fn test_sequence_item() {
        assert_eq!(kinds("- item\n"), vec![DASH, WHITESPACE, PLAIN, NEWLINE]);
    }

    #[test]
    fn test_dash_inside_value_is_plain() {
        assert_eq!(
            kinds("key: a - b\n"),
            vec![PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE]
        );
    }

    #[test]
    fn test_trailing_comment() {
        assert_eq!(
            kinds("key: value  # note\n"),
            vec![PLAIN, COLON, WHITESPACE, PLAIN, WHITESPACE, COMMENT, NEWLINE]
        );
    }

    #[test]
    fn test_indent_token() {
        assert_eq!(
            kinds("a:\n    b: 1\n"),
            vec![PLAIN, COLON, NEWLINE, INDENT, PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE]
        );
    }

    #[test]
    fn test_flow_sequence() {
        assert_eq!(
            kinds("[a, b]"),
            vec![LEFT_BRACKET, PLAIN, COMMA, WHITESPACE, PLAIN, RIGHT_BRACKET]
        );
    }

    #[test]
    fn test_block_scalar_swallows_lines() {
        assert_eq!(
            kinds("key: |\n  text: not a mapping\n  more\nnext: 1\n"),
            vec![
                PLAIN, COLON, WHITESPACE, BLOCK_HEADER, NEWLINE, BLOCK_TEXT, NEWLINE, BLOCK_TEXT,
                NEWLINE, PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE
            ]
        );
    }

    #[test]
    fn test_doc_markers() {
        assert_eq!(
            kinds("---\na: 1\n...\n"),
            vec![DOC_START, NEWLINE, PLAIN, COLON, WHITESPACE, PLAIN, NEWLINE, DOC_END, NEWLINE]
        );
    }

    #[test]
    fn test_anchor_and_alias() {
        assert_eq!(
            kinds("a: &anchor val\nb: *anchor\n"),
            vec![
                PLAIN, COLON, WHITESPACE, ANCHOR, WHITESPACE, PLAIN, NEWLINE, PLAIN, COLON,
                WHITESPACE, ALIAS, NEWLINE
            ]
        );
    }

    #[test]
    fn test_quoted_scalars() {
        assert_eq!(
            kinds("a: 'single'\nb: \"double\"\n"),
            vec![
                PLAIN, COLON, WHITESPACE, SINGLE_QUOTED, NEWLINE, PLAIN, COLON, WHITESPACE,
                DOUBLE_QUOTED, NEWLINE
            ]
        );
    }

    #[test]
    fn test_nested_sequence_markers() {
        assert_eq!(
            kinds("- - a\n"),
            vec![DASH, WHITESPACE, DASH, WHITESPACE, PLAIN, NEWLINE]
        );
    }
}

//! Indentation detection for parsed YAML files.

/// Default indent width assumed when a file gives no evidence.
pub const DEFAULT_INDENT: usize = 2;

/// Detect the indent width of a YAML file from its text.
///
/// The width of the first indented mapping line wins; list markers and
/// comments are skipped since their indentation does not follow the mapping
/// step. Files without any indented mapping line report [`DEFAULT_INDENT`].
pub fn detect_indent(text: &str) -> usize {
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with("- ") || trimmed == "-" {
            continue;
        }
        let indent = line.len() - trimmed.len();
        if indent == 0 {
            continue;
        }
        if looks_like_mapping_line(trimmed) {
            return indent;
        }
    }
    DEFAULT_INDENT
}

/// A mapping line carries a separating colon: either "key: value" or a bare
/// "key:" opening a nested block.
fn looks_like_mapping_line(trimmed: &str) -> bool {
    if trimmed.contains(": ") {
        return true;
    }
    match trimmed.split('#').next() {
        Some(before_comment) => before_comment.trim_end().ends_with(':'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_space() {
        assert_eq!(detect_indent("a:\n  b: 1\n"), 2);
    }

    #[test]
    fn test_four_space() {
        assert_eq!(detect_indent("a:\n    b: 1\n"), 4);
    }

    #[test]
    fn test_flat_file_defaults() {
        assert_eq!(detect_indent("a: 1\nb: 2\n"), DEFAULT_INDENT);
    }

    #[test]
    fn test_empty_defaults() {
        assert_eq!(detect_indent(""), DEFAULT_INDENT);
    }

    #[test]
    fn test_list_lines_skipped() {
        // The list items are indented 4 but the mapping step is 2.
        assert_eq!(detect_indent("a:\n    - x\n    - y\nb:\n  c: 1\n"), 2);
    }

    #[test]
    fn test_comment_lines_skipped() {
        assert_eq!(detect_indent("a:\n    # note\n  b: 1\n"), 2);
    }

    #[test]
    fn test_first_indented_mapping_wins() {
        assert_eq!(detect_indent("a:\n   b:\n      c: 1\n"), 3);
    }

    #[test]
    fn test_bare_key_opening_block() {
        assert_eq!(detect_indent("a:\n  b:\n    c: 1\n"), 2);
    }
}

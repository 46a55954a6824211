//! A minimal unified diff for reporting what an update changed.
//!
//! Updates rewrite scalars in place, so old and new text pair up line by
//! line. That makes a positional comparison sufficient; no LCS machinery.

use std::fmt::Write;

/// Render a unified diff between two versions of the file at `path`.
///
/// Consecutive differing lines are grouped into one hunk; a matching line
/// closes the open hunk. Returns the empty string only when the texts are
/// byte-equal; any other difference gets at least the file headers.
pub fn diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let total = old_lines.len().max(new_lines.len());

    let mut out = String::new();
    let _ = writeln!(out, "--- {path}");
    let _ = writeln!(out, "+++ {path}");
    let mut hunk_start: Option<usize> = None;

    for i in 0..=total {
        let old_line = old_lines.get(i);
        let new_line = new_lines.get(i);
        if i < total && old_line != new_line {
            hunk_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = hunk_start.take() {
            let old_count = old_lines.len().min(i) - start.min(old_lines.len());
            let new_count = new_lines.len().min(i) - start.min(new_lines.len());
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                start + 1,
                old_count,
                start + 1,
                new_count
            );
            for line in &old_lines[start..start + old_count] {
                let _ = writeln!(out, "-{line}");
            }
            for line in &new_lines[start..start + new_count] {
                let _ = writeln!(out, "+{line}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_empty() {
        assert_eq!(diff("f.yaml", "a: 1\nb: 2\n", "a: 1\nb: 2\n"), "");
    }

    #[test]
    fn test_trailing_newline_only_difference() {
        let out = diff("f.yaml", "a: 1", "a: 1\n");
        assert_eq!(out, "--- f.yaml\n+++ f.yaml\n");
    }

    #[test]
    fn test_single_line_change() {
        let out = diff(
            "values.yaml",
            "image:\n  tag: v1.0.0\n",
            "image:\n  tag: v2.0.0\n",
        );
        assert_eq!(
            out,
            "--- values.yaml\n+++ values.yaml\n@@ -2,1 +2,1 @@\n-  tag: v1.0.0\n+  tag: v2.0.0\n"
        );
    }

    #[test]
    fn test_two_separate_hunks() {
        let out = diff("f.yaml", "a: 1\nb: 2\nc: 3\n", "a: 9\nb: 2\nc: 9\n");
        assert_eq!(
            out,
            "--- f.yaml\n+++ f.yaml\n@@ -1,1 +1,1 @@\n-a: 1\n+a: 9\n@@ -3,1 +3,1 @@\n-c: 3\n+c: 9\n"
        );
    }

    #[test]
    fn test_consecutive_changes_grouped() {
        let out = diff("f.yaml", "a: 1\nb: 2\nc: 3\n", "a: 9\nb: 9\nc: 3\n");
        assert_eq!(
            out,
            "--- f.yaml\n+++ f.yaml\n@@ -1,2 +1,2 @@\n-a: 1\n-b: 2\n+a: 9\n+b: 9\n"
        );
    }

    #[test]
    fn test_appended_lines() {
        let out = diff("f.yaml", "a: 1\n", "a: 1\nb: 2\n");
        assert_eq!(out, "--- f.yaml\n+++ f.yaml\n@@ -2,0 +2,1 @@\n+b: 2\n");
    }

    #[test]
    fn test_removed_lines() {
        let out = diff("f.yaml", "a: 1\nb: 2\n", "a: 1\n");
        assert_eq!(out, "--- f.yaml\n+++ f.yaml\n@@ -2,1 +2,0 @@\n-b: 2\n");
    }
}

//! Offset to line resolution

use crate::diagnostic::Line;
use regex::{Regex, RegexBuilder};

/// What to report when a construct's offset is not known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePolicy {
    /// Fall back to line 1
    FirstLine,
    /// Report `Line::Unknown`
    Unknown,
}

/// 1-based line of a byte offset in `text`.
///
/// Returns 1 when `offset` is `None`. Offsets past the end are clamped.
pub fn line_of(offset: Option<usize>, text: &str) -> usize {
    match offset {
        Some(offset) => {
            let end = offset.min(text.len());
            1 + text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
        }
        None => 1,
    }
}

/// Resolve an optional offset to a [`Line`] using the caller's policy
pub fn resolve_line(offset: Option<usize>, text: &str, policy: LinePolicy) -> Line {
    match (offset, policy) {
        (Some(_), _) | (None, LinePolicy::FirstLine) => Line::Known(line_of(offset, text)),
        (None, LinePolicy::Unknown) => Line::Unknown,
    }
}

/// Offset of the first `<tag` in `text`, ignoring case.
///
/// This is an approximation: a repeated tag always resolves to its first occurrence.
pub fn find_tag_offset(text: &str, tag: &str) -> Option<usize> {
    tag_prefix_regex(tag).and_then(|re| re.find(text).map(|m| m.start()))
}

fn tag_prefix_regex(tag: &str) -> Option<Regex> {
    RegexBuilder::new(&format!("<{}", regex::escape(tag)))
        .case_insensitive(true)
        .build()
        .ok()
}

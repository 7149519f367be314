//! Unclosed container tag detection
//!
//! Runs over the raw text rather than the tree: the tree builder silently
//! closes or drops unbalanced tags.

use crate::diagnostic::HtmlIssue;
use crate::position::{resolve_line, LinePolicy};
use crate::rule::{RuleCategory, RuleInfo, RuleScope};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

pub const RULE_ID: &str = "html-closing-tag";
const KIND: &str = "Missing closing tag";

/// Tags that must be explicitly closed
pub const TAGS_REQUIRING_CLOSE: &[&str] = &[
    "div", "section", "article", "header", "footer", "nav", "main", "aside", "p", "span", "ul",
    "ol", "li", "table", "tr", "td", "th", "form", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Open/close counts for one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBalance {
    pub opened: usize,
    pub closed: usize,
    /// Offset of the first opening tag
    pub first_open: Option<usize>,
}

impl TagBalance {
    pub fn is_unclosed(&self) -> bool {
        self.opened > self.closed
    }
}

/// Compiled opening and closing patterns for one tag
struct TagPatterns {
    tag: &'static str,
    open: Regex,
    close: Regex,
}

impl TagPatterns {
    /// `<tag` followed by whitespace or `>`, and `</tag>`, ignoring case
    fn new(tag: &'static str) -> Option<Self> {
        let escaped = regex::escape(tag);
        Some(Self {
            tag,
            open: case_insensitive(&format!(r"<{}[\s>]", escaped))?,
            close: case_insensitive(&format!(r"</{}>", escaped))?,
        })
    }

    fn balance(&self, content: &str) -> TagBalance {
        let mut opens = self.open.find_iter(content);
        let first_open = opens.next().map(|m| m.start());
        let opened = first_open.map_or(0, |_| 1 + opens.count());

        TagBalance {
            opened,
            closed: self.close.find_iter(content).count(),
            first_open,
        }
    }
}

static CATALOGUE: LazyLock<Vec<TagPatterns>> = LazyLock::new(|| {
    TAGS_REQUIRING_CLOSE
        .iter()
        .copied()
        .filter_map(TagPatterns::new)
        .collect()
});

/// Count `<tag` (followed by whitespace or `>`) against `</tag>`, ignoring case
pub fn tag_balance(content: &str, tag: &str) -> TagBalance {
    CATALOGUE
        .iter()
        .find(|patterns| patterns.tag.eq_ignore_ascii_case(tag))
        .map(|patterns| patterns.balance(content))
        .unwrap_or(TagBalance {
            opened: 0,
            closed: 0,
            first_open: None,
        })
}

/// One issue per catalogue tag with more openings than closings, in catalogue order
pub fn check(content: &str) -> Vec<HtmlIssue> {
    let mut issues = Vec::new();

    for patterns in CATALOGUE.iter() {
        let tag = patterns.tag;
        let balance = patterns.balance(content);
        if balance.is_unclosed() {
            log::debug!(
                "<{}> opened {} time(s), closed {} time(s)",
                tag,
                balance.opened,
                balance.closed
            );
            issues.push(HtmlIssue::new(
                RULE_ID,
                KIND,
                &format!("<{}>", tag),
                resolve_line(balance.first_open, content, LinePolicy::FirstLine),
                &format!("Add a closing </{}> tag", tag),
            ));
        }
    }

    issues
}

pub fn rule_info() -> RuleInfo {
    RuleInfo {
        id: RULE_ID,
        scope: RuleScope::Markup,
        category: RuleCategory::Correctness,
        summary: KIND,
        solution: "Add a closing </tag> tag",
        trigger: format!(
            "more opening than closing tags for any of: {}",
            TAGS_REQUIRING_CLOSE.join(", ")
        ),
    }
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Line;

    #[test]
    fn test_balanced_div() {
        assert!(check("<div>\n  <div class=\"x\">a</div>\n</div>").is_empty());
    }

    #[test]
    fn test_unclosed_div_anchored_at_first_open() {
        let content = "<p>intro</p>\n<div>\n<div>\n</div>";
        let issues = check(content);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].tag, "<div>");
        assert_eq!(issues[0].kind, "Missing closing tag");
        assert_eq!(issues[0].line, Line::Known(2));
        assert_eq!(issues[0].solution, "Add a closing </div> tag");
    }

    #[test]
    fn test_counts_ignore_case() {
        let balance = tag_balance("<DIV>\n</div>\n<Div >", "div");
        assert_eq!(balance.opened, 2);
        assert_eq!(balance.closed, 1);
        assert_eq!(balance.first_open, Some(0));
    }

    #[test]
    fn test_open_pattern_requires_boundary() {
        // <pre>, <param> and <p/> are not <p>
        let balance = tag_balance("<pre></pre><param><p/>", "p");
        assert_eq!(balance.opened, 0);
    }

    #[test]
    fn test_issues_follow_catalogue_order() {
        let issues = check("<li>\n<ul>\n<span>");
        let tags: Vec<_> = issues.iter().map(|i| i.tag.as_str()).collect();
        assert_eq!(tags, vec!["<span>", "<ul>", "<li>"]);
    }

    #[test]
    fn test_more_closings_than_openings_is_not_reported() {
        assert!(check("</div></div>").is_empty());
    }

    #[test]
    fn test_every_catalogue_tag_has_patterns() {
        assert_eq!(CATALOGUE.len(), TAGS_REQUIRING_CLOSE.len());
        assert_eq!(tag_balance("<H1>x", "h1").opened, 1);
    }

    #[test]
    fn test_tag_outside_catalogue_is_not_counted() {
        assert_eq!(tag_balance("<img>", "img").opened, 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(check("").is_empty());
    }
}

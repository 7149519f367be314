//! HTML analyzer

pub mod closing;
mod document;
pub mod rules;

pub use document::{Element, HtmlDocument, MarkupNode};
pub use rules::{ElementCheck, ElementRule, ELEMENT_RULES};

use crate::config::Config;
use crate::diagnostic::HtmlIssue;
use crate::position::{find_tag_offset, resolve_line, LinePolicy};

/// Walks markup documents against the element rule catalogue
#[derive(Debug, Clone)]
pub struct HtmlAnalyzer {
    /// Active element rules, in catalogue order
    rules: Vec<&'static ElementRule>,

    /// Whether the textual closing-tag pass runs
    check_closing_tags: bool,
}

impl Default for HtmlAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlAnalyzer {
    /// Analyzer with every built-in rule enabled
    pub fn new() -> Self {
        Self {
            rules: ELEMENT_RULES.iter().collect(),
            check_closing_tags: true,
        }
    }

    /// Analyzer with the rules the configuration enables
    pub fn from_config(config: &Config) -> Self {
        let rules = ELEMENT_RULES
            .iter()
            .filter(|r| config.is_rule_enabled(r.id) && config.is_category_enabled(r.category))
            .collect();
        let closing = closing::rule_info();

        Self {
            rules,
            check_closing_tags: config.is_rule_enabled(closing.id)
                && config.is_category_enabled(closing.category),
        }
    }

    /// Ids of the active rules
    pub fn rule_ids(&self) -> Vec<&'static str> {
        let mut ids = Vec::new();
        if self.check_closing_tags {
            ids.push(closing::RULE_ID);
        }
        ids.extend(self.rules.iter().map(|r| r.id));
        ids
    }

    /// Analyze raw markup text
    pub fn analyze(&self, content: &str) -> Vec<HtmlIssue> {
        let mut issues = if self.check_closing_tags {
            closing::check(content)
        } else {
            Vec::new()
        };

        let document = HtmlDocument::parse(content);
        issues.extend(self.walk(&document, content));

        log::debug!("markup analysis produced {} issue(s)", issues.len());
        issues
    }

    /// Apply the element rules to every element of a parsed document
    pub fn walk(&self, document: &HtmlDocument, content: &str) -> Vec<HtmlIssue> {
        let mut issues = Vec::new();

        for element in document.elements() {
            for rule in &self.rules {
                if !rule.matches(element) {
                    continue;
                }

                let offset = element
                    .offset
                    .or_else(|| find_tag_offset(content, &element.name));
                issues.push(HtmlIssue::new(
                    rule.id,
                    rule.kind,
                    &format!("<{}>", element.name),
                    resolve_line(offset, content, LinePolicy::Unknown),
                    rule.solution,
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Line;
    use pretty_assertions::assert_eq;

    fn kinds(issues: &[HtmlIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.kind.as_str()).collect()
    }

    #[test]
    fn test_img_without_alt_at_any_depth() {
        let content = "<div>\n<section>\n<p><img src=\"a.png\"></p>\n</section>\n</div>\n<img src=\"b.png\" alt=\"b\">";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(kinds(&issues), vec!["Missing alt attribute"]);
        assert_eq!(issues[0].tag, "<img>");
        assert_eq!(issues[0].line, Line::Known(3));
    }

    #[test]
    fn test_input_without_name_and_type_yields_two_issues() {
        let issues = HtmlAnalyzer::new().analyze("<form>\n<input>\n</form>");
        assert_eq!(
            kinds(&issues),
            vec!["Missing name attribute", "Missing type attribute"]
        );
        assert!(issues.iter().all(|i| i.line == Line::Known(2)));
    }

    #[test]
    fn test_rules_fire_in_catalogue_order_per_element() {
        let issues = HtmlAnalyzer::new().analyze("<input style=\"color:red\">");
        assert_eq!(
            kinds(&issues),
            vec![
                "Missing name attribute",
                "Missing type attribute",
                "Inline style detected"
            ]
        );
    }

    #[test]
    fn test_closing_tag_issues_come_first() {
        let content = "<a>home\n<div>\n<img src=x>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(
            kinds(&issues),
            vec![
                "Missing closing tag",
                "Missing href in anchor tag",
                "Missing alt attribute"
            ]
        );
        assert_eq!(issues[0].line, Line::Known(2));
        assert_eq!(issues[1].line, Line::Known(1));
        assert_eq!(issues[2].line, Line::Known(3));
    }

    #[test]
    fn test_document_order_across_siblings() {
        let content = "<label>Name</label>\n<button>Go</button>\n<textarea></textarea>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(
            kinds(&issues),
            vec![
                "Missing htmlFor attribute",
                "Missing type attribute",
                "Missing name attribute"
            ]
        );
        let lines: Vec<_> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![Line::Known(1), Line::Known(2), Line::Known(3)]);
    }

    #[test]
    fn test_tag_text_in_script_does_not_move_line() {
        let content = "<script>\nvar s = '<img>';\n</script>\n<img src=x>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(kinds(&issues), vec!["Missing alt attribute"]);
        assert_eq!(issues[0].line, Line::Known(4));
    }

    #[test]
    fn test_tag_text_in_textarea_does_not_move_line() {
        let content = "<textarea name=t>\n<input>\n</textarea>\n<input name=a>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(kinds(&issues), vec!["Missing type attribute"]);
        assert_eq!(issues[0].tag, "<input>");
        assert_eq!(issues[0].line, Line::Known(4));
    }

    #[test]
    fn test_tag_text_in_attribute_value_does_not_move_line() {
        let content = "<p title=\"<a>\">x</p>\n<a>y</a>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(kinds(&issues), vec!["Missing href in anchor tag"]);
        assert_eq!(issues[0].line, Line::Known(2));
    }

    #[test]
    fn test_deeply_nested_markup() {
        let content = format!("{}<img>", "<div>".repeat(10_000));
        let issues = HtmlAnalyzer::new().analyze(&content);

        assert_eq!(kinds(&issues), vec!["Missing closing tag", "Missing alt attribute"]);
        assert_eq!(issues[0].line, Line::Known(1));
        assert_eq!(issues[1].line, Line::Known(1));
    }

    #[test]
    fn test_empty_alt_counts_as_present() {
        let content = "<img src=spacer.gif alt=\"\">\n<img src=x alt>";
        let issues = HtmlAnalyzer::new().analyze(content);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_implied_html_element_is_not_flagged() {
        let issues = HtmlAnalyzer::new().analyze("<p>text</p>");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_explicit_html_without_lang() {
        let content = "<!DOCTYPE html>\n<html>\n<body></body>\n</html>";
        let issues = HtmlAnalyzer::new().analyze(content);

        assert_eq!(kinds(&issues), vec!["Missing lang attribute"]);
        assert_eq!(issues[0].line, Line::Known(2));
    }

    #[test]
    fn test_walk_falls_back_to_text_search() {
        let content = "<p>\n<img>\n</p>";
        let root = MarkupNode::Document {
            children: vec![MarkupNode::Element(Element::new("img"))],
        };
        let issues = HtmlAnalyzer::new().walk(&HtmlDocument::from_root(root), content);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Line::Known(2));
    }

    #[test]
    fn test_walk_reports_unknown_line_when_not_found() {
        let root = MarkupNode::Document {
            children: vec![MarkupNode::Element(Element::new("img"))],
        };
        let issues = HtmlAnalyzer::new().walk(&HtmlDocument::from_root(root), "");

        assert_eq!(issues[0].line, Line::Unknown);
    }

    #[test]
    fn test_walk_prefers_recorded_offset() {
        let content = "<img>\n<img>";
        let root = MarkupNode::Document {
            children: vec![MarkupNode::Element(Element::new("img").with_offset(6))],
        };
        let issues = HtmlAnalyzer::new().walk(&HtmlDocument::from_root(root), content);

        assert_eq!(issues[0].line, Line::Known(2));
    }

    #[test]
    fn test_from_config_filters_rules() {
        let mut config = Config::default();
        config.rules.disabled.push("html-img-alt".to_string());
        config.rules.disabled.push("html-closing-tag".to_string());

        let analyzer = HtmlAnalyzer::from_config(&config);
        assert!(!analyzer.rule_ids().contains(&"html-img-alt"));
        assert!(analyzer.analyze("<div><img>").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(HtmlAnalyzer::new().analyze("").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let content = "<html>\n<a>x</a>\n<div style=\"x\">\n<input>";
        let analyzer = HtmlAnalyzer::new();
        assert_eq!(analyzer.analyze(content), analyzer.analyze(content));
    }
}

//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{CssIssue, HtmlIssue};
use crate::engine::Report;
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show the suggested fix under each issue
    pub show_solutions: bool,

    /// Prefix each issue with the id of the rule that emitted it
    pub show_rule_ids: bool,

    /// Show the summary line
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_solutions: true,
            show_rule_ids: false,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, title: &str, count: usize) -> String {
        let title = format!("{} ({})", title, count);
        format!("{}\n", self.paint(&title, |s| s.bold().underline()))
    }

    fn rule_prefix(&self, rule_id: &str) -> String {
        if self.show_rule_ids {
            format!("[{}] ", self.paint(rule_id, |s| s.cyan()))
        } else {
            String::new()
        }
    }

    fn solution(&self, solution: &str) -> String {
        if self.show_solutions {
            format!("      {} fix: {}\n", self.paint("=", |s| s.green()), solution)
        } else {
            String::new()
        }
    }

    /// Format a single markup issue
    pub fn format_html_issue(&self, issue: &HtmlIssue) -> String {
        let line = format!("line {}", issue.line);
        let mut output = format!(
            "  {:>12}  {}{} {}\n",
            self.paint(&line, |s| s.dimmed()),
            self.rule_prefix(issue.rule_id),
            self.paint(&issue.kind, |s| s.yellow().bold()),
            issue.tag
        );
        output.push_str(&self.solution(&issue.solution));
        output
    }

    /// Format a single stylesheet issue
    pub fn format_css_issue(&self, issue: &CssIssue) -> String {
        let line = format!("line {}", issue.line);
        let mut output = format!(
            "  {:>12}  {}{}: {}\n",
            self.paint(&line, |s| s.dimmed()),
            self.rule_prefix(issue.rule_id),
            self.paint(&issue.property, |s| s.yellow().bold()),
            issue.problem
        );
        output.push_str(&self.solution(&issue.solution));
        output
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        if !report.html_issues.is_empty() {
            output.push_str(&self.heading("HTML", report.html_issues.len()));
            for issue in &report.html_issues {
                output.push_str(&self.format_html_issue(issue));
            }
            output.push('\n');
        }

        if !report.css_issues.is_empty() {
            output.push_str(&self.heading("CSS", report.css_issues.len()));
            for issue in &report.css_issues {
                output.push_str(&self.format_css_issue(issue));
            }
            output.push('\n');
        }

        if self.show_stats {
            let count = report.issue_count();
            if count == 0 {
                output.push_str(&self.paint("No issues found", |s| s.green()));
            } else {
                let summary = format!(
                    "{} {} found",
                    count,
                    if count == 1 { "issue" } else { "issues" }
                );
                output.push_str(&self.paint(&summary, |s| s.yellow().bold()));
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Line;

    fn report() -> Report {
        Report {
            html_issues: vec![HtmlIssue::new(
                "html-img-alt",
                "Missing alt attribute",
                "<img>",
                Line::Known(3),
                "Add alt=\"...\" attribute in <img>",
            )],
            css_issues: vec![CssIssue::new(
                "css-important",
                "color",
                "Avoid using !important unless necessary",
                Line::Known(7),
                "Remove '!important' if possible",
            )],
        }
    }

    #[test]
    fn test_format_html_issue() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format_html_issue(&report().html_issues[0]);

        assert!(output.contains("line 3"));
        assert!(output.contains("Missing alt attribute <img>"));
        assert!(output.contains("fix: Add alt=\"...\" attribute in <img>"));
    }

    #[test]
    fn test_unknown_line() {
        let formatter = TextFormatter::new().without_color();
        let issue = HtmlIssue::new("html-lang", "Missing lang attribute", "<html>", Line::Unknown, "x");
        assert!(formatter.format_html_issue(&issue).contains("line Unknown"));
    }

    #[test]
    fn test_rule_ids() {
        let mut formatter = TextFormatter::new().without_color();
        formatter.show_rule_ids = true;
        let output = formatter.format_css_issue(&report().css_issues[0]);
        assert!(output.contains("[css-important] color: Avoid using !important"));
    }

    #[test]
    fn test_format_report() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format(&report());

        assert!(output.contains("HTML (1)"));
        assert!(output.contains("CSS (1)"));
        assert!(output.contains("2 issues found"));
        assert!(output.find("HTML (1)") < output.find("CSS (1)"));
    }

    #[test]
    fn test_format_clean_report() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format(&Report::default());

        assert!(!output.contains("HTML"));
        assert!(output.contains("No issues found"));
    }
}

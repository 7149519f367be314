//! Codecatcher - HTML and CSS Code Quality Analyzer
//!
//! Checks a markup document and a stylesheet against a fixed catalogue of
//! accessibility, correctness and style rules. Every issue carries a
//! human-readable problem, a suggested fix and the 1-based source line.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> HtmlAnalyzer -> HtmlDocument (scraper)
//!                   -> CssAnalyzer  -> Stylesheet   (cssparser)
//! ```
//!
//! Analysis never fails: malformed input is parsed by recovering parsers and
//! yields whatever issues can still be found.
//!
//! ```
//! let issues = codecatcher::analyze_stylesheet("a { margin: 0px; }");
//! assert_eq!(issues[0].problem, "Use 0 instead of 0px");
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod output;
pub mod position;
pub mod rule;

// Re-export main types
pub use config::{CliOverrides, Config, ConfigError};
pub use diagnostic::{CssIssue, HtmlIssue, Line};
pub use engine::{Engine, Report};
pub use output::{JsonFormatter, OutputFormatter, TextFormatter};
pub use rule::{RuleCategory, RuleInfo, RuleScope};

// Built-in analyzers
pub mod plugins {
    pub mod css;
    pub mod html;
}

/// Analyze markup text with every built-in rule enabled
pub fn analyze_markup(text: &str) -> Vec<HtmlIssue> {
    Engine::default().analyze_markup(text)
}

/// Analyze stylesheet text with every built-in rule enabled
pub fn analyze_stylesheet(text: &str) -> Vec<CssIssue> {
    Engine::default().analyze_stylesheet(text)
}

//! Core analysis engine

use crate::config::Config;
use crate::diagnostic::{CssIssue, HtmlIssue};
use crate::plugins::css::CssAnalyzer;
use crate::plugins::html::HtmlAnalyzer;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Result of analyzing one markup document and one stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Issues from the markup analyzer
    pub html_issues: Vec<HtmlIssue>,

    /// Issues from the stylesheet analyzer
    pub css_issues: Vec<CssIssue>,
}

impl Report {
    /// Total number of issues
    pub fn issue_count(&self) -> usize {
        self.html_issues.len() + self.css_issues.len()
    }

    /// Check if no issues were found
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    /// Get exit code (0 = clean, 1 = issues found)
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }
}

/// The main analysis engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    html: HtmlAnalyzer,
    css: CssAnalyzer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    /// Create a new engine with configuration
    pub fn new(config: Config) -> Self {
        let html = HtmlAnalyzer::from_config(&config);
        let css = CssAnalyzer::from_config(&config);
        log::debug!(
            "engine configured with {} markup and {} stylesheet rule(s)",
            html.rule_ids().len(),
            css.rule_ids().len()
        );

        Self { config, html, css }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ids of every active rule, markup first
    pub fn rule_ids(&self) -> Vec<&'static str> {
        let mut ids = self.html.rule_ids();
        ids.extend(self.css.rule_ids());
        ids
    }

    /// Analyze markup text
    pub fn analyze_markup(&self, content: &str) -> Vec<HtmlIssue> {
        isolate("markup", || self.html.analyze(content))
    }

    /// Analyze stylesheet text
    pub fn analyze_stylesheet(&self, content: &str) -> Vec<CssIssue> {
        isolate("stylesheet", || self.css.analyze(content))
    }

    /// Analyze a markup document and a stylesheet together
    pub fn analyze(&self, markup: &str, stylesheet: &str) -> Report {
        let (html_issues, css_issues) = if self.config.engine.parallel {
            rayon::join(
                || self.analyze_markup(markup),
                || self.analyze_stylesheet(stylesheet),
            )
        } else {
            (
                self.analyze_markup(markup),
                self.analyze_stylesheet(stylesheet),
            )
        };

        Report {
            html_issues,
            css_issues,
        }
    }
}

/// Run one analyzer, turning a panic into an empty issue list
fn isolate<T>(label: &str, analyze: impl FnOnce() -> Vec<T>) -> Vec<T> {
    match panic::catch_unwind(AssertUnwindSafe(analyze)) {
        Ok(issues) => issues,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::warn!("{} analyzer panicked: {}", label, message);
            Vec::new()
        }
    }
}

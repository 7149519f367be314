//! CSS analyzer

mod document;
pub mod rules;

pub use document::{
    AtRule, BlockDelimiter, ComponentValue, CssNode, Declaration, Position, StyleRule, Stylesheet,
    Value,
};
pub use rules::{DeclarationCheck, DeclarationRule, DECLARATION_RULES};

use crate::config::Config;
use crate::diagnostic::{CssIssue, Line};

/// Walks stylesheet declarations against the declaration rule catalogue
#[derive(Debug, Clone)]
pub struct CssAnalyzer {
    /// Active rules, in catalogue order
    rules: Vec<&'static DeclarationRule>,
}

impl Default for CssAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CssAnalyzer {
    /// Analyzer with every built-in rule enabled
    pub fn new() -> Self {
        Self {
            rules: DECLARATION_RULES.iter().collect(),
        }
    }

    /// Analyzer with the rules the configuration enables
    pub fn from_config(config: &Config) -> Self {
        Self {
            rules: DECLARATION_RULES
                .iter()
                .filter(|r| config.is_rule_enabled(r.id) && config.is_category_enabled(r.category))
                .collect(),
        }
    }

    /// Ids of the active rules
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }

    /// Analyze raw stylesheet text
    pub fn analyze(&self, content: &str) -> Vec<CssIssue> {
        let stylesheet = Stylesheet::parse(content);
        let issues = self.walk(&stylesheet);
        log::debug!("stylesheet analysis produced {} issue(s)", issues.len());
        issues
    }

    /// Apply the rules to every declaration of a parsed stylesheet
    pub fn walk(&self, stylesheet: &Stylesheet) -> Vec<CssIssue> {
        let mut issues = Vec::new();

        for declaration in stylesheet.declarations() {
            for rule in &self.rules {
                if rule.matches(declaration) {
                    issues.push(CssIssue::new(
                        rule.id,
                        &declaration.property,
                        rule.problem,
                        Line::Known(declaration.position.line),
                        rule.solution,
                    ));
                }
            }
        }

        issues
    }
}

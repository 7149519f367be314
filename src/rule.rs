//! Rule metadata shared by both analyzers

use crate::plugins::{css, html};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Content that assistive technology cannot interpret
    Accessibility,
    /// Markup that is likely broken or behaves unexpectedly
    Correctness,
    /// Maintainability and consistency
    #[default]
    Style,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Accessibility => write!(f, "accessibility"),
            RuleCategory::Correctness => write!(f, "correctness"),
            RuleCategory::Style => write!(f, "style"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accessibility" | "a11y" => Ok(RuleCategory::Accessibility),
            "correctness" => Ok(RuleCategory::Correctness),
            "style" => Ok(RuleCategory::Style),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Which document a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    Markup,
    Stylesheet,
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleScope::Markup => write!(f, "markup"),
            RuleScope::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Descriptive view of a rule, used for listing and explaining
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub scope: RuleScope,
    pub category: RuleCategory,
    /// Issue kind the rule reports
    pub summary: &'static str,
    /// Suggested fix attached to every issue
    pub solution: &'static str,
    /// What triggers the rule
    pub trigger: String,
}

/// All built-in rules, markup first, in evaluation order
pub fn all_rules() -> Vec<RuleInfo> {
    let mut rules = vec![html::closing::rule_info()];
    rules.extend(html::rules::ELEMENT_RULES.iter().map(|r| r.info()));
    rules.extend(css::rules::DECLARATION_RULES.iter().map(|r| r.info()));
    rules
}

/// Look up a rule by id
pub fn find_rule(id: &str) -> Option<RuleInfo> {
    all_rules().into_iter().find(|r| r.id == id)
}

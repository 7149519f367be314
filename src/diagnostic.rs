//! Issue records produced by the analyzers

use serde::{Serialize, Serializer};
use std::fmt;

/// Source line of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// 1-based line number
    Known(usize),
    /// Position could not be recovered from the source
    Unknown,
}

impl Default for Line {
    fn default() -> Self {
        Line::Known(1)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Known(n) => write!(f, "{}", n),
            Line::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Line::Known(n) => serializer.serialize_u64(*n as u64),
            Line::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

/// An issue found in a markup document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlIssue {
    /// Rule that emitted this issue
    #[serde(skip)]
    pub rule_id: &'static str,
    /// Issue kind, e.g. "Missing alt attribute"
    #[serde(rename = "type")]
    pub kind: String,
    /// Offending tag, e.g. "<img>"
    pub tag: String,
    pub line: Line,
    /// Suggested fix
    pub solution: String,
}

impl HtmlIssue {
    pub fn new(rule_id: &'static str, kind: &str, tag: &str, line: Line, solution: &str) -> Self {
        Self {
            rule_id,
            kind: kind.to_string(),
            tag: tag.to_string(),
            line,
            solution: solution.to_string(),
        }
    }
}

/// An issue found in a stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssIssue {
    /// Rule that emitted this issue
    #[serde(skip)]
    pub rule_id: &'static str,
    /// Property name as written
    pub property: String,
    /// Issue description, e.g. "Use 0 instead of 0px"
    pub problem: String,
    pub line: Line,
    /// Suggested fix
    pub solution: String,
}

impl CssIssue {
    pub fn new(
        rule_id: &'static str,
        property: &str,
        problem: &str,
        line: Line,
        solution: &str,
    ) -> Self {
        Self {
            rule_id,
            property: property.to_string(),
            problem: problem.to_string(),
            line,
            solution: solution.to_string(),
        }
    }
}

//! Built-in declaration rules

use super::document::Declaration;
use crate::rule::{RuleCategory, RuleInfo, RuleScope};

/// Condition a declaration must meet for the rule to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationCheck {
    /// The value holds this exact token at any depth
    ValueToken(&'static str),
    /// The property name starts with this prefix (ignoring ASCII case)
    PropertyPrefix(&'static str),
    /// The declaration is marked `!important`
    Important,
}

/// A rule evaluated against declaration nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationRule {
    pub id: &'static str,
    pub check: DeclarationCheck,
    pub category: RuleCategory,
    /// Problem reported
    pub problem: &'static str,
    pub solution: &'static str,
}

impl DeclarationRule {
    pub fn matches(&self, declaration: &Declaration) -> bool {
        match self.check {
            DeclarationCheck::ValueToken(literal) => declaration.value.contains_token(literal),
            DeclarationCheck::PropertyPrefix(prefix) => declaration
                .property
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
            DeclarationCheck::Important => declaration.important,
        }
    }

    pub fn info(&self) -> RuleInfo {
        let trigger = match self.check {
            DeclarationCheck::ValueToken(literal) => format!("value contains `{}`", literal),
            DeclarationCheck::PropertyPrefix(prefix) => {
                format!("property name starts with `{}`", prefix)
            }
            DeclarationCheck::Important => "declaration is marked `!important`".to_string(),
        };

        RuleInfo {
            id: self.id,
            scope: RuleScope::Stylesheet,
            category: self.category,
            summary: self.problem,
            solution: self.solution,
            trigger,
        }
    }
}

pub static DECLARATION_RULES: &[DeclarationRule] = &[
    DeclarationRule {
        id: "css-zero-unit",
        check: DeclarationCheck::ValueToken("0px"),
        category: RuleCategory::Style,
        problem: "Use 0 instead of 0px",
        solution: "Replace '0px' with '0'",
    },
    DeclarationRule {
        id: "css-font-shorthand",
        check: DeclarationCheck::PropertyPrefix("font-"),
        category: RuleCategory::Style,
        problem: "Consider using font shorthand",
        solution: "Use full 'font: ...' shorthand",
    },
    DeclarationRule {
        id: "css-background-shorthand",
        check: DeclarationCheck::PropertyPrefix("background-"),
        category: RuleCategory::Style,
        problem: "Consider using background shorthand",
        solution: "Use 'background: ...' shorthand",
    },
    DeclarationRule {
        id: "css-important",
        check: DeclarationCheck::Important,
        category: RuleCategory::Style,
        problem: "Avoid using !important unless necessary",
        solution: "Remove '!important' if possible",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::css::document::Stylesheet;

    fn rule(id: &str) -> &'static DeclarationRule {
        DECLARATION_RULES.iter().find(|r| r.id == id).unwrap()
    }

    fn first_declaration(content: &str) -> Declaration {
        Stylesheet::parse(content).declarations().next().cloned().unwrap()
    }

    #[test]
    fn test_zero_unit() {
        let rule = rule("css-zero-unit");
        assert!(rule.matches(&first_declaration("a { margin: 0px auto }")));
        assert!(!rule.matches(&first_declaration("a { margin: 10px }")));
        assert!(!rule.matches(&first_declaration("a { margin: 0 }")));
    }

    #[test]
    fn test_property_prefix() {
        let font = rule("css-font-shorthand");
        assert!(font.matches(&first_declaration("a { font-size: 1em }")));
        assert!(font.matches(&first_declaration("a { FONT-weight: bold }")));
        assert!(!font.matches(&first_declaration("a { font: 1em serif }")));
        assert!(!font.matches(&first_declaration("a { --font-size: 1em }")));

        let background = rule("css-background-shorthand");
        assert!(background.matches(&first_declaration("a { background-color: red }")));
        assert!(!background.matches(&first_declaration("a { background: red }")));
    }

    #[test]
    fn test_important() {
        let rule = rule("css-important");
        assert!(rule.matches(&first_declaration("a { color: red !important }")));
        assert!(!rule.matches(&first_declaration("a { color: red }")));
    }

    #[test]
    fn test_info() {
        let info = rule("css-font-shorthand").info();
        assert_eq!(info.trigger, "property name starts with `font-`");
        assert_eq!(info.scope, RuleScope::Stylesheet);
    }
}

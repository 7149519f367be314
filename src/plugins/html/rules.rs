//! Built-in element rules
//!
//! Evaluated in table order at every element node.

use super::document::Element;
use crate::rule::{RuleCategory, RuleInfo, RuleScope};

/// Condition an element must meet for the rule to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCheck {
    /// None of the listed attributes is present
    MissingAll(&'static [&'static str]),
    /// The attribute is present
    Has(&'static str),
}

/// A rule evaluated against element nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRule {
    pub id: &'static str,
    /// Tag the rule applies to (None = every element)
    pub tag: Option<&'static str>,
    pub check: ElementCheck,
    pub category: RuleCategory,
    /// Issue kind reported
    pub kind: &'static str,
    pub solution: &'static str,
}

impl ElementRule {
    /// Whether this rule fires on the element
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = self.tag {
            if !element.is(tag) {
                return false;
            }
        }

        match self.check {
            ElementCheck::MissingAll(attrs) => !attrs.iter().any(|a| element.has_attribute(a)),
            ElementCheck::Has(attr) => element.has_attribute(attr),
        }
    }

    pub fn info(&self) -> RuleInfo {
        let target = match self.tag {
            Some(tag) => format!("<{}>", tag),
            None => "any element".to_string(),
        };
        let trigger = match self.check {
            ElementCheck::MissingAll(attrs) => format!(
                "{} without {}",
                target,
                attrs
                    .iter()
                    .map(|a| format!("`{}`", a))
                    .collect::<Vec<_>>()
                    .join(" or ")
            ),
            ElementCheck::Has(attr) => format!("{} with a `{}` attribute", target, attr),
        };

        RuleInfo {
            id: self.id,
            scope: RuleScope::Markup,
            category: self.category,
            summary: self.kind,
            solution: self.solution,
            trigger,
        }
    }
}

pub static ELEMENT_RULES: &[ElementRule] = &[
    ElementRule {
        id: "html-img-alt",
        tag: Some("img"),
        check: ElementCheck::MissingAll(&["alt"]),
        category: RuleCategory::Accessibility,
        kind: "Missing alt attribute",
        solution: "Add alt=\"...\" attribute in <img>",
    },
    ElementRule {
        id: "html-lang",
        tag: Some("html"),
        check: ElementCheck::MissingAll(&["lang"]),
        category: RuleCategory::Accessibility,
        kind: "Missing lang attribute",
        solution: "Add lang=\"en\" in <html>",
    },
    ElementRule {
        id: "html-anchor-href",
        tag: Some("a"),
        check: ElementCheck::MissingAll(&["href"]),
        category: RuleCategory::Correctness,
        kind: "Missing href in anchor tag",
        solution: "Add href=\"...\" in <a>",
    },
    ElementRule {
        id: "html-label-for",
        tag: Some("label"),
        check: ElementCheck::MissingAll(&["for", "htmlFor"]),
        category: RuleCategory::Accessibility,
        kind: "Missing htmlFor attribute",
        solution: "Add htmlFor=\"...\" in <label>",
    },
    ElementRule {
        id: "html-button-type",
        tag: Some("button"),
        check: ElementCheck::MissingAll(&["type"]),
        category: RuleCategory::Correctness,
        kind: "Missing type attribute",
        solution: "Add type=\"button\" or type=\"submit\" in <button>",
    },
    ElementRule {
        id: "html-input-name",
        tag: Some("input"),
        check: ElementCheck::MissingAll(&["name"]),
        category: RuleCategory::Correctness,
        kind: "Missing name attribute",
        solution: "Add name=\"...\" in <input>",
    },
    ElementRule {
        id: "html-input-type",
        tag: Some("input"),
        check: ElementCheck::MissingAll(&["type"]),
        category: RuleCategory::Correctness,
        kind: "Missing type attribute",
        solution: "Add type=\"...\" in <input>",
    },
    ElementRule {
        id: "html-textarea-name",
        tag: Some("textarea"),
        check: ElementCheck::MissingAll(&["name"]),
        category: RuleCategory::Correctness,
        kind: "Missing name attribute",
        solution: "Add name=\"...\" in <textarea>",
    },
    ElementRule {
        id: "html-inline-style",
        tag: None,
        check: ElementCheck::Has("style"),
        category: RuleCategory::Style,
        kind: "Inline style detected",
        solution: "Move inline styles into the stylesheet",
    },
];

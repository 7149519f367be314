//! CSS stylesheet tree
//!
//! Built on the `cssparser` tokenizer with a recovering rule-body parser:
//! anything that does not form a rule or declaration is skipped up to the
//! next `;` or the end of the enclosing block.

use cssparser::{ParseError, Parser, ParserInput, SourceLocation, Token};
use std::fmt;

/// Source position (1-based line and column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl From<SourceLocation> for Position {
    fn from(location: SourceLocation) -> Self {
        Self {
            line: location.line as usize + 1,
            column: location.column as usize,
        }
    }
}

/// A node in the stylesheet tree
#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    Rule(StyleRule),
    AtRule(AtRule),
    Declaration(Declaration),
}

impl CssNode {
    pub fn kind(&self) -> &'static str {
        match self {
            CssNode::Rule(_) => "rule",
            CssNode::AtRule(_) => "atrule",
            CssNode::Declaration(_) => "declaration",
        }
    }

    pub fn children(&self) -> &[CssNode] {
        match self {
            CssNode::Rule(rule) => &rule.children,
            CssNode::AtRule(rule) => rule.children.as_deref().unwrap_or(&[]),
            CssNode::Declaration(_) => &[],
        }
    }

    pub fn position(&self) -> Position {
        match self {
            CssNode::Rule(rule) => rule.position,
            CssNode::AtRule(rule) => rule.position,
            CssNode::Declaration(declaration) => declaration.position,
        }
    }
}

/// `selector { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub position: Position,
    pub children: Vec<CssNode>,
}

/// `@name prelude;` or `@name prelude { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub prelude: String,
    pub position: Position,
    /// None for statement at-rules such as `@import`
    pub children: Option<Vec<CssNode>>,
}

/// `property: value [!important]`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name as written
    pub property: String,
    /// Value without the `!important` suffix
    pub value: Value,
    pub important: bool,
    /// Position of the property name
    pub position: Position,
}

/// Delimiters of a simple block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDelimiter {
    Parenthesis,
    Bracket,
    Brace,
}

impl BlockDelimiter {
    fn open(self) -> char {
        match self {
            BlockDelimiter::Parenthesis => '(',
            BlockDelimiter::Bracket => '[',
            BlockDelimiter::Brace => '{',
        }
    }

    fn close(self) -> char {
        match self {
            BlockDelimiter::Parenthesis => ')',
            BlockDelimiter::Bracket => ']',
            BlockDelimiter::Brace => '}',
        }
    }
}

/// One component of a declaration value
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A single token, as written in the source
    Token(String),
    Whitespace,
    Function {
        name: String,
        arguments: Vec<ComponentValue>,
    },
    Block {
        delimiter: BlockDelimiter,
        contents: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    fn is_token(&self, literal: &str) -> bool {
        matches!(self, ComponentValue::Token(text) if text.eq_ignore_ascii_case(literal))
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::Token(text) => f.write_str(text),
            ComponentValue::Whitespace => f.write_str(" "),
            ComponentValue::Function { name, arguments } => {
                write!(f, "{}(", name)?;
                for argument in arguments {
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
            ComponentValue::Block {
                delimiter,
                contents,
            } => {
                write!(f, "{}", delimiter.open())?;
                for value in contents {
                    write!(f, "{}", value)?;
                }
                write!(f, "{}", delimiter.close())
            }
        }
    }
}

/// A declaration value as a tree of component values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Value(pub Vec<ComponentValue>);

impl Value {
    /// Whether any token, at any nesting depth, is exactly `literal` (ignoring ASCII case)
    pub fn contains_token(&self, literal: &str) -> bool {
        fn walk(values: &[ComponentValue], literal: &str) -> bool {
            values.iter().any(|value| match value {
                ComponentValue::Function { arguments, .. } => walk(arguments, literal),
                ComponentValue::Block { contents, .. } => walk(contents, literal),
                other => other.is_token(literal),
            })
        }
        walk(&self.0, literal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.0 {
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// A parsed stylesheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub nodes: Vec<CssNode>,
}

impl Stylesheet {
    /// Parse stylesheet text. Malformed input is recovered, never rejected.
    pub fn parse(content: &str) -> Self {
        let mut input = ParserInput::new(content);
        let mut parser = Parser::new(&mut input);
        Self {
            nodes: parse_block_contents(&mut parser, 0),
        }
    }

    /// Iterate over all nodes, depth-first in document order
    pub fn iter(&self) -> impl Iterator<Item = &CssNode> + '_ {
        let mut stack: Vec<&CssNode> = self.nodes.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }

    /// Iterate over declarations in document order
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> + '_ {
        self.iter().filter_map(|node| match node {
            CssNode::Declaration(declaration) => Some(declaration),
            _ => None,
        })
    }
}

/// Blocks nested deeper than this are skipped unparsed
pub const MAX_NESTING: usize = 128;

fn parse_block_contents<'i>(input: &mut Parser<'i, '_>, depth: usize) -> Vec<CssNode> {
    let mut nodes = Vec::new();

    loop {
        skip_trivia(input);
        let start = input.state();
        let position = Position::from(input.current_source_location());
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::AtKeyword(name) => {
                nodes.push(CssNode::AtRule(parse_at_rule(input, &name, position, depth)));
            }
            Token::Ident(name) => {
                if let Some(declaration) = parse_declaration(input, &name, position) {
                    nodes.push(CssNode::Declaration(declaration));
                } else {
                    input.reset(&start);
                    if let Some(rule) = parse_qualified_rule(input, position, depth) {
                        nodes.push(CssNode::Rule(rule));
                    }
                }
            }
            _ => {
                input.reset(&start);
                if let Some(rule) = parse_qualified_rule(input, position, depth) {
                    nodes.push(CssNode::Rule(rule));
                }
            }
        }
    }

    nodes
}

/// Skip whitespace, comments, empty statements and stray closing brackets
fn skip_trivia(input: &mut Parser<'_, '_>) {
    loop {
        let state = input.state();
        let skip = match input.next_including_whitespace_and_comments() {
            Ok(token) => matches!(
                token,
                Token::WhiteSpace(_)
                    | Token::Comment(_)
                    | Token::Semicolon
                    | Token::CDO
                    | Token::CDC
                    | Token::CloseCurlyBracket
                    | Token::CloseParenthesis
                    | Token::CloseSquareBracket
            ),
            Err(_) => return,
        };
        if !skip {
            input.reset(&state);
            return;
        }
    }
}

fn skip_whitespace(input: &mut Parser<'_, '_>) {
    loop {
        let state = input.state();
        let skip = match input.next_including_whitespace_and_comments() {
            Ok(token) => matches!(token, Token::WhiteSpace(_) | Token::Comment(_)),
            Err(_) => return,
        };
        if !skip {
            input.reset(&state);
            return;
        }
    }
}

fn parse_at_rule(input: &mut Parser<'_, '_>, name: &str, position: Position, depth: usize) -> AtRule {
    let start = input.position();

    loop {
        let before = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => {
                return AtRule {
                    name: name.to_string(),
                    prelude: input.slice_from(start).trim().to_string(),
                    position,
                    children: None,
                }
            }
        };

        match token {
            Token::Semicolon => {
                return AtRule {
                    name: name.to_string(),
                    prelude: input.slice(start..before).trim().to_string(),
                    position,
                    children: None,
                }
            }
            Token::CurlyBracketBlock => {
                let prelude = input.slice(start..before).trim().to_string();
                let children = nested_rules(input, depth);
                return AtRule {
                    name: name.to_string(),
                    prelude,
                    position,
                    children: Some(children),
                };
            }
            _ => {}
        }
    }
}

/// Contents of the `{}` block just consumed
fn nested_rules<'i>(input: &mut Parser<'i, '_>, depth: usize) -> Vec<CssNode> {
    if depth >= MAX_NESTING {
        // Left unentered: the tokenizer skips the whole block on the next read
        log::debug!(
            "stylesheet nested deeper than {} levels, skipping block",
            MAX_NESTING
        );
        return Vec::new();
    }

    input
        .parse_nested_block(|nested| {
            Ok::<_, ParseError<'i, ()>>(parse_block_contents(nested, depth + 1))
        })
        .unwrap_or_default()
}

fn parse_qualified_rule(
    input: &mut Parser<'_, '_>,
    position: Position,
    depth: usize,
) -> Option<StyleRule> {
    let start = input.position();

    loop {
        let before = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return None,
        };

        match token {
            Token::CurlyBracketBlock => {
                let selector = input.slice(start..before).trim().to_string();
                let children = nested_rules(input, depth);
                return Some(StyleRule {
                    selector,
                    position,
                    children,
                });
            }
            Token::Semicolon => {
                log::trace!(
                    "dropping invalid statement at line {}: {}",
                    position.line,
                    input.slice(start..before).trim()
                );
                return None;
            }
            _ => {}
        }
    }
}

/// Parse `: value` after a property name.
///
/// Returns None when this is not a declaration (no colon, or the value holds a
/// `{}` block, which makes it a nested rule such as `a:hover { ... }`).
fn parse_declaration<'i>(
    input: &mut Parser<'i, '_>,
    property: &str,
    position: Position,
) -> Option<Declaration> {
    skip_whitespace(input);
    let is_colon = matches!(
        input.next_including_whitespace_and_comments(),
        Ok(&Token::Colon)
    );
    if !is_colon {
        return None;
    }

    let components = collect_values(input, true, 0)?;
    let (components, important) = strip_important(components);

    Some(Declaration {
        property: property.to_string(),
        value: Value(components),
        important,
        position,
    })
}

fn collect_values(
    input: &mut Parser<'_, '_>,
    top_level: bool,
    depth: usize,
) -> Option<Vec<ComponentValue>> {
    let mut values = Vec::new();

    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Semicolon | Token::CloseCurlyBracket if top_level => break,
            Token::CurlyBracketBlock if top_level => return None,
            Token::WhiteSpace(_) => values.push(ComponentValue::Whitespace),
            Token::Comment(_) => {}
            Token::Function(name) => {
                let arguments = nested_values(input, depth);
                values.push(ComponentValue::Function {
                    name: name.to_string(),
                    arguments,
                });
            }
            Token::ParenthesisBlock => values.push(ComponentValue::Block {
                delimiter: BlockDelimiter::Parenthesis,
                contents: nested_values(input, depth),
            }),
            Token::SquareBracketBlock => values.push(ComponentValue::Block {
                delimiter: BlockDelimiter::Bracket,
                contents: nested_values(input, depth),
            }),
            Token::CurlyBracketBlock => values.push(ComponentValue::Block {
                delimiter: BlockDelimiter::Brace,
                contents: nested_values(input, depth),
            }),
            _ => values.push(ComponentValue::Token(input.slice_from(start).to_string())),
        }
    }

    Some(values)
}

/// Contents of the function or block just consumed
fn nested_values<'i>(input: &mut Parser<'i, '_>, depth: usize) -> Vec<ComponentValue> {
    if depth >= MAX_NESTING {
        return Vec::new();
    }

    input
        .parse_nested_block(|nested| {
            let values = collect_values(nested, false, depth + 1).unwrap_or_default();
            Ok::<_, ParseError<'i, ()>>(values)
        })
        .unwrap_or_default()
}

/// Trim surrounding whitespace and split off a trailing `!important`
fn strip_important(mut values: Vec<ComponentValue>) -> (Vec<ComponentValue>, bool) {
    fn trim_end(values: &mut Vec<ComponentValue>) {
        while matches!(values.last(), Some(ComponentValue::Whitespace)) {
            values.pop();
        }
    }

    trim_end(&mut values);
    let leading = values
        .iter()
        .take_while(|v| matches!(v, ComponentValue::Whitespace))
        .count();
    values.drain(..leading);

    let mut important = false;
    if values.last().is_some_and(|v| v.is_token("important")) {
        let mut bang = values.len() - 1;
        while bang > 0 && matches!(values[bang - 1], ComponentValue::Whitespace) {
            bang -= 1;
        }
        if bang > 0 && values[bang - 1].is_token("!") {
            values.truncate(bang - 1);
            trim_end(&mut values);
            important = true;
        }
    }

    (values, important)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn declarations(content: &str) -> Vec<Declaration> {
        Stylesheet::parse(content).declarations().cloned().collect()
    }

    #[test]
    fn test_parse_simple_rule() {
        let sheet = Stylesheet::parse("a { margin: 0px; color: red }");
        assert_eq!(sheet.nodes.len(), 1);

        let CssNode::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected a rule");
        };
        assert_eq!(rule.selector, "a");
        assert_eq!(rule.children.len(), 2);

        let decls = declarations("a { margin: 0px; color: red }");
        assert_eq!(decls[0].property, "margin");
        assert_eq!(decls[0].value.to_string(), "0px");
        assert_eq!(decls[0].position, Position { line: 1, column: 5 });
        assert_eq!(decls[1].value.to_string(), "red");
    }

    #[test]
    fn test_declaration_positions() {
        let content = "body {\n  font-size: 12px;\n\n  background-color: #fff;\n}";
        let lines: Vec<_> = declarations(content)
            .iter()
            .map(|d| d.position.line)
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_important_is_stripped() {
        let decls = declarations("a { color: red !important; margin: 0 ! IMPORTANT }");
        assert!(decls[0].important);
        assert_eq!(decls[0].value.to_string(), "red");
        assert!(decls[1].important);
        assert_eq!(decls[1].value.to_string(), "0");
    }

    #[test]
    fn test_nested_values() {
        let decls = declarations("a { width: calc(100% - 0px); grid-area: [a] 1 }");
        assert_eq!(decls[0].value.to_string(), "calc(100% - 0px)");
        assert!(decls[0].value.contains_token("0px"));
        assert_eq!(decls[1].value.to_string(), "[a] 1");
    }

    #[test]
    fn test_contains_token_is_exact() {
        let decls = declarations("a { margin: 10px 0.5px; padding: 0PX }");
        assert!(!decls[0].value.contains_token("0px"));
        assert!(decls[1].value.contains_token("0px"));
    }

    #[test]
    fn test_at_rules() {
        let sheet = Stylesheet::parse(
            "@import url(a.css);\n@media (max-width: 600px) {\n  p { font-weight: bold; }\n}",
        );
        assert_eq!(sheet.nodes.len(), 2);

        let CssNode::AtRule(import) = &sheet.nodes[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(import.name, "import");
        assert_eq!(import.prelude, "url(a.css)");
        assert!(import.children.is_none());

        let CssNode::AtRule(media) = &sheet.nodes[1] else {
            panic!("expected an at-rule");
        };
        assert_eq!(media.prelude, "(max-width: 600px)");
        assert_eq!(media.position.line, 2);

        let decls: Vec<_> = sheet.declarations().collect();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "font-weight");
        assert_eq!(decls[0].position.line, 3);
    }

    #[test]
    fn test_nested_rule_with_pseudo_class() {
        let sheet = Stylesheet::parse(".card { color: red; a:hover { color: blue; } }");
        let kinds: Vec<_> = sheet.iter().map(CssNode::kind).collect();
        assert_eq!(kinds, vec!["rule", "declaration", "rule", "declaration"]);
    }

    #[test]
    fn test_unclosed_block_is_recovered() {
        let decls = declarations("a {\n  color: red;\n  margin: 0px");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].property, "margin");
        assert_eq!(decls[1].position.line, 3);
    }

    #[test]
    fn test_garbage_is_skipped() {
        let content = "}} ;; a { : red; color blue; ; margin: 1px } @@ b { padding: 2px }";
        let props: Vec<_> = declarations(content)
            .into_iter()
            .map(|d| d.property)
            .collect();
        assert_eq!(props, vec!["margin", "padding"]);
    }

    #[test]
    fn test_comments_are_ignored() {
        let decls = declarations("/* head */ a { /* x */ color /* y */ : /* z */ red; }");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "color");
        assert_eq!(decls[0].value.to_string(), "red");
    }

    #[test]
    fn test_deeply_nested_values() {
        let content = format!("a {{ margin: 0px {} }}", "(".repeat(10_000));
        let decls = declarations(&content);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "margin");
        assert!(decls[0].value.contains_token("0px"));
    }

    #[test]
    fn test_deeply_nested_rules() {
        let content = format!("{}color: red", "a { ".repeat(10_000));
        let sheet = Stylesheet::parse(&content);

        assert_eq!(sheet.nodes.len(), 1);
        assert_eq!(sheet.iter().count(), MAX_NESTING + 1);
        assert_eq!(sheet.declarations().count(), 0);
    }

    #[test]
    fn test_rules_within_nesting_limit_are_kept() {
        let content = format!("{}color: red", "a { ".repeat(10));
        let decls = declarations(&content);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "color");
    }

    #[test]
    fn test_empty_input() {
        assert!(Stylesheet::parse("").nodes.is_empty());
    }
}

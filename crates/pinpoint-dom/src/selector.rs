//! CSS selector parsing and matching
//!
//! Supports the subset Pinpoint generates plus the common forms a stored
//! selector may contain: type, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! structural pseudo-classes (`:nth-child()`, `:nth-of-type()`, their `-last-`
//! variants, `:first-child`, `:last-child`, `:first-of-type`, `:last-of-type`,
//! `:only-child`), all four combinators, and selector lists. Identifiers accept
//! CSS escapes. Anything else is rejected the way `querySelector` would throw.

use pinpoint_core::{PinpointError, Result};

use crate::document::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// `an+b` argument of a structural pseudo-class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nth {
    a: i64,
    b: i64,
}

impl Nth {
    fn matches(self, index: usize) -> bool {
        let k = index as i64;
        if self.a == 0 {
            return k == self.b;
        }
        let diff = k - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PseudoClass {
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    OnlyChild,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    pseudo_classes: Vec<PseudoClass>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    // Relation to the previous (left) part.
    combinator: Option<Combinator>,
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Vec<Part>>,
}

impl SelectorList {
    /// Whether `node` matches any selector in the list
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.is_element(node)
            && self
                .selectors
                .iter()
                .any(|parts| matches_from(doc, node, parts, parts.len() - 1))
    }
}

impl std::str::FromStr for SelectorList {
    type Err = PinpointError;

    fn from_str(s: &str) -> Result<Self> {
        parse_selector_list(s)
    }
}

/// Parse a selector list, rejecting anything `querySelector` would reject
pub fn parse_selector_list(selector: &str) -> Result<SelectorList> {
    let mut parser = Parser::new(selector);
    let list = parser
        .parse_list()
        .ok_or_else(|| PinpointError::InvalidSelector(selector.to_string()))?;
    Ok(list)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ws(c)) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Option<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(_) => return None,
            }
        }
        Some(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Option<Vec<Part>> {
        let mut parts = vec![Part {
            compound: self.parse_compound()?,
            combinator: None,
        }];

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return None,
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_ws();
            }
            parts.push(Part {
                compound: self.parse_compound()?,
                combinator: Some(combinator),
            });
        }

        Some(parts)
    }

    fn parse_compound(&mut self) -> Option<Compound> {
        let mut compound = Compound::default();

        while let Some(c) = self.peek() {
            match c {
                '*' => {
                    if !compound.is_empty() {
                        return None;
                    }
                    self.pos += 1;
                    compound.universal = true;
                }
                '#' => {
                    self.pos += 1;
                    let id = self.parse_ident()?;
                    if compound.id.replace(id).is_some() {
                        return None;
                    }
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                '[' => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                ':' => {
                    self.pos += 1;
                    compound.pseudo_classes.push(self.parse_pseudo()?);
                }
                c if is_ws(c) || matches!(c, '>' | '+' | '~' | ',') => break,
                _ => {
                    if !compound.is_empty() {
                        return None;
                    }
                    compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
                }
            }
        }

        if compound.is_empty() {
            None
        } else {
            Some(compound)
        }
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('-') => true,
                Some('\\') => self.peek_at(2).is_some_and(|c| c != '\n'),
                Some(c) => is_name_start(c),
                None => false,
            },
            Some('\\') => self.peek_at(1).is_some_and(|c| c != '\n'),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn parse_ident(&mut self) -> Option<String> {
        if !self.starts_ident() {
            return None;
        }
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                out.push(self.parse_escape()?);
            } else if is_name_char(c) {
                self.pos += 1;
                out.push(c);
            } else {
                break;
            }
        }
        Some(out)
    }

    // Called just past a backslash.
    fn parse_escape(&mut self) -> Option<char> {
        let first = self.peek()?;
        if first == '\n' {
            return None;
        }
        if !first.is_ascii_hexdigit() {
            self.pos += 1;
            return Some(first);
        }

        let mut code = 0u32;
        let mut digits = 0;
        while digits < 6 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    digits += 1;
                    self.pos += 1;
                }
                None => break,
            }
        }
        // One whitespace character terminates a hex escape.
        if matches!(self.peek(), Some(c) if is_ws(c)) {
            self.pos += 1;
        }

        if code == 0 {
            return Some('\u{FFFD}');
        }
        Some(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => out.push(self.parse_escape()?),
                c if c == quote => return Some(out),
                '\n' => return None,
                c => out.push(c),
            }
        }
    }

    fn parse_attr(&mut self) -> Option<AttrCondition> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        if self.eat(']') {
            return Some(AttrCondition::Exists(name));
        }
        if !self.eat('=') {
            return None;
        }
        self.skip_ws();
        let value = match self.peek()? {
            '"' | '\'' => self.parse_string()?,
            _ => self.parse_ident()?,
        };
        self.skip_ws();
        if !self.eat(']') {
            return None;
        }
        Some(AttrCondition::Equals(name, value))
    }

    fn parse_pseudo(&mut self) -> Option<PseudoClass> {
        let name = self.parse_ident()?.to_ascii_lowercase();
        let first = Nth { a: 0, b: 1 };

        let functional = |ctor: fn(Nth) -> PseudoClass, parser: &mut Parser| {
            if !parser.eat('(') {
                return None;
            }
            let start = parser.pos;
            while parser.peek()? != ')' {
                parser.pos += 1;
            }
            let raw: String = parser.chars[start..parser.pos].iter().collect();
            parser.pos += 1;
            parse_nth(&raw).map(ctor)
        };

        match name.as_str() {
            "nth-child" => functional(PseudoClass::NthChild, self),
            "nth-last-child" => functional(PseudoClass::NthLastChild, self),
            "nth-of-type" => functional(PseudoClass::NthOfType, self),
            "nth-last-of-type" => functional(PseudoClass::NthLastOfType, self),
            "first-child" => Some(PseudoClass::NthChild(first)),
            "last-child" => Some(PseudoClass::NthLastChild(first)),
            "first-of-type" => Some(PseudoClass::NthOfType(first)),
            "last-of-type" => Some(PseudoClass::NthLastOfType(first)),
            "only-child" => Some(PseudoClass::OnlyChild),
            _ => None,
        }
    }
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 0x80
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn parse_nth(raw: &str) -> Option<Nth> {
    let expr: String = raw
        .chars()
        .filter(|c| !is_ws(*c))
        .collect::<String>()
        .to_ascii_lowercase();

    match expr.as_str() {
        "" => return None,
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }

    let Some((a_part, b_part)) = expr.split_once('n') else {
        return Some(Nth {
            a: 0,
            b: parse_signed(&expr)?,
        });
    };

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        other => parse_signed(other)?,
    };
    let b = if b_part.is_empty() {
        0
    } else if b_part.starts_with('+') || b_part.starts_with('-') {
        parse_signed(b_part)?
    } else {
        return None;
    };
    Some(Nth { a, b })
}

fn parse_signed(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn matches_from(doc: &Document, node: NodeId, parts: &[Part], index: usize) -> bool {
    let part = &parts[index];
    if !matches_compound(doc, node, &part.compound) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match part.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => doc
            .parent_element(node)
            .is_some_and(|parent| matches_from(doc, parent, parts, index - 1)),
        Combinator::Descendant => {
            let mut cursor = doc.parent_element(node);
            while let Some(ancestor) = cursor {
                if matches_from(doc, ancestor, parts, index - 1) {
                    return true;
                }
                cursor = doc.parent_element(ancestor);
            }
            false
        }
        Combinator::AdjacentSibling => previous_element_sibling(doc, node)
            .is_some_and(|sibling| matches_from(doc, sibling, parts, index - 1)),
        Combinator::GeneralSibling => {
            let mut cursor = previous_element_sibling(doc, node);
            while let Some(sibling) = cursor {
                if matches_from(doc, sibling, parts, index - 1) {
                    return true;
                }
                cursor = previous_element_sibling(doc, sibling);
            }
            false
        }
    }
}

fn matches_compound(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if !element.tag_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &compound.id {
        if element.attrs.get("id") != Some(id) {
            return false;
        }
    }

    if compound
        .classes
        .iter()
        .any(|class_name| !element.has_class(class_name))
    {
        return false;
    }

    for cond in &compound.attrs {
        let matched = match cond {
            AttrCondition::Exists(name) => element.attrs.contains_key(name),
            AttrCondition::Equals(name, value) => element.attrs.get(name) == Some(value),
        };
        if !matched {
            return false;
        }
    }

    compound
        .pseudo_classes
        .iter()
        .all(|pseudo| matches_pseudo(doc, node, pseudo))
}

fn matches_pseudo(doc: &Document, node: NodeId, pseudo: &PseudoClass) -> bool {
    let siblings = element_siblings(doc, node);
    let Some(position) = siblings.iter().position(|s| *s == node) else {
        return false;
    };

    let tag = doc.tag_name(node);
    let same_type: Vec<NodeId> = siblings
        .iter()
        .copied()
        .filter(|s| doc.tag_name(*s) == tag)
        .collect();
    let type_position = same_type.iter().position(|s| *s == node).unwrap_or(0);

    match pseudo {
        PseudoClass::NthChild(nth) => nth.matches(position + 1),
        PseudoClass::NthLastChild(nth) => nth.matches(siblings.len() - position),
        PseudoClass::NthOfType(nth) => nth.matches(type_position + 1),
        PseudoClass::NthLastOfType(nth) => nth.matches(same_type.len() - type_position),
        PseudoClass::OnlyChild => siblings.len() == 1,
    }
}

fn element_siblings(doc: &Document, node: NodeId) -> Vec<NodeId> {
    match doc.parent(node) {
        Some(parent) => doc.element_children(parent),
        None => vec![node],
    }
}

fn previous_element_sibling(doc: &Document, node: NodeId) -> Option<NodeId> {
    let siblings = element_siblings(doc, node);
    let position = siblings.iter().position(|s| *s == node)?;
    position.checked_sub(1).map(|p| siblings[p])
}

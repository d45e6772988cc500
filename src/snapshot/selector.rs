//! CSS Selector Subset
//!
//! Enough of the selector grammar to drive the component matcher table
//! against a static snapshot:
//!
//! - type (`button`), universal (`*`), class (`.btn`), id (`#main`)
//! - attributes: `[attr]`, `=`, `*=`, `^=`, `$=`, `~=` with quoted or bare values
//! - descendant (` `) and child (`>`) combinators
//! - selector lists (`a, b`)
//!
//! Pseudo-classes and sibling combinators are rejected.

use super::page::{PageSnapshot, SnapshotElement};
use crate::types::{HarvestError, Result};

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(Vec<ComplexSelector>);

#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrSelector {
    name: String,
    op: Option<(AttrOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Contains,
    Prefix,
    Suffix,
    Word,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let fail = |reason: String| HarvestError::Selector {
            selector: input.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for part in split_top_level(input) {
            let part = part.trim();
            if part.is_empty() {
                return Err(fail("empty selector in list".to_string()));
            }
            alternatives.push(parse_complex(part).map_err(fail)?);
        }
        Ok(Self(alternatives))
    }

    /// Whether the element at `index` matches any alternative
    pub fn matches(&self, page: &PageSnapshot, index: usize) -> bool {
        self.0.iter().any(|complex| complex.matches(page, index))
    }
}

impl ComplexSelector {
    fn matches(&self, page: &PageSnapshot, index: usize) -> bool {
        let Some(last) = self.compounds.len().checked_sub(1) else {
            return false;
        };
        match page.element(index) {
            Some(el) if self.compounds[last].matches(el) => self.match_ancestors(page, last, index),
            _ => false,
        }
    }

    /// `compounds[pos]` already matched the element at `index`
    fn match_ancestors(&self, page: &PageSnapshot, pos: usize, index: usize) -> bool {
        if pos == 0 {
            return true;
        }
        let target = &self.compounds[pos - 1];

        match self.combinators[pos - 1] {
            Combinator::Child => match page.parent_of(index) {
                Some(parent) => {
                    page.element(parent).is_some_and(|el| target.matches(el))
                        && self.match_ancestors(page, pos - 1, parent)
                }
                None => false,
            },
            Combinator::Descendant => {
                let mut current = page.parent_of(index);
                while let Some(ancestor) = current {
                    if page.element(ancestor).is_some_and(|el| target.matches(el))
                        && self.match_ancestors(page, pos - 1, ancestor)
                    {
                        return true;
                    }
                    current = page.parent_of(ancestor);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, el: &SnapshotElement) -> bool {
        if let Some(tag) = &self.tag
            && !el.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if !self.ids.iter().all(|id| el.id.as_deref() == Some(id.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|c| el.classes.iter().any(|ec| ec == c)) {
            return false;
        }
        self.attrs.iter().all(|attr| attr.matches(el))
    }
}

impl AttrSelector {
    fn matches(&self, el: &SnapshotElement) -> bool {
        let Some(actual) = el.attribute(&self.name) else {
            return false;
        };
        match &self.op {
            None => true,
            Some((AttrOp::Equals, v)) => actual == *v,
            Some((AttrOp::Contains, v)) => !v.is_empty() && actual.contains(v.as_str()),
            Some((AttrOp::Prefix, v)) => !v.is_empty() && actual.starts_with(v.as_str()),
            Some((AttrOp::Suffix, v)) => !v.is_empty() && actual.ends_with(v.as_str()),
            Some((AttrOp::Word, v)) => actual.split_whitespace().any(|w| w == v),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Split on commas outside brackets and quotes
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_complex(input: &str) -> std::result::Result<ComplexSelector, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        if chars[i] == '>' {
            if compounds.is_empty() || pending.is_some() {
                return Err("dangling '>' combinator".to_string());
            }
            pending = Some(Combinator::Child);
            i += 1;
            continue;
        }
        if matches!(chars[i], '+' | '~') {
            return Err(format!("sibling combinator '{}' is not supported", chars[i]));
        }

        if !compounds.is_empty() {
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        }
        compounds.push(parse_compound(&chars, &mut i)?);
    }

    if pending.is_some() {
        return Err("selector ends with a combinator".to_string());
    }
    if compounds.is_empty() {
        return Err("empty selector".to_string());
    }

    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn parse_compound(chars: &[char], i: &mut usize) -> std::result::Result<Compound, String> {
    let mut compound = Compound::default();
    let start = *i;

    if chars[*i] == '*' {
        *i += 1;
    } else if is_ident_char(chars[*i]) {
        compound.tag = Some(read_ident(chars, i).to_ascii_lowercase());
    }

    while *i < chars.len() {
        match chars[*i] {
            '.' => {
                *i += 1;
                let name = read_ident(chars, i);
                if name.is_empty() {
                    return Err("expected class name after '.'".to_string());
                }
                compound.classes.push(name);
            }
            '#' => {
                *i += 1;
                let name = read_ident(chars, i);
                if name.is_empty() {
                    return Err("expected id after '#'".to_string());
                }
                compound.ids.push(name);
            }
            '[' => {
                *i += 1;
                compound.attrs.push(parse_attr(chars, i)?);
            }
            ':' => return Err("pseudo-classes are not supported".to_string()),
            c if c.is_whitespace() || c == '>' => break,
            c => return Err(format!("unexpected character '{}'", c)),
        }
    }

    if *i == start {
        return Err("expected a selector".to_string());
    }
    Ok(compound)
}

fn skip_ws(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

/// Parse after the opening `[`, consuming the closing `]`
fn parse_attr(chars: &[char], i: &mut usize) -> std::result::Result<AttrSelector, String> {
    skip_ws(chars, i);
    let name = read_ident(chars, i).to_ascii_lowercase();
    if name.is_empty() {
        return Err("expected attribute name".to_string());
    }
    skip_ws(chars, i);

    let Some(&c) = chars.get(*i) else {
        return Err("unclosed attribute selector".to_string());
    };
    if c == ']' {
        *i += 1;
        return Ok(AttrSelector { name, op: None });
    }

    let op = match (c, chars.get(*i + 1)) {
        ('=', _) => {
            *i += 1;
            AttrOp::Equals
        }
        ('*', Some('=')) => {
            *i += 2;
            AttrOp::Contains
        }
        ('^', Some('=')) => {
            *i += 2;
            AttrOp::Prefix
        }
        ('$', Some('=')) => {
            *i += 2;
            AttrOp::Suffix
        }
        ('~', Some('=')) => {
            *i += 2;
            AttrOp::Word
        }
        _ => return Err(format!("unsupported attribute operator at '{}'", c)),
    };
    skip_ws(chars, i);

    let value = match chars.get(*i) {
        Some(&q @ ('"' | '\'')) => {
            *i += 1;
            let start = *i;
            while *i < chars.len() && chars[*i] != q {
                *i += 1;
            }
            if *i >= chars.len() {
                return Err("unterminated attribute value".to_string());
            }
            let value: String = chars[start..*i].iter().collect();
            *i += 1;
            value
        }
        Some(_) => read_ident(chars, i),
        None => return Err("unclosed attribute selector".to_string()),
    };
    skip_ws(chars, i);

    if chars.get(*i) != Some(&']') {
        return Err("expected ']'".to_string());
    }
    *i += 1;

    Ok(AttrSelector {
        name,
        op: Some((op, value)),
    })
}

//! Shape selectors: `*`, `#name` and bare type tags.

use std::fmt;

use crate::model::Shape;

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    All,
    Id(String),
    Type(String),
}

impl Selector {
    /// Parse a selector string, `None` for anything that is not `*`,
    /// `#ident` or `ident` (an identifier starts with a lowercase ASCII
    /// letter followed by word characters or `-`).
    pub fn parse(input: &str) -> Option<Selector> {
        if input == "*" {
            return Some(Selector::All);
        }
        match input.strip_prefix('#') {
            Some(name) if is_identifier(name) => Some(Selector::Id(name.to_string())),
            Some(_) => None,
            None if is_identifier(input) => Some(Selector::Type(input.to_string())),
            None => None,
        }
    }

    pub fn matches(&self, shape: &Shape) -> bool {
        match self {
            Selector::All => true,
            Selector::Id(name) => shape.name() == Some(name.as_str()),
            Selector::Type(tag) => shape.type_tag() == tag,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "*"),
            Selector::Id(name) => write!(f, "#{}", name),
            Selector::Type(tag) => write!(f, "{}", tag),
        }
    }
}

/// Identifier accepted by selectors and by `Scene::set_name`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

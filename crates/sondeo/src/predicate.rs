//! Predicates evaluated over a query result.

use crate::dom::ElementHandle;
use std::fmt;

/// Expected state of a queried element set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// At least one element matched
    Exists,
    /// No element matched
    NotExists,
    /// At least one matched element is visible
    Visible,
    /// Some matched element's text contains the string
    ContainsText(String),
    /// Exactly this many elements matched
    HasCount(usize),
    /// Some matched element carries the attribute (with the value, if given)
    HasAttribute {
        /// Attribute name
        name: String,
        /// Expected value, or `None` for presence only
        value: Option<String>,
    },
}

impl Predicate {
    /// Attribute presence predicate
    #[must_use]
    pub fn has_attribute(name: impl Into<String>) -> Self {
        Self::HasAttribute {
            name: name.into(),
            value: None,
        }
    }

    /// Attribute value predicate
    #[must_use]
    pub fn attribute_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::HasAttribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Evaluate against a query result
    #[must_use]
    pub fn evaluate(&self, elements: &[ElementHandle]) -> bool {
        match self {
            Self::Exists => !elements.is_empty(),
            Self::NotExists => elements.is_empty(),
            Self::Visible => elements.iter().any(|e| e.visible),
            Self::ContainsText(text) => elements.iter().any(|e| e.text_content.contains(text)),
            Self::HasCount(expected) => elements.len() == *expected,
            Self::HasAttribute { name, value } => elements.iter().any(|e| {
                e.attribute(name)
                    .is_some_and(|actual| value.as_deref().map_or(true, |v| v == actual))
            }),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exist"),
            Self::NotExists => write!(f, "not exist"),
            Self::Visible => write!(f, "be visible"),
            Self::ContainsText(text) => write!(f, "contain text {text:?}"),
            Self::HasCount(n) => write!(f, "have count {n}"),
            Self::HasAttribute { name, value: None } => write!(f, "have attribute {name:?}"),
            Self::HasAttribute {
                name,
                value: Some(value),
            } => write!(f, "have attribute {name:?} = {value:?}"),
        }
    }
}

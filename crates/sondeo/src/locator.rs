//! Selectors describing what a DOM query should return.
//!
//! A selector is opaque to the polling core: it is handed to the [`Dom`]
//! collaborator, which resolves it to zero or more elements. The only thing
//! the core does with a selector is describe it in diagnostics.
//!
//! [`Dom`]: crate::dom::Dom

use regex::Regex;
use std::fmt;

/// A compiled text pattern, comparable by its source string
#[derive(Debug, Clone)]
pub struct TextPattern(Regex);

impl TextPattern {
    /// Compile a pattern
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is not a valid regular expression
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Pattern source
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the text contains a match
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextPattern {}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "#searchBox")
    Css(String),
    /// Any element whose text contains the given string
    Text(String),
    /// Any element whose text matches a regular expression
    Pattern(TextPattern),
    /// CSS selector filtered by contained text
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a pattern selector
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is not a valid regular expression
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        TextPattern::new(pattern).map(Self::Pattern)
    }

    /// Filter a CSS selector by text content.
    ///
    /// Non-CSS selectors are returned unchanged.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::Css(css) => Self::CssWithText {
                css,
                text: text.into(),
            },
            other => other,
        }
    }

    /// The CSS part of the selector, if any
    #[must_use]
    pub fn css_part(&self) -> Option<&str> {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => Some(css),
            Self::Text(_) | Self::Pattern(_) => None,
        }
    }

    /// Whether an element's text satisfies the selector's text filter.
    ///
    /// Pure CSS selectors have no text filter and accept any text.
    #[must_use]
    pub fn accepts_text(&self, text: &str) -> bool {
        match self {
            Self::Css(_) => true,
            Self::Text(needle) | Self::CssWithText { text: needle, .. } => text.contains(needle),
            Self::Pattern(pattern) => pattern.is_match(text),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css {css:?}"),
            Self::Text(text) => write!(f, "text {text:?}"),
            Self::Pattern(pattern) => write!(f, "pattern /{}/", pattern.as_str()),
            Self::CssWithText { css, text } => write!(f, "css {css:?} containing {text:?}"),
        }
    }
}

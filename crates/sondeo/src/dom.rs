//! DOM collaborator seam.
//!
//! Sondeo never talks to a browser itself. Everything it knows about the page
//! comes through the [`Dom`] trait: queries return snapshots of the matching
//! elements, actions target a previously returned [`ElementHandle`], and
//! [`Dom::capture_view`] hands back the rendered view for screenshots.
//!
//! Implementations:
//!
//! - a real browser driver, supplied by the caller
//! - [`mock::MockDom`] - scripted document timeline for unit tests

pub mod mock;

use crate::locator::Selector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Result type for DOM collaborator calls
pub type DomResult<T> = Result<T, DomError>;

/// Errors reported by the DOM collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The element or document was detached by a re-render mid-query
    #[error("element detached from document: {0}")]
    Detached(String),
    /// The document is not in a queryable state (navigating, unloaded)
    #[error("document not ready: {0}")]
    InvalidDocument(String),
    /// The element exists but cannot receive the action
    #[error("element not actionable: {0}")]
    NotActionable(String),
    /// View capture failed
    #[error("capture failed: {0}")]
    Capture(String),
}

/// Snapshot of one element returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier for the element
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content
    pub text_content: String,
    /// Whether the element is rendered and not hidden
    pub visible: bool,
    /// Element attributes
    pub attributes: BTreeMap<String, String>,
}

impl ElementHandle {
    /// Create a visible element with a fresh id and no text
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tag_name: tag_name.into(),
            text_content: String::new(),
            visible: true,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark the element as hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Attribute value by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Captured view of the page
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub const fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Check if screenshot has data
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }
}

/// DOM query and action collaborator.
///
/// Queries must be read-only: the polling loop calls [`Dom::query`] as often
/// as it likes.
#[async_trait]
pub trait Dom: Send + Sync {
    /// Return every element currently matching the selector
    async fn query(&self, selector: &Selector) -> DomResult<Vec<ElementHandle>>;

    /// Click an element
    async fn click(&self, element: &ElementHandle) -> DomResult<()>;

    /// Clear an input element
    async fn clear(&self, element: &ElementHandle) -> DomResult<()>;

    /// Type text into an input element
    async fn type_text(&self, element: &ElementHandle, text: &str) -> DomResult<()>;

    /// Capture the currently rendered view
    async fn capture_view(&self) -> DomResult<Screenshot>;
}

/// One-line summary of a query result for diagnostics
#[must_use]
pub fn summarize(elements: &[ElementHandle]) -> String {
    if elements.is_empty() {
        return "0 element(s)".to_string();
    }
    let visible = elements.iter().filter(|e| e.visible).count();
    let texts: Vec<String> = elements
        .iter()
        .take(3)
        .map(|e| format!("<{}> {:?}", e.tag_name, truncate(&e.text_content, 40)))
        .collect();
    let more = if elements.len() > 3 { ", ..." } else { "" };
    format!(
        "{} element(s), {visible} visible: [{}{more}]",
        elements.len(),
        texts.join(", ")
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

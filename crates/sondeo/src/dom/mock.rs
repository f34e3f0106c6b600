//! Scripted in-memory DOM for unit tests.
//!
//! A [`MockDom`] holds a timeline of [`MockDocument`] phases. Each phase
//! becomes current once its offset has elapsed since the mock was created,
//! which lets tests model elements that render late or a document that is
//! briefly detached mid re-render. Time is read from `tokio::time`, so the
//! timeline follows paused test time.

use super::{Dom, DomError, DomResult, ElementHandle, Screenshot};
use crate::locator::Selector;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Static document contents for one phase of the timeline
#[derive(Debug, Clone, Default)]
pub struct MockDocument {
    css: BTreeMap<String, Vec<ElementHandle>>,
    text_nodes: Vec<ElementHandle>,
    detached: bool,
}

impl MockDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document that fails every query as detached
    #[must_use]
    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    /// Register an element that answers to a CSS selector
    #[must_use]
    pub fn with_css(mut self, css: impl Into<String>, element: ElementHandle) -> Self {
        self.css.entry(css.into()).or_default().push(element);
        self
    }

    /// Register an element only reachable through text queries
    #[must_use]
    pub fn with_text_node(mut self, element: ElementHandle) -> Self {
        self.text_nodes.push(element);
        self
    }

    fn all_elements(&self) -> impl Iterator<Item = &ElementHandle> {
        self.css.values().flatten().chain(self.text_nodes.iter())
    }

    fn contains(&self, id: &str) -> bool {
        self.all_elements().any(|e| e.id == id)
    }

    fn resolve(&self, selector: &Selector) -> DomResult<Vec<ElementHandle>> {
        if self.detached {
            return Err(DomError::Detached(selector.to_string()));
        }

        let candidates: Vec<&ElementHandle> = match selector.css_part() {
            Some(css) => self.css.get(css).into_iter().flatten().collect(),
            None => self.all_elements().collect(),
        };

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|e| selector.accepts_text(&e.text_content))
            .filter(|e| seen.insert(e.id.clone()))
            .cloned()
            .collect())
    }
}

/// Scripted DOM collaborator with call history
#[derive(Debug)]
pub struct MockDom {
    phases: Vec<(Duration, MockDocument)>,
    origin: Instant,
    screenshot: Option<Screenshot>,
    history: Mutex<Vec<String>>,
    queries: AtomicUsize,
}

impl MockDom {
    /// Create a mock whose document never changes
    #[must_use]
    pub fn new(document: MockDocument) -> Self {
        Self {
            phases: vec![(Duration::ZERO, document)],
            origin: Instant::now(),
            screenshot: None,
            history: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Switch to `document` once `offset` has elapsed since creation
    #[must_use]
    pub fn then_at(mut self, offset: Duration, document: MockDocument) -> Self {
        self.phases.push((offset, document));
        self.phases.sort_by_key(|(at, _)| *at);
        self
    }

    /// Set the view returned by [`Dom::capture_view`]
    #[must_use]
    pub fn with_screenshot(mut self, screenshot: Screenshot) -> Self {
        self.screenshot = Some(screenshot);
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if an action with this prefix was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    /// Number of queries served so far
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn current(&self) -> &MockDocument {
        let elapsed = self.origin.elapsed();
        self.phases
            .iter()
            .rev()
            .find(|(at, _)| *at <= elapsed)
            .map_or(&self.phases[0].1, |(_, doc)| doc)
    }

    fn record(&self, entry: String) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn actionable(&self, element: &ElementHandle) -> DomResult<()> {
        let document = self.current();
        if document.detached {
            return Err(DomError::Detached(element.id.clone()));
        }
        if !document.contains(&element.id) {
            return Err(DomError::Detached(element.id.clone()));
        }
        if !element.visible {
            return Err(DomError::NotActionable(format!(
                "<{}> {} is hidden",
                element.tag_name, element.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Dom for MockDom {
    async fn query(&self, selector: &Selector) -> DomResult<Vec<ElementHandle>> {
        let _ = self.queries.fetch_add(1, Ordering::SeqCst);
        self.current().resolve(selector)
    }

    async fn click(&self, element: &ElementHandle) -> DomResult<()> {
        self.actionable(element)?;
        self.record(format!("click:{}", element.id));
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> DomResult<()> {
        self.actionable(element)?;
        self.record(format!("clear:{}", element.id));
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> DomResult<()> {
        self.actionable(element)?;
        self.record(format!("type:{}:{text}", element.id));
        Ok(())
    }

    async fn capture_view(&self) -> DomResult<Screenshot> {
        self.record("capture_view".to_string());
        self.screenshot
            .clone()
            .ok_or_else(|| DomError::Capture("no mock screenshot set".to_string()))
    }
}

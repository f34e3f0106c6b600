//! Polling assertions.
//!
//! A [`PollingAssertion`] re-runs a DOM query and re-checks a [`Predicate`]
//! until the predicate holds or the timeout budget is spent. Callers never
//! sleep for a fixed duration themselves.
//!
//! - A query that errors (detached element, document mid re-render) counts as
//!   "not yet satisfied" and is retried.
//! - The last sleep is clamped to the remaining budget, so a timeout is
//!   reported no earlier than the budget and no later than one interval past it.
//! - A query still pending when the budget runs out is abandoned, and a
//!   success that only arrives after the budget does not count.
//! - Sleeping goes through `tokio::time`, so tests can run the loop under
//!   paused time.

use crate::dom::{self, Dom, ElementHandle};
use crate::locator::Selector;
use crate::predicate::Predicate;
use crate::result::{SondeoError, SondeoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default timeout for polling assertions (4 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 4_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Timeout budget and polling interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Total timeout in milliseconds
    pub timeout_ms: u64,
    /// Interval between attempts in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollingConfig {
    /// Create a config with the given timeout and the default interval
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration (never below 1ms)
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// What to query and what must hold for the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Query descriptor handed to the DOM collaborator
    pub selector: Selector,
    /// Expected predicate over the query result
    pub predicate: Predicate,
}

impl Condition {
    /// Create a condition
    #[must_use]
    pub const fn new(selector: Selector, predicate: Predicate) -> Self {
        Self {
            selector,
            predicate,
        }
    }

    /// Selector must match at least one visible element
    #[must_use]
    pub const fn visible(selector: Selector) -> Self {
        Self::new(selector, Predicate::Visible)
    }

    /// Selector must match at least one element
    #[must_use]
    pub const fn exists(selector: Selector) -> Self {
        Self::new(selector, Predicate::Exists)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.selector, self.predicate)
    }
}

/// Successful outcome of a polling assertion
#[derive(Debug, Clone)]
pub struct Matched {
    /// The query result that satisfied the predicate
    pub elements: Vec<ElementHandle>,
    /// Number of attempts, including the successful one
    pub attempts: usize,
    /// Time from the first attempt to success
    pub elapsed: Duration,
}

impl Matched {
    /// First matched element
    #[must_use]
    pub fn first(&self) -> Option<&ElementHandle> {
        self.elements.first()
    }
}

/// A condition plus its timing budget
#[derive(Debug, Clone)]
pub struct PollingAssertion {
    condition: Condition,
    config: PollingConfig,
}

impl PollingAssertion {
    /// Create an assertion with the default config
    #[must_use]
    pub fn new(selector: Selector, predicate: Predicate) -> Self {
        Self::from_condition(Condition::new(selector, predicate))
    }

    /// Create an assertion from a condition
    #[must_use]
    pub fn from_condition(condition: Condition) -> Self {
        Self {
            condition,
            config: PollingConfig::default(),
        }
    }

    /// Set the full config
    #[must_use]
    pub const fn with_config(mut self, config: PollingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// The condition being checked
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The timing budget
    #[must_use]
    pub const fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Query and evaluate exactly once, without waiting.
    ///
    /// The query itself is still bounded by the timeout budget.
    ///
    /// # Errors
    ///
    /// Returns `TimeoutExceeded` with one attempt if the predicate does not hold
    pub async fn check_once<D: Dom + ?Sized>(&self, dom: &D) -> SondeoResult<Matched> {
        let start = Instant::now();
        match self.attempt_within(dom, self.config.timeout()).await {
            Ok(elements) => Ok(Matched {
                elements,
                attempts: 1,
                elapsed: start.elapsed(),
            }),
            Err(last_observed) => Err(self.timeout_error(last_observed, 1, start.elapsed())),
        }
    }

    /// Poll until the predicate holds or the timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns `TimeoutExceeded` carrying the last observed state when no
    /// attempt within the budget succeeded
    pub async fn verify<D: Dom + ?Sized>(&self, dom: &D) -> SondeoResult<Matched> {
        let start = Instant::now();
        let timeout = self.config.timeout();
        let interval = self.config.poll_interval();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let remaining = timeout.saturating_sub(start.elapsed());
            let last_observed = match self.attempt_within(dom, remaining).await {
                Ok(_) if start.elapsed() > timeout => {
                    "satisfied only after the budget ran out".to_string()
                }
                Ok(elements) => {
                    let elapsed = start.elapsed();
                    debug!(
                        condition = %self.condition,
                        attempts,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "condition satisfied"
                    );
                    return Ok(Matched {
                        elements,
                        attempts,
                        elapsed,
                    });
                }
                Err(observed) => observed,
            };

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                warn!(
                    condition = %self.condition,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    last_observed = %last_observed,
                    "condition timed out"
                );
                return Err(self.timeout_error(last_observed, attempts, elapsed));
            }

            tokio::time::sleep(interval.min(timeout - elapsed)).await;
        }
    }

    /// One attempt, abandoned once `budget` has passed
    async fn attempt_within<D: Dom + ?Sized>(
        &self,
        dom: &D,
        budget: Duration,
    ) -> Result<Vec<ElementHandle>, String> {
        match tokio::time::timeout(budget, self.attempt(dom)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(condition = %self.condition, "query abandoned at the budget");
                Err(format!(
                    "query did not complete within budget ({}ms)",
                    self.config.timeout_ms
                ))
            }
        }
    }

    /// One query plus evaluation. `Err` carries a summary of what was seen.
    async fn attempt<D: Dom + ?Sized>(&self, dom: &D) -> Result<Vec<ElementHandle>, String> {
        match dom.query(&self.condition.selector).await {
            Ok(elements) if self.condition.predicate.evaluate(&elements) => Ok(elements),
            Ok(elements) => {
                let summary = dom::summarize(&elements);
                debug!(condition = %self.condition, observed = %summary, "not yet satisfied");
                Err(summary)
            }
            Err(err) => {
                debug!(condition = %self.condition, error = %err, "transient query error");
                Err(format!("query error: {err}"))
            }
        }
    }

    fn timeout_error(&self, last_observed: String, attempts: usize, elapsed: Duration) -> SondeoError {
        SondeoError::TimeoutExceeded {
            predicate: self.condition.predicate.to_string(),
            selector: self.condition.selector.to_string(),
            last_observed,
            attempts,
            elapsed,
        }
    }
}

/// Poll a condition with the given config
///
/// # Errors
///
/// Returns `TimeoutExceeded` if the condition never holds within the budget
pub async fn poll<D: Dom + ?Sized>(
    dom: &D,
    condition: Condition,
    config: PollingConfig,
) -> SondeoResult<Matched> {
    PollingAssertion::from_condition(condition)
        .with_config(config)
        .verify(dom)
        .await
}

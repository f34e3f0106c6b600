//! Page Object Model support.
//!
//! Page objects are short-lived values built per test from a [`PageContext`]
//! (the DOM collaborator plus configuration). They hold no state of their own
//! and contain no logic beyond sequencing polling assertions and actions.

use crate::config::SondeoConfig;
use crate::dom::{Dom, DomError, ElementHandle};
use crate::locator::Selector;
use crate::polling::{Condition, Matched, PollingAssertion, PollingConfig};
use crate::result::{SondeoError, SondeoResult};
use std::fmt;
use tracing::debug;

/// A page or component in the UI under test.
///
/// # Example
///
/// ```ignore
/// struct CartPage<'a, D: ?Sized> {
///     ctx: PageContext<'a, D>,
/// }
///
/// impl<D: Dom + ?Sized> PageObject for CartPage<'_, D> {
///     fn page_name(&self) -> &'static str {
///         "cart"
///     }
///
///     fn ready_conditions(&self) -> Vec<Condition> {
///         vec![Condition::visible(Selector::text("Your Cart"))]
///     }
/// }
/// ```
pub trait PageObject {
    /// Page name for logging
    fn page_name(&self) -> &'static str;

    /// Conditions that must all hold, in order, once the page has rendered
    fn ready_conditions(&self) -> Vec<Condition>;
}

/// Poll each of the page's ready conditions in order.
///
/// # Errors
///
/// Returns the first condition's `TimeoutExceeded`
pub async fn wait_until_ready<P, D>(page: &P, ctx: &PageContext<'_, D>) -> SondeoResult<()>
where
    P: PageObject + ?Sized,
    D: Dom + ?Sized,
{
    for condition in page.ready_conditions() {
        let _ = ctx.expect(condition).await?;
    }
    debug!(page = page.page_name(), "page ready");
    Ok(())
}

/// DOM collaborator and configuration shared by the page objects of one test
pub struct PageContext<'a, D: ?Sized> {
    dom: &'a D,
    config: &'a SondeoConfig,
}

impl<D: ?Sized> Clone for PageContext<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for PageContext<'_, D> {}

impl<D: ?Sized> fmt::Debug for PageContext<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, D: Dom + ?Sized> PageContext<'a, D> {
    /// Create a context
    #[must_use]
    pub const fn new(dom: &'a D, config: &'a SondeoConfig) -> Self {
        Self { dom, config }
    }

    /// The DOM collaborator
    #[must_use]
    pub const fn dom(&self) -> &'a D {
        self.dom
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &'a SondeoConfig {
        self.config
    }

    /// Poll a condition with the default polling config
    pub async fn expect(&self, condition: Condition) -> SondeoResult<Matched> {
        self.expect_with(condition, self.config.polling).await
    }

    /// Poll a condition with an explicit polling config
    pub async fn expect_with(
        &self,
        condition: Condition,
        polling: PollingConfig,
    ) -> SondeoResult<Matched> {
        PollingAssertion::from_condition(condition)
            .with_config(polling)
            .verify(self.dom)
            .await
    }

    /// Poll until the selector matches a visible element
    pub async fn expect_visible(&self, selector: Selector) -> SondeoResult<Matched> {
        self.expect(Condition::visible(selector)).await
    }

    /// Wait until the selector matches and return the first match.
    ///
    /// Visibility is left to the action, so a hidden first match surfaces as
    /// the collaborator's action error rather than a timeout.
    pub async fn locate(&self, selector: Selector) -> SondeoResult<ElementHandle> {
        let matched = self.expect(Condition::exists(selector.clone())).await?;
        matched
            .elements
            .into_iter()
            .next()
            .ok_or_else(|| SondeoError::Action {
                action: "locate",
                selector: selector.to_string(),
                message: "no match".to_string(),
            })
    }

    /// Locate and click the first match
    pub async fn click(&self, selector: Selector) -> SondeoResult<ElementHandle> {
        let element = self.locate(selector.clone()).await?;
        self.dom
            .click(&element)
            .await
            .map_err(|err| action_error("click", &selector, err))?;
        Ok(element)
    }

    /// Locate an input, clear it and type into it
    pub async fn clear_and_type(&self, selector: Selector, text: &str) -> SondeoResult<()> {
        let element = self.locate(selector.clone()).await?;
        self.dom
            .clear(&element)
            .await
            .map_err(|err| action_error("clear", &selector, err))?;
        self.dom
            .type_text(&element, text)
            .await
            .map_err(|err| action_error("type", &selector, err))
    }
}

fn action_error(action: &'static str, selector: &Selector, err: DomError) -> SondeoError {
    SondeoError::Action {
        action,
        selector: selector.to_string(),
        message: err.to_string(),
    }
}

//! Profile screen shown after login.

use crate::dom::Dom;
use crate::locator::Selector;
use crate::page_object::{PageContext, PageObject};
use crate::polling::Condition;
use crate::result::SondeoResult;

/// Welcome text on the profile screen
pub const WELCOME_TEXT: &str = "Profile";

/// Profile screen
#[derive(Debug, Clone, Copy)]
pub struct ProfilePage<'a, D: ?Sized> {
    ctx: PageContext<'a, D>,
}

impl<D: Dom + ?Sized> PageObject for ProfilePage<'_, D> {
    fn page_name(&self) -> &'static str {
        "profile"
    }

    fn ready_conditions(&self) -> Vec<Condition> {
        vec![Condition::visible(Selector::text(WELCOME_TEXT))]
    }
}

impl<'a, D: Dom + ?Sized> ProfilePage<'a, D> {
    /// Create the page for one test
    #[must_use]
    pub const fn new(ctx: PageContext<'a, D>) -> Self {
        Self { ctx }
    }

    /// "Profile" is visible
    pub async fn validate_message_welcome(&self) -> SondeoResult<()> {
        let _ = self.ctx.expect_visible(Selector::text(WELCOME_TEXT)).await?;
        Ok(())
    }
}

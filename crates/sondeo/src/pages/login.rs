//! Login form leading to the profile screen.

use crate::dom::Dom;
use crate::locator::Selector;
use crate::page_object::{wait_until_ready, PageContext, PageObject};
use crate::polling::Condition;
use crate::result::SondeoResult;
use tracing::debug;

/// User name input
pub const USER_NAME_CSS: &str = "#userName";

/// Password input
pub const PASSWORD_CSS: &str = "#password";

/// Login button
pub const LOGIN_BUTTON_CSS: &str = "#login";

/// Login screen
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'a, D: ?Sized> {
    ctx: PageContext<'a, D>,
}

impl<D: Dom + ?Sized> PageObject for LoginPage<'_, D> {
    fn page_name(&self) -> &'static str {
        "login"
    }

    fn ready_conditions(&self) -> Vec<Condition> {
        [USER_NAME_CSS, PASSWORD_CSS, LOGIN_BUTTON_CSS]
            .into_iter()
            .map(|css| Condition::visible(Selector::css(css)))
            .collect()
    }
}

impl<'a, D: Dom + ?Sized> LoginPage<'a, D> {
    /// Create the page for one test
    #[must_use]
    pub const fn new(ctx: PageContext<'a, D>) -> Self {
        Self { ctx }
    }

    /// Both inputs and the login button are visible
    pub async fn validate_form(&self) -> SondeoResult<()> {
        wait_until_ready(self, &self.ctx).await
    }

    /// Clear and fill the user name and password inputs
    pub async fn fill_credentials(&self, user: &str, password: &str) -> SondeoResult<()> {
        debug!(user, "filling credentials");
        self.ctx
            .clear_and_type(Selector::css(USER_NAME_CSS), user)
            .await?;
        self.ctx
            .clear_and_type(Selector::css(PASSWORD_CSS), password)
            .await
    }

    /// Click the login button
    pub async fn submit(&self) -> SondeoResult<()> {
        let _ = self.ctx.click(Selector::css(LOGIN_BUTTON_CSS)).await?;
        Ok(())
    }
}

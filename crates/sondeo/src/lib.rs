//! Sondeo: polling assertions and page objects for browser end-to-end tests
//!
//! Sondeo (Spanish: "probe") sits between a test and whatever drives the
//! browser. Every UI check is a [`PollingAssertion`]: re-query the DOM,
//! evaluate a [`Predicate`], sleep, repeat until it holds or the timeout
//! elapses. Page objects for the Book Store application compose those
//! assertions into named validations, and [`TestDataGenerator`] supplies the
//! fixture values the flows type into forms.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ Test body    │───►│ Page objects     │───►│ Polling      │
//! │ (tokio test) │    │ (BookStore, ...) │    │ assertion    │
//! └──────────────┘    └──────────────────┘    └──────┬───────┘
//!                                                    │ query
//!                                             ┌──────▼───────┐
//!                                             │ Dom          │
//!                                             │ (driver/mock)│
//!                                             └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sondeo::prelude::*;
//!
//! let config = SondeoConfig::new().with_env_overrides()?;
//! let page = BookStorePage::new(PageContext::new(&dom, &config));
//! page.validate_elements_screen().await?;
//! page.input_name_book("Git Pocket Guide").await?;
//! page.click_in_link_name_book().await?;
//! page.validate_detail_book("Git Pocket Guide").await?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod clock;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod config;

/// DOM collaborator seam and the scripted mock used in tests
#[allow(clippy::missing_errors_doc)]
pub mod dom;

mod locator;
mod logging;
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
mod page_object;

/// Book Store page objects
#[allow(clippy::missing_errors_doc)]
pub mod pages;

#[allow(clippy::cast_possible_truncation)]
mod polling;
mod predicate;
mod result;
#[allow(clippy::missing_errors_doc)]
mod screenshot;
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
mod test_data;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    SondeoConfig, DEFAULT_DETAIL_TITLE_TIMEOUT_MS, DEFAULT_SCREENSHOT_DIR, ENV_POLL_INTERVAL_MS,
    ENV_SCREENSHOT_DIR, ENV_TIMEOUT_MS,
};
pub use dom::{Dom, DomError, DomResult, ElementHandle, Screenshot};
pub use locator::{Selector, TextPattern};
pub use logging::{init_test_tracing, init_tracing, DEFAULT_FILTER};
pub use page_object::{wait_until_ready, PageContext, PageObject};
pub use pages::{BookStorePage, IsbnCheck, LoginPage, ProfilePage};
pub use polling::{
    poll, Condition, Matched, PollingAssertion, PollingConfig, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
pub use predicate::Predicate;
pub use result::{SondeoError, SondeoResult};
pub use screenshot::{capture_screenshot, screenshot_on_failure, ScreenshotStore};
pub use test_data::{
    random_code, random_password, random_phone_number, screenshot_timestamp, CodeAlphabet,
    RandomSource, Seed, TestDataGenerator, DEFAULT_CODE_LEN, PASSWORD_LEN, PHONE_NUMBER_MAX,
    SCREENSHOT_TIMESTAMP_FORMAT,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::clock::*;
    pub use super::config::*;
    pub use super::dom::mock::{MockDocument, MockDom};
    pub use super::dom::*;
    pub use super::locator::*;
    pub use super::logging::*;
    pub use super::page_object::*;
    pub use super::pages::*;
    pub use super::polling::*;
    pub use super::predicate::*;
    pub use super::result::*;
    pub use super::screenshot::*;
    pub use super::test_data::*;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod reexport_tests {
        use super::*;

        #[test]
        fn test_default_timing() {
            let config = SondeoConfig::default();
            assert_eq!(config.polling.timeout_ms, DEFAULT_TIMEOUT_MS);
            assert_eq!(config.polling.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
            assert_eq!(config.detail_title_timeout_ms, DEFAULT_DETAIL_TITLE_TIMEOUT_MS);
        }

        #[test]
        fn test_seeded_generators_agree() {
            let mut a = TestDataGenerator::from_seed(Seed::from_u64(7));
            let mut b = TestDataGenerator::from_seed(Seed::from_u64(7));
            assert_eq!(a.random_phone_number(), b.random_phone_number());
            assert_eq!(a.random_password(), b.random_password());
            assert_eq!(a.random_code_default(), b.random_code_default());
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_config_error_display() {
            let err = SondeoError::config("bad timeout");
            assert!(err.to_string().contains("bad timeout"));
        }
    }
}

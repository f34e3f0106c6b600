//! Book Store listing and book detail screens.

use crate::dom::{Dom, ElementHandle};
use crate::locator::{Selector, TextPattern};
use crate::page_object::{wait_until_ready, PageContext, PageObject};
use crate::polling::{Condition, PollingAssertion};
use crate::result::{SondeoError, SondeoResult};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Heading shown on the listing screen
pub const TITLE_TEXT: &str = "Book Store";

/// Label shown on every book detail screen
pub const AUTHOR_LABEL: &str = "Author";

/// Search input
pub const SEARCH_INPUT_CSS: &str = "#searchBox";

/// Results table
pub const RESULTS_TABLE_CSS: &str = ".rt-table";

/// Book links inside the results table
pub const RESULT_LINK_CSS: &str = ".rt-table a";

// The label element alone, e.g. "ISBN :", not a title or blurb mentioning ISBN.
const ISBN_LABEL_PATTERN: &str = r"^\s*ISBN\s*:?\s*$";

// ISBN-10 and ISBN-13 printed without separators.
const ISBN_DIGITS_PATTERN: &str = r"\b\d{10,13}\b";

fn isbn_label() -> Selector {
    static PATTERN: OnceLock<TextPattern> = OnceLock::new();
    Selector::Pattern(
        PATTERN
            .get_or_init(|| TextPattern::new(ISBN_LABEL_PATTERN).expect("valid ISBN label regex"))
            .clone(),
    )
}

fn isbn_digits() -> Selector {
    static PATTERN: OnceLock<TextPattern> = OnceLock::new();
    Selector::Pattern(
        PATTERN
            .get_or_init(|| TextPattern::new(ISBN_DIGITS_PATTERN).expect("valid ISBN digits regex"))
            .clone(),
    )
}

/// How the ISBN is checked on a detail page.
///
/// Decided from a single query for the ISBN label; exactly one of the two
/// conditions is then asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnCheck {
    /// The page labels the ISBN; assert the label is visible
    LabeledIsbn,
    /// No label; assert a bare 10-13 digit number is visible
    NumericFallback,
}

impl IsbnCheck {
    /// Branch on the number of elements the label query matched
    #[must_use]
    pub const fn from_label_matches(count: usize) -> Self {
        if count > 0 {
            Self::LabeledIsbn
        } else {
            Self::NumericFallback
        }
    }

    /// The condition asserted for this branch
    #[must_use]
    pub fn condition(self) -> Condition {
        match self {
            Self::LabeledIsbn => Condition::visible(isbn_label()),
            Self::NumericFallback => Condition::visible(isbn_digits()),
        }
    }
}

/// Book Store listing and detail screens
#[derive(Debug, Clone, Copy)]
pub struct BookStorePage<'a, D: ?Sized> {
    ctx: PageContext<'a, D>,
}

impl<D: Dom + ?Sized> PageObject for BookStorePage<'_, D> {
    fn page_name(&self) -> &'static str {
        "book_store"
    }

    fn ready_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::visible(Selector::text(TITLE_TEXT)),
            Condition::visible(Selector::css(SEARCH_INPUT_CSS)),
            Condition::exists(Selector::css(RESULTS_TABLE_CSS)),
        ]
    }
}

impl<'a, D: Dom + ?Sized> BookStorePage<'a, D> {
    /// Create the page for one test
    #[must_use]
    pub const fn new(ctx: PageContext<'a, D>) -> Self {
        Self { ctx }
    }

    /// "Book Store" heading is visible
    pub async fn validate_title(&self) -> SondeoResult<()> {
        let _ = self.ctx.expect_visible(Selector::text(TITLE_TEXT)).await?;
        Ok(())
    }

    /// Heading and search input visible, results table present
    pub async fn validate_elements_screen(&self) -> SondeoResult<()> {
        wait_until_ready(self, &self.ctx).await
    }

    /// Clear the search input and type a book name
    pub async fn input_name_book(&self, name: &str) -> SondeoResult<()> {
        debug!(name, "searching book");
        self.ctx
            .clear_and_type(Selector::css(SEARCH_INPUT_CSS), name)
            .await
    }

    /// The book name is visible
    pub async fn validate_name_book(&self, name: &str) -> SondeoResult<()> {
        let _ = self.ctx.expect_visible(Selector::text(name)).await?;
        Ok(())
    }

    /// Click the first book link in the results table, hidden or not
    pub async fn click_in_link_name_book(&self) -> SondeoResult<ElementHandle> {
        let link = self.ctx.click(Selector::css(RESULT_LINK_CSS)).await?;
        info!(book = %link.text_content, "opened book detail");
        Ok(link)
    }

    /// Title (long timeout) and author label visible, then the ISBN by label
    /// or, when the page has no label, by its bare digits.
    ///
    /// Returns the branch that was asserted.
    ///
    /// # Errors
    ///
    /// - `TimeoutExceeded` from the title, author or labeled-ISBN checks
    /// - `AmbiguousFallback` when there is no label and no digit sequence
    pub async fn validate_detail_book(&self, title: &str) -> SondeoResult<IsbnCheck> {
        let config = self.ctx.config();
        let _ = self
            .ctx
            .expect_with(
                Condition::visible(Selector::text(title)),
                config.detail_title_polling(),
            )
            .await?;
        let _ = self.ctx.expect_visible(Selector::text(AUTHOR_LABEL)).await?;

        let label_check = PollingAssertion::from_condition(Condition::exists(isbn_label()));
        let label_matches = match label_check.check_once(self.ctx.dom()).await {
            Ok(matched) => matched.elements.len(),
            Err(err) => {
                debug!(error = %err, "no ISBN label on detail page");
                0
            }
        };
        let check = IsbnCheck::from_label_matches(label_matches);
        debug!(title, ?check, label_matches, "ISBN check selected");

        let outcome = self.ctx.expect(check.condition()).await;
        match (check, outcome) {
            (_, Ok(_)) => Ok(check),
            (IsbnCheck::LabeledIsbn, Err(err)) => Err(err),
            (IsbnCheck::NumericFallback, Err(err)) => Err(SondeoError::AmbiguousFallback {
                title: title.to_string(),
                source: Box::new(err),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SondeoConfig;
    use crate::dom::mock::{MockDocument, MockDom};
    use crate::polling::PollingConfig;
    use std::time::Duration;
    use tokio::time::Instant;

    fn config() -> SondeoConfig {
        SondeoConfig::new().with_polling(PollingConfig::new(1000).with_poll_interval(100))
    }

    fn listing() -> MockDocument {
        MockDocument::new()
            .with_text_node(ElementHandle::new("div").with_text(TITLE_TEXT))
            .with_css(SEARCH_INPUT_CSS, ElementHandle::new("input"))
            .with_css(RESULTS_TABLE_CSS, ElementHandle::new("div"))
            .with_css(
                RESULT_LINK_CSS,
                ElementHandle::new("a").with_text("Git Pocket Guide"),
            )
    }

    fn detail(title: &str) -> MockDocument {
        MockDocument::new()
            .with_text_node(ElementHandle::new("label").with_text(title))
            .with_text_node(ElementHandle::new("label").with_text(AUTHOR_LABEL))
    }

    /// Fails every query for the ISBN label
    struct FailingLabelQuery(MockDom);

    #[async_trait::async_trait]
    impl Dom for FailingLabelQuery {
        async fn query(
            &self,
            selector: &Selector,
        ) -> crate::dom::DomResult<Vec<ElementHandle>> {
            if *selector == isbn_label() {
                return Err(crate::dom::DomError::Detached(selector.to_string()));
            }
            self.0.query(selector).await
        }

        async fn click(&self, element: &ElementHandle) -> crate::dom::DomResult<()> {
            self.0.click(element).await
        }

        async fn clear(&self, element: &ElementHandle) -> crate::dom::DomResult<()> {
            self.0.clear(element).await
        }

        async fn type_text(
            &self,
            element: &ElementHandle,
            text: &str,
        ) -> crate::dom::DomResult<()> {
            self.0.type_text(element, text).await
        }

        async fn capture_view(&self) -> crate::dom::DomResult<crate::dom::Screenshot> {
            self.0.capture_view().await
        }
    }

    mod isbn_check {
        use super::*;

        #[test]
        fn test_from_label_matches() {
            assert_eq!(IsbnCheck::from_label_matches(0), IsbnCheck::NumericFallback);
            assert_eq!(IsbnCheck::from_label_matches(1), IsbnCheck::LabeledIsbn);
            assert_eq!(IsbnCheck::from_label_matches(4), IsbnCheck::LabeledIsbn);
        }

        #[test]
        fn test_conditions_are_exclusive() {
            let labeled = IsbnCheck::LabeledIsbn.condition();
            let fallback = IsbnCheck::NumericFallback.condition();
            assert_ne!(labeled, fallback);
            assert!(labeled.selector.accepts_text("ISBN :"));
            assert!(labeled.selector.accepts_text("ISBN"));
            assert!(!labeled.selector.accepts_text("The ISBN Handbook"));
            assert!(!labeled.selector.accepts_text("ISBN-13 explained for librarians"));
            assert!(fallback.selector.accepts_text("9781449325862"));
            assert!(fallback.selector.accepts_text("1449325866"));
            assert!(!fallback.selector.accepts_text("978144932586212345"));
            assert!(!fallback.selector.accepts_text("Pages 234"));
        }
    }

    mod listing_screen {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_validate_title_and_elements() {
            let dom = MockDom::new(listing());
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            page.validate_title().await.unwrap();
            page.validate_elements_screen().await.unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_elements_screen_needs_results_table() {
            let document = MockDocument::new()
                .with_text_node(ElementHandle::new("div").with_text(TITLE_TEXT))
                .with_css(SEARCH_INPUT_CSS, ElementHandle::new("input"));
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let err = page.validate_elements_screen().await.unwrap_err();
            assert!(err.to_string().contains(RESULTS_TABLE_CSS));
        }

        #[tokio::test(start_paused = true)]
        async fn test_search_and_open_first_result() {
            let dom = MockDom::new(listing());
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            page.input_name_book("Git Pocket Guide").await.unwrap();
            page.validate_name_book("Git Pocket Guide").await.unwrap();
            let link = page.click_in_link_name_book().await.unwrap();

            assert_eq!(link.text_content, "Git Pocket Guide");
            let history = dom.history();
            assert!(history[0].starts_with("clear:"));
            assert!(history[1].ends_with(":Git Pocket Guide"));
            assert_eq!(history[2], format!("click:{}", link.id));
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_targets_first_anchor_even_if_hidden() {
            let document = MockDocument::new()
                .with_css(RESULT_LINK_CSS, ElementHandle::new("a").with_text("first").hidden())
                .with_css(RESULT_LINK_CSS, ElementHandle::new("a").with_text("second"));
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let err = page.click_in_link_name_book().await.unwrap_err();
            assert!(matches!(err, SondeoError::Action { action: "click", .. }), "{err}");
            assert!(!dom.was_called("click:"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_without_results_times_out() {
            let dom = MockDom::new(MockDocument::new());
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let err = page.click_in_link_name_book().await.unwrap_err();
            assert!(err.is_timeout());
            assert!(dom.history().is_empty());
        }
    }

    mod detail_screen {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_labeled_isbn() {
            let document = detail("Git Pocket Guide").with_text_node(
                ElementHandle::new("label").with_text("ISBN :"),
            );
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let check = page.validate_detail_book("Git Pocket Guide").await.unwrap();
            assert_eq!(check, IsbnCheck::LabeledIsbn);
        }

        #[tokio::test(start_paused = true)]
        async fn test_numeric_fallback() {
            let document = detail("Harry Potter")
                .with_text_node(ElementHandle::new("span").with_text("978144932586"));
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let check = page.validate_detail_book("Harry Potter").await.unwrap();
            assert_eq!(check, IsbnCheck::NumericFallback);
        }

        #[tokio::test(start_paused = true)]
        async fn test_title_mentioning_isbn_is_not_a_label() {
            let document = detail("The ISBN Handbook")
                .with_text_node(ElementHandle::new("span").with_text("9780131103627"));
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let check = page.validate_detail_book("The ISBN Handbook").await.unwrap();
            assert_eq!(check, IsbnCheck::NumericFallback);
        }

        #[tokio::test(start_paused = true)]
        async fn test_no_isbn_at_all_is_ambiguous() {
            let dom = MockDom::new(detail("Harry Potter"));
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let err = page.validate_detail_book("Harry Potter").await.unwrap_err();
            match err {
                SondeoError::AmbiguousFallback { title, source } => {
                    assert_eq!(title, "Harry Potter");
                    assert!(source.is_timeout());
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_unknown_title_fails_on_title_with_long_timeout() {
            let document = MockDocument::new()
                .with_text_node(ElementHandle::new("label").with_text(AUTHOR_LABEL))
                .with_text_node(ElementHandle::new("label").with_text("ISBN :"));
            let dom = MockDom::new(document);
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let start = Instant::now();
            let err = page.validate_detail_book("Unknown Book").await.unwrap_err();
            let waited = start.elapsed();

            match err {
                SondeoError::TimeoutExceeded { selector, .. } => {
                    assert!(selector.contains("Unknown Book"));
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(waited >= Duration::from_millis(10_000), "{waited:?}");
            assert!(waited <= Duration::from_millis(10_100), "{waited:?}");
        }

        #[tokio::test(start_paused = true)]
        async fn test_title_rendering_late_within_long_timeout() {
            let dom = MockDom::new(MockDocument::new()).then_at(
                Duration::from_millis(5_000),
                detail("Speaking JavaScript")
                    .with_text_node(ElementHandle::new("label").with_text("ISBN :")),
            );
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let check = page.validate_detail_book("Speaking JavaScript").await.unwrap();
            assert_eq!(check, IsbnCheck::LabeledIsbn);
        }

        #[tokio::test(start_paused = true)]
        async fn test_label_query_error_falls_back_to_digits() {
            let document = detail("Eloquent JavaScript")
                .with_text_node(ElementHandle::new("label").with_text("ISBN :"))
                .with_text_node(ElementHandle::new("span").with_text("9781593275846"));
            let dom = FailingLabelQuery(MockDom::new(document));
            let config = config();
            let page = BookStorePage::new(PageContext::new(&dom, &config));

            let check = page.validate_detail_book("Eloquent JavaScript").await.unwrap();
            assert_eq!(check, IsbnCheck::NumericFallback);
        }
    }
}

//! Timestamped screenshots.

use crate::clock::Clock;
use crate::dom::{Dom, Screenshot};
use crate::result::{SondeoError, SondeoResult};
use crate::test_data::screenshot_timestamp;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory screenshots are persisted to
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Store rooted at `dir` (created on first save)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a screenshot name
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }

    /// Write the screenshot as `<dir>/<name>.png`
    ///
    /// # Errors
    ///
    /// Returns error if the screenshot is empty or cannot be written
    pub async fn save(&self, name: &str, screenshot: &Screenshot) -> SondeoResult<PathBuf> {
        if !screenshot.is_valid() {
            return Err(SondeoError::Screenshot {
                message: format!("refusing to save empty view as {name}"),
            });
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(name);
        tokio::fs::write(&path, &screenshot.data).await?;
        Ok(path)
    }
}

/// Capture the current view and save it under a timestamp name.
///
/// Returns the name (without extension).
///
/// # Errors
///
/// Returns error if the view cannot be captured or written
pub async fn capture_screenshot<D: Dom + ?Sized>(
    dom: &D,
    clock: &dyn Clock,
    store: &ScreenshotStore,
) -> SondeoResult<String> {
    let name = screenshot_timestamp(clock);
    let view = dom
        .capture_view()
        .await
        .map_err(|err| SondeoError::Screenshot {
            message: err.to_string(),
        })?;
    let path = store.save(&name, &view).await?;
    info!(path = %path.display(), "screenshot saved");
    Ok(name)
}

/// Run a test body and capture a screenshot if it fails.
///
/// The body's error is returned unchanged; a failed capture is only logged.
///
/// # Errors
///
/// Returns the body's error
pub async fn screenshot_on_failure<D, F, T>(
    dom: &D,
    clock: &dyn Clock,
    store: &ScreenshotStore,
    body: F,
) -> SondeoResult<T>
where
    D: Dom + ?Sized,
    F: Future<Output = SondeoResult<T>>,
{
    let outcome = body.await;
    if let Err(ref err) = outcome {
        match capture_screenshot(dom, clock, store).await {
            Ok(name) => warn!(error = %err, screenshot = %name, "test failed"),
            Err(capture_err) => {
                warn!(error = %err, capture_error = %capture_err, "test failed, no screenshot");
            }
        }
    }
    outcome
}

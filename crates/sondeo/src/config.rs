//! Sondeo configuration
//!
//! Defaults cover everything; a YAML or JSON file and `SONDEO_*` environment
//! variables can override individual fields.

use crate::polling::PollingConfig;
use crate::result::{SondeoError, SondeoResult};
use crate::screenshot::ScreenshotStore;
use crate::test_data::{CodeAlphabet, TestDataGenerator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timeout for the title check on a book detail page (10 seconds)
pub const DEFAULT_DETAIL_TITLE_TIMEOUT_MS: u64 = 10_000;

/// Default screenshot directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "target/sondeo/screenshots";

/// Environment variable overriding `polling.timeout_ms`
pub const ENV_TIMEOUT_MS: &str = "SONDEO_TIMEOUT_MS";

/// Environment variable overriding `polling.poll_interval_ms`
pub const ENV_POLL_INTERVAL_MS: &str = "SONDEO_POLL_INTERVAL_MS";

/// Environment variable overriding `screenshot_dir`
pub const ENV_SCREENSHOT_DIR: &str = "SONDEO_SCREENSHOT_DIR";

/// Sondeo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SondeoConfig {
    /// Default timing for every polling assertion
    pub polling: PollingConfig,
    /// Timeout for the title check on a book detail page
    pub detail_title_timeout_ms: u64,
    /// Directory for screenshots
    pub screenshot_dir: String,
    /// Alphabet for generated codes
    pub code_alphabet: CodeAlphabet,
}

impl Default for SondeoConfig {
    fn default() -> Self {
        Self {
            polling: PollingConfig::default(),
            detail_title_timeout_ms: DEFAULT_DETAIL_TITLE_TIMEOUT_MS,
            screenshot_dir: DEFAULT_SCREENSHOT_DIR.to_string(),
            code_alphabet: CodeAlphabet::Standard,
        }
    }
}

impl SondeoConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, has an unknown extension, or
    /// does not parse
    pub fn from_file(path: impl AsRef<Path>) -> SondeoResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(SondeoError::config(format!(
                "unsupported config file {}: expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Parse YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid
    pub fn from_yaml_str(yaml: &str) -> SondeoResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse JSON
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid
    pub fn from_json_str(json: &str) -> SondeoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `SONDEO_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse
    pub fn with_env_overrides(self) -> SondeoResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SondeoResult<Self> {
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.polling.timeout_ms = parse_ms(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            self.polling.poll_interval_ms = parse_ms(ENV_POLL_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_SCREENSHOT_DIR) {
            self.screenshot_dir = value;
        }
        Ok(self)
    }

    /// Set the default polling config
    #[must_use]
    pub const fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Set the detail page title timeout
    #[must_use]
    pub const fn with_detail_title_timeout(mut self, timeout_ms: u64) -> Self {
        self.detail_title_timeout_ms = timeout_ms;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<String>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set the code alphabet
    #[must_use]
    pub const fn with_code_alphabet(mut self, alphabet: CodeAlphabet) -> Self {
        self.code_alphabet = alphabet;
        self
    }

    /// Polling config for the detail page title check
    #[must_use]
    pub const fn detail_title_polling(&self) -> PollingConfig {
        self.polling.with_timeout(self.detail_title_timeout_ms)
    }

    /// Screenshot store for the configured directory
    #[must_use]
    pub fn screenshot_store(&self) -> ScreenshotStore {
        ScreenshotStore::new(&self.screenshot_dir)
    }

    /// Entropy-seeded generator using the configured alphabet
    #[must_use]
    pub fn data_generator(&self) -> TestDataGenerator {
        TestDataGenerator::new().with_alphabet(self.code_alphabet)
    }
}

fn parse_ms(key: &str, value: &str) -> SondeoResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| SondeoError::config(format!("{key} must be milliseconds, got {value:?}")))
}

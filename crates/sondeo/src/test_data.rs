//! Randomized fixture values.
//!
//! Values are only "practically unlikely to collide within a test run"; there
//! is no uniqueness bookkeeping. Every value is drawn from a [`RandomSource`]
//! producing uniform floats in `[0, 1)`, so a seeded generator reproduces the
//! same stream.

use crate::clock::Clock;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Largest phone number produced
pub const PHONE_NUMBER_MAX: u64 = 99_999_999_999;

/// Length of generated passwords
pub const PASSWORD_LEN: usize = 7;

/// Length of `random_code_default`
pub const DEFAULT_CODE_LEN: usize = 6;

/// `strftime` pattern for screenshot names
pub const SCREENSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// f64 carries ~10 base-36 digits of real information; one more absorbs rounding.
const MAX_FRACTION_DIGITS: usize = 11;

const MAX_PASSWORD_REROLLS: usize = 32;

const STANDARD_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// Y is missing and X is doubled, kept byte-for-byte for old fixtures.
const LEGACY_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXXZabcdefghijklmnopqrstuvwxyz";

/// Deterministic seed for reproducible fixture data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Create a seed from a u64 value
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw seed value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Alphabet used by `random_code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeAlphabet {
    /// `0-9A-Za-z`, 62 distinct characters
    #[default]
    Standard,
    /// The historical fixture alphabet: no `Y`, `X` twice
    Legacy,
}

impl CodeAlphabet {
    /// Alphabet bytes
    #[must_use]
    pub const fn chars(self) -> &'static [u8] {
        match self {
            Self::Standard => STANDARD_ALPHABET,
            Self::Legacy => LEGACY_ALPHABET,
        }
    }

    /// Whether `c` can appear in a code
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        c.is_ascii() && self.chars().contains(&(c as u8))
    }
}

/// Generator of phone numbers, passwords and codes
#[derive(Debug, Clone)]
pub struct TestDataGenerator<R = StdRng> {
    rng: R,
    alphabet: CodeAlphabet,
}

impl TestDataGenerator<StdRng> {
    /// Generator seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(StdRng::from_entropy())
    }

    /// Generator with a reproducible stream
    #[must_use]
    pub fn from_seed(seed: Seed) -> Self {
        Self::with_source(StdRng::seed_from_u64(seed.value()))
    }
}

impl Default for TestDataGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> TestDataGenerator<R> {
    /// Generator over any random source
    #[must_use]
    pub fn with_source(rng: R) -> Self {
        Self {
            rng,
            alphabet: CodeAlphabet::Standard,
        }
    }

    /// Use a different code alphabet
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: CodeAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Current code alphabet
    #[must_use]
    pub const fn alphabet(&self) -> CodeAlphabet {
        self.alphabet
    }

    fn unit(&mut self) -> f64 {
        let r = self.rng.next_unit();
        if r.is_finite() {
            r.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }

    /// Phone number in `[1, 99_999_999_999]`, unformatted
    pub fn random_phone_number(&mut self) -> u64 {
        let scaled = (self.unit() * PHONE_NUMBER_MAX as f64).floor() as u64;
        (scaled + 1).min(PHONE_NUMBER_MAX)
    }

    /// Exactly seven characters from `[0-9a-z]`.
    ///
    /// Takes the last seven digits of the base-36 expansion of a draw. Draws
    /// whose expansion is shorter are re-rolled.
    pub fn random_password(&mut self) -> String {
        for _ in 0..MAX_PASSWORD_REROLLS {
            let digits = base36_fraction(self.unit());
            if digits.len() >= PASSWORD_LEN {
                return digits[digits.len() - PASSWORD_LEN..].to_string();
            }
        }
        // Only reachable with a degenerate source stuck on short draws.
        format!("{:0>width$}", base36_fraction(self.unit()), width = PASSWORD_LEN)
    }

    /// `length` characters drawn uniformly, with replacement, from the alphabet
    pub fn random_code(&mut self, length: usize) -> String {
        let chars = self.alphabet.chars();
        (0..length)
            .map(|_| {
                let idx = ((self.unit() * chars.len() as f64).floor() as usize).min(chars.len() - 1);
                chars[idx] as char
            })
            .collect()
    }

    /// Six-character code
    pub fn random_code_default(&mut self) -> String {
        self.random_code(DEFAULT_CODE_LEN)
    }
}

/// Base-36 digits after the point, at most `MAX_FRACTION_DIGITS`
fn base36_fraction(mut value: f64) -> String {
    let mut digits = String::with_capacity(MAX_FRACTION_DIGITS);
    while value > 0.0 && digits.len() < MAX_FRACTION_DIGITS {
        value *= 36.0;
        let digit = (value.floor() as usize).min(35);
        digits.push(BASE36_DIGITS[digit] as char);
        value -= digit as f64;
    }
    digits
}

/// Local time as `YYYY-MM-DD_HH-mm-ss`, safe for file names
#[must_use]
pub fn screenshot_timestamp(clock: &dyn Clock) -> String {
    clock.now().format(SCREENSHOT_TIMESTAMP_FORMAT).to_string()
}

/// Phone number from a fresh entropy-seeded generator
#[must_use]
pub fn random_phone_number() -> u64 {
    TestDataGenerator::new().random_phone_number()
}

/// Password from a fresh entropy-seeded generator
#[must_use]
pub fn random_password() -> String {
    TestDataGenerator::new().random_password()
}

/// Code from a fresh entropy-seeded generator
#[must_use]
pub fn random_code(length: usize) -> String {
    TestDataGenerator::new().random_code(length)
}

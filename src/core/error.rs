//! Error types for shopcheck
//!
//! Every driver failure is folded into [`ShopError`] so scenarios can decide
//! per kind whether to retry, skip, or propagate.

use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thiserror::Error;

/// Main error type for shopcheck operations
#[derive(Error, Debug)]
pub enum ShopError {
    /// A bounded wait ran past its deadline
    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    /// A previously located element no longer maps to live content
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Another element received the click
    #[error("Click intercepted: {0}")]
    ClickIntercepted(String),

    /// Scraped text did not hold the expected number
    #[error("Could not parse {expected} from {input:?}")]
    Parse {
        input: String,
        expected: &'static str,
    },

    /// An observed value did not match the expected one
    #[error("Assertion failed: {message} (expected {expected:?}, got {actual:?})")]
    Assertion {
        expected: String,
        actual: String,
        message: String,
    },

    /// No element matched a locator
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// Any other WebDriver failure
    #[error("Driver error: {0}")]
    Driver(String),

    /// chromedriver binary missing
    #[error("chromedriver not found. Install it and make sure it is on PATH, or point browser.driver_binary at it")]
    DriverNotFound,

    /// A retry loop gave up
    #[error("Gave up on {what} after {attempts} attempts")]
    RetriesExhausted { what: String, attempts: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for shopcheck operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Coarse classification of a [`ShopError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    StaleElement,
    ClickIntercepted,
    NoSuchElement,
    Parse,
    Assertion,
    Other,
}

impl ShopError {
    /// Create a driver error
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::Driver(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error for `input`
    pub fn parse(input: impl Into<String>, expected: &'static str) -> Self {
        Self::Parse {
            input: input.into(),
            expected,
        }
    }

    /// Create an assertion error
    pub fn assertion(
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Assertion {
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::StaleElement(_) => ErrorKind::StaleElement,
            Self::ClickIntercepted(_) => ErrorKind::ClickIntercepted,
            Self::NoSuchElement(_) => ErrorKind::NoSuchElement,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Assertion { .. } => ErrorKind::Assertion,
            _ => ErrorKind::Other,
        }
    }

    /// Whether another element swallowed the click
    pub fn is_click_intercepted(&self) -> bool {
        self.kind() == ErrorKind::ClickIntercepted
    }

    /// Whether a poll hitting this error should simply try again
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StaleElement | ErrorKind::NoSuchElement
        )
    }
}

impl From<WebDriverError> for ShopError {
    fn from(err: WebDriverError) -> Self {
        let msg = err.to_string();
        match err {
            WebDriverError::StaleElementReference(..) => Self::StaleElement(msg),
            WebDriverError::ElementClickIntercepted(..) => Self::ClickIntercepted(msg),
            WebDriverError::NoSuchElement(..) => Self::NoSuchElement(msg),
            WebDriverError::Timeout(..) => Self::Timeout {
                what: msg,
                waited: Duration::ZERO,
            },
            _ => Self::Driver(msg),
        }
    }
}

//! Parsing helpers for scraped text

use std::str::FromStr;

use crate::core::{Result, ShopError};

/// Parse a star rating badge such as `"4.3"`
pub fn parse_rating(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ShopError::parse(text, "rating"))
}

/// Keep only ASCII digits
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Strip every non-digit and parse what is left
///
/// `"20% off"` becomes `20`, `"(1,234)"` becomes `1234`. Text without digits
/// is a parse error.
pub fn parse_digits<T: FromStr>(text: &str) -> Result<T> {
    digits_only(text)
        .parse::<T>()
        .map_err(|_| ShopError::parse(text, "integer"))
}

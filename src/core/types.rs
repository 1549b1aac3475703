//! Shared types used across shopcheck modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// An XPath expression identifying elements on the page
///
/// Expressions are kept verbatim; they are coupled to the live markup of the
/// storefront and break when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    expr: &'static str,
}

impl Selector {
    /// Selector from a static XPath expression
    pub const fn xpath(expr: &'static str) -> Self {
        Self { expr }
    }

    /// The raw expression
    pub fn as_str(&self) -> &'static str {
        self.expr
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expr)
    }
}

/// What an interaction acts on: a handle already in hand, or a locator that is
/// re-resolved on every readiness poll
#[derive(Debug)]
pub enum Target<'a, E> {
    Element(&'a E),
    Locator(&'a Selector),
}

impl<E> Target<'_, E> {
    /// Short description for logs and timeout messages
    pub fn describe(&self) -> String {
        match self {
            Target::Element(_) => "element".to_string(),
            Target::Locator(selector) => selector.to_string(),
        }
    }
}

impl<E> Clone for Target<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Target<'_, E> {}

/// Top-left corner of an element in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

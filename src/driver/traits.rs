//! Browser session trait
//!
//! The narrow slice of a WebDriver session the scenarios need. Keeping it a
//! trait lets unit tests drive scenarios against a scripted page.

use async_trait::async_trait;

use crate::core::{Point, Result, Selector};

/// Script used to bring an element into the viewport
pub const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView(true);";

/// One live browser window under automation control
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Handle to a located element, valid until the page re-renders it away
    type Element: Clone + Send + Sync;

    /// Navigate to a URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Maximize the window
    async fn maximize(&self) -> Result<()>;

    /// Value of `document.readyState`
    async fn ready_state(&self) -> Result<String>;

    /// Locate the first element matching `selector`
    async fn find(&self, selector: &Selector) -> Result<Self::Element>;

    /// Locate every element matching `selector`, possibly none
    async fn find_all(&self, selector: &Selector) -> Result<Vec<Self::Element>>;

    /// Locate the first element matching `selector` starting from `parent`
    async fn find_in(&self, parent: &Self::Element, selector: &Selector) -> Result<Self::Element>;

    /// Rendered text
    async fn text(&self, element: &Self::Element) -> Result<String>;

    /// Attribute value, if present
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    async fn is_displayed(&self, element: &Self::Element) -> Result<bool>;

    async fn is_enabled(&self, element: &Self::Element) -> Result<bool>;

    /// Top-left corner of the element
    async fn location(&self, element: &Self::Element) -> Result<Point>;

    /// Run a script in page context with `element` as `arguments[0]`
    async fn execute(&self, script: &str, element: &Self::Element) -> Result<()>;

    /// Scroll `element` into the viewport
    async fn scroll_into_view(&self, element: &Self::Element) -> Result<()> {
        self.execute(SCROLL_INTO_VIEW, element).await
    }

    /// Native element click
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Pointer move to the element followed by a click
    async fn pointer_click(&self, element: &Self::Element) -> Result<()>;

    /// Clear an input's value
    async fn clear(&self, element: &Self::Element) -> Result<()>;

    /// Type text into an element
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Close the current window
    async fn close_window(&self) -> Result<()>;

    /// End the session
    async fn quit(&self) -> Result<()>;
}

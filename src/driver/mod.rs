//! Browser driver module
//!
//! The session trait the scenarios talk to, its WebDriver implementation,
//! and chromedriver process management.

pub mod service;
pub mod traits;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod scripted;

pub use service::DriverService;
pub use traits::BrowserSession;
pub use webdriver::WebDriverSession;

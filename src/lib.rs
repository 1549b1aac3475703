//! shopcheck - end-to-end storefront checks over WebDriver
//!
//! Drives a real Chrome window against a live storefront: search, filter, and
//! scrape product listings, then check what was scraped.
//!
//! # Architecture
//!
//! - **Core**: Configuration, error handling, logging, shared types
//! - **Driver**: The browser session trait, its WebDriver implementation, and
//!   chromedriver process management
//! - **Tools**: Interaction wrapper, bounded waits, text parsing
//! - **Scenarios**: The ratings, discounts, and reviews checks
//! - **Runner**: Session lifecycle and the suite report
//!
//! # Usage
//!
//! ```rust,no_run
//! use shopcheck::runner::run_live;
//! use shopcheck::scenarios::ScenarioKind;
//! use shopcheck::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let report = run_live(&config, &ScenarioKind::ALL).await.unwrap();
//!     println!("{}", report);
//! }
//! ```

pub mod core;
pub mod driver;
pub mod runner;
pub mod scenarios;
pub mod tools;

// Re-export commonly used items
pub use core::{Config, Result, ShopError};
pub use runner::{run_live, run_suite, SuiteReport};
pub use scenarios::ScenarioKind;

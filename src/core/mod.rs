//! Core module - shared infrastructure for shopcheck
//!
//! Configuration, error handling, logging setup, and the small value types
//! passed between the driver seam and the scenarios.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::Config;
pub use error::{ErrorKind, Result, ShopError};
pub use types::*;

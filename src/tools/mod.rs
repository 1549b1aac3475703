//! Tools module - helpers the scenarios are built from
//!
//! The interaction wrapper, bounded waits, and scraped-text parsing.

pub mod interaction;
pub mod text;
pub mod wait;

pub use interaction::Interactor;
pub use wait::WaitPolicy;

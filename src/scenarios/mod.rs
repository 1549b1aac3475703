//! Storefront scenarios
//!
//! Three independent, linear checks against the live site. Each takes the
//! session explicitly and shares nothing else with the others. Their failure
//! handling differs on purpose:
//!
//! - `ratings` re-resolves the badge list and retries the same index
//! - `discounts` skips a card that fails and keeps going
//! - `reviews` aborts on any failure around the rating filter

pub mod discounts;
pub mod ratings;
pub mod reviews;

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::core::{Config, Result, Selector, Target};
use crate::driver::BrowserSession;
use crate::tools::wait::{settle, WaitPolicy};
use crate::tools::Interactor;

pub use discounts::{DiscountSummary, DiscountedProduct};
pub use ratings::RatingSummary;
pub use reviews::{FilterState, ReviewSummary};

/// Header search box
pub const SEARCH_INPUT: Selector = Selector::xpath("//input[@class='Pke_EE']");

/// Header search submit button
pub const SEARCH_SUBMIT: Selector = Selector::xpath("//button[@type='submit']");

/// Which scenario to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Count products rated 4 stars or lower
    Ratings,
    /// Report products discounted above the threshold
    Discounts,
    /// Apply the 4-star filter and scrape review counts
    Reviews,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::Ratings, Self::Discounts, Self::Reviews];
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Ratings => write!(f, "ratings"),
            ScenarioKind::Discounts => write!(f, "discounts"),
            ScenarioKind::Reviews => write!(f, "reviews"),
        }
    }
}

/// What a scenario found
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum ScenarioReport {
    Ratings(RatingSummary),
    Discounts(DiscountSummary),
    Reviews(ReviewSummary),
}

/// Run one scenario on `session`
pub async fn run<S: BrowserSession>(
    kind: ScenarioKind,
    session: &S,
    config: &Config,
) -> Result<ScenarioReport> {
    match kind {
        ScenarioKind::Ratings => ratings::run(session, config)
            .await
            .map(ScenarioReport::Ratings),
        ScenarioKind::Discounts => discounts::run(session, config)
            .await
            .map(ScenarioReport::Discounts),
        ScenarioKind::Reviews => reviews::run(session, config)
            .await
            .map(ScenarioReport::Reviews),
    }
}

fn policy(config: &Config, timeout: Duration) -> WaitPolicy {
    WaitPolicy::new(timeout, &config.waits)
}

fn interactor(config: &Config) -> Interactor {
    Interactor::new(policy(config, config.waits.interaction_timeout()))
}

/// Load the landing page and wait for it to finish loading
async fn open_storefront<S: BrowserSession>(session: &S, config: &Config) -> Result<()> {
    session.goto(&config.site.base_url).await?;
    settle(session, &policy(config, config.waits.settle_timeout())).await
}

/// Type `query` into the header search box and submit
async fn search<S: BrowserSession>(
    session: &S,
    interactor: &Interactor,
    query: &str,
) -> Result<()> {
    debug!("Searching for {:?}", query);
    interactor
        .send_keys(session, Target::Locator(&SEARCH_INPUT), query)
        .await?;
    interactor
        .click(session, Target::Locator(&SEARCH_SUBMIT))
        .await
}

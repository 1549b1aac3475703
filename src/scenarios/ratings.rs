//! Ratings scenario
//!
//! Search, sort by popularity, then count rating badges at or below the
//! ceiling. The site re-renders the result list while it is being read, so
//! the list is fetched again for every index and a failed index is retried
//! against a freshly waited-for list.

use serde::Serialize;
use tracing::{info, warn};

use crate::core::{Config, Result, Selector, ShopError, Target};
use crate::driver::BrowserSession;
use crate::scenarios::{interactor, open_storefront, policy, search};
use crate::tools::text::parse_rating;
use crate::tools::wait::present_all;

pub const POPULARITY_SORT: Selector = Selector::xpath("//div[text()='Popularity']");
pub const RATING_BADGE: Selector = Selector::xpath("//div[@class='XQDdHH']");

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Badges in the last fetched list
    pub badges_seen: usize,
    /// Badges rated at or below the ceiling
    pub at_or_below_ceiling: usize,
    /// Times the list had to be re-resolved after a failed read
    pub relocations: usize,
}

pub async fn run<S: BrowserSession>(session: &S, config: &Config) -> Result<RatingSummary> {
    info!("Start scenario: ratings");
    let interactor = interactor(config);

    open_storefront(session, config).await?;
    search(session, &interactor, &config.site.rating_query).await?;
    interactor
        .click(session, Target::Locator(&POPULARITY_SORT))
        .await?;

    let summary = count_ratings(session, config).await?;
    info!(
        "The count of products with {} stars or less is: {}",
        config.site.rating_ceiling, summary.at_or_below_ceiling
    );

    info!("End scenario: ratings");
    Ok(summary)
}

/// Count badges rated at or below `config.site.rating_ceiling`
///
/// A failing index is retried until it reads, unless `site.relocate_limit`
/// caps the attempts.
///
/// Known flaky: the list can change between the fetch that bounds the loop and
/// the read of index `i`, so an element may be skipped or counted twice.
pub async fn count_ratings<S: BrowserSession>(
    session: &S,
    config: &Config,
) -> Result<RatingSummary> {
    let wait = policy(config, config.waits.results_timeout());
    let mut badges = present_all(session, &RATING_BADGE, &wait).await?;
    let mut summary = RatingSummary::default();
    let mut failures_at_index = 0;
    let mut i = 0;

    while i < badges.len() {
        match read_rating(session, &mut badges, i).await {
            Ok(rating) => {
                if rating <= config.site.rating_ceiling {
                    summary.at_or_below_ceiling += 1;
                }
                failures_at_index = 0;
                i += 1;
            }
            Err(e) => {
                failures_at_index += 1;
                if config
                    .site
                    .relocate_limit
                    .is_some_and(|limit| failures_at_index > limit)
                {
                    return Err(ShopError::RetriesExhausted {
                        what: format!("rating badge {}", i),
                        attempts: failures_at_index,
                    });
                }
                warn!("Rating badge {} unreadable ({}), re-locating the list", i, e);
                summary.relocations += 1;
                badges = present_all(session, &RATING_BADGE, &wait).await?;
            }
        }
    }

    summary.badges_seen = badges.len();
    Ok(summary)
}

/// Re-fetch the list, then read and parse badge `i`
async fn read_rating<S: BrowserSession>(
    session: &S,
    badges: &mut Vec<S::Element>,
    i: usize,
) -> Result<f64> {
    *badges = session.find_all(&RATING_BADGE).await?;
    let badge = badges
        .get(i)
        .ok_or_else(|| ShopError::StaleElement(format!("rating badge {} is gone", i)))?;
    parse_rating(&session.text(badge).await?)
}

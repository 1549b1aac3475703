//! Reviews scenario
//!
//! Search, apply the "4★ & above" filter when it can be clicked, then scrape
//! the review-count labels. Any failure while handling the filter ends the
//! scenario; a filter that is present but not clickable does not.

use serde::Serialize;
use tracing::{error, info};

use crate::core::{Config, Point, Result, Selector, Target};
use crate::driver::BrowserSession;
use crate::scenarios::{interactor, open_storefront, policy, search};
use crate::tools::text::parse_digits;
use crate::tools::wait::present;
use crate::tools::Interactor;

pub const FOUR_STAR_FILTER: Selector = Selector::xpath("//div[text()='4★ & above']");
pub const REVIEW_COUNT: Selector = Selector::xpath("//span[@class='Wphh3N']");

/// How the rating filter looked when it was found
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub displayed: bool,
    pub enabled: bool,
    pub location: Point,
    pub clicked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub filter: FilterState,
    /// Review counts in page order
    pub review_counts: Vec<u64>,
}

pub async fn run<S: BrowserSession>(session: &S, config: &Config) -> Result<ReviewSummary> {
    info!("Start scenario: reviews");
    let interactor = interactor(config);

    open_storefront(session, config).await?;
    search(session, &interactor, &config.site.review_query).await?;

    let filter = apply_rating_filter(session, &interactor, config)
        .await
        .inspect_err(|e| error!("Failed to interact with the 4-star and above filter: {}", e))?;

    let review_counts = review_counts(session).await?;
    info!("End scenario: reviews");
    Ok(ReviewSummary {
        filter,
        review_counts,
    })
}

/// Find the filter, scroll to it, and click it only if it is displayed and
/// enabled once scrolled into view
pub async fn apply_rating_filter<S: BrowserSession>(
    session: &S,
    interactor: &Interactor,
    config: &Config,
) -> Result<FilterState> {
    let wait = policy(config, config.waits.filter_timeout());
    let control = present(session, &FOUR_STAR_FILTER, &wait).await?;

    let mut state = FilterState {
        displayed: session.is_displayed(&control).await?,
        enabled: session.is_enabled(&control).await?,
        location: session.location(&control).await?,
        clicked: false,
    };
    info!(
        "Found 4-star filter - displayed: {}, enabled: {}, location: {}",
        state.displayed, state.enabled, state.location
    );

    session.scroll_into_view(&control).await?;
    let clickable =
        session.is_displayed(&control).await? && session.is_enabled(&control).await?;
    if clickable {
        interactor
            .click(session, Target::Element(&control))
            .await?;
        state.clicked = true;
        info!("Clicked the 4-star and above filter");
    } else {
        info!("4-star and above filter is not clickable");
    }

    Ok(state)
}

/// Parse every review-count label on the page
pub async fn review_counts<S: BrowserSession>(session: &S) -> Result<Vec<u64>> {
    let labels = session.find_all(&REVIEW_COUNT).await?;
    let mut counts = Vec::with_capacity(labels.len());

    for label in &labels {
        let count = parse_digits(&session.text(label).await?)?;
        info!("{}", count);
        counts.push(count);
    }

    Ok(counts)
}

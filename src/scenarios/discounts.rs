//! Discounts scenario
//!
//! Dismiss the login overlay, search, check the query round-trips through the
//! search box, then report product cards discounted above the threshold.
//! Cards are best-effort: one that cannot be read is logged and skipped.

use serde::Serialize;
use tracing::{info, warn};

use crate::core::{Config, Result, Selector, ShopError, Target};
use crate::driver::BrowserSession;
use crate::scenarios::{interactor, open_storefront, policy};
use crate::tools::text::parse_digits;
use crate::tools::wait::present_all;

pub const CLOSE_LOGIN: Selector = Selector::xpath("//span[@role='button']");
pub const SEARCH_BOX: Selector = Selector::xpath("//input[contains(@title,'Search for Products')]");
pub const SEARCH_BUTTON: Selector = Selector::xpath("//button[contains(@aria-label,'Search')]");
pub const RESULTS_ROW: Selector = Selector::xpath("//div[@class='yKfJKb row']");
pub const PRODUCT_CARD: Selector = Selector::xpath("//div[@class='tUxRFH']");
pub const CARD_TITLE: Selector = Selector::xpath("//div[@class='KzDlHZ']");
pub const CARD_DISCOUNT: Selector = Selector::xpath("//div[@class='UkUFwK']");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountedProduct {
    pub title: String,
    pub percent: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscountSummary {
    pub cards_seen: usize,
    /// Cards discounted strictly above the threshold, in page order
    pub above_threshold: Vec<DiscountedProduct>,
    /// Cards that could not be read
    pub skipped: usize,
}

pub async fn run<S: BrowserSession>(session: &S, config: &Config) -> Result<DiscountSummary> {
    info!("Start scenario: discounts");
    let interactor = interactor(config);

    open_storefront(session, config).await?;
    interactor
        .click(session, Target::Locator(&CLOSE_LOGIN))
        .await?;

    let query = &config.site.discount_query;
    let search_box = session.find(&SEARCH_BOX).await?;
    interactor
        .send_keys(session, Target::Element(&search_box), query)
        .await?;
    let entered = session
        .attribute(&search_box, "value")
        .await?
        .unwrap_or_default();
    if entered != *query {
        return Err(ShopError::assertion(
            query.as_str(),
            entered,
            format!("The text '{}' was not entered correctly in the search box", query),
        ));
    }

    interactor
        .click(session, Target::Locator(&SEARCH_BUTTON))
        .await?;
    present_all(
        session,
        &RESULTS_ROW,
        &policy(config, config.waits.results_timeout()),
    )
    .await?;

    let summary = scan_cards(session, config.site.discount_threshold).await?;
    info!("End scenario: discounts");
    Ok(summary)
}

/// Walk every product card and collect those discounted above `threshold`
pub async fn scan_cards<S: BrowserSession>(session: &S, threshold: u32) -> Result<DiscountSummary> {
    let cards = session.find_all(&PRODUCT_CARD).await?;
    let mut summary = DiscountSummary {
        cards_seen: cards.len(),
        ..Default::default()
    };

    for (i, card) in cards.iter().enumerate() {
        match read_card(session, card).await {
            Ok(product) if product.percent > threshold => {
                info!("title = {}, discount = {}%", product.title, product.percent);
                summary.above_threshold.push(product);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping product card {}: {}", i, e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

async fn read_card<S: BrowserSession>(session: &S, card: &S::Element) -> Result<DiscountedProduct> {
    let title = session.find_in(card, &CARD_TITLE).await?;
    let title = session.text(&title).await?;
    let discount = session.find_in(card, &CARD_DISCOUNT).await?;
    let percent = parse_digits(&session.text(&discount).await?)?;
    Ok(DiscountedProduct { title, percent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::scripted::{Call, FakeElement, Handle, ScriptedSession};
    use crate::scenarios::testing;

    fn card(session: &ScriptedSession, title: &str, discount: Option<&str>) -> Handle {
        let card = session.add(FakeElement::new(""));
        session.nest(card, &CARD_TITLE, FakeElement::new(title));
        if let Some(discount) = discount {
            session.nest(card, &CARD_DISCOUNT, FakeElement::new(discount));
        }
        card
    }

    #[tokio::test]
    async fn test_reports_cards_above_threshold() {
        let session = ScriptedSession::new();
        let cards = [
            card(&session, "iPhone 15 (Black, 128 GB)", Some("20% off")),
            card(&session, "iPhone 13 (Blue, 128 GB)", Some("17% off")),
            card(&session, "iPhone 14 (Red, 256 GB)", Some("9% off")),
        ];
        session.place(&PRODUCT_CARD, &cards);

        let summary = scan_cards(&session, 17).await.unwrap();

        assert_eq!(summary.cards_seen, 3);
        assert_eq!(
            summary.above_threshold,
            vec![DiscountedProduct {
                title: "iPhone 15 (Black, 128 GB)".to_string(),
                percent: 20,
            }]
        );
        assert_eq!(summary.skipped, 0);
    }

    #[tokio::test]
    async fn test_bad_cards_are_skipped() {
        let session = ScriptedSession::new();
        let cards = [
            card(&session, "No discount shown", None),
            card(&session, "Coming soon", Some("Notify me")),
            card(&session, "iPhone 15 Plus", Some("25% off")),
        ];
        session.place(&PRODUCT_CARD, &cards);

        let summary = scan_cards(&session, 17).await.unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.above_threshold.len(), 1);
        assert_eq!(summary.above_threshold[0].percent, 25);
    }

    fn search_page(session: &ScriptedSession) {
        session.put(&CLOSE_LOGIN, FakeElement::new("✕"));
        session.put(&SEARCH_BOX, FakeElement::new(""));
        session.put(&SEARCH_BUTTON, FakeElement::new(""));
        session.put(&RESULTS_ROW, FakeElement::new(""));
    }

    #[tokio::test]
    async fn test_full_scenario_closes_login_first() {
        let session = ScriptedSession::new();
        search_page(&session);
        let close = session.find(&CLOSE_LOGIN).await.unwrap();
        let cards = [card(&session, "iPhone 15", Some("18% off"))];
        session.place(&PRODUCT_CARD, &cards);

        let summary = run(&session, &testing::config()).await.unwrap();

        assert_eq!(summary.above_threshold.len(), 1);
        let calls = session.calls();
        let first_click = calls
            .iter()
            .find(|c| matches!(c, Call::Click(_)))
            .cloned();
        assert_eq!(first_click, Some(Call::Click(close)));
    }

    #[tokio::test]
    async fn test_search_box_is_cleared_before_typing() {
        let session = ScriptedSession::new();
        search_page(&session);
        let search_box = session.find(&SEARCH_BOX).await.unwrap();
        session.send_keys(&search_box, "Apple ").await.unwrap();

        let mut config = testing::config();
        config.site.discount_query = "iPhone".to_string();
        run(&session, &config).await.unwrap();
        assert_eq!(session.value_of(search_box), "iPhone");
    }

    #[tokio::test]
    async fn test_search_text_mismatch_fails_assertion() {
        let session = ScriptedSession::new();
        session.put(&CLOSE_LOGIN, FakeElement::new("✕"));
        session.put(&SEARCH_BOX, FakeElement::new("").rewrites_value("iPhon"));
        let button = session.put(&SEARCH_BUTTON, FakeElement::new(""));
        session.put(&RESULTS_ROW, FakeElement::new(""));

        let err = run(&session, &testing::config()).await.unwrap_err();

        match err {
            ShopError::Assertion {
                expected, actual, ..
            } => {
                assert_eq!(expected, "iPhone");
                assert_eq!(actual, "iPhon");
            }
            other => panic!("expected an assertion failure, got {:?}", other),
        }
        assert!(!session.calls().contains(&Call::Click(button)));
    }

    #[tokio::test]
    async fn test_missing_results_fails_scenario() {
        let session = ScriptedSession::new();
        session.put(&CLOSE_LOGIN, FakeElement::new("✕"));
        session.put(&SEARCH_BOX, FakeElement::new(""));
        session.put(&SEARCH_BUTTON, FakeElement::new(""));

        let err = run(&session, &testing::config()).await.unwrap_err();
        assert!(matches!(err, ShopError::Timeout { .. }));
    }
}

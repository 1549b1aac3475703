//! Suite runner
//!
//! Owns the single browser session for a run: opens it, runs the selected
//! scenarios one after another, and always closes and quits it afterwards.

mod report;

pub use report::{ScenarioOutcome, SuiteReport};

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::core::{Config, Result, ShopError};
use crate::driver::{BrowserSession, DriverService, WebDriverSession};
use crate::scenarios::{self, ScenarioKind};

const DRIVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `kinds` in order on `session`, then release it
///
/// A failing scenario does not stop the ones after it. The session is closed
/// and quit regardless of how the scenarios ended.
pub async fn run_suite<S: BrowserSession>(
    session: &S,
    config: &Config,
    kinds: &[ScenarioKind],
) -> SuiteReport {
    let started = Instant::now();
    let mut outcomes = Vec::with_capacity(kinds.len());

    if let Err(e) = session.maximize().await {
        warn!("Could not maximize the window: {}", e);
    }

    for &kind in kinds {
        let scenario_started = Instant::now();
        let result = scenarios::run(kind, session, config).await;
        if let Err(e) = &result {
            error!("Scenario {} failed: {}", kind, e);
        }
        outcomes.push(ScenarioOutcome::new(kind, result, scenario_started.elapsed()));
    }

    release(session).await;

    SuiteReport::new(outcomes, started.elapsed())
}

/// Close the window, then end the session
async fn release<S: BrowserSession>(session: &S) {
    if let Err(e) = session.close_window().await {
        warn!("Failed to close browser window: {}", e);
    }
    if let Err(e) = session.quit().await {
        warn!("Failed to quit browser session: {}", e);
    }
}

/// Connect to (or spawn) chromedriver and run `kinds` against the live site
pub async fn run_live(config: &Config, kinds: &[ScenarioKind]) -> Result<SuiteReport> {
    config.validate()?;

    let service = if config.browser.spawn_driver {
        if !DriverService::is_available(&config.browser.driver_binary).await {
            return Err(ShopError::DriverNotFound);
        }
        Some(DriverService::spawn(config, DRIVER_STARTUP_TIMEOUT).await?)
    } else {
        None
    };
    let url = service
        .as_ref()
        .map(|s| s.url().to_string())
        .unwrap_or_else(|| config.browser.webdriver_url.clone());

    let session = WebDriverSession::connect(&url, &config.browser).await?;
    let report = run_suite(&session, config, kinds).await;
    info!("{}", report.headline());

    match service {
        Some(service) => Ok(keep_report(report, service.stop().await)),
        None => Ok(report),
    }
}

/// The suite already ran; a chromedriver that will not stop is only reported
fn keep_report(report: SuiteReport, stopped: Result<()>) -> SuiteReport {
    if let Err(e) = stopped {
        warn!("Failed to stop chromedriver: {}", e);
    }
    report
}

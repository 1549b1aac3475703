//! Interaction wrapper
//!
//! `click` and `send_keys` wait for the target to be ready before acting.
//! A click swallowed by an overlay is retried once as a pointer action.

use tracing::{debug, error};

use crate::core::{Result, Target};
use crate::driver::BrowserSession;
use crate::tools::wait::{wait_until, WaitPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Clickable,
    Visible,
}

/// Wait-then-act helpers shared by every scenario
#[derive(Debug, Clone)]
pub struct Interactor {
    policy: WaitPolicy,
}

impl Interactor {
    pub fn new(policy: WaitPolicy) -> Self {
        Self { policy }
    }

    /// Click `target` once it is displayed and enabled.
    ///
    /// The element is scrolled into view first. If the native click is
    /// intercepted, a pointer move-then-click is tried once; whatever that
    /// attempt returns is final.
    pub async fn click<S: BrowserSession>(
        &self,
        session: &S,
        target: Target<'_, S::Element>,
    ) -> Result<()> {
        let element = self.resolve(session, target, Readiness::Clickable).await?;

        let outcome = async {
            session.scroll_into_view(&element).await?;
            match session.click(&element).await {
                Err(e) if e.is_click_intercepted() => {
                    debug!("Click on {} intercepted, retrying with pointer", target.describe());
                    session.pointer_click(&element).await
                }
                other => other,
            }
        }
        .await;

        if let Err(e) = &outcome {
            error!("Failed to click {}: {}", target.describe(), e);
        }
        outcome
    }

    /// Clear `target` and type `text` once it is displayed
    pub async fn send_keys<S: BrowserSession>(
        &self,
        session: &S,
        target: Target<'_, S::Element>,
        text: &str,
    ) -> Result<()> {
        let element = self.resolve(session, target, Readiness::Visible).await?;
        session.clear(&element).await?;
        session.send_keys(&element, text).await
    }

    async fn resolve<S: BrowserSession>(
        &self,
        session: &S,
        target: Target<'_, S::Element>,
        readiness: Readiness,
    ) -> Result<S::Element> {
        let what = match readiness {
            Readiness::Clickable => format!("{} to be clickable", target.describe()),
            Readiness::Visible => format!("{} to be visible", target.describe()),
        };

        wait_until(&self.policy, &what, move || async move {
            let element = match target {
                Target::Element(element) => element.clone(),
                Target::Locator(selector) => session.find(selector).await?,
            };
            let ready = match readiness {
                Readiness::Clickable => {
                    session.is_displayed(&element).await? && session.is_enabled(&element).await?
                }
                Readiness::Visible => session.is_displayed(&element).await?,
            };
            Ok(ready.then_some(element))
        })
        .await
    }
}

//! WebDriver-backed session
//!
//! Connects to a chromedriver endpoint through thirtyfour.

use async_trait::async_trait;
use serde_json::json;
use thirtyfour::prelude::*;
use thirtyfour::{CapabilitiesHelper, ChromeCapabilities, ChromiumLikeCapabilities};
use tracing::{debug, info};

use crate::core::config::BrowserConfig;
use crate::core::{Point, Result, Selector};
use crate::driver::traits::BrowserSession;

/// A live Chrome session driven over WebDriver
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Open a session against `server_url` using the browser settings
    pub async fn connect(server_url: &str, config: &BrowserConfig) -> Result<Self> {
        let caps = chrome_capabilities(config)?;

        info!("Opening browser session via {}", server_url);
        let driver = WebDriver::new(server_url, caps).await?;

        Ok(Self { driver })
    }
}

/// Chrome capabilities for a run
fn chrome_capabilities(config: &BrowserConfig) -> Result<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();

    caps.insert_base_capability(
        "goog:loggingPrefs".to_string(),
        json!({
            "browser": config.browser_log_level,
            "driver": config.driver_log_level,
        }),
    );

    if config.remote_allow_origins {
        caps.add_arg("--remote-allow-origins=*")?;
    }

    if config.headless {
        caps.set_headless()?;
    }

    Ok(caps)
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<()> {
        debug!("goto {}", url);
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn maximize(&self) -> Result<()> {
        self.driver.maximize_window().await?;
        Ok(())
    }

    async fn ready_state(&self) -> Result<String> {
        let ret = self
            .driver
            .execute("return document.readyState;", Vec::new())
            .await?;
        Ok(ret.json().as_str().unwrap_or_default().to_string())
    }

    async fn find(&self, selector: &Selector) -> Result<WebElement> {
        Ok(self.driver.find(By::XPath(selector.as_str())).await?)
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<WebElement>> {
        Ok(self.driver.find_all(By::XPath(selector.as_str())).await?)
    }

    async fn find_in(&self, parent: &WebElement, selector: &Selector) -> Result<WebElement> {
        Ok(parent.find(By::XPath(selector.as_str())).await?)
    }

    async fn text(&self, element: &WebElement) -> Result<String> {
        Ok(element.text().await?)
    }

    async fn attribute(&self, element: &WebElement, name: &str) -> Result<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn is_displayed(&self, element: &WebElement) -> Result<bool> {
        Ok(element.is_displayed().await?)
    }

    async fn is_enabled(&self, element: &WebElement) -> Result<bool> {
        Ok(element.is_enabled().await?)
    }

    async fn location(&self, element: &WebElement) -> Result<Point> {
        let rect = element.rect().await?;
        Ok(Point {
            x: rect.x,
            y: rect.y,
        })
    }

    async fn execute(&self, script: &str, element: &WebElement) -> Result<()> {
        self.driver.execute(script, vec![element.to_json()?]).await?;
        Ok(())
    }

    async fn click(&self, element: &WebElement) -> Result<()> {
        element.click().await?;
        Ok(())
    }

    async fn pointer_click(&self, element: &WebElement) -> Result<()> {
        self.driver
            .action_chain()
            .move_to_element_center(element)
            .click()
            .perform()
            .await?;
        Ok(())
    }

    async fn clear(&self, element: &WebElement) -> Result<()> {
        element.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, element: &WebElement, text: &str) -> Result<()> {
        element.send_keys(text).await?;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.driver.close_window().await?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.driver.clone().quit().await?;
        Ok(())
    }
}

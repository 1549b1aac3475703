//! chromedriver process management
//!
//! Spawns chromedriver with its log destination and waits for `/status` to
//! report ready. The child is killed when the handle drops.

use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::{Config, Result, ShopError};

/// Handle to a running chromedriver
pub struct DriverService {
    child: Child,
    url: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    value: StatusValue,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    message: String,
}

impl DriverService {
    /// Check if the chromedriver binary can be run
    pub async fn is_available(binary: &str) -> bool {
        Command::new(binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Spawn chromedriver and wait until it accepts sessions
    pub async fn spawn(config: &Config, startup_timeout: Duration) -> Result<Self> {
        let log_path = &config.logging.driver_log_path;
        if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let mut cmd = Command::new(&config.browser.driver_binary);
        cmd.args(driver_args(config));
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShopError::DriverNotFound
            } else {
                ShopError::driver(format!("Failed to spawn chromedriver: {}", e))
            }
        })?;

        let service = Self {
            child,
            url: config.spawned_driver_url(),
        };

        info!(
            "Spawned chromedriver on port {} (log: {})",
            config.browser.driver_port,
            log_path.display()
        );
        service.wait_until_ready(startup_timeout).await?;
        Ok(service)
    }

    /// Endpoint sessions should connect to
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let status_url = format!("{}/status", self.url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let status: StatusResponse = resp.json().await?;
                    if status.value.ready {
                        return Ok(());
                    }
                    debug!("chromedriver not ready: {}", status.value.message);
                }
                Ok(resp) => warn!("chromedriver status returned {}", resp.status()),
                Err(e) if !e.is_connect() => warn!("chromedriver status error: {}", e),
                Err(_) => {}
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(ShopError::RetriesExhausted {
            what: "chromedriver readiness".to_string(),
            attempts,
        })
    }

    /// Stop the process
    pub async fn stop(mut self) -> Result<()> {
        info!("Stopping chromedriver");
        self.child.kill().await?;
        Ok(())
    }
}

fn driver_args(config: &Config) -> Vec<String> {
    vec![
        format!("--port={}", config.browser.driver_port),
        format!("--log-path={}", config.logging.driver_log_path.display()),
        "--verbose".to_string(),
    ]
}

//! shopcheck - end-to-end storefront checks
//!
//! Main entry point for the CLI application.

use clap::Parser;
use shopcheck::core::logging;
use shopcheck::{run_live, Config, ScenarioKind};
use tracing::warn;

/// shopcheck - end-to-end storefront checks over WebDriver
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run (repeatable; default: all, in order)
    #[arg(long, short = 's', value_enum)]
    scenario: Vec<ScenarioKind>,

    /// WebDriver endpoint to connect to
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Spawn chromedriver instead of connecting to a running one
    #[arg(long)]
    spawn_driver: bool,

    /// Run without a visible browser window
    #[arg(long)]
    headless: bool,

    /// Print the suite report as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, rejected) = Config::load_reporting();

    if let Some(url) = args.webdriver_url {
        config.browser.webdriver_url = url;
    }

    if args.spawn_driver {
        config.browser.spawn_driver = true;
    }

    if args.headless {
        config.browser.headless = true;
    }

    if args.write_config {
        if let Some(e) = &rejected {
            eprintln!("Warning: {}", e);
        }
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    logging::init(&config.logging, args.debug);
    if let Some(e) = rejected {
        warn!("{}", e);
    }

    let kinds = if args.scenario.is_empty() {
        ScenarioKind::ALL.to_vec()
    } else {
        args.scenario
    };

    let report = run_live(&config, &kinds).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

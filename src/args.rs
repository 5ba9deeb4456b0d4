//! Command line flags shared by the server and the one-shot CLI.

use crate::browser::LaunchOptions;
use crate::config::{ReadinessPolicy, ReadySignal, ScrapeConfig};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    /// Contest listing API (overrides VJUDGE_CONTEST_API)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Site hosting the contest pages (overrides SITE_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub site_base_url: Option<String>,

    /// Path to custom browser executable (overrides CHROME_PATH)
    #[arg(long, value_name = "PATH")]
    pub executable_path: Option<PathBuf>,

    /// Navigation budget in seconds
    #[arg(long, value_name = "SECS", default_value_t = 60, env = "NAVIGATION_TIMEOUT_SECS")]
    pub navigation_timeout: u64,

    /// Wait after the page is ready, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 2000)]
    pub settle_ms: u64,

    /// Readiness signals, any one of which ends the wait
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [ReadySignal::NetworkIdle, ReadySignal::DomContentLoaded, ReadySignal::TableSelector]
    )]
    pub wait_for: Vec<ReadySignal>,

    /// Let images, stylesheets and fonts load
    #[arg(long)]
    pub no_block_resources: bool,

    /// Route the browser through this proxy server
    #[arg(long, value_name = "URL", env = "SCRAPE_PROXY")]
    pub proxy: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    pub headed: bool,
}

impl ScrapeArgs {
    /// Environment defaults overlaid with the flags that were given
    pub fn to_config(&self) -> ScrapeConfig {
        let mut config = ScrapeConfig::from_env();

        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(base) = &self.site_base_url {
            config.site_base_url = base.clone();
        }

        let timeout = Duration::from_secs(self.navigation_timeout);
        if !(60..=120).contains(&self.navigation_timeout) {
            log::warn!("Navigation timeout of {:?} is outside the usual 60-120s range", timeout);
        }

        let mut launch = LaunchOptions::new()
            .headless(!self.headed)
            .navigation_timeout(timeout)
            .block_resources(!self.no_block_resources);
        launch.chrome_path = self.executable_path.clone().or(config.launch.chrome_path.take());
        config.launch = launch;

        config.readiness = ReadinessPolicy {
            signals: self.wait_for.clone(),
            settle_delay: Duration::from_millis(self.settle_ms),
            ..ReadinessPolicy::default()
        };

        config
    }
}

//! Run configuration, passed explicitly into the orchestrator.

use crate::browser::LaunchOptions;
use crate::contest::ContestId;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://vjudge.net/contest/data?draw=2&start=0&length=20&sortDir=desc&sortCol=0&category=mine&running=3&title=&owner=Pbhustle&_=1733642420751";
pub const DEFAULT_SITE_BASE_URL: &str = "https://vjudge.net";
pub const DEFAULT_PRIMARY_SELECTOR: &str = "#contest-rank-table tbody";
pub const DEFAULT_FALLBACK_SELECTOR: &str = ".contest-rank-table tbody";

pub const API_URL_ENV: &str = "VJUDGE_CONTEST_API";
pub const SITE_BASE_URL_ENV: &str = "SITE_BASE_URL";
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Signals that count as "page ready". Any enabled signal is sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReadySignal {
    /// Load complete and no new resource fetches for the idle window
    NetworkIdle,
    /// `document.readyState` reached `interactive`
    DomContentLoaded,
    /// The primary or fallback table selector matches
    TableSelector,
}

/// CSS selectors for the leaderboard table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelectors {
    pub primary: String,
    pub fallback: String,
}

impl Default for TableSelectors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_SELECTOR.to_string(),
            fallback: DEFAULT_FALLBACK_SELECTOR.to_string(),
        }
    }
}

impl TableSelectors {
    /// Both selectors, primary first
    pub fn ordered(&self) -> [&str; 2] {
        [self.primary.as_str(), self.fallback.as_str()]
    }
}

/// How the navigator decides a page is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub signals: Vec<ReadySignal>,

    /// Delay between probes
    pub poll_interval: Duration,

    /// Quiet period required for [`ReadySignal::NetworkIdle`]
    pub network_idle_window: Duration,

    /// Fixed wait after readiness for rendering the signals do not cover
    pub settle_delay: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            signals: vec![ReadySignal::NetworkIdle, ReadySignal::DomContentLoaded, ReadySignal::TableSelector],
            poll_interval: Duration::from_millis(250),
            network_idle_window: Duration::from_millis(500),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl ReadinessPolicy {
    pub fn accepts(&self, signal: ReadySignal) -> bool {
        self.signals.contains(&signal)
    }
}

/// Everything one scrape run needs
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Contest listing endpoint
    pub api_url: String,

    /// Site that hosts `/contest/<id>` pages
    pub site_base_url: String,

    /// Timeout for the contest API request
    pub api_timeout: Duration,

    pub table: TableSelectors,
    pub readiness: ReadinessPolicy,
    pub launch: LaunchOptions,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            api_timeout: Duration::from_secs(30),
            table: TableSelectors::default(),
            readiness: ReadinessPolicy::default(),
            launch: LaunchOptions::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `VJUDGE_CONTEST_API`, `SITE_BASE_URL` and `CHROME_PATH`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = present(API_URL_ENV) {
            config.api_url = url;
        }
        if let Some(base) = present(SITE_BASE_URL_ENV) {
            config.site_base_url = base;
        }
        if let Some(path) = present(CHROME_PATH_ENV) {
            config.launch.chrome_path = Some(PathBuf::from(path));
        }
        config
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn site_base_url(mut self, base: impl Into<String>) -> Self {
        self.site_base_url = base.into();
        self
    }

    pub fn readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn launch(mut self, launch: LaunchOptions) -> Self {
        self.launch = launch;
        self
    }

    /// Leaderboard page for a contest: `<base>/contest/<id>#rank`
    pub fn contest_url(&self, contest: &ContestId) -> String {
        format!("{}/contest/{}#rank", self.site_base_url.trim_end_matches('/'), contest)
    }
}

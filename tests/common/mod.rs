//! Test doubles for the browser and contest seams.

#![allow(dead_code)]

use async_trait::async_trait;
use rank_scrape::browser::{LaunchOptions, PageHandle, PageProbe, SessionController};
use rank_scrape::config::{ReadinessPolicy, ReadySignal, ScrapeConfig};
use rank_scrape::contest::{ContestId, ContestSource};
use rank_scrape::error::{ExtractionFailure, Result, ScrapeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PRIMARY: &str = "#contest-rank-table tbody";
pub const FALLBACK: &str = ".contest-rank-table tbody";

pub fn rows(data: &[[&str; 3]]) -> Vec<Vec<String>> {
    data.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
}

/// Config with a short budget and no settling delay
pub fn fast_config(timeout: Duration) -> ScrapeConfig {
    ScrapeConfig::new()
        .readiness(ReadinessPolicy {
            signals: vec![ReadySignal::TableSelector],
            poll_interval: Duration::from_millis(5),
            network_idle_window: Duration::from_millis(20),
            settle_delay: Duration::ZERO,
        })
        .launch(LaunchOptions::new().navigation_timeout(timeout))
}

/// What the fake tab renders
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    pub tables: HashMap<&'static str, Vec<Vec<String>>>,
    /// Never report the table as present, so readiness can only time out
    pub never_ready: bool,
    /// The browser rejects the navigation command
    pub goto_fails: bool,
    /// HTTP status of the document, if the page reports one
    pub status: Option<u16>,
    /// Row extraction script throws
    pub script_error: bool,
    pub panic_on_extract: bool,
}

impl PageScript {
    pub fn with_table(selector: &'static str, rows: Vec<Vec<String>>) -> Self {
        Self { tables: HashMap::from([(selector, rows)]), ..Self::default() }
    }
}

pub struct FakePage {
    script: PageScript,
    visited: Arc<Mutex<Vec<String>>>,
}

impl PageHandle for FakePage {
    fn goto(&self, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        if self.script.goto_fails {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        Ok(())
    }

    fn probe(&self, table_selectors: &[&str]) -> Result<PageProbe> {
        let table_present =
            !self.script.never_ready && table_selectors.iter().any(|s| self.script.tables.contains_key(*s));

        Ok(PageProbe {
            ready_state: if self.script.never_ready { "loading" } else { "complete" }.to_string(),
            resource_count: 0,
            status: self.script.status,
            table_present,
        })
    }

    fn table_rows(&self, selector: &str) -> Result<Option<Vec<Vec<String>>>> {
        if self.script.panic_on_extract {
            panic!("renderer crashed");
        }
        if self.script.script_error {
            return Err(ExtractionFailure::Script("TypeError: rows is not iterable".to_string()).into());
        }
        Ok(self.script.tables.get(selector).cloned())
    }
}

/// Counts acquire/release calls and hands out scripted pages
#[derive(Default)]
pub struct FakeController {
    pub script: PageScript,
    pub launch_fails: bool,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub visited: Arc<Mutex<Vec<String>>>,
}

impl FakeController {
    pub fn new(script: PageScript) -> Self {
        Self { script, ..Self::default() }
    }

    pub fn failing_launch() -> Self {
        Self { launch_fails: true, ..Self::default() }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl SessionController for FakeController {
    type Session = FakePage;

    fn acquire(&self, _options: &LaunchOptions) -> Result<FakePage> {
        if self.launch_fails {
            return Err(ScrapeError::Session("chrome not found".to_string()));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage { script: self.script.clone(), visited: Arc::clone(&self.visited) })
    }

    fn release(&self, _session: FakePage) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Resolver that answers without touching the network
pub struct StaticResolver(pub Option<&'static str>);

#[async_trait]
impl ContestSource for StaticResolver {
    async fn resolve(&self) -> Result<ContestId> {
        match self.0 {
            Some(id) => ContestId::new(id),
            None => Err(ScrapeError::Resolution("contest listing has no rows".to_string())),
        }
    }
}

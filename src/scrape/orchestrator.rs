use crate::browser::{PageHandle, SessionController, SessionGuard};
use crate::config::ScrapeConfig;
use crate::contest::{ContestId, ContestSource};
use crate::error::{Result, ScrapeError};
use crate::scrape::extractor::TableExtractor;
use crate::scrape::navigator::PageNavigator;
use crate::scrape::record::{RankRecord, ScrapeResult};
use std::fmt;
use std::sync::Arc;

/// Stages of one scrape run. Runs move strictly forward; any stage may end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Resolving,
    SessionOpen,
    Navigating,
    Extracting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Resolving => "resolving",
            Stage::SessionOpen => "session_open",
            Stage::Navigating => "navigating",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    log::debug!("Scrape stage -> {}", stage);
}

fn failed(stage: Stage, err: ScrapeError) -> ScrapeError {
    log::error!("Scrape failed while {}: {}", stage, err);
    enter(Stage::Failed);
    err
}

/// The blocking worker panicked or was cancelled. The stage it was in is unknown here.
fn aborted(err: tokio::task::JoinError) -> ScrapeError {
    log::error!("Scrape worker aborted: {}", err);
    enter(Stage::Failed);
    ScrapeError::Aborted(err.to_string())
}

/// Composes contest resolution, a browser session, navigation and extraction into one run.
///
/// Every run acquires its own session and releases it before returning, on success and on
/// every failure after the session was opened.
pub struct Orchestrator<R, C> {
    resolver: R,
    controller: Arc<C>,
    config: Arc<ScrapeConfig>,
}

impl<R: ContestSource, C: SessionController> Orchestrator<R, C> {
    pub fn new(resolver: R, controller: C, config: ScrapeConfig) -> Self {
        Self { resolver, controller: Arc::new(controller), config: Arc::new(config) }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Run one scrape from contest lookup to extracted rankings
    pub async fn run(&self) -> Result<ScrapeResult> {
        enter(Stage::Idle);

        enter(Stage::Resolving);
        let contest = self.resolver.resolve().await.map_err(|e| failed(Stage::Resolving, e))?;

        self.run_for(contest).await
    }

    /// Run the browser stages for a contest that is already known
    pub async fn run_for(&self, contest: ContestId) -> Result<ScrapeResult> {
        let url = self.config.contest_url(&contest);
        let controller = Arc::clone(&self.controller);
        let config = Arc::clone(&self.config);

        // headless_chrome is blocking; keep it off the async workers
        let rankings = tokio::task::spawn_blocking(move || capture(controller.as_ref(), &config, &url))
            .await
            .map_err(aborted)??;

        enter(Stage::Done);
        log::info!("Scraped {} rankings for contest {}", rankings.len(), contest);
        Ok(ScrapeResult::new(rankings, contest))
    }
}

/// Open a session, navigate, extract, and release the session on every path
fn capture<C: SessionController>(controller: &C, config: &ScrapeConfig, url: &str) -> Result<Vec<RankRecord>> {
    enter(Stage::SessionOpen);
    let session = controller.acquire(&config.launch).map_err(|e| failed(Stage::SessionOpen, e))?;
    let guard = SessionGuard::new(controller, session);

    let outcome = browse(&*guard, config, url);

    guard.release();
    outcome
}

fn browse<P: PageHandle + ?Sized>(page: &P, config: &ScrapeConfig, url: &str) -> Result<Vec<RankRecord>> {
    enter(Stage::Navigating);
    PageNavigator::from_config(config)
        .navigate(page, url)
        .map_err(|e| failed(Stage::Navigating, e))?;

    enter(Stage::Extracting);
    TableExtractor::new(&config.table)
        .extract(page)
        .map_err(|e| failed(Stage::Extracting, e))
}

use crate::browser::{PageHandle, PageProbe};
use crate::config::{ReadinessPolicy, ReadySignal, ScrapeConfig, TableSelectors};
use crate::error::{Result, ScrapeError};
use std::thread;
use std::time::{Duration, Instant};

/// Drives a tab to a URL and blocks until the page is ready or the budget runs out
#[derive(Debug, Clone, Copy)]
pub struct PageNavigator<'a> {
    readiness: &'a ReadinessPolicy,
    selectors: &'a TableSelectors,
    timeout: Duration,
}

impl<'a> PageNavigator<'a> {
    pub fn new(readiness: &'a ReadinessPolicy, selectors: &'a TableSelectors, timeout: Duration) -> Self {
        Self { readiness, selectors, timeout }
    }

    /// Navigator using the config's readiness policy and the session's navigation budget
    pub fn from_config(config: &'a ScrapeConfig) -> Self {
        Self::new(&config.readiness, &config.table, config.launch.navigation_timeout)
    }

    /// Navigate, wait for the first enabled readiness signal, then apply the settling delay.
    ///
    /// The budget starts before the navigation command, so a slow `goto` counts against it.
    /// Fails with [`ScrapeError::NavigationTimeout`] when no signal fires within the budget and
    /// with [`ScrapeError::Navigation`] when the browser rejects the URL or the document comes
    /// back with an HTTP error status.
    pub fn navigate<P: PageHandle + ?Sized>(&self, page: &P, url: &str) -> Result<ReadySignal> {
        let started = Instant::now();
        log::info!("Navigating to {}", url);

        if let Err(e) = page.goto(url) {
            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                log::debug!("Navigation command outlived the budget: {}", e);
                return Err(self.timed_out(url, elapsed));
            }
            return Err(e);
        }

        let signal = self.wait_ready(page, url, started)?;
        log::debug!("Page ready on {:?} after {:?}", signal, started.elapsed());

        if !self.readiness.settle_delay.is_zero() {
            thread::sleep(self.readiness.settle_delay);
        }

        Ok(signal)
    }

    fn wait_ready<P: PageHandle + ?Sized>(&self, page: &P, url: &str, started: Instant) -> Result<ReadySignal> {
        let selectors = self.selectors.ordered();
        let mut idle = IdleTracker::default();

        loop {
            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                return Err(self.timed_out(url, elapsed));
            }

            match page.probe(&selectors) {
                Ok(probe) => {
                    if let Some(status) = probe.status.filter(|s| *s >= 400) {
                        return Err(ScrapeError::Navigation {
                            url: url.to_string(),
                            reason: format!("page responded with HTTP {}", status),
                        });
                    }

                    let quiet_for = idle.observe(&probe, Instant::now());
                    if let Some(signal) = self.ready_signal(&probe, quiet_for) {
                        return Ok(signal);
                    }
                }
                // The execution context is torn down while a navigation commits
                Err(e) => log::debug!("Readiness probe failed, polling again: {}", e),
            }

            let remaining = self.timeout.saturating_sub(started.elapsed());
            thread::sleep(self.readiness.poll_interval.min(remaining));
        }
    }

    fn timed_out(&self, url: &str, elapsed: Duration) -> ScrapeError {
        ScrapeError::NavigationTimeout { url: url.to_string(), elapsed }
    }

    fn ready_signal(&self, probe: &PageProbe, quiet_for: Duration) -> Option<ReadySignal> {
        if self.readiness.accepts(ReadySignal::TableSelector) && probe.table_present {
            return Some(ReadySignal::TableSelector);
        }
        if self.readiness.accepts(ReadySignal::NetworkIdle)
            && probe.load_complete()
            && quiet_for >= self.readiness.network_idle_window
        {
            return Some(ReadySignal::NetworkIdle);
        }
        if self.readiness.accepts(ReadySignal::DomContentLoaded) && probe.dom_loaded() {
            return Some(ReadySignal::DomContentLoaded);
        }
        None
    }
}

/// Tracks how long the resource count has stayed flat since load completed
#[derive(Debug, Default)]
struct IdleTracker {
    resource_count: Option<usize>,
    quiet_since: Option<Instant>,
}

impl IdleTracker {
    fn observe(&mut self, probe: &PageProbe, now: Instant) -> Duration {
        if !probe.load_complete() {
            *self = Self::default();
            return Duration::ZERO;
        }

        match self.quiet_since {
            Some(since) if self.resource_count == Some(probe.resource_count) => now.saturating_duration_since(since),
            _ => {
                self.resource_count = Some(probe.resource_count);
                self.quiet_since = Some(now);
                Duration::ZERO
            }
        }
    }
}

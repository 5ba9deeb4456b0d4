use crate::browser::config::LaunchOptions;
use crate::browser::page::{self, PageHandle, PageProbe};
use crate::error::{ExtractionFailure, ReleaseError, Result, ScrapeError};
use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::{FailRequest, RequestPattern, RequestStage};
use headless_chrome::protocol::cdp::Network::{ErrorReason, ResourceType};
use headless_chrome::{Browser, Tab};
use serde::de::DeserializeOwned;
use std::ffi::OsStr;
use std::ops::Deref;
use std::sync::Arc;

/// Owns the lifecycle of browser sessions.
///
/// Every session handed out by [`acquire`](SessionController::acquire) must be passed back to
/// [`release`](SessionController::release) exactly once. [`SessionGuard`] enforces that.
pub trait SessionController: Send + Sync + 'static {
    type Session: PageHandle + Send + 'static;

    /// Launch a browser and open its single tab
    fn acquire(&self, options: &LaunchOptions) -> Result<Self::Session>;

    /// Tear the session down. Failures are logged, never returned.
    fn release(&self, session: Self::Session);
}

/// Launches a local Chrome/Chromium through headless_chrome
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeController;

impl SessionController for ChromeController {
    type Session = ChromeSession;

    fn acquire(&self, options: &LaunchOptions) -> Result<ChromeSession> {
        ChromeSession::launch(options)
    }

    fn release(&self, session: ChromeSession) {
        match session.close() {
            Ok(()) => log::debug!("Browser session released"),
            Err(e) => log::warn!("{}", e),
        }
    }
}

/// A Chrome process with exactly one tab
pub struct ChromeSession {
    /// Dropping the Browser kills the Chrome process
    browser: Browser,

    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.headless = options.headless;
        launch_opts.sandbox = options.sandbox;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        // Also the reply deadline for Page.navigate, so it must not outlast the navigation budget
        launch_opts.idle_browser_timeout = options.command_timeout();

        // Container-friendly flags. headless_chrome adds --no-sandbox itself when sandbox is off.
        if !options.sandbox {
            launch_opts.args.push(OsStr::new("--disable-setuid-sandbox"));
        }
        launch_opts.args.push(OsStr::new("--disable-dev-shm-usage"));
        launch_opts.args.push(OsStr::new("--disable-gpu"));

        if let Some(path) = &options.chrome_path {
            launch_opts.path = Some(path.clone());
        }

        launch_opts.proxy_server = options.proxy_server.as_deref();

        let browser = Browser::new(launch_opts).map_err(|e| ScrapeError::Session(e.to_string()))?;

        let tab = browser
            .wait_for_initial_tab()
            .map_err(|e| ScrapeError::Session(format!("Failed to get initial tab: {}", e)))?;

        tab.set_default_timeout(options.navigation_timeout);

        if options.block_resources {
            block_subresources(&tab)
                .map_err(|e| ScrapeError::Session(format!("Failed to enable request blocking: {}", e)))?;
        }

        Ok(Self { browser, tab })
    }

    /// Get the session's tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the tab and shut the browser down
    pub fn close(self) -> std::result::Result<(), ReleaseError> {
        let closed = self.tab.close(false).map_err(|e| ReleaseError(format!("Failed to close tab: {}", e)));

        // The process goes away with the Browser, whatever happened to the tab
        drop(self.browser);

        closed.map(|_| ())
    }

    fn evaluate_json<T: DeserializeOwned>(&self, script: &str) -> std::result::Result<T, String> {
        let result = self.tab.evaluate(script, false).map_err(|e| e.to_string())?;

        let value = result.value.ok_or_else(|| "No value returned from script".to_string())?;

        // The scripts return a JSON string so the value survives CDP serialization intact
        let json_str: String = serde_json::from_value(value).map_err(|e| format!("Expected JSON string: {}", e))?;

        serde_json::from_str(&json_str).map_err(|e| format!("Failed to parse script result: {}", e))
    }
}

impl PageHandle for ChromeSession {
    fn goto(&self, url: &str) -> Result<()> {
        self.tab.navigate_to(url).map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn probe(&self, table_selectors: &[&str]) -> Result<PageProbe> {
        self.evaluate_json(&page::probe_script(table_selectors))
            .map_err(|reason| ScrapeError::Navigation { url: self.tab.get_url(), reason })
    }

    fn table_rows(&self, selector: &str) -> Result<Option<Vec<Vec<String>>>> {
        self.evaluate_json(&page::table_rows_script(selector))
            .map_err(|reason| ExtractionFailure::Script(reason).into())
    }
}

fn blocked_resource_types() -> Vec<ResourceType> {
    vec![ResourceType::Image, ResourceType::Stylesheet, ResourceType::Font, ResourceType::Media]
}

/// Fail sub-resource requests that never carry leaderboard text
fn block_subresources(tab: &Arc<Tab>) -> anyhow::Result<()> {
    let patterns: Vec<RequestPattern> = blocked_resource_types()
        .into_iter()
        .map(|resource_type| RequestPattern {
            url_pattern: None,
            resource_Type: Some(resource_type),
            request_stage: Some(RequestStage::Request),
        })
        .collect();

    tab.enable_fetch(Some(patterns.as_slice()), None)?;

    let interceptor: Arc<dyn RequestInterceptor + Send + Sync> =
        Arc::new(|_transport: Arc<Transport>, _session_id: SessionId, event: RequestPausedEvent| {
            RequestPausedDecision::Fail(FailRequest {
                request_id: event.params.request_id,
                error_reason: ErrorReason::BlockedByClient,
            })
        });
    tab.enable_request_interception(interceptor)?;

    Ok(())
}

/// Routes every session through a fixed proxy server.
///
/// The proxy is applied as a launch flag only. Nothing checks that traffic actually leaves
/// through it. Only unauthenticated proxies work: Chrome drops `user:pw@` from
/// `--proxy-server` and no handler answers the auth challenge.
#[derive(Debug, Clone)]
pub struct ProxiedController<C> {
    inner: C,
    proxy: String,
}

impl<C: SessionController> ProxiedController<C> {
    /// Fails with [`ScrapeError::Session`] when the proxy URL carries credentials
    pub fn new(inner: C, proxy: impl Into<String>) -> Result<Self> {
        let proxy = proxy.into();
        if has_credentials(&proxy) {
            return Err(ScrapeError::Session(format!(
                "Proxy {} carries credentials, only unauthenticated proxies are supported",
                proxy_host(&proxy)
            )));
        }
        Ok(Self { inner, proxy })
    }

    pub fn proxy(&self) -> &str {
        &self.proxy
    }
}

impl<C: SessionController> SessionController for ProxiedController<C> {
    type Session = C::Session;

    fn acquire(&self, options: &LaunchOptions) -> Result<Self::Session> {
        log::info!("Launching browser through proxy {}", self.proxy);
        let options = options.clone().proxy_server(self.proxy.clone());
        self.inner.acquire(&options)
    }

    fn release(&self, session: Self::Session) {
        self.inner.release(session)
    }
}

fn has_credentials(proxy: &str) -> bool {
    let rest = proxy.split_once("://").map_or(proxy, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    authority.contains('@')
}

/// Strip credentials from a proxy URL before it reaches a message
fn proxy_host(proxy: &str) -> &str {
    match proxy.rsplit_once('@') {
        Some((_, host)) => host,
        None => proxy,
    }
}

/// Holds an acquired session and hands it back to its controller exactly once.
///
/// Call [`release`](SessionGuard::release) on the normal path. If the guard is dropped first
/// (early return, panic) the session is released from `Drop`.
pub struct SessionGuard<'c, C: SessionController> {
    controller: &'c C,
    session: Option<C::Session>,
}

impl<'c, C: SessionController> SessionGuard<'c, C> {
    pub fn new(controller: &'c C, session: C::Session) -> Self {
        Self { controller, session: Some(session) }
    }

    pub fn release(mut self) {
        if let Some(session) = self.session.take() {
            self.controller.release(session);
        }
    }
}

impl<C: SessionController> Deref for SessionGuard<'_, C> {
    type Target = C::Session;

    fn deref(&self) -> &Self::Target {
        match &self.session {
            Some(session) => session,
            // Only `release` and `drop` take the session, and both consume the guard
            None => unreachable!("session guard used after release"),
        }
    }
}

impl<C: SessionController> Drop for SessionGuard<'_, C> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            log::warn!("Releasing browser session from guard drop");
            self.controller.release(session);
        }
    }
}

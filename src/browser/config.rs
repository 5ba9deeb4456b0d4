use std::path::PathBuf;
use std::time::Duration;

/// Default navigation budget attached to each session
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for launching a browser session
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,

    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Path to a Chrome/Chromium binary. Auto-detected when unset.
    pub chrome_path: Option<PathBuf>,

    /// Keep Chrome's OS sandbox. Containers usually cannot provide one, so this is off by default.
    pub sandbox: bool,

    /// Budget for one navigation, enforced by the page navigator
    pub navigation_timeout: Duration,

    /// How long the browser may sit idle before headless_chrome shuts it down. headless_chrome
    /// also uses it as the reply deadline for every CDP call, see [`command_timeout`](Self::command_timeout).
    pub idle_timeout: Duration,

    /// Fail image, stylesheet, font and media requests at the network layer
    pub block_resources: bool,

    /// Proxy server passed to Chrome, e.g. `socks5://10.0.0.1:1080`
    pub proxy_server: Option<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            sandbox: false,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            idle_timeout: Duration::from_secs(5 * 60),
            block_resources: true,
            proxy_server: None,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Deadline handed to headless_chrome for CDP replies. Capped at the navigation budget so a
    /// `Page.navigate` that never answers cannot outlive it.
    pub fn command_timeout(&self) -> Duration {
        self.idle_timeout.min(self.navigation_timeout)
    }

    pub fn block_resources(mut self, block: bool) -> Self {
        self.block_resources = block;
        self
    }

    pub fn proxy_server(mut self, proxy: impl Into<String>) -> Self {
        self.proxy_server = Some(proxy.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fit_containers() {
        let opts = LaunchOptions::default();

        assert!(opts.headless);
        assert!(!opts.sandbox);
        assert_eq!((opts.window_width, opts.window_height), (1280, 800));
        assert_eq!(opts.navigation_timeout, Duration::from_secs(60));
        assert!(opts.proxy_server.is_none());
    }

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new()
            .headless(false)
            .window_size(800, 600)
            .chrome_path("/usr/bin/google-chrome-beta")
            .navigation_timeout(Duration::from_secs(120))
            .block_resources(false);

        assert!(!opts.headless);
        assert_eq!(opts.window_width, 800);
        assert_eq!(opts.window_height, 600);
        assert_eq!(opts.chrome_path, Some(PathBuf::from("/usr/bin/google-chrome-beta")));
        assert_eq!(opts.navigation_timeout, Duration::from_secs(120));
        assert!(!opts.block_resources);
    }

    #[test]
    fn test_command_timeout_never_exceeds_navigation_budget() {
        let opts = LaunchOptions::default();
        assert_eq!(opts.command_timeout(), Duration::from_secs(60));

        let opts = LaunchOptions::new()
            .navigation_timeout(Duration::from_secs(90))
            .idle_timeout(Duration::from_secs(30));
        assert_eq!(opts.command_timeout(), Duration::from_secs(30));
    }
}

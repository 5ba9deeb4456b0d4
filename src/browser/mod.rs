//! Browser session management
//!
//! - [`SessionController`]: acquire/release contract, with the live [`ChromeController`]
//! - [`ProxiedController`]: decorator that routes sessions through a proxy
//! - [`SessionGuard`]: releases a session exactly once on every exit path
//! - [`PageHandle`]: the tab operations the navigator and extractor rely on

pub mod config;
pub mod page;
pub mod session;

pub use config::{DEFAULT_NAVIGATION_TIMEOUT, LaunchOptions};
pub use page::{PageHandle, PageProbe};
pub use session::{ChromeController, ChromeSession, ProxiedController, SessionController, SessionGuard};

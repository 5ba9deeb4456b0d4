//! # rank-scrape
//!
//! Scrapes a contest leaderboard that only exists after client-side rendering, using headless
//! Chrome via the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Contest Resolution**: Look up the live contest identifier from a JSON listing API
//! - **Session Management**: Launch a container-friendly headless Chrome with one tab, and always release it
//! - **Readiness Waiting**: Network idle, DOM loaded or table present, bounded by a navigation budget
//! - **Table Extraction**: Lenient parsing of (rank, name, score) rows with a fallback selector
//! - **HTTP Server**: A single `GET /scrape` endpoint (requires the `server` feature)
//!
//! ## Running the Server
//!
//! ```bash
//! # Headless, port 3000
//! cargo run --bin rank-scrape-server
//!
//! # Custom Chrome binary and a longer navigation budget
//! CHROME_PATH=/usr/bin/google-chrome-beta cargo run --bin rank-scrape-server -- --navigation-timeout 120
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use rank_scrape::{ChromeController, ContestResolver, Orchestrator, ScrapeConfig};
//!
//! # async fn run() -> rank_scrape::Result<()> {
//! let config = ScrapeConfig::from_env();
//! let resolver = ContestResolver::new(config.api_url.clone(), config.api_timeout)?;
//! let orchestrator = Orchestrator::new(resolver, ChromeController, config);
//!
//! let result = orchestrator.run().await?;
//! for record in result.rankings() {
//!     println!("{:>4} {:<24} {}", record.rank, record.name, record.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Session controller, proxy decorator and the page abstraction
//! - [`contest`]: Contest identifier lookup
//! - [`scrape`]: Navigator, extractor and the orchestrator that ties them together
//! - [`config`]: Run configuration
//! - [`error`]: Error types and result aliases
//! - [`server`]: HTTP facade (requires `server` feature)

pub mod browser;
pub mod config;
pub mod contest;
pub mod error;
pub mod scrape;

#[cfg(feature = "clap")]
pub mod args;

#[cfg(feature = "server")]
pub mod server;

pub use browser::{ChromeController, LaunchOptions, PageHandle, ProxiedController, SessionController};
pub use config::{ReadinessPolicy, ReadySignal, ScrapeConfig, TableSelectors};
pub use contest::{ContestId, ContestResolver, ContestSource};
pub use error::{ExtractionFailure, Result, ScrapeError};
pub use scrape::{Orchestrator, RankRecord, ScrapeResult};

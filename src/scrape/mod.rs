//! The scrape pipeline: navigate to the leaderboard, wait for it to render, read the table.

pub mod extractor;
pub mod navigator;
pub mod orchestrator;
pub mod record;

pub use extractor::TableExtractor;
pub use navigator::PageNavigator;
pub use orchestrator::{Orchestrator, Stage};
pub use record::{RankRecord, ScrapeResult, parse_count, parse_rows};

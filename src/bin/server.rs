//! rank-scrape HTTP server
//!
//! Serves `GET /scrape`, which resolves the current contest, scrapes its leaderboard with a
//! headless browser and answers with the rankings as JSON.

use clap::Parser;
use rank_scrape::args::ScrapeArgs;
use rank_scrape::browser::{ChromeController, ProxiedController};
use rank_scrape::contest::ContestResolver;
use rank_scrape::scrape::Orchestrator;
use rank_scrape::server;

#[derive(Parser)]
#[command(name = "rank-scrape-server")]
#[command(version)]
#[command(about = "Contest leaderboard scraper over HTTP", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = 3000, env = "PORT")]
    port: u16,

    #[command(flatten)]
    scrape: ScrapeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.scrape.to_config();

    log::info!("rank-scrape-server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Contest API: {}", config.api_url);
    log::info!("Browser mode: {}", if config.launch.headless { "headless" } else { "headed" });
    if let Some(path) = &config.launch.chrome_path {
        log::info!("Browser executable: {}", path.display());
    }

    let resolver = ContestResolver::new(config.api_url.clone(), config.api_timeout)?;

    match cli.scrape.proxy.clone() {
        Some(proxy) => {
            let controller = ProxiedController::new(ChromeController, proxy)?;
            server::serve(Orchestrator::new(resolver, controller, config), cli.port).await?;
        }
        None => {
            server::serve(Orchestrator::new(resolver, ChromeController, config), cli.port).await?;
        }
    }

    Ok(())
}

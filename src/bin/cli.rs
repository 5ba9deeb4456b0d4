//! rank-scrape one-shot CLI
//!
//! Runs a single scrape and prints the result as JSON on stdout.

use clap::Parser;
use rank_scrape::args::ScrapeArgs;
use rank_scrape::browser::{ChromeController, ProxiedController, SessionController};
use rank_scrape::contest::{ContestId, ContestResolver};
use rank_scrape::scrape::{Orchestrator, ScrapeResult};

#[derive(Parser)]
#[command(name = "rank-scrape")]
#[command(version)]
#[command(about = "Scrape a contest leaderboard once and print it as JSON", long_about = None)]
struct Cli {
    /// Skip the contest API and scrape this contest directly
    #[arg(long, value_name = "ID")]
    contest: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    scrape: ScrapeArgs,
}

async fn scrape_once<C: SessionController>(
    orchestrator: Orchestrator<ContestResolver, C>,
    contest: Option<ContestId>,
) -> rank_scrape::Result<ScrapeResult> {
    match contest {
        Some(contest) => orchestrator.run_for(contest).await,
        None => orchestrator.run().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.scrape.to_config();
    let contest = cli.contest.map(ContestId::new).transpose()?;

    let resolver = ContestResolver::new(config.api_url.clone(), config.api_timeout)?;

    let result = match cli.scrape.proxy.clone() {
        Some(proxy) => {
            let controller = ProxiedController::new(ChromeController, proxy)?;
            scrape_once(Orchestrator::new(resolver, controller, config), contest).await?
        }
        None => scrape_once(Orchestrator::new(resolver, ChromeController, config), contest).await?,
    };

    let json = if cli.pretty { serde_json::to_string_pretty(&result)? } else { serde_json::to_string(&result)? };
    println!("{}", json);

    Ok(())
}

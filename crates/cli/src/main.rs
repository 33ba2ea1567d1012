//! Review Metrics CLI

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use common::{Config, Error};
use github::{GitHubClient, RetryPolicy};
use processor::{CollectConfig, PrCollector, ReviewAnalyzer};
use tracing::info;

mod commands;
mod dump;
mod export;
mod report;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Command {
    /// Per-member metrics over PRs each member was asked to review or reviewed
    Direct,
    /// Per-member metrics over PRs that requested the team's review
    Team,
    /// Team-wide metrics over team-tagged and direct PRs combined
    Overall,
}

#[derive(Parser, Debug)]
#[command(name = "review-metrics")]
#[command(about = "Code-review engagement and turnaround metrics from GitHub", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Team members to analyze (overrides TEAM_MEMBERS)
    #[arg(short, long, global = true, value_delimiter = ',')]
    users: Vec<String>,

    /// Team as org/slug (overrides TEAM_NAME)
    #[arg(short, long, global = true)]
    team: Option<String>,

    /// Directory for CSV and dump files (overrides OUTPUT_DIR)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print results as JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,

    /// Write the fetched PRs to pr_data_dump.txt (team and overall)
    #[arg(long, global = true)]
    dump: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command once config and flags are merged
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub json: bool,
    pub dump: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the report
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("review_metrics={}", level).parse()?)
                .add_directive(format!("processor={}", level).parse()?)
                .add_directive(format!("github={}", level).parse()?),
        )
        .init();

    let mut config = Config::from_env();
    if !cli.users.is_empty() {
        config.team.members = cli.users.clone();
    }
    if let Some(team) = cli.team.clone() {
        config.team.name = team;
    }
    if let Some(dir) = cli.output_dir.clone() {
        config.output_dir = dir;
    }

    if config.team.members.is_empty() {
        return Err(Error::Config(
            "no team members given; set TEAM_MEMBERS or pass --users".to_string(),
        )
        .into());
    }
    let token = config
        .github_token
        .clone()
        .ok_or_else(|| Error::Config("GITHUB_TOKEN must be set".to_string()))?;

    info!(
        "Analyzing {} members of {}",
        config.team.members.len(),
        config.team.name
    );

    let client = GitHubClient::new(Some(token))
        .with_endpoint(config.graphql_url.clone())
        .with_retry(RetryPolicy {
            max_retries: config.max_retries,
            delay: Duration::from_secs(config.retry_delay_secs),
        });
    let collector = PrCollector::new(client, CollectConfig::from(&config));
    let analyzer = ReviewAnalyzer::new(&config.team);
    let options = RunOptions {
        output_dir: config.output_dir.clone(),
        json: cli.json,
        dump: cli.dump,
    };

    commands::run(cli.command, &collector, &analyzer, &config.team, &options).await
}

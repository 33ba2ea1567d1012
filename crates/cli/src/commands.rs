//! Subcommand handlers: collect, analyze, export, report

use chrono::Utc;
use common::models::TimingMetricKind;
use common::TeamConfig;
use processor::{PrCollector, ReviewAnalyzer};
use tracing::info;

use crate::{dump, export, report, Command, RunOptions};

/// Metrics reported by the direct-review command, in column order
pub const DIRECT_METRICS: &[TimingMetricKind] = &[
    TimingMetricKind::ReviewTurnaround,
    TimingMetricKind::ApprovalTurnaround,
    TimingMetricKind::TimeToMerge,
];

/// Metrics reported by the team-tagged command, in column order
pub const TEAM_TAGGED_METRICS: &[TimingMetricKind] = &[
    TimingMetricKind::ReviewTurnaround,
    TimingMetricKind::TimeToMerge,
];

pub async fn run(
    command: Command,
    collector: &PrCollector,
    analyzer: &ReviewAnalyzer,
    team: &TeamConfig,
    options: &RunOptions,
) -> anyhow::Result<()> {
    match command {
        Command::Direct => direct(collector, analyzer, options).await,
        Command::Team => team_tagged(collector, analyzer, team, options).await,
        Command::Overall => overall(collector, analyzer, team, options).await,
    }
}

async fn direct(
    collector: &PrCollector,
    analyzer: &ReviewAnalyzer,
    options: &RunOptions,
) -> anyhow::Result<()> {
    let mut results = Vec::with_capacity(analyzer.members().len());
    for member in analyzer.members() {
        let prs = collector.direct(member).await?;
        results.push(analyzer.analyze_direct(member, &prs));
    }

    let path = export::write_file(&options.output_dir, "direct_review_metrics.csv", |file| {
        export::write_members(file, &results, DIRECT_METRICS)
    })?;
    info!("Exported {}", path.display());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print!("{}", report::render_member(result, DIRECT_METRICS));
        }
    }
    Ok(())
}

async fn team_tagged(
    collector: &PrCollector,
    analyzer: &ReviewAnalyzer,
    team: &TeamConfig,
    options: &RunOptions,
) -> anyhow::Result<()> {
    info!("Fetching team review data...");
    let prs = collector.team(team).await?;
    if options.dump {
        let path = dump::write(&options.output_dir, &prs, analyzer.members(), Utc::now())?;
        info!("PR data dumped to {}", path.display());
    }

    info!("Analyzing data for each user...");
    let results = analyzer.analyze_members(&prs);

    let path = export::write_file(&options.output_dir, "team_review_metrics.csv", |file| {
        export::write_members(file, &results, TEAM_TAGGED_METRICS)
    })?;
    info!("Exported {}", path.display());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print!("{}", report::render_member(result, TEAM_TAGGED_METRICS));
        }
    }
    Ok(())
}

async fn overall(
    collector: &PrCollector,
    analyzer: &ReviewAnalyzer,
    team: &TeamConfig,
    options: &RunOptions,
) -> anyhow::Result<()> {
    info!("Fetching all PR data...");
    let prs = collector.overall(team).await?;
    if options.dump {
        let path = dump::write(&options.output_dir, &prs, analyzer.members(), Utc::now())?;
        info!("PR data dumped to {}", path.display());
    }

    let analysis = analyzer.analyze_team(&prs);

    let path = export::write_file(&options.output_dir, "overall_metrics.csv", |file| {
        export::write_overall(file, &analysis)
    })?;
    info!("Exported {}", path.display());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render_team(&analysis));
    }
    Ok(())
}

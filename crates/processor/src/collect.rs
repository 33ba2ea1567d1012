//! Fetch PR sets from GitHub and turn them into de-duplicated views

use common::{Config, TeamConfig};
use github::{ClientError, GitHubClient, PullRequestRecord};
use thiserror::Error;
use tracing::info;

use crate::pull_request::{dedupe_by_url, PullRequest};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] ClientError),
}

/// Search limits and exclusions applied when collecting PRs
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Cap per direct-review search query
    pub direct_pr_limit: usize,
    /// Cap for the team-tagged search
    pub team_pr_limit: usize,
    /// Authors left out of team-tagged searches
    pub bot_authors: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            direct_pr_limit: 50,
            team_pr_limit: 100,
            bot_authors: Vec::new(),
        }
    }
}

impl From<&Config> for CollectConfig {
    fn from(config: &Config) -> Self {
        Self {
            direct_pr_limit: config.direct_pr_limit,
            team_pr_limit: config.team_pr_limit,
            bot_authors: config.bot_authors.clone(),
        }
    }
}

/// Collects the PR sets each analysis runs over
pub struct PrCollector {
    client: GitHubClient,
    config: CollectConfig,
}

fn into_views(records: Vec<PullRequestRecord>) -> impl Iterator<Item = PullRequest> {
    records.into_iter().map(PullRequest::from)
}

impl PrCollector {
    pub fn new(client: GitHubClient, config: CollectConfig) -> Self {
        Self { client, config }
    }

    /// PRs requesting review from, or reviewed by, `username`
    pub async fn direct(&self, username: &str) -> Result<Vec<PullRequest>, CollectError> {
        let records = self
            .client
            .fetch_direct_review_prs(username, self.config.direct_pr_limit)
            .await?;
        let prs = dedupe_by_url(into_views(records));
        info!("{} unique direct-review PRs for {}", prs.len(), username);
        Ok(prs)
    }

    /// PRs requesting review from the team
    pub async fn team(&self, team: &TeamConfig) -> Result<Vec<PullRequest>, CollectError> {
        let records = self
            .client
            .fetch_team_tagged_prs(&team.name, &self.config.bot_authors, self.config.team_pr_limit)
            .await?;
        Ok(into_views(records).collect())
    }

    /// Team-tagged PRs plus every member's direct-review PRs, by URL
    pub async fn overall(&self, team: &TeamConfig) -> Result<Vec<PullRequest>, CollectError> {
        let team_prs = self.team(team).await?;
        info!("Team-tagged PRs: {}", team_prs.len());

        let mut direct_prs = Vec::new();
        for member in &team.members {
            info!("Fetching direct reviews for {}...", member);
            let records = self
                .client
                .fetch_direct_review_prs(member, self.config.direct_pr_limit)
                .await?;
            direct_prs.extend(into_views(records));
        }
        info!("Direct-tagged PRs: {}", direct_prs.len());

        let prs = dedupe_by_url(team_prs.into_iter().chain(direct_prs));
        info!("Total unique PRs: {}", prs.len());
        Ok(prs)
    }
}

//! Application configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

const DEFAULT_TEAM_NAME: &str = "Shopify/payments-infrastructure";
const DEFAULT_BOT_AUTHORS: &[&str] = &[
    "github-actions[bot]",
    "shopify-shipitnext[bot]",
    "dependabot[bot]",
];

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub graphql_url: String,
    pub team: TeamConfig,
    /// Authors excluded from the team-tagged search
    pub bot_authors: Vec<String>,
    /// Cap per direct-review search query
    pub direct_pr_limit: usize,
    /// Cap for the team-tagged search
    pub team_pr_limit: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub output_dir: PathBuf,
}

/// The team whose members are analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamConfig {
    /// `org/slug` identifier used by team searches
    pub name: String,
    pub members: Vec<String>,
}

impl TeamConfig {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Slug matched against review requests, e.g. `payments-infrastructure`
    /// for `Shopify/payments-infrastructure`.
    pub fn slug(&self) -> &str {
        match self.name.rsplit_once('/') {
            Some((_, slug)) => slug,
            None => &self.name,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            graphql_url: env::var("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|_| "https://api.github.com/graphql".to_string()),
            team: TeamConfig {
                name: env::var("TEAM_NAME").unwrap_or_else(|_| DEFAULT_TEAM_NAME.to_string()),
                members: env::var("TEAM_MEMBERS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },
            bot_authors: env::var("BOT_AUTHORS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| DEFAULT_BOT_AUTHORS.iter().map(|b| b.to_string()).collect()),
            direct_pr_limit: parse_var("DIRECT_PR_LIMIT", 50),
            team_pr_limit: parse_var("TEAM_PR_LIMIT", 100),
            max_retries: parse_var("MAX_RETRIES", 10),
            retry_delay_secs: parse_var("RETRY_DELAY_SECS", 2),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

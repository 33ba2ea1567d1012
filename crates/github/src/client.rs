//! GitHub GraphQL search client for fetching PRs and their review activity

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, info, warn};

use crate::types::PullRequestRecord;

const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";
const MAX_PAGE_SIZE: usize = 100;

/// Pull request search with review activity. `withTimeline` toggles the
/// review-requested timeline, which team searches do not need.
const SEARCH_QUERY: &str = r#"
query($search: String!, $first: Int!, $after: String, $withTimeline: Boolean!) {
  search(query: $search, type: ISSUE, first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      ... on PullRequest {
        number
        url
        state
        createdAt
        mergedAt
        author { login }
        reviewRequests(first: 20) {
          nodes {
            requestedReviewer {
              ... on Team { name slug }
            }
          }
        }
        timelineItems(first: 20, itemTypes: [REVIEW_REQUESTED_EVENT]) @include(if: $withTimeline) {
          nodes {
            ... on ReviewRequestedEvent {
              createdAt
              requestedReviewer {
                ... on User { login }
              }
            }
          }
        }
        reviews(first: 20) {
          nodes { author { login } state createdAt }
        }
        comments(first: 20) {
          nodes { author { login } createdAt }
        }
        reviewThreads(first: 20) {
          nodes {
            comments(first: 20) {
              nodes { author { login } createdAt }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How often and how patiently a failed request is retried
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    endpoint: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchConnection {
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// One decoded page of search results
#[derive(Debug)]
struct SearchPage {
    prs: Vec<PullRequestRecord>,
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            token,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("review-metrics/0.1"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    async fn execute(&self, body: &Value) -> Result<SearchPage, ClientError> {
        debug!("POST {}", self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .headers(self.headers())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: GraphQlResponse = resp.json().await?;
        into_page(response)
    }

    /// Delays between attempts: `max_retries` attempts in total
    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        let retries = self.retry.max_retries.max(1) - 1;
        FixedInterval::new(self.retry.delay).take(retries as usize)
    }

    /// Run one search request, retrying failures per the retry policy
    async fn execute_with_retry(&self, body: &Value) -> Result<SearchPage, ClientError> {
        Retry::spawn(self.retry_strategy(), || async {
            self.execute(body).await.map_err(|e| {
                warn!("Search request failed, retrying: {}", e);
                e
            })
        })
        .await
    }

    /// Search PRs, following pagination until `limit` PRs are collected or
    /// results run out. `keep` filters each page before it counts toward the
    /// limit.
    async fn search_prs_filtered(
        &self,
        search: &str,
        limit: usize,
        with_timeline: bool,
        keep: impl Fn(&PullRequestRecord) -> bool,
    ) -> Result<Vec<PullRequestRecord>, ClientError> {
        let page_size = limit.clamp(1, MAX_PAGE_SIZE);
        let mut fetched = Vec::new();
        let mut cursor: Option<String> = None;

        while fetched.len() < limit {
            let body = json!({
                "query": SEARCH_QUERY,
                "variables": {
                    "search": search,
                    "first": page_size,
                    "after": cursor,
                    "withTimeline": with_timeline,
                },
            });
            let page = self.execute_with_retry(&body).await?;
            debug!("Search page returned {} PRs for {:?}", page.prs.len(), search);

            fetched.extend(page.prs.into_iter().filter(|pr| keep(pr)));

            if !page.has_next_page || fetched.len() >= limit {
                break;
            }
            match page.end_cursor {
                Some(end) => cursor = Some(end),
                None => break,
            }
        }

        Ok(fetched)
    }

    /// Search PRs matching `search`, up to roughly `limit` results
    pub async fn search_prs(
        &self,
        search: &str,
        limit: usize,
        with_timeline: bool,
    ) -> Result<Vec<PullRequestRecord>, ClientError> {
        self.search_prs_filtered(search, limit, with_timeline, |_| true)
            .await
    }

    /// PRs where `username` was asked to review, followed by PRs they
    /// reviewed. The two result sets may overlap; callers de-duplicate.
    pub async fn fetch_direct_review_prs(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PullRequestRecord>, ClientError> {
        let mut all_prs = Vec::new();
        for search in direct_review_queries(username) {
            let prs = self.search_prs(&search, limit, true).await?;
            all_prs.extend(prs);
        }
        info!("Fetched {} direct-review PRs for {}", all_prs.len(), username);
        Ok(all_prs)
    }

    /// Open or merged PRs that requested a review from `team_name`
    pub async fn fetch_team_tagged_prs(
        &self,
        team_name: &str,
        bot_authors: &[String],
        limit: usize,
    ) -> Result<Vec<PullRequestRecord>, ClientError> {
        let search = team_review_query(team_name, bot_authors);
        let prs = self
            .search_prs_filtered(&search, limit, false, |pr| {
                pr.state == "OPEN" || pr.state == "MERGED"
            })
            .await?;
        info!("Fetched {} team-tagged PRs for {}", prs.len(), team_name);
        Ok(prs)
    }
}

/// Search strings for PRs requesting review from, and reviewed by, a user
pub fn direct_review_queries(username: &str) -> [String; 2] {
    [
        format!("review-requested:{} type:pr -is:archived -is:closed", username),
        format!("reviewed-by:{} type:pr -is:archived -is:closed", username),
    ]
}

/// Search string for PRs requesting review from a team, excluding bots
pub fn team_review_query(team_name: &str, bot_authors: &[String]) -> String {
    let mut search = format!(
        "team-review-requested:{} type:pr -is:archived -is:closed",
        team_name
    );
    for bot in bot_authors {
        search.push_str(" -author:");
        search.push_str(bot);
    }
    search
}

fn into_page(response: GraphQlResponse) -> Result<SearchPage, ClientError> {
    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ClientError::GraphQl(message));
    }
    let search = response
        .data
        .ok_or_else(|| ClientError::GraphQl("response has no data".to_string()))?
        .search;

    Ok(SearchPage {
        prs: decode_nodes(search.nodes),
        has_next_page: search.page_info.has_next_page,
        end_cursor: search.page_info.end_cursor,
    })
}

/// Decode search nodes, skipping any that are not pull requests
fn decode_nodes(nodes: Vec<Value>) -> Vec<PullRequestRecord> {
    nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value(node) {
            Ok(pr) => Some(pr),
            Err(e) => {
                warn!("Skipping search result that is not a pull request: {}", e);
                None
            }
        })
        .collect()
}

//! Pull request records as returned by the GraphQL search API
//!
//! Every nested connection is optional: GitHub omits or nulls them depending
//! on the query and on permissions. Consumers should go through
//! `processor::PullRequest`, which flattens them into plain lists.

use common::models::Timestamp;
use serde::{Deserialize, Serialize};

/// A GraphQL `{ nodes: [...] }` connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    pub nodes: Option<Vec<Option<T>>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: None }
    }
}

impl<T> Connection<T> {
    pub fn new(nodes: Vec<T>) -> Self {
        Self {
            nodes: Some(nodes.into_iter().map(Some).collect()),
        }
    }

    /// Nodes with nulls dropped; an absent connection yields nothing
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.unwrap_or_default().into_iter().flatten()
    }
}

/// Flatten an optional connection into its non-null nodes
pub fn nodes_of<T>(connection: Option<Connection<T>>) -> Vec<T> {
    connection.unwrap_or_default().into_nodes().collect()
}

/// Author of a review or comment. `null` for deleted accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// Target of a review request: a user (`login`) or a team (`name`, `slug`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedReviewer {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestNode {
    #[serde(default)]
    pub requested_reviewer: Option<RequestedReviewer>,
}

/// `ReviewRequestedEvent` from the PR timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEventNode {
    pub created_at: Timestamp,
    #[serde(default)]
    pub requested_reviewer: Option<RequestedReviewer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    #[serde(default)]
    pub author: Option<Actor>,
    pub state: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    #[serde(default)]
    pub author: Option<Actor>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewThreadNode {
    #[serde(default)]
    pub comments: Option<Connection<CommentNode>>,
}

/// One pull request from a search result page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    #[serde(default)]
    pub number: Option<i64>,
    pub url: String,
    pub state: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub merged_at: Option<Timestamp>,
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(default)]
    pub review_requests: Option<Connection<ReviewRequestNode>>,
    #[serde(default)]
    pub timeline_items: Option<Connection<TimelineEventNode>>,
    #[serde(default)]
    pub reviews: Option<Connection<ReviewNode>>,
    #[serde(default)]
    pub comments: Option<Connection<CommentNode>>,
    #[serde(default)]
    pub review_threads: Option<Connection<ReviewThreadNode>>,
}

//! GitHub GraphQL client for fetching PRs with their review activity

pub mod client;
pub mod types;

pub use client::{ClientError, GitHubClient, RetryPolicy};
pub use types::{
    Actor, CommentNode, Connection, PullRequestRecord, RequestedReviewer, ReviewNode,
    ReviewRequestNode, ReviewThreadNode, TimelineEventNode,
};

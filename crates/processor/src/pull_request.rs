//! Read-only view over a fetched pull request
//!
//! GraphQL records nest every collection behind optional connections. The
//! view flattens them once, on construction, so every query below works on
//! plain lists and an absent collection is simply empty.

use std::collections::HashSet;

use common::models::Timestamp;
use github::types::{nodes_of, Actor};
use github::PullRequestRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Open,
    Merged,
    Closed,
    Unknown,
}

impl PrState {
    pub fn from_github(state: &str) -> Self {
        match state {
            "OPEN" => Self::Open,
            "MERGED" => Self::Merged,
            "CLOSED" => Self::Closed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Unknown,
}

impl ReviewState {
    pub fn from_github(state: &str) -> Self {
        match state {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A submitted review
#[derive(Debug, Clone)]
pub struct Review {
    pub author: Option<String>,
    pub state: ReviewState,
    pub submitted_at: Timestamp,
}

/// A top-level or review-thread comment
#[derive(Debug, Clone)]
pub struct Comment {
    pub author: Option<String>,
    pub created_at: Timestamp,
}

/// A "review requested" timeline event naming a user
#[derive(Debug, Clone)]
pub struct ReviewRequestEvent {
    pub reviewer: Option<String>,
    pub requested_at: Timestamp,
}

/// Outstanding review request, addressed to a team or a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedReviewer {
    /// Team name, or user login
    pub name: Option<String>,
    pub team_slug: Option<String>,
}

/// Ways a user can have engaged with a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementKind {
    Review,
    Comment,
    ThreadComment,
    Approval,
}

impl EngagementKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Review => "Review",
            Self::Comment => "Comment",
            Self::ThreadComment => "Thread Comment",
            Self::Approval => "Approval",
        }
    }
}

/// A pull request and its review activity
#[derive(Debug, Clone)]
pub struct PullRequest {
    number: Option<i64>,
    url: String,
    state: PrState,
    author: Option<String>,
    created_at: Timestamp,
    merged_at: Option<Timestamp>,
    requested_reviewers: Vec<RequestedReviewer>,
    review_request_events: Vec<ReviewRequestEvent>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
    review_threads: Vec<Vec<Comment>>,
}

fn login(actor: Option<Actor>) -> Option<String> {
    actor.map(|a| a.login)
}

impl From<PullRequestRecord> for PullRequest {
    fn from(record: PullRequestRecord) -> Self {
        let requested_reviewers = nodes_of(record.review_requests)
            .into_iter()
            .filter_map(|request| request.requested_reviewer)
            .map(|reviewer| RequestedReviewer {
                name: reviewer.name.or(reviewer.login),
                team_slug: reviewer.slug,
            })
            .collect();

        let review_request_events = nodes_of(record.timeline_items)
            .into_iter()
            .map(|event| ReviewRequestEvent {
                reviewer: event.requested_reviewer.and_then(|r| r.login),
                requested_at: event.created_at,
            })
            .collect();

        let reviews = nodes_of(record.reviews)
            .into_iter()
            .map(|review| Review {
                author: login(review.author),
                state: ReviewState::from_github(&review.state),
                submitted_at: review.created_at,
            })
            .collect();

        let to_comment = |node: github::CommentNode| Comment {
            author: login(node.author),
            created_at: node.created_at,
        };

        let comments = nodes_of(record.comments)
            .into_iter()
            .map(to_comment)
            .collect();

        let review_threads = nodes_of(record.review_threads)
            .into_iter()
            .map(|thread| nodes_of(thread.comments).into_iter().map(to_comment).collect())
            .collect();

        Self {
            number: record.number,
            url: record.url,
            state: PrState::from_github(&record.state),
            author: login(record.author),
            created_at: record.created_at,
            merged_at: record.merged_at,
            requested_reviewers,
            review_request_events,
            reviews,
            comments,
            review_threads,
        }
    }
}

impl PullRequest {
    pub fn number(&self) -> Option<i64> {
        self.number
    }

    /// Identity of the PR across fetches
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> PrState {
        self.state
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn requested_reviewers(&self) -> &[RequestedReviewer] {
        &self.requested_reviewers
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn review_threads(&self) -> &[Vec<Comment>] {
        &self.review_threads
    }

    pub fn is_merged(&self) -> bool {
        self.state == PrState::Merged
    }

    pub fn authored_by(&self, user: &str) -> bool {
        self.author() == Some(user)
    }

    /// Merge instant, only for merged PRs
    pub fn merged_at(&self) -> Option<Timestamp> {
        if self.is_merged() {
            self.merged_at
        } else {
            None
        }
    }

    fn reviews_by<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews
            .iter()
            .filter(move |r| r.author.as_deref() == Some(user))
    }

    fn comments_by<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Comment> + 'a {
        self.comments
            .iter()
            .filter(move |c| c.author.as_deref() == Some(user))
    }

    fn thread_comments_by<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Comment> + 'a {
        self.review_threads
            .iter()
            .flatten()
            .filter(move |c| c.author.as_deref() == Some(user))
    }

    /// Whether `user` reviewed or commented anywhere on someone else's PR
    pub fn engaged_by(&self, user: &str) -> bool {
        if self.authored_by(user) {
            return false;
        }
        self.reviews_by(user).next().is_some()
            || self.comments_by(user).next().is_some()
            || self.thread_comments_by(user).next().is_some()
    }

    pub fn approved_by(&self, user: &str) -> bool {
        self.reviews_by(user)
            .any(|r| r.state == ReviewState::Approved)
    }

    /// Which kinds of activity `user` has on this PR, in a fixed order
    pub fn engagement_kinds(&self, user: &str) -> Vec<EngagementKind> {
        let mut kinds = Vec::new();
        if self.reviews_by(user).next().is_some() {
            kinds.push(EngagementKind::Review);
        }
        if self.comments_by(user).next().is_some() {
            kinds.push(EngagementKind::Comment);
        }
        if self.thread_comments_by(user).next().is_some() {
            kinds.push(EngagementKind::ThreadComment);
        }
        if self.approved_by(user) {
            kinds.push(EngagementKind::Approval);
        }
        kinds
    }

    /// Earliest timeline event requesting a review from `user`
    pub fn review_requested_at(&self, user: &str) -> Option<Timestamp> {
        self.review_request_events
            .iter()
            .filter(|e| e.reviewer.as_deref() == Some(user))
            .map(|e| e.requested_at)
            .min()
    }

    /// PR creation time if a review was requested from the team.
    ///
    /// The request list carries no timestamp, so creation time stands in for
    /// the request instant. Unlike `review_requested_at` this is not the
    /// actual event time.
    pub fn team_review_requested_at(&self, team_slug: &str) -> Option<Timestamp> {
        self.requested_reviewers
            .iter()
            .any(|r| r.team_slug.as_deref() == Some(team_slug))
            .then_some(self.created_at)
    }

    /// Earliest review, comment or thread comment by `user`
    pub fn first_engagement_at(&self, user: &str) -> Option<Timestamp> {
        let reviews = self.reviews_by(user).map(|r| r.submitted_at);
        let comments = self
            .comments_by(user)
            .chain(self.thread_comments_by(user))
            .map(|c| c.created_at);
        reviews.chain(comments).min()
    }

    pub fn first_approval_at(&self, user: &str) -> Option<Timestamp> {
        self.reviews_by(user)
            .filter(|r| r.state == ReviewState::Approved)
            .map(|r| r.submitted_at)
            .min()
    }
}

/// Drop PRs whose URL was already seen, keeping the first occurrence
pub fn dedupe_by_url(prs: impl IntoIterator<Item = PullRequest>) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    prs.into_iter()
        .filter(|pr| seen.insert(pr.url.clone()))
        .collect()
}

//! Result models produced by the review analyzers

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Instants as reported by GitHub; the offset in the source string is kept.
pub type Timestamp = DateTime<FixedOffset>;

/// A count and its share of some denominator, as a percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RateMetric {
    pub count: usize,
    pub rate: f64,
}

/// Average and 90th percentile of a set of business-hour samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TimingMetric {
    pub average: f64,
    pub p90: f64,
}

/// Named turnaround metrics. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMetricKind {
    ReviewTurnaround,
    ApprovalTurnaround,
    TimeToMerge,
    FirstReview,
    SecondReview,
    Merge,
}

impl TimingMetricKind {
    /// Human label used by reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReviewTurnaround => "Review Turnaround",
            Self::ApprovalTurnaround => "Approval Turnaround",
            Self::TimeToMerge | Self::Merge => "Time to Merge",
            Self::FirstReview => "First Review",
            Self::SecondReview => "Second Review",
        }
    }
}

pub type TimingMetrics = BTreeMap<TimingMetricKind, TimingMetric>;

/// Per-subject analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub subject_id: String,
    pub total_prs: usize,
    pub engagement: RateMetric,
    /// Approval rate is relative to merged PRs only
    pub approvals: RateMetric,
    pub timing: TimingMetrics,
}

impl AnalysisResult {
    /// Timing for `kind`, zeroed if this analysis did not compute it
    pub fn timing_for(&self, kind: TimingMetricKind) -> TimingMetric {
        self.timing.get(&kind).copied().unwrap_or_default()
    }
}

/// One bucket of the review-count distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DistributionBucket {
    pub count: usize,
    pub percentage: f64,
}

/// Merged, team-reviewed PRs bucketed by number of engaged team members
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ReviewDistribution {
    pub one_review: DistributionBucket,
    pub two_reviews: DistributionBucket,
    pub more_than_two: DistributionBucket,
}

impl ReviewDistribution {
    pub fn total(&self) -> usize {
        self.one_review.count + self.two_reviews.count + self.more_than_two.count
    }
}

/// Team-wide analysis over the combined PR set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalysis {
    pub subject_id: String,
    /// Unique PRs in the combined set
    pub total_prs: usize,
    /// PRs where at least one team member engaged
    pub unique_reviewed_prs: usize,
    pub timing: TimingMetrics,
    pub review_distribution: ReviewDistribution,
}

impl TeamAnalysis {
    pub fn timing_for(&self, kind: TimingMetricKind) -> TimingMetric {
        self.timing.get(&kind).copied().unwrap_or_default()
    }
}

//! Per-member and team-wide review metrics

use common::models::{
    AnalysisResult, DistributionBucket, RateMetric, ReviewDistribution, TeamAnalysis,
    TimingMetricKind, TimingMetrics, Timestamp,
};
use common::TeamConfig;
use tracing::{debug, info};

use crate::business_hours::business_hours_between;
use crate::pull_request::PullRequest;
use crate::statistics::{percentage, timing_metric};

/// Where a member's turnaround clock starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAnchor {
    /// The member's own review-requested timeline event
    Member,
    /// The team review request, i.e. PR creation when the team was requested
    Team,
}

/// Computes review engagement and latency metrics for a team's members
pub struct ReviewAnalyzer {
    team_name: String,
    team_slug: String,
    members: Vec<String>,
}

impl ReviewAnalyzer {
    pub fn new(team: &TeamConfig) -> Self {
        let mut members: Vec<String> = Vec::with_capacity(team.members.len());
        for member in &team.members {
            if !members.contains(member) {
                members.push(member.clone());
            }
        }
        Self {
            team_name: team.name.clone(),
            team_slug: team.slug().to_string(),
            members,
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Metrics for one member over PRs they were asked to review or reviewed
    pub fn analyze_direct(&self, subject: &str, prs: &[PullRequest]) -> AnalysisResult {
        self.analyze_subject(subject, prs, RequestAnchor::Member)
    }

    /// Metrics for one member over PRs that requested the team's review
    pub fn analyze_team_tagged(&self, subject: &str, prs: &[PullRequest]) -> AnalysisResult {
        self.analyze_subject(subject, prs, RequestAnchor::Team)
    }

    /// Team-tagged metrics for every member, in member order
    pub fn analyze_members(&self, prs: &[PullRequest]) -> Vec<AnalysisResult> {
        self.members
            .iter()
            .map(|member| self.analyze_team_tagged(member, prs))
            .collect()
    }

    fn analyze_subject(
        &self,
        subject: &str,
        prs: &[PullRequest],
        anchor: RequestAnchor,
    ) -> AnalysisResult {
        info!("Analyzing {}", subject);

        let relevant: Vec<&PullRequest> = prs.iter().filter(|pr| !pr.authored_by(subject)).collect();
        let merged: Vec<&PullRequest> = relevant.iter().copied().filter(|pr| pr.is_merged()).collect();

        let engaged = relevant.iter().filter(|pr| pr.engaged_by(subject)).count();
        let approved = merged.iter().filter(|pr| pr.approved_by(subject)).count();

        let timing = match anchor {
            RequestAnchor::Member => member_timing(subject, &relevant, &merged),
            RequestAnchor::Team => self.team_tagged_timing(subject, &relevant, &merged),
        };

        AnalysisResult {
            subject_id: subject.to_string(),
            total_prs: relevant.len(),
            engagement: RateMetric {
                count: engaged,
                rate: percentage(engaged, relevant.len()),
            },
            approvals: RateMetric {
                count: approved,
                rate: percentage(approved, merged.len()),
            },
            timing,
        }
    }

    fn team_tagged_timing(
        &self,
        subject: &str,
        relevant: &[&PullRequest],
        merged: &[&PullRequest],
    ) -> TimingMetrics {
        let requested = |pr: &PullRequest| pr.team_review_requested_at(&self.team_slug);

        let review: Vec<f64> = relevant
            .iter()
            .filter(|pr| pr.engaged_by(subject))
            .filter_map(|&pr| business_hours_between(requested(pr), pr.first_engagement_at(subject)))
            .collect();

        let merge: Vec<f64> = merged
            .iter()
            .filter(|pr| pr.engaged_by(subject))
            .filter_map(|&pr| business_hours_between(requested(pr), pr.merged_at()))
            .collect();

        debug!(
            "{}: {} review samples, {} merge samples",
            subject,
            review.len(),
            merge.len()
        );

        TimingMetrics::from([
            (TimingMetricKind::ReviewTurnaround, timing_metric(&review)),
            (TimingMetricKind::TimeToMerge, timing_metric(&merge)),
        ])
    }

    /// Members who engaged with `pr`, in member order
    fn engaged_members<'a>(&'a self, pr: &'a PullRequest) -> impl Iterator<Item = &'a String> + 'a {
        self.members.iter().filter(move |member| pr.engaged_by(member))
    }

    /// Turnaround anchor for team metrics, falling back to PR creation
    fn team_anchor(&self, pr: &PullRequest) -> Timestamp {
        pr.team_review_requested_at(&self.team_slug)
            .unwrap_or_else(|| pr.created_at())
    }

    /// First activity by each member, earliest first. Unlike `engaged_by`,
    /// a member's activity on their own PR counts here.
    fn engagement_times(&self, pr: &PullRequest) -> Vec<Timestamp> {
        let mut times: Vec<Timestamp> = self
            .members
            .iter()
            .filter_map(|member| pr.first_engagement_at(member))
            .collect();
        times.sort();
        times
    }

    /// Team-wide metrics over a combined, de-duplicated PR set
    pub fn analyze_team(&self, prs: &[PullRequest]) -> TeamAnalysis {
        info!("Analyzing {} PRs for team {}", prs.len(), self.team_name);

        let reviewed: Vec<&PullRequest> = prs
            .iter()
            .filter(|pr| self.engaged_members(pr).next().is_some())
            .collect();
        let merged: Vec<&PullRequest> = reviewed.iter().copied().filter(|pr| pr.is_merged()).collect();

        let mut first_review = Vec::new();
        let mut second_review = Vec::new();
        for pr in &reviewed {
            let anchor = Some(self.team_anchor(pr));
            let times = self.engagement_times(pr);
            if let Some(hours) = business_hours_between(anchor, times.first().copied()) {
                first_review.push(hours);
            }
            if let Some(hours) = business_hours_between(anchor, times.get(1).copied()) {
                second_review.push(hours);
            }
        }

        let merge: Vec<f64> = merged
            .iter()
            .filter_map(|pr| business_hours_between(Some(self.team_anchor(pr)), pr.merged_at()))
            .collect();

        debug!(
            "Timing samples: {} first review, {} second review, {} merge",
            first_review.len(),
            second_review.len(),
            merge.len()
        );

        TeamAnalysis {
            subject_id: self.team_name.clone(),
            total_prs: prs.len(),
            unique_reviewed_prs: reviewed.len(),
            timing: TimingMetrics::from([
                (TimingMetricKind::FirstReview, timing_metric(&first_review)),
                (TimingMetricKind::SecondReview, timing_metric(&second_review)),
                (TimingMetricKind::Merge, timing_metric(&merge)),
            ]),
            review_distribution: self.review_distribution(&merged),
        }
    }

    /// Bucket merged, team-reviewed PRs by how many members engaged
    fn review_distribution(&self, merged: &[&PullRequest]) -> ReviewDistribution {
        let counts: Vec<usize> = merged
            .iter()
            .map(|pr| {
                let reviewers = self.engaged_members(pr).count();
                debug!("PR {}: {} team reviewers", pr.url(), reviewers);
                reviewers
            })
            .collect();

        let total = merged.len();
        let bucket = |count: usize| DistributionBucket {
            count,
            percentage: percentage(count, total),
        };

        ReviewDistribution {
            one_review: bucket(counts.iter().filter(|&&c| c == 1).count()),
            two_reviews: bucket(counts.iter().filter(|&&c| c == 2).count()),
            more_than_two: bucket(counts.iter().filter(|&&c| c > 2).count()),
        }
    }
}

fn member_timing(subject: &str, relevant: &[&PullRequest], merged: &[&PullRequest]) -> TimingMetrics {
    let requested = |pr: &PullRequest| pr.review_requested_at(subject);

    let review: Vec<f64> = relevant
        .iter()
        .filter(|pr| pr.engaged_by(subject))
        .filter_map(|&pr| business_hours_between(requested(pr), pr.first_engagement_at(subject)))
        .collect();

    let approval: Vec<f64> = merged
        .iter()
        .filter(|pr| pr.approved_by(subject))
        .filter_map(|&pr| business_hours_between(requested(pr), pr.first_approval_at(subject)))
        .collect();

    let merge: Vec<f64> = merged
        .iter()
        .filter(|pr| pr.engaged_by(subject))
        .filter_map(|&pr| business_hours_between(requested(pr), pr.merged_at()))
        .collect();

    debug!(
        "{}: {} review samples, {} approval samples, {} merge samples",
        subject,
        review.len(),
        approval.len(),
        merge.len()
    );

    TimingMetrics::from([
        (TimingMetricKind::ReviewTurnaround, timing_metric(&review)),
        (TimingMetricKind::ApprovalTurnaround, timing_metric(&approval)),
        (TimingMetricKind::TimeToMerge, timing_metric(&merge)),
    ])
}

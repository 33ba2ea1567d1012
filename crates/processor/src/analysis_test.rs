#[cfg(test)]
mod tests {
    use crate::analysis::*;
    use crate::pull_request::PullRequest;
    use crate::tests::fixtures::{mar, PrFixture};
    use common::models::{TimingMetric, TimingMetricKind};
    use common::TeamConfig;

    const TEAM: &str = "acme/payments-infrastructure";
    const SLUG: &str = "payments-infrastructure";

    fn analyzer(members: &[&str]) -> ReviewAnalyzer {
        ReviewAnalyzer::new(&TeamConfig::new(
            TEAM,
            members.iter().map(|m| m.to_string()).collect(),
        ))
    }

    fn timing(average: f64, p90: f64) -> TimingMetric {
        TimingMetric { average, p90 }
    }

    fn direct_prs() -> Vec<PullRequest> {
        vec![
            // Reviewed and approved, then merged
            PrFixture::new(1, "alice")
                .requested("bob", mar(4, 9, 0))
                .comment("bob", mar(4, 11, 0))
                .approval("bob", mar(5, 10, 0))
                .merged(mar(5, 15, 0))
                .build(),
            // Reviewed, still open
            PrFixture::new(2, "alice")
                .requested("bob", mar(4, 13, 0))
                .review("bob", "COMMENTED", mar(4, 14, 0))
                .build(),
            // Requested, never looked at
            PrFixture::new(3, "carol")
                .requested("bob", mar(4, 9, 0))
                .build(),
            // Bob's own PR
            PrFixture::new(4, "bob")
                .comment("bob", mar(4, 10, 0))
                .merged(mar(4, 12, 0))
                .build(),
            // Merged without Bob
            PrFixture::new(5, "alice")
                .requested("bob", mar(4, 10, 0))
                .approval("carol", mar(4, 11, 0))
                .merged(mar(4, 16, 0))
                .build(),
        ]
    }

    // direct analysis
    #[test]
    fn test_direct_counts_and_rates() {
        let result = analyzer(&["bob"]).analyze_direct("bob", &direct_prs());

        assert_eq!(result.subject_id, "bob");
        assert_eq!(result.total_prs, 4, "own PR is excluded");
        assert_eq!(result.engagement.count, 2);
        assert_eq!(result.engagement.rate, 50.0);
        assert_eq!(result.approvals.count, 1);
        assert_eq!(result.approvals.rate, 50.0, "approvals are out of merged PRs");
    }

    #[test]
    fn test_direct_timing() {
        let result = analyzer(&["bob"]).analyze_direct("bob", &direct_prs());

        // Samples: 2h and 1h
        assert_eq!(
            result.timing_for(TimingMetricKind::ReviewTurnaround),
            timing(1.5, 2.0)
        );
        // Mon 09:00 -> Tue 10:00 = 8h + 1h
        assert_eq!(
            result.timing_for(TimingMetricKind::ApprovalTurnaround),
            timing(9.0, 9.0)
        );
        // Mon 09:00 -> Tue 15:00 = 8h + 6h
        assert_eq!(
            result.timing_for(TimingMetricKind::TimeToMerge),
            timing(14.0, 14.0)
        );
        assert_eq!(result.timing.len(), 3);
    }

    #[test]
    fn test_engagement_without_request_event_adds_no_sample() {
        let prs = vec![
            PrFixture::new(1, "alice").comment("bob", mar(4, 11, 0)).build(),
            PrFixture::new(2, "alice")
                .requested("bob", mar(4, 9, 0))
                .comment("bob", mar(4, 13, 0))
                .build(),
        ];

        let result = analyzer(&["bob"]).analyze_direct("bob", &prs);

        assert_eq!(result.engagement.count, 2);
        // Only the second PR yields a sample; the first is skipped, not zeroed
        assert_eq!(
            result.timing_for(TimingMetricKind::ReviewTurnaround),
            timing(4.0, 4.0)
        );
    }

    #[test]
    fn test_no_prs_yields_zeroes() {
        let result = analyzer(&["bob"]).analyze_direct("bob", &[]);

        assert_eq!(result.total_prs, 0);
        assert_eq!(result.engagement.rate, 0.0);
        assert_eq!(result.approvals.rate, 0.0);
        assert_eq!(
            result.timing_for(TimingMetricKind::ReviewTurnaround),
            timing(0.0, 0.0)
        );
    }

    // team-tagged analysis
    #[test]
    fn test_team_tagged_anchors_on_team_request() {
        let prs = vec![
            PrFixture::new(1, "alice")
                .created(mar(4, 9, 0))
                .team_requested(SLUG)
                .requested("bob", mar(4, 12, 0))
                .review("bob", "COMMENTED", mar(4, 13, 0))
                .merged(mar(4, 15, 0))
                .build(),
            // Not team-requested: engagement counts, no timing sample
            PrFixture::new(2, "alice")
                .comment("bob", mar(4, 10, 0))
                .build(),
        ];

        let result = analyzer(&["bob"]).analyze_team_tagged("bob", &prs);

        assert_eq!(result.engagement.count, 2);
        assert_eq!(result.engagement.rate, 100.0);
        assert_eq!(
            result.timing_for(TimingMetricKind::ReviewTurnaround),
            timing(4.0, 4.0)
        );
        assert_eq!(
            result.timing_for(TimingMetricKind::TimeToMerge),
            timing(6.0, 6.0)
        );
        assert!(!result
            .timing
            .contains_key(&TimingMetricKind::ApprovalTurnaround));
    }

    #[test]
    fn test_analyze_members_keeps_member_order() {
        let prs = vec![PrFixture::new(1, "alice").comment("carol", mar(4, 10, 0)).build()];

        let results = analyzer(&["dave", "bob", "carol", "bob"]).analyze_members(&prs);

        let subjects: Vec<_> = results.iter().map(|r| r.subject_id.as_str()).collect();
        assert_eq!(subjects, vec!["dave", "bob", "carol"]);
        assert_eq!(results[2].engagement.count, 1);
    }

    // team-wide analysis
    fn team_prs() -> Vec<PullRequest> {
        vec![
            // Two members engaged
            PrFixture::new(1, "alice")
                .created(mar(4, 9, 0))
                .team_requested(SLUG)
                .comment("bob", mar(4, 10, 0))
                .review("carol", "APPROVED", mar(4, 13, 0))
                .merged(mar(5, 12, 0))
                .build(),
            // One member engaged, no team request: anchored on creation
            PrFixture::new(2, "alice")
                .created(mar(4, 12, 0))
                .review("bob", "APPROVED", mar(4, 14, 0))
                .merged(mar(6, 9, 0))
                .build(),
            // Only the authoring member commented
            PrFixture::new(3, "dave")
                .comment("dave", mar(4, 10, 0))
                .comment("alice", mar(4, 11, 0))
                .build(),
            // Everyone engaged
            PrFixture::new(4, "alice")
                .created(mar(4, 9, 0))
                .team_requested(SLUG)
                .comment("bob", mar(4, 10, 0))
                .thread(&[("carol", mar(4, 11, 0))])
                .review("dave", "COMMENTED", mar(4, 12, 0))
                .merged(mar(4, 17, 0))
                .build(),
        ]
    }

    #[test]
    fn test_team_reviewed_counts() {
        let result = analyzer(&["bob", "carol", "dave"]).analyze_team(&team_prs());

        assert_eq!(result.subject_id, TEAM);
        assert_eq!(result.total_prs, 4);
        assert_eq!(result.unique_reviewed_prs, 3);
    }

    #[test]
    fn test_team_timing() {
        let result = analyzer(&["bob", "carol", "dave"]).analyze_team(&team_prs());

        // First review samples: 1h, 2h, 1h
        assert_eq!(
            result.timing_for(TimingMetricKind::FirstReview),
            timing(1.33, 2.0)
        );
        // Second review samples: 4h, 2h (PR 2 had one reviewer)
        assert_eq!(
            result.timing_for(TimingMetricKind::SecondReview),
            timing(3.0, 4.0)
        );
        // Merge samples: 11h, 13h, 8h
        assert_eq!(
            result.timing_for(TimingMetricKind::Merge),
            timing(10.67, 13.0)
        );
    }

    #[test]
    fn test_review_distribution_partitions_merged_reviewed_prs() {
        let result = analyzer(&["bob", "carol", "dave"]).analyze_team(&team_prs());
        let distribution = result.review_distribution;

        assert_eq!(distribution.one_review.count, 1);
        assert_eq!(distribution.two_reviews.count, 1);
        assert_eq!(distribution.more_than_two.count, 1);
        assert_eq!(distribution.one_review.percentage, 33.33);
        assert_eq!(distribution.total(), 3);
    }

    #[test]
    fn test_member_author_activity_counts_toward_review_times() {
        let prs = vec![PrFixture::new(1, "dave")
            .created(mar(4, 9, 0))
            .comment("dave", mar(4, 9, 30))
            .comment("bob", mar(4, 11, 0))
            .build()];

        let result = analyzer(&["bob", "dave"]).analyze_team(&prs);

        assert_eq!(result.unique_reviewed_prs, 1);
        assert_eq!(
            result.timing_for(TimingMetricKind::FirstReview),
            timing(1.0, 1.0)
        );
        assert_eq!(
            result.timing_for(TimingMetricKind::SecondReview),
            timing(2.0, 2.0)
        );
    }

    #[test]
    fn test_team_without_reviews() {
        let prs = vec![PrFixture::new(1, "alice").merged(mar(5, 10, 0)).build()];

        let result = analyzer(&["bob"]).analyze_team(&prs);

        assert_eq!(result.unique_reviewed_prs, 0);
        assert_eq!(result.review_distribution.total(), 0);
        assert_eq!(result.review_distribution.one_review.percentage, 0.0);
        assert_eq!(result.timing_for(TimingMetricKind::Merge), timing(0.0, 0.0));
    }
}

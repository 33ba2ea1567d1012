//! Plain-text console report

use std::fmt::Write;

use common::models::{AnalysisResult, TeamAnalysis, TimingMetricKind};

use crate::export::number;

pub fn render_member(result: &AnalysisResult, metrics: &[TimingMetricKind]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}:", result.subject_id);
    let _ = writeln!(out, "Total PRs: {}", result.total_prs);
    let _ = writeln!(
        out,
        "Engagement: {}/{} ({}%)",
        result.engagement.count,
        result.total_prs,
        number(result.engagement.rate)
    );
    let _ = writeln!(
        out,
        "Approvals: {} of merged PRs ({}%)",
        result.approvals.count,
        number(result.approvals.rate)
    );
    for kind in metrics {
        let timing = result.timing_for(*kind);
        let _ = writeln!(
            out,
            "{}: avg {}h, p90 {}h",
            kind.label(),
            number(timing.average),
            number(timing.p90)
        );
    }
    out
}

pub fn render_team(analysis: &TeamAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nOverall Team Metrics ({}):", analysis.subject_id);
    let _ = writeln!(out, "Unique PRs: {}", analysis.total_prs);
    let _ = writeln!(out, "Unique PRs with reviews: {}", analysis.unique_reviewed_prs);

    let _ = writeln!(out, "\nTiming Metrics:");
    for (kind, timing) in &analysis.timing {
        let _ = writeln!(
            out,
            "{}: avg {}h, p90 {}h",
            kind.label(),
            number(timing.average),
            number(timing.p90)
        );
    }

    let distribution = &analysis.review_distribution;
    let _ = writeln!(out, "\nReview Distribution:");
    for (label, bucket) in [
        ("1 review", distribution.one_review),
        ("2 reviews", distribution.two_reviews),
        ("3+ reviews", distribution.more_than_two),
    ] {
        let _ = writeln!(
            out,
            "{}: {} PRs ({}%)",
            label,
            bucket.count,
            number(bucket.percentage)
        );
    }
    out
}

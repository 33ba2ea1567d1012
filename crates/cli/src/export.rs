//! CSV export of analysis results

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use common::models::{AnalysisResult, TeamAnalysis, TimingMetricKind};
use common::Error;

/// Format a metric the way reports show it: integers keep one decimal
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn percent(value: f64) -> String {
    format!("{}%", number(value))
}

fn hours(value: f64) -> String {
    format!("{}h", number(value))
}

/// Create `dir/name` and hand it to `write`
pub fn write_file<F>(dir: &Path, name: &str, write: F) -> common::Result<PathBuf>
where
    F: FnOnce(File) -> Result<(), csv::Error>,
{
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let file = File::create(&path)?;
    write(file).map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}

/// One row per member with counts, rates and the given timing metrics
pub fn write_members<W: io::Write>(
    writer: W,
    results: &[AnalysisResult],
    metrics: &[TimingMetricKind],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = [
        "Username",
        "Total PRs",
        "Engaged PRs",
        "Engagement Rate",
        "Approved PRs",
        "Approval Rate",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    for kind in metrics {
        header.push(format!("Avg {}", kind.label()));
        header.push(format!("P90 {}", kind.label()));
    }
    wtr.write_record(&header)?;

    for result in results {
        let mut row = vec![
            result.subject_id.clone(),
            result.total_prs.to_string(),
            result.engagement.count.to_string(),
            percent(result.engagement.rate),
            result.approvals.count.to_string(),
            percent(result.approvals.rate),
        ];
        for kind in metrics {
            let timing = result.timing_for(*kind);
            row.push(number(timing.average));
            row.push(number(timing.p90));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Team-wide metrics as a two-column Metric/Value table
pub fn write_overall<W: io::Write>(writer: W, analysis: &TeamAnalysis) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Metric", "Value"])?;
    wtr.write_record([
        "Unique PRs with reviews".to_string(),
        analysis.unique_reviewed_prs.to_string(),
    ])?;

    let timings = [
        (TimingMetricKind::FirstReview, "time to first review"),
        (TimingMetricKind::SecondReview, "time to second review"),
        (TimingMetricKind::Merge, "time to merge"),
    ];
    for (kind, label) in timings {
        let timing = analysis.timing_for(kind);
        wtr.write_record([format!("Average {}", label), hours(timing.average)])?;
        wtr.write_record([format!("P90 {}", label), hours(timing.p90)])?;
    }

    let distribution = &analysis.review_distribution;
    let buckets = [
        ("PRs with 1 review", distribution.one_review),
        ("PRs with 2 reviews", distribution.two_reviews),
        ("PRs with 3+ reviews", distribution.more_than_two),
    ];
    for (label, bucket) in buckets {
        wtr.write_record([
            label.to_string(),
            format!("{} ({})", bucket.count, percent(bucket.percentage)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{
        DistributionBucket, RateMetric, ReviewDistribution, TimingMetric, TimingMetrics,
    };

    fn member_result() -> AnalysisResult {
        AnalysisResult {
            subject_id: "bob".to_string(),
            total_prs: 4,
            engagement: RateMetric {
                count: 2,
                rate: 50.0,
            },
            approvals: RateMetric {
                count: 1,
                rate: 33.33,
            },
            timing: TimingMetrics::from([
                (
                    TimingMetricKind::ReviewTurnaround,
                    TimingMetric {
                        average: 1.5,
                        p90: 2.0,
                    },
                ),
                (
                    TimingMetricKind::TimeToMerge,
                    TimingMetric {
                        average: 14.0,
                        p90: 14.0,
                    },
                ),
            ]),
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(15.0), "15.0");
        assert_eq!(number(1.33), "1.33");
        assert_eq!(number(0.0), "0.0");
        assert_eq!(percent(25.0), "25.0%");
        assert_eq!(hours(10.67), "10.67h");
    }

    #[test]
    fn test_member_rows() {
        let mut out = Vec::new();
        write_members(
            &mut out,
            &[member_result()],
            &[
                TimingMetricKind::ReviewTurnaround,
                TimingMetricKind::TimeToMerge,
            ],
        )
        .unwrap();

        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Username,Total PRs,Engaged PRs,Engagement Rate,Approved PRs,Approval Rate,\
             Avg Review Turnaround,P90 Review Turnaround,Avg Time to Merge,P90 Time to Merge"
        );
        assert_eq!(lines[1], "bob,4,2,50.0%,1,33.33%,1.5,2.0,14.0,14.0");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_missing_metric_is_zero() {
        let mut out = Vec::new();
        write_members(
            &mut out,
            &[member_result()],
            &[TimingMetricKind::ApprovalTurnaround],
        )
        .unwrap();

        let csv = String::from_utf8(out).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",0.0,0.0"));
    }

    #[test]
    fn test_overall_table() {
        let analysis = TeamAnalysis {
            subject_id: "acme/core".to_string(),
            total_prs: 5,
            unique_reviewed_prs: 3,
            timing: TimingMetrics::from([(
                TimingMetricKind::FirstReview,
                TimingMetric {
                    average: 1.33,
                    p90: 2.0,
                },
            )]),
            review_distribution: ReviewDistribution {
                one_review: DistributionBucket {
                    count: 1,
                    percentage: 50.0,
                },
                two_reviews: DistributionBucket {
                    count: 1,
                    percentage: 50.0,
                },
                more_than_two: DistributionBucket::default(),
            },
        };

        let mut out = Vec::new();
        write_overall(&mut out, &analysis).unwrap();

        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Unique PRs with reviews,3");
        assert_eq!(lines[2], "Average time to first review,1.33h");
        assert_eq!(lines[3], "P90 time to first review,2.0h");
        assert_eq!(lines[6], "Average time to merge,0.0h");
        assert_eq!(lines[8], "PRs with 1 review,1 (50.0%)");
        assert_eq!(lines[10], "PRs with 3+ reviews,0 (0.0%)");
        assert_eq!(lines.len(), 11);
    }
}

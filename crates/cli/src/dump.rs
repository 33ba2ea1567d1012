//! Human-readable dump of fetched PRs, for checking what the metrics saw

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use processor::pull_request::Comment;
use processor::{EngagementKind, PullRequest};

const DUMP_FILE: &str = "pr_data_dump.txt";

/// Write the dump to `dir/pr_data_dump.txt`
pub fn write(
    dir: &Path,
    prs: &[PullRequest],
    members: &[String],
    generated_at: DateTime<Utc>,
) -> common::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(DUMP_FILE);
    fs::write(&path, render(prs, members, generated_at))?;
    Ok(path)
}

fn engagement_summary(pr: &PullRequest, member: &str) -> String {
    let kinds = pr.engagement_kinds(member);
    if kinds.is_empty() {
        return "None".to_string();
    }
    kinds
        .iter()
        .map(EngagementKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_comment(out: &mut String, indent: &str, comment: &Comment) {
    let _ = writeln!(
        out,
        "{}- Author: {}",
        indent,
        comment.author.as_deref().unwrap_or("ghost")
    );
    let _ = writeln!(out, "{}  Created At: {}", indent, comment.created_at.to_rfc3339());
}

pub fn render(prs: &[PullRequest], members: &[String], generated_at: DateTime<Utc>) -> String {
    let rule = "=".repeat(80);
    let mut out = String::new();
    let _ = writeln!(out, "PR Data Dump - {}", generated_at.to_rfc3339());
    let _ = writeln!(out, "Total PRs: {}", prs.len());
    let _ = writeln!(out, "{}", rule);

    for pr in prs {
        match pr.number() {
            Some(number) => {
                let _ = writeln!(out, "\nPR #{}", number);
            }
            None => {
                let _ = writeln!(out, "\nPR");
            }
        }
        let _ = writeln!(out, "{}", "-".repeat(40));
        let _ = writeln!(out, "URL: {}", pr.url());
        let _ = writeln!(out, "State: {}", pr.state().as_str());
        let _ = writeln!(out, "Created At: {}", pr.created_at().to_rfc3339());
        let merged = pr
            .merged_at()
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "Not merged".to_string());
        let _ = writeln!(out, "Merged At: {}", merged);
        let _ = writeln!(out, "Author: {}", pr.author().unwrap_or("ghost"));

        let _ = writeln!(out, "\nReview Requests:");
        for reviewer in pr.requested_reviewers() {
            if let Some(name) = &reviewer.name {
                let _ = writeln!(out, "  - {}", name);
            }
        }

        let _ = writeln!(out, "\nReviews:");
        for review in pr.reviews() {
            let _ = writeln!(
                out,
                "  - Author: {}",
                review.author.as_deref().unwrap_or("ghost")
            );
            let _ = writeln!(out, "    State: {}", review.state.as_str());
            let _ = writeln!(out, "    Created At: {}", review.submitted_at.to_rfc3339());
        }

        let _ = writeln!(out, "\nComments:");
        for comment in pr.comments() {
            write_comment(&mut out, "  ", comment);
        }

        let _ = writeln!(out, "\nReview Thread Comments:");
        for (i, thread) in pr.review_threads().iter().enumerate() {
            let _ = writeln!(out, "  Thread {}:", i + 1);
            for comment in thread {
                write_comment(&mut out, "    ", comment);
            }
        }

        let _ = writeln!(out, "\nTeam Engagement:");
        for member in members {
            let _ = writeln!(out, "  - {}: {}", member, engagement_summary(pr, member));
        }

        let _ = writeln!(out, "\n{}", rule);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use github::PullRequestRecord;

    fn load(json: &str) -> PullRequest {
        let record: PullRequestRecord = serde_json::from_str(json).expect("Invalid JSON");
        PullRequest::from(record)
    }

    #[test]
    fn test_render_pr() {
        let pr = load(
            r#"{
                "number": 12,
                "url": "https://github.com/acme/api/pull/12",
                "state": "OPEN",
                "createdAt": "2024-03-04T09:00:00Z",
                "author": { "login": "alice" },
                "reviewRequests": { "nodes": [ { "requestedReviewer": { "name": "Core", "slug": "core" } } ] },
                "reviews": { "nodes": [ { "author": { "login": "bob" }, "state": "APPROVED", "createdAt": "2024-03-04T10:00:00Z" } ] },
                "reviewThreads": { "nodes": [ { "comments": { "nodes": [ { "author": null, "createdAt": "2024-03-04T11:00:00Z" } ] } } ] }
            }"#,
        );
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();

        let text = render(&[pr], &["bob".to_string(), "carol".to_string()], generated_at);

        assert!(text.starts_with("PR Data Dump - 2024-03-08T12:00:00+00:00\nTotal PRs: 1\n"));
        assert!(text.contains("\nPR #12\n"));
        assert!(text.contains("Merged At: Not merged\n"));
        assert!(text.contains("Review Requests:\n  - Core\n"));
        assert!(text.contains("    State: APPROVED\n"));
        assert!(text.contains("  Thread 1:\n    - Author: ghost\n"));
        assert!(text.contains("  - bob: Review, Approval\n"));
        assert!(text.contains("  - carol: None\n"));
    }
}

//! Review engagement and latency metrics
//!
//! Raw PR records become [`PullRequest`] views, per-PR turnarounds are
//! measured in business hours, and samples are aggregated into
//! per-member and team-wide results.

pub mod analysis;
pub mod business_hours;
pub mod collect;
pub mod pull_request;
pub mod statistics;

#[cfg(test)]
mod analysis_test;
#[cfg(test)]
mod tests;

pub use analysis::{RequestAnchor, ReviewAnalyzer};
pub use business_hours::business_hours_between;
pub use collect::{CollectConfig, CollectError, PrCollector};
pub use pull_request::{dedupe_by_url, EngagementKind, PullRequest};

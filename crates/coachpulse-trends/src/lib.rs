//! Coachpulse Trends
//!
//! On-demand trend aggregation over the sentiment store: per-player
//! recent-vs-prior classification and team favorites/watch-list reports.

pub mod aggregator;

pub use aggregator::{ShiftReport, TeamReport, TrendAggregator, TrendDirection, TrendResult};

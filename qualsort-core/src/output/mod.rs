/// Views over a [`crate::types::SortResult`]: flat sorted list, detailed
/// ranking entries, and percentile/tier assignment.
pub mod percentile;
pub mod ranking;
pub mod sorting;

pub use percentile::{to_percentile, PercentileEntry, PercentileOutput, DEFAULT_TIER_THRESHOLDS};
pub use ranking::{to_ranking, RankingEntry, RankingOutput};
pub use sorting::{to_sorted, SortedOutput};

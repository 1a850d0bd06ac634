/// Percentile and tier view.
use serde::Serialize;

use crate::types::SortResult;

/// Default tier thresholds: an item's tier is the first whose threshold its
/// percentile reaches, scanning from the top.
pub const DEFAULT_TIER_THRESHOLDS: [(&str, f64); 5] = [
    ("S", 90.0),
    ("A", 70.0),
    ("B", 50.0),
    ("C", 30.0),
    ("D", 0.0),
];

#[derive(Debug, Clone, Serialize)]
pub struct PercentileEntry {
    pub item: String,
    pub percentile: f64,
    pub rank: usize,
    pub tier: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PercentileOutput {
    pub entries: Vec<PercentileEntry>,
    pub total_items: usize,
}

/// Convert rankings into percentiles with tier labels. `thresholds` defaults
/// to [`DEFAULT_TIER_THRESHOLDS`]; custom thresholds are `(tier, minimum
/// percentile)` pairs in any order.
pub fn to_percentile(result: &SortResult, thresholds: Option<&[(&str, f64)]>) -> PercentileOutput {
    let mut tiers: Vec<(&str, f64)> = thresholds
        .unwrap_or(&DEFAULT_TIER_THRESHOLDS)
        .to_vec();
    tiers.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let total_items: usize = result.rankings.iter().map(|g| g.items.len()).sum();

    let mut entries = Vec::with_capacity(total_items);
    for group in &result.rankings {
        let percentile = percentile_for_rank(group.rank, total_items);
        let tier = tier_for(percentile, &tiers);
        for item in &group.items {
            entries.push(PercentileEntry {
                item: item.clone(),
                percentile,
                rank: group.rank,
                tier: tier.to_string(),
            });
        }
    }

    PercentileOutput { entries, total_items }
}

/// `(1 - (rank - 1) / total) * 100`, so rank 1 of n sits at the 100th
/// percentile and lower ranks step down evenly.
fn percentile_for_rank(rank: usize, total_items: usize) -> f64 {
    if total_items <= 1 {
        return 100.0;
    }
    (1.0 - (rank as f64 - 1.0) / total_items as f64) * 100.0
}

fn tier_for<'a>(percentile: f64, sorted_tiers: &[(&'a str, f64)]) -> &'a str {
    for &(tier, threshold) in sorted_tiers {
        if percentile >= threshold {
            return tier;
        }
    }
    sorted_tiers.last().map(|&(tier, _)| tier).unwrap_or("D")
}

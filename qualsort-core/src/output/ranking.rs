/// Detailed ranking view: one entry per item with rank, win count, and tie
/// status.
use std::collections::HashMap;

use serde::Serialize;

use crate::types::SortResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub item: String,
    pub wins: usize,
    pub is_tied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingOutput {
    pub entries: Vec<RankingEntry>,
    pub total_items: usize,
}

pub fn to_ranking(result: &SortResult) -> RankingOutput {
    let wins = wins_by_item(result);

    let mut entries = Vec::new();
    for group in &result.rankings {
        let is_tied = group.items.len() > 1;
        for item in &group.items {
            entries.push(RankingEntry {
                rank: group.rank,
                item: item.clone(),
                wins: wins.get(item.as_str()).copied().unwrap_or(0),
                is_tied,
            });
        }
    }

    let total_items = entries.len();
    RankingOutput { entries, total_items }
}

fn wins_by_item(result: &SortResult) -> HashMap<&str, usize> {
    let mut wins: HashMap<&str, usize> = HashMap::new();
    for m in &result.match_history {
        if let Some(winner) = m.winner.as_deref() {
            *wins.entry(winner).or_insert(0) += 1;
        }
    }
    wins
}

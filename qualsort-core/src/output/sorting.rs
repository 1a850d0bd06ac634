/// Flat sorted-list view.
use std::collections::HashMap;

use serde::Serialize;

use crate::types::SortResult;

#[derive(Debug, Clone, Serialize)]
pub struct SortedOutput {
    /// Items from best to worst rank.
    pub items: Vec<String>,
}

/// Flatten rankings into one ordered list. Tied items are broken by their
/// position in `original_order`, so the output is stable for the caller.
pub fn to_sorted(result: &SortResult, original_order: &[String]) -> SortedOutput {
    let position: HashMap<&str, usize> = original_order
        .iter()
        .enumerate()
        .map(|(i, item)| (item.as_str(), i))
        .collect();

    let mut items = Vec::new();
    for group in &result.rankings {
        let mut tied: Vec<&String> = group.items.iter().collect();
        tied.sort_by_key(|item| position.get(item.as_str()).copied().unwrap_or(usize::MAX));
        items.extend(tied.into_iter().cloned());
    }

    SortedOutput { items }
}

/// Output formatting: terminal table, JSON, flat list, and tier views.
use qualsort_core::output::{to_percentile, to_ranking, to_sorted};
use qualsort_core::SortResult;

/// Print results as a formatted terminal table.
pub fn print_table(result: &SortResult) {
    let ranking = to_ranking(result);

    // Find the widest item name for padding
    let item_width = ranking
        .entries
        .iter()
        .map(|e| e.item.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!("Rank | {:<item_width$} | Wins | Tied", "Item");
    println!("-----|-{}-|------|-----", "-".repeat(item_width));

    for entry in &ranking.entries {
        println!(
            "{:>4} | {:<item_width$} | {:>4} | {}",
            entry.rank,
            entry.item,
            entry.wins,
            if entry.is_tied { "yes" } else { "" },
        );
    }

    print_summary(result);
}

/// Print the full result as JSON.
pub fn print_json(result: &SortResult) {
    println!("{}", serde_json::to_string_pretty(result).unwrap());
}

/// Print items best-to-worst, one per line. Ties keep input order.
pub fn print_list(result: &SortResult, original_order: &[String]) {
    for item in to_sorted(result, original_order).items {
        println!("{item}");
    }
}

/// Print the percentile/tier view.
pub fn print_tiers(result: &SortResult) {
    let output = to_percentile(result, None);

    let item_width = output
        .entries
        .iter()
        .map(|e| e.item.len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("Tier | Pctl  | {:<item_width$}", "Item");
    println!("-----|-------|-{}", "-".repeat(item_width));

    for entry in &output.entries {
        println!(
            "{:>4} | {:>5.1} | {:<item_width$}",
            entry.tier, entry.percentile, entry.item,
        );
    }

    print_summary(result);
}

fn print_summary(result: &SortResult) {
    let stats = &result.statistics;
    println!(
        "\n{} matches, {} API calls, {} cache hits in {:.1}s",
        stats.total_matches, stats.total_api_calls, stats.cache_hits, stats.elapsed_time_seconds,
    );
    if stats.deadlocked {
        println!("Schedule ended early: remaining participants had already played each other.");
    }
}

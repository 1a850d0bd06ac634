/// Executes one match: a fixed number of comparison rounds between two items.
///
/// Rounds alternate presentation order (`AB`, `BA`, `AB`, …) so that an even
/// round count gives each item equal first-position exposure, cancelling the
/// judge's position bias. Rounds run sequentially so a cache write from round
/// `i` is visible to round `i + 1`; parallelism lives across matches, never
/// inside one.
use std::sync::Arc;

use tracing::warn;

use crate::cache::Cache;
use crate::dispatch::Dispatcher;
use crate::judge::Judge;
use crate::types::{ComparisonResult, MatchResult, Order, RoundResult, Verdict};

pub(crate) struct MatchRunner {
    pub judge: Arc<dyn Judge>,
    pub cache: Option<Arc<dyn Cache>>,
    pub dispatcher: Arc<Dispatcher>,
    pub criteria: String,
    pub comparison_rounds: usize,
}

/// Map a relative verdict back to identity terms: the returned `A` means
/// `item_a` won the round, `B` means `item_b` did. In `BA` order the judge's
/// "first presented" is `item_b`, so the tokens swap.
fn identity_winner(winner: Option<Verdict>, order: Order) -> Option<Verdict> {
    match (winner, order) {
        (None, _) => None,
        (Some(v), Order::Ab) => Some(v),
        (Some(Verdict::A), Order::Ba) => Some(Verdict::B),
        (Some(Verdict::B), Order::Ba) => Some(Verdict::A),
    }
}

impl MatchRunner {
    /// Run every round and tally the majority. Judge failures become rounds
    /// with no winner and are skipped in the tally; if nothing decisive
    /// remains, the match is a draw.
    pub(crate) async fn run(&self, item_a: &str, item_b: &str) -> MatchResult {
        let mut rounds = Vec::with_capacity(self.comparison_rounds);
        let mut wins_a = 0usize;
        let mut wins_b = 0usize;

        for index in 0..self.comparison_rounds {
            let order = Order::for_round(index);
            let (result, cached, error) = self.compare_with_cache(item_a, item_b, order).await;

            match identity_winner(result.winner, order) {
                Some(Verdict::A) => wins_a += 1,
                Some(Verdict::B) => wins_b += 1,
                None => {}
            }

            rounds.push(RoundResult {
                order,
                winner: result.winner,
                reasoning: result.reasoning,
                cached,
                error,
            });
        }

        let winner = if wins_a > wins_b {
            Some(item_a.to_string())
        } else if wins_b > wins_a {
            Some(item_b.to_string())
        } else {
            None
        };

        MatchResult {
            item_a: item_a.to_string(),
            item_b: item_b.to_string(),
            winner,
            rounds,
        }
    }

    /// One round: consult the cache, fall back to a gated live call. Cache
    /// failures degrade to misses (read) or dropped writes; only the judge
    /// call itself can mark the round as an error.
    async fn compare_with_cache(
        &self,
        item_a: &str,
        item_b: &str,
        order: Order,
    ) -> (ComparisonResult, bool, bool) {
        if let Some(cache) = &self.cache {
            match cache.get(item_a, item_b, &self.criteria, order).await {
                Ok(Some(result)) => return (result, true, false),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "cache read failed, treating as miss"),
            }
        }

        let (first, second) = order.presented(item_a, item_b);
        let outcome = {
            let _permit = self.dispatcher.permit().await;
            self.judge.compare(first, second, &self.criteria).await
        };

        match outcome {
            Ok(result) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache
                        .put(item_a, item_b, &self.criteria, order, &result)
                        .await
                    {
                        warn!(error = %e, "cache write failed, result not persisted");
                    }
                }
                (result, false, false)
            }
            Err(e) => (
                ComparisonResult {
                    winner: None,
                    reasoning: format!("judge error: {e}"),
                    raw: None,
                },
                false,
                true,
            ),
        }
    }
}

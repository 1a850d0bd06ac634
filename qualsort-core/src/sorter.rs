/// The orchestrator: validates input, drives the tournament round loop,
/// fans matches out concurrently, and assembles the final result.
///
/// Scheduling is batch-synchronous: every result of batch k is recorded
/// before the pairing for batch k + 1 is computed, so the loss counts that
/// drive bracket pairing are always stable. Within a batch, matches run
/// concurrently under the dispatcher gate and are recorded in spawn order.
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::constants::{
    DEFAULT_COMPARISON_ROUNDS, DEFAULT_ELIMINATION_COUNT, DEFAULT_MAX_CONCURRENT_REQUESTS,
};
use crate::dispatch::Dispatcher;
use crate::error::SortError;
use crate::events::{deliver, EventKind, ProgressEvent, ProgressSink};
use crate::judge::Judge;
use crate::match_runner::MatchRunner;
use crate::tournament::Tournament;
use crate::types::{MatchResult, SortResult, Statistics};

/// Configuration for a sorter. `criteria` is passed verbatim to every judge
/// call; everything else shapes the schedule.
#[derive(Debug, Clone)]
pub struct SorterConfig {
    pub criteria: String,
    /// Losses that eliminate a participant. Minimum 1.
    pub elimination_count: usize,
    /// Rounds per match. Minimum 1; even values balance order exposure.
    pub comparison_rounds: usize,
    /// Dispatcher gate capacity. Minimum 1.
    pub max_concurrent_requests: usize,
    /// Seeds the pairing PRNG for reproducible schedules.
    pub seed: Option<u64>,
}

impl SorterConfig {
    pub fn new(criteria: impl Into<String>) -> Self {
        SorterConfig {
            criteria: criteria.into(),
            elimination_count: DEFAULT_ELIMINATION_COUNT,
            comparison_rounds: DEFAULT_COMPARISON_ROUNDS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            seed: None,
        }
    }
}

pub struct QualitativeSorter {
    judge: Arc<dyn Judge>,
    cache: Option<Arc<dyn Cache>>,
    sink: Option<Arc<dyn ProgressSink>>,
    cancel: CancellationToken,
    config: SorterConfig,
}

impl QualitativeSorter {
    pub fn new(judge: Arc<dyn Judge>, config: SorterConfig) -> Self {
        QualitativeSorter {
            judge,
            cache: None,
            sink: None,
            cancel: CancellationToken::new(),
            config,
        }
    }

    /// Attach a comparison cache shared across `sort` calls.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attach a progress sink. Must be non-blocking; panics are contained.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attach a cancellation token. Cancellation is observed at batch
    /// boundaries: in-flight matches settle, nothing new is scheduled, and
    /// `sort` returns [`SortError::Cancelled`].
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Rank `items` by running the tournament to completion.
    pub async fn sort(&self, items: &[String]) -> Result<SortResult, SortError> {
        self.validate(items)?;
        let started = Instant::now();

        let mut tournament =
            Tournament::new(items, self.config.elimination_count, self.config.seed)?;

        let runner = Arc::new(MatchRunner {
            judge: Arc::clone(&self.judge),
            cache: self.cache.clone(),
            dispatcher: Arc::new(Dispatcher::new(self.config.max_concurrent_requests)),
            criteria: self.config.criteria.clone(),
            comparison_rounds: self.config.comparison_rounds,
        });

        // Heuristic denominator for progress reporting only; the schedule
        // may finish short of it.
        let estimated_total = (items.len() * self.config.elimination_count).div_ceil(2);

        let mut match_history: Vec<MatchResult> = Vec::new();
        let mut completed = 0usize;
        let mut total_api_calls = 0usize;
        let mut cache_hits = 0usize;
        let mut deadlocked = false;

        while !tournament.is_complete() {
            if self.cancel.is_cancelled() {
                return Err(SortError::Cancelled);
            }

            let batch = tournament.get_next_matches();
            if batch.is_empty() {
                // More than one active participant with no legal pairing
                // left: the exhausted-history deadlock.
                deadlocked = tournament.active_count() > 1;
                break;
            }

            debug!(round = batch[0].round, matches = batch.len(), "scheduling batch");

            let mut handles = Vec::with_capacity(batch.len());
            for request in batch {
                self.emit(
                    EventKind::MatchStart,
                    format!("Starting match: {} vs {}", request.item_a, request.item_b),
                    completed,
                    estimated_total,
                    Some(serde_json::json!({
                        "item_a": request.item_a,
                        "item_b": request.item_b,
                    })),
                );

                let runner = Arc::clone(&runner);
                handles.push(tokio::spawn(async move {
                    runner.run(&request.item_a, &request.item_b).await
                }));
            }

            for handle in handles {
                let result = handle
                    .await
                    .map_err(|e| SortError::Internal(format!("match task failed: {e}")))?;

                total_api_calls += result.rounds.iter().filter(|r| !r.cached).count();
                cache_hits += result.rounds.iter().filter(|r| r.cached).count();

                tournament.record_match_result(
                    &result.item_a,
                    &result.item_b,
                    result.winner.as_deref(),
                );
                completed += 1;

                self.emit(
                    EventKind::MatchEnd,
                    format!(
                        "Match complete: {} vs {} -> {}",
                        result.item_a,
                        result.item_b,
                        result.winner.as_deref().unwrap_or("draw")
                    ),
                    completed,
                    estimated_total,
                    Some(serde_json::json!({
                        "item_a": result.item_a,
                        "item_b": result.item_b,
                        "winner": result.winner,
                    })),
                );

                match_history.push(result);
            }

            self.emit(
                EventKind::RoundEnd,
                "Round complete".to_string(),
                completed,
                estimated_total,
                None,
            );
        }

        if deadlocked {
            info!(
                active = tournament.active_count(),
                "no legal pairing left among active participants, ending tournament"
            );
        }

        let statistics = Statistics {
            total_matches: match_history.len(),
            total_api_calls,
            cache_hits,
            elapsed_time_seconds: started.elapsed().as_secs_f64(),
            deadlocked,
        };

        Ok(SortResult {
            rankings: tournament.get_rankings(),
            match_history,
            statistics,
        })
    }

    fn validate(&self, items: &[String]) -> Result<(), SortError> {
        if items.is_empty() {
            return Err(SortError::EmptyItems);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.as_str()) {
                return Err(SortError::DuplicateItem(item.clone()));
            }
        }
        if self.config.elimination_count < 1 {
            return Err(SortError::InvalidConfiguration {
                field: "elimination_count",
            });
        }
        if self.config.comparison_rounds < 1 {
            return Err(SortError::InvalidConfiguration {
                field: "comparison_rounds",
            });
        }
        if self.config.max_concurrent_requests < 1 {
            return Err(SortError::InvalidConfiguration {
                field: "max_concurrent_requests",
            });
        }
        Ok(())
    }

    fn emit(
        &self,
        kind: EventKind,
        message: String,
        completed: usize,
        total: usize,
        data: Option<serde_json::Value>,
    ) {
        deliver(
            self.sink.as_deref(),
            ProgressEvent {
                kind,
                message,
                completed,
                total,
                data,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::MockJudge;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sorter(config: SorterConfig) -> QualitativeSorter {
        QualitativeSorter::new(Arc::new(MockJudge::noiseless()), config)
    }

    #[tokio::test]
    async fn test_rejects_empty_input() {
        let result = sorter(SorterConfig::new("max")).sort(&[]).await;
        assert!(matches!(result, Err(SortError::EmptyItems)));
    }

    #[tokio::test]
    async fn test_rejects_duplicate_items() {
        let result = sorter(SorterConfig::new("max"))
            .sort(&items(&["1", "2", "1"]))
            .await;
        assert!(matches!(result, Err(SortError::DuplicateItem(item)) if item == "1"));
    }

    #[tokio::test]
    async fn test_rejects_invalid_configuration() {
        for (field, config) in [
            ("elimination_count", SorterConfig {
                elimination_count: 0,
                ..SorterConfig::new("max")
            }),
            ("comparison_rounds", SorterConfig {
                comparison_rounds: 0,
                ..SorterConfig::new("max")
            }),
            ("max_concurrent_requests", SorterConfig {
                max_concurrent_requests: 0,
                ..SorterConfig::new("max")
            }),
        ] {
            let result = sorter(config).sort(&items(&["1", "2"])).await;
            assert!(
                matches!(result, Err(SortError::InvalidConfiguration { field: f }) if f == field),
                "expected InvalidConfiguration for {field}"
            );
        }
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_stops_before_scheduling() {
        let token = CancellationToken::new();
        token.cancel();

        let sorter = sorter(SorterConfig::new("max")).with_cancellation_token(token);
        let result = sorter.sort(&items(&["1", "2"])).await;
        assert!(matches!(result, Err(SortError::Cancelled)));
    }

    #[tokio::test]
    async fn test_singleton_completes_without_matches() {
        let result = sorter(SorterConfig::new("max"))
            .sort(&items(&["only"]))
            .await
            .unwrap();

        assert!(result.match_history.is_empty());
        assert_eq!(result.statistics.total_matches, 0);
        assert_eq!(result.rankings.len(), 1);
        assert_eq!(result.rankings[0].rank, 1);
        assert_eq!(result.rankings[0].items, items(&["only"]));
    }
}

/// qualsort-core: LLM-judged qualitative ranking.
///
/// Ranks textual items under a criterion that has no numeric score ("prose
/// quality", "character strength") by delegating pairwise comparisons to an
/// LLM judge and aggregating them through a multi-elimination tournament:
/// lose `elimination_count` matches and you are out, final ranks come from
/// win counts.
///
/// Each match runs several comparison rounds with the presentation order
/// flipped between them, which cancels the judge's position bias; verdicts
/// are cached under order-sensitive keys so repeated runs stay cheap. No
/// HTTP lives in this crate: bring a [`Judge`] implementation (the CLI
/// crate ships an OpenAI-compatible one, [`MockJudge`] works offline).
///
/// # Quick start
///
/// ```no_run
/// use std::sync::Arc;
/// use qualsort_core::{MockJudge, QualitativeSorter, SorterConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), qualsort_core::SortError> {
///     let items: Vec<String> = ["12", "7", "42", "3"].map(String::from).into();
///
///     let mut config = SorterConfig::new("which number is larger?");
///     config.seed = Some(0);
///
///     let sorter = QualitativeSorter::new(Arc::new(MockJudge::noiseless()), config);
///     let result = sorter.sort(&items).await?;
///
///     for group in &result.rankings {
///         println!("#{} {}", group.rank, group.items.join(", "));
///     }
///     Ok(())
/// }
/// ```

pub mod cache;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod judge;
mod match_runner;
pub mod output;
mod pairing;
pub mod sorter;
pub mod tournament;
pub mod types;

// Re-export primary public API at crate root.
pub use cache::{cache_key, Cache, FileCache, MemoryCache};
pub use dispatch::Dispatcher;
pub use error::{CacheError, JudgeError, SortError};
pub use events::{EventKind, ProgressEvent, ProgressSink};
pub use judge::{Judge, MockJudge, DEFAULT_NOISE_STDDEV};
pub use sorter::{QualitativeSorter, SorterConfig};
pub use tournament::{Participant, Tournament};
pub use types::{
    ComparisonResult, MatchRequest, MatchResult, Order, RankGroup, RoundResult, SortResult,
    Statistics, Verdict,
};

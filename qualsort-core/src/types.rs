/// Shared data model for the tournament pipeline.
///
/// Everything here is plain data: the engine, match runner, and orchestrator
/// communicate exclusively through these types, and all of them serialize so
/// callers can persist or render results however they like.
use serde::{Deserialize, Serialize};

/// Presentation order of a comparison round.
///
/// `Ab` presents `item_a` first, `Ba` presents `item_b` first. LLM judges are
/// position-sensitive, so the order is part of every round and of every cache
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    #[serde(rename = "AB")]
    Ab,
    #[serde(rename = "BA")]
    Ba,
}

impl Order {
    /// Order used for the given 0-based round index: even rounds are `AB`,
    /// odd rounds `BA`. With an odd round count the schedule ends up with one
    /// extra `AB` round; even counts balance order exposure exactly.
    pub fn for_round(index: usize) -> Self {
        if index % 2 == 0 {
            Order::Ab
        } else {
            Order::Ba
        }
    }

    /// Split an identity-ordered pair into (first presented, second presented).
    pub fn presented<'a>(&self, item_a: &'a str, item_b: &'a str) -> (&'a str, &'a str) {
        match self {
            Order::Ab => (item_a, item_b),
            Order::Ba => (item_b, item_a),
        }
    }
}

/// A judge's verdict, relative to presentation order: `A` is whichever item
/// was presented first in that round, `B` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    A,
    B,
}

/// Outcome of a single judge call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Relative winner, or `None` when the judge could not decide.
    pub winner: Option<Verdict>,
    /// Human-readable justification. Non-empty on decisive outcomes.
    pub reasoning: String,
    /// Opaque provider payload, kept for diagnostics.
    pub raw: Option<serde_json::Value>,
}

/// One comparison round within a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub order: Order,
    /// Winner relative to presentation order (see [`Verdict`]). Tallying
    /// translates this back to item identity via `order`.
    pub winner: Option<Verdict>,
    pub reasoning: String,
    /// True when the result came from the cache instead of a live call.
    pub cached: bool,
    /// True when the judge call failed; such rounds are skipped in tallying.
    pub error: bool,
}

/// Outcome of a full match between two items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub item_a: String,
    pub item_b: String,
    /// The winning item's text, or `None` for a draw. Both an evenly split
    /// match and an all-error match are draws; inspect `rounds` to tell them
    /// apart.
    pub winner: Option<String>,
    pub rounds: Vec<RoundResult>,
}

impl MatchResult {
    /// A match is decisive when it produced a winner.
    pub fn is_decisive(&self) -> bool {
        self.winner.is_some()
    }
}

/// A scheduled pairing, produced by the tournament engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub item_a: String,
    pub item_b: String,
    /// 0-based index of the batch this pairing belongs to.
    pub round: usize,
}

/// Counters for one `sort` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// All completed matches, draws included.
    pub total_matches: usize,
    /// Live judge calls issued (cache hits excluded, failed calls included).
    pub total_api_calls: usize,
    pub cache_hits: usize,
    pub elapsed_time_seconds: f64,
    /// True when the tournament ended because no legal pairing remained while
    /// two or more participants were still active.
    pub deadlocked: bool,
}

/// A group of items sharing one rank. Ranks are 1-based competition ranks:
/// a k-way tie at rank r is followed by rank r + k.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankGroup {
    pub rank: usize,
    pub items: Vec<String>,
}

/// Final output of a `sort` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortResult {
    pub rankings: Vec<RankGroup>,
    pub match_history: Vec<MatchResult>,
    pub statistics: Statistics,
}

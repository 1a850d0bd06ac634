/// Progress events delivered to a user-supplied sink.
///
/// Events are emitted from the orchestrator's control flow, so the sink must
/// be non-blocking. A panicking sink is caught and logged; it never aborts
/// the sort.
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// A match has been scheduled into the current batch.
    #[serde(rename = "MATCH_START")]
    MatchStart,
    /// A match finished and its result was recorded.
    #[serde(rename = "MATCH_END")]
    MatchEnd,
    /// A full batch finished.
    #[serde(rename = "ROUND_END")]
    RoundEnd,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
    /// Matches completed so far.
    pub completed: usize,
    /// Estimated total matches. A heuristic denominator for progress bars,
    /// not a promise; `completed` can stop short of it.
    pub total: usize,
    pub data: Option<serde_json::Value>,
}

/// Receives progress events. Implemented for any `Fn(&ProgressEvent)`.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Deliver an event, shielding the orchestrator from sink panics.
pub(crate) fn deliver(sink: Option<&dyn ProgressSink>, event: ProgressEvent) {
    let Some(sink) = sink else { return };
    if catch_unwind(AssertUnwindSafe(|| sink.emit(&event))).is_err() {
        warn!(kind = ?event.kind, "progress sink panicked; event dropped");
    }
}

/// Judge abstraction and the built-in mock judge.
///
/// A judge sees two items in presentation order and returns a relative
/// verdict: `A` for the first-presented, `B` for the second, or `None` when
/// it cannot decide. Real judges live behind HTTP in the CLI crate; the mock
/// here compares numeric strings and exists for tests and offline runs.
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::JudgeError;
use crate::types::{ComparisonResult, Verdict};

#[async_trait]
pub trait Judge: Send + Sync {
    /// Identifier used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Compare the first- and second-presented items under `criteria`.
    ///
    /// Implementations should return `Ok` with `winner: None` when the judge
    /// answered but could not decide, and `Err` only for call failures
    /// (transport, unusable response). Either way the match continues.
    async fn compare(
        &self,
        first: &str,
        second: &str,
        criteria: &str,
    ) -> Result<ComparisonResult, JudgeError>;
}

/// Default noise applied by [`MockJudge`], tuned so adjacent integers flip
/// often enough to look like a genuinely uncertain qualitative judge.
pub const DEFAULT_NOISE_STDDEV: f64 = 3.33;

/// Compares items as numbers, with Gaussian noise added to each side.
/// The larger noisy value wins. Items that fail to parse yield an undecided
/// result rather than an error.
pub struct MockJudge {
    noise_stddev: f64,
    rng: Mutex<StdRng>,
}

impl MockJudge {
    pub fn new(seed: Option<u64>, noise_stddev: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        MockJudge {
            noise_stddev,
            rng: Mutex::new(rng),
        }
    }

    /// A noiseless mock: the numerically larger item always wins.
    pub fn noiseless() -> Self {
        Self::new(Some(0), 0.0)
    }

    /// Standard normal sample via Box-Muller, scaled to the configured
    /// stddev. Hand-rolled to avoid an extra crate dependency.
    fn noise(&self) -> f64 {
        if self.noise_stddev == 0.0 {
            return 0.0;
        }
        let mut rng = self.rng.lock().expect("mock judge rng poisoned");
        let u1: f64 = rng.random();
        let u2: f64 = rng.random();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z * self.noise_stddev
    }
}

#[async_trait]
impl Judge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn compare(
        &self,
        first: &str,
        second: &str,
        _criteria: &str,
    ) -> Result<ComparisonResult, JudgeError> {
        let (Ok(base_first), Ok(base_second)) = (first.parse::<f64>(), second.parse::<f64>())
        else {
            return Ok(ComparisonResult {
                winner: None,
                reasoning: format!("failed to parse {first:?} or {second:?} as a number"),
                raw: None,
            });
        };

        let value_first = base_first + self.noise();
        let value_second = base_second + self.noise();
        let winner = if value_first > value_second {
            Verdict::A
        } else {
            Verdict::B
        };

        Ok(ComparisonResult {
            winner: Some(winner),
            reasoning: format!("compared {first} vs {second} with noise"),
            raw: Some(serde_json::json!({
                "first": first,
                "second": second,
                "value_first": value_first,
                "value_second": value_second,
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noiseless_mock_picks_larger_number() {
        let judge = MockJudge::noiseless();

        let result = judge.compare("3", "7", "max").await.unwrap();
        assert_eq!(result.winner, Some(Verdict::B));

        let result = judge.compare("7", "3", "max").await.unwrap();
        assert_eq!(result.winner, Some(Verdict::A));
    }

    #[tokio::test]
    async fn test_unparseable_items_yield_undecided() {
        let judge = MockJudge::noiseless();

        let result = judge.compare("apple", "7", "max").await.unwrap();
        assert_eq!(result.winner, None);
        assert!(!result.reasoning.is_empty());
    }

    #[tokio::test]
    async fn test_seeded_mock_is_reproducible() {
        let run = |seed| async move {
            let judge = MockJudge::new(Some(seed), DEFAULT_NOISE_STDDEV);
            let mut verdicts = Vec::new();
            for _ in 0..10 {
                verdicts.push(judge.compare("5", "6", "max").await.unwrap().winner);
            }
            verdicts
        };

        assert_eq!(run(9).await, run(9).await);
    }
}

/// Multi-elimination tournament engine.
///
/// Participants are eliminated after a fixed number of losses rather than a
/// single one; final ranks come from win counts with competition ranking.
/// The engine is a pure in-memory state machine: no I/O, no suspension, and
/// it is only ever mutated from the orchestrator's control flow.
use std::collections::{BTreeMap, HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::SortError;
use crate::pairing::{generate_pairs, pair_key};
use crate::types::{MatchRequest, RankGroup};

/// Tournament participant, one per input item.
#[derive(Debug, Clone)]
pub struct Participant {
    pub item: String,
    pub wins: usize,
    pub losses: usize,
}

impl Participant {
    fn new(item: String) -> Self {
        Participant {
            item,
            wins: 0,
            losses: 0,
        }
    }

    /// A participant is out of the tournament once its losses reach the
    /// elimination count.
    pub fn is_eliminated(&self, elimination_count: usize) -> bool {
        self.losses >= elimination_count
    }
}

#[derive(Debug)]
pub struct Tournament {
    elimination_count: usize,
    /// Participants in input order; grouping and tie output preserve this
    /// order, which keeps seeded runs byte-for-byte reproducible.
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
    /// Every unordered pair ever scheduled. A pair may appear at most once
    /// over the lifetime of the tournament.
    history: HashSet<(usize, usize)>,
    rng: StdRng,
    next_round: usize,
}

impl Tournament {
    /// Create a tournament over `items`. Fails on an empty list, duplicate
    /// items, or an elimination count below 1. A seed makes pairing
    /// deterministic; without one the PRNG is seeded from the OS.
    pub fn new(
        items: &[String],
        elimination_count: usize,
        seed: Option<u64>,
    ) -> Result<Self, SortError> {
        if items.is_empty() {
            return Err(SortError::EmptyItems);
        }
        if elimination_count < 1 {
            return Err(SortError::InvalidConfiguration {
                field: "elimination_count",
            });
        }

        let mut index = HashMap::with_capacity(items.len());
        let mut participants = Vec::with_capacity(items.len());
        for item in items {
            if index.insert(item.clone(), participants.len()).is_some() {
                return Err(SortError::DuplicateItem(item.clone()));
            }
            participants.push(Participant::new(item.clone()));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Tournament {
            elimination_count,
            participants,
            index,
            history: HashSet::new(),
            rng,
            next_round: 0,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, item: &str) -> Option<&Participant> {
        self.index.get(item).map(|&i| &self.participants[i])
    }

    pub fn active_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| !p.is_eliminated(self.elimination_count))
            .count()
    }

    /// `(index, losses)` for every active participant, in input order.
    fn active(&self) -> Vec<(usize, usize)> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_eliminated(self.elimination_count))
            .map(|(i, p)| (i, p.losses))
            .collect()
    }

    /// Schedule the next batch of disjoint pairings among active
    /// participants. Empty when the tournament is complete, or when two or
    /// more participants remain but every legal pairing has already been
    /// played, which is the deadlock condition the orchestrator checks for.
    pub fn get_next_matches(&mut self) -> Vec<MatchRequest> {
        let active = self.active();
        if active.len() < 2 {
            return Vec::new();
        }

        let pairs = generate_pairs(&active, &self.history, &mut self.rng);
        if pairs.is_empty() {
            return Vec::new();
        }

        let round = self.next_round;
        self.next_round += 1;

        pairs
            .into_iter()
            .map(|(a, b)| MatchRequest {
                item_a: self.participants[a].item.clone(),
                item_b: self.participants[b].item.clone(),
                round,
            })
            .collect()
    }

    /// Record a finished match. `winner` is one of the two items, or `None`
    /// for a draw; draws leave both win/loss counters untouched. The pair is
    /// added to history either way, so it can never be scheduled again.
    ///
    /// Panics if either item is unknown, the items are equal, either
    /// participant is already eliminated, or `winner` names a third item.
    /// All of these are orchestrator bugs, not input errors.
    pub fn record_match_result(&mut self, item_a: &str, item_b: &str, winner: Option<&str>) {
        let a = self.lookup(item_a);
        let b = self.lookup(item_b);
        assert!(a != b, "match must involve two distinct participants");
        assert!(
            !self.participants[a].is_eliminated(self.elimination_count),
            "result recorded for eliminated participant {item_a:?}"
        );
        assert!(
            !self.participants[b].is_eliminated(self.elimination_count),
            "result recorded for eliminated participant {item_b:?}"
        );

        match winner {
            None => {}
            Some(w) if w == item_a => {
                self.participants[a].wins += 1;
                self.participants[b].losses += 1;
            }
            Some(w) if w == item_b => {
                self.participants[b].wins += 1;
                self.participants[a].losses += 1;
            }
            Some(w) => panic!("winner {w:?} is not a participant of this match"),
        }

        self.history.insert(pair_key(a, b));
    }

    /// Complete once fewer than two active participants remain. The deadlock
    /// case (≥2 active, no legal pair) is detected by the orchestrator via an
    /// empty `get_next_matches` batch instead.
    pub fn is_complete(&self) -> bool {
        self.active_count() <= 1
    }

    /// Final rankings over all participants, eliminated included: descending
    /// by wins, equal wins share a rank, and a k-way tie at rank r is
    /// followed by rank r + k. Within a tie, items keep input order.
    pub fn get_rankings(&self) -> Vec<RankGroup> {
        let mut by_wins: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for p in &self.participants {
            by_wins.entry(p.wins).or_default().push(p.item.clone());
        }

        let mut rankings = Vec::with_capacity(by_wins.len());
        let mut rank = 1;
        for (_, items) in by_wins.into_iter().rev() {
            let group_size = items.len();
            rankings.push(RankGroup { rank, items });
            rank += group_size;
        }
        rankings
    }

    /// Whether the unordered pair has already been scheduled.
    pub fn has_played(&self, item_a: &str, item_b: &str) -> bool {
        match (self.index.get(item_a), self.index.get(item_b)) {
            (Some(&a), Some(&b)) => self.history.contains(&pair_key(a, b)),
            _ => false,
        }
    }

    fn lookup(&self, item: &str) -> usize {
        *self
            .index
            .get(item)
            .unwrap_or_else(|| panic!("unknown participant: {item:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_empty_items() {
        assert!(matches!(
            Tournament::new(&[], 2, Some(0)),
            Err(SortError::EmptyItems)
        ));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = Tournament::new(&items(&["a", "b", "a"]), 2, Some(0)).unwrap_err();
        assert!(matches!(err, SortError::DuplicateItem(item) if item == "a"));
    }

    #[test]
    fn test_new_rejects_zero_elimination_count() {
        assert!(matches!(
            Tournament::new(&items(&["a", "b"]), 0, Some(0)),
            Err(SortError::InvalidConfiguration { field: "elimination_count" })
        ));
    }

    #[test]
    fn test_singleton_is_complete_immediately() {
        let mut t = Tournament::new(&items(&["only"]), 2, Some(0)).unwrap();
        assert!(t.is_complete());
        assert!(t.get_next_matches().is_empty());

        let rankings = t.get_rankings();
        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].rank, 1);
        assert_eq!(rankings[0].items, vec!["only".to_string()]);
    }

    #[test]
    fn test_decisive_result_updates_both_sides() {
        let mut t = Tournament::new(&items(&["a", "b"]), 2, Some(0)).unwrap();
        t.record_match_result("a", "b", Some("b"));

        let a = t.participant("a").unwrap();
        let b = t.participant("b").unwrap();
        assert_eq!((a.wins, a.losses), (0, 1));
        assert_eq!((b.wins, b.losses), (1, 0));
        assert!(t.has_played("a", "b"));
        assert!(t.has_played("b", "a"));
    }

    #[test]
    fn test_draw_updates_neither_side_but_burns_the_pairing() {
        let mut t = Tournament::new(&items(&["a", "b"]), 2, Some(0)).unwrap();
        t.record_match_result("a", "b", None);

        let a = t.participant("a").unwrap();
        let b = t.participant("b").unwrap();
        assert_eq!((a.wins, a.losses), (0, 0));
        assert_eq!((b.wins, b.losses), (0, 0));
        assert!(t.has_played("a", "b"));
    }

    #[test]
    fn test_elimination_after_configured_losses() {
        let mut t = Tournament::new(&items(&["a", "b", "c"]), 2, Some(0)).unwrap();
        t.record_match_result("a", "b", Some("b"));
        t.record_match_result("a", "c", Some("c"));

        let a = t.participant("a").unwrap();
        assert!(a.is_eliminated(2));
        assert_eq!(t.active_count(), 2);

        // Eliminated participants never appear in later batches.
        for _ in 0..10 {
            for request in t.get_next_matches() {
                assert_ne!(request.item_a, "a");
                assert_ne!(request.item_b, "a");
            }
        }
    }

    #[test]
    fn test_no_pair_is_scheduled_twice() {
        let mut t = Tournament::new(&items(&["a", "b", "c", "d"]), 3, Some(7)).unwrap();
        let mut seen = HashSet::new();

        loop {
            let batch = t.get_next_matches();
            if batch.is_empty() {
                break;
            }
            for request in batch {
                let key = if request.item_a < request.item_b {
                    (request.item_a.clone(), request.item_b.clone())
                } else {
                    (request.item_b.clone(), request.item_a.clone())
                };
                assert!(seen.insert(key), "pair proposed twice");
                // Draws keep everyone active, forcing the pairing to cycle
                // through every combination before going quiet.
                t.record_match_result(&request.item_a, &request.item_b, None);
            }
        }

        assert_eq!(seen.len(), 6); // C(4,2)
    }

    #[test]
    fn test_deadlock_yields_empty_batch_with_two_active() {
        let mut t = Tournament::new(&items(&["x", "y"]), 1, Some(0)).unwrap();
        t.record_match_result("x", "y", None);

        assert!(!t.is_complete());
        assert!(t.get_next_matches().is_empty());
    }

    #[test]
    fn test_rankings_use_competition_ranking() {
        let mut t = Tournament::new(&items(&["a", "b", "c", "d"]), 10, Some(0)).unwrap();
        // a: 2 wins, b and c: 1 win each, d: 0 wins.
        t.record_match_result("a", "d", Some("a"));
        t.record_match_result("a", "b", Some("a"));
        t.record_match_result("b", "d", Some("b"));
        t.record_match_result("c", "d", Some("c"));

        let rankings = t.get_rankings();
        assert_eq!(rankings.len(), 3);
        assert_eq!((rankings[0].rank, rankings[0].items.as_slice()), (1, &["a".to_string()][..]));
        assert_eq!(rankings[1].rank, 2);
        assert_eq!(rankings[1].items, items(&["b", "c"]));
        // Two-way tie at rank 2, so the next rank is 4.
        assert_eq!(rankings[2].rank, 4);
        assert_eq!(rankings[2].items, vec!["d".to_string()]);
    }

    #[test]
    fn test_batches_are_deterministic_for_fixed_seed() {
        let run = |seed| {
            let mut t = Tournament::new(&items(&["a", "b", "c", "d", "e"]), 2, Some(seed)).unwrap();
            let mut schedule = Vec::new();
            loop {
                let batch = t.get_next_matches();
                if batch.is_empty() {
                    break;
                }
                for request in batch {
                    schedule.push((request.item_a.clone(), request.item_b.clone()));
                    let winner = std::cmp::max(request.item_a.clone(), request.item_b.clone());
                    t.record_match_result(&request.item_a, &request.item_b, Some(winner.as_str()));
                }
            }
            schedule
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    #[should_panic(expected = "unknown participant")]
    fn test_record_panics_on_unknown_item() {
        let mut t = Tournament::new(&items(&["a", "b"]), 2, Some(0)).unwrap();
        t.record_match_result("a", "nope", Some("a"));
    }

    #[test]
    #[should_panic(expected = "not a participant")]
    fn test_record_panics_on_foreign_winner() {
        let mut t = Tournament::new(&items(&["a", "b", "c"]), 2, Some(0)).unwrap();
        t.record_match_result("a", "b", Some("c"));
    }
}

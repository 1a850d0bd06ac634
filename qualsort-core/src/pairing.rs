/// Bracket pairing for the multi-elimination tournament.
///
/// Participants are partitioned by loss count into brackets, iterated from
/// fewest losses to most. Each bracket is shuffled and paired greedily from
/// the front, rejecting any pair that has already played; a participant with
/// no legal partner carries over into the next bracket, and whoever is still
/// unpaired after the last bracket waits for a later batch.
///
/// Greedy rejection does not attempt an optimal matching (no blossom
/// algorithm); for the target input sizes of tens to low hundreds of items
/// it finds a legal pairing whenever a greedy one exists, and the engine
/// treats the all-rejected case as end of tournament.
///
/// Operates on `usize` participant indices; the engine maps them back to
/// items.
use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

/// Canonical unordered pair of participant indices.
pub(crate) fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Generate disjoint pairs for one batch.
///
/// `active` holds `(participant index, loss count)` for every non-eliminated
/// participant, in stable participant order; `history` holds every unordered
/// pair that has already been scheduled. Returns an empty vector when no
/// legal pair can be formed.
pub(crate) fn generate_pairs(
    active: &[(usize, usize)],
    history: &HashSet<(usize, usize)>,
    rng: &mut impl Rng,
) -> Vec<(usize, usize)> {
    let mut brackets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &(index, losses) in active {
        brackets.entry(losses).or_default().push(index);
    }

    let mut pairs = Vec::new();
    let mut carry: Vec<usize> = Vec::new();

    for members in brackets.into_values() {
        let mut pool = carry;
        pool.extend(members);
        pool.shuffle(rng);

        carry = Vec::new();
        while !pool.is_empty() {
            let first = pool.remove(0);
            // First legal partner in shuffled order; on rejection the scan
            // simply advances to the next unpaired candidate.
            match pool
                .iter()
                .position(|&other| !history.contains(&pair_key(first, other)))
            {
                Some(pos) => {
                    let partner = pool.remove(pos);
                    pairs.push((first, partner));
                }
                None => carry.push(first),
            }
        }
    }

    // Anyone left in carry waits for a later batch, where shifted loss
    // counts may produce a fresh opponent.
    pairs
}

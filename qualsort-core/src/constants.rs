/// Number of losses that eliminates a participant, unless configured.
pub const DEFAULT_ELIMINATION_COUNT: usize = 2;

/// Comparison rounds per match, unless configured.
///
/// Even values give each item equal exposure to both presentation positions,
/// which is what makes order-bias cancellation work; odd values are allowed
/// but leave one extra first-position round.
pub const DEFAULT_COMPARISON_ROUNDS: usize = 2;

/// Dispatcher gate capacity, unless configured. Bounds the number of judge
/// calls in flight at once; cache hits never consume a permit.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

use std::cmp::Ordering;
use std::fmt;

use crate::words::Word;

/// Absolute tolerance for comparing floating-point heuristics. Entropies
/// within this band are treated as ties and fall through to the
/// deterministic tie-breakers.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Builds a guess object from a streamed histogram. Implementors summarise
/// the histogram into whatever their heuristic ranks by.
pub trait FromHistogram {
    fn from_histogram(word: Word, is_potential_soln: bool, histogram: &[u32]) -> Self;
}

/// A guess ranked by the minimax heuristic: minimise the worst-case
/// remaining candidate count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimaxGuess {
    pub word: Word,
    pub is_potential_soln: bool,
    pub number_of_buckets: u32,
    pub size_of_largest_bucket: u32,
}

impl MinimaxGuess {
    pub fn new(
        word: Word,
        is_potential_soln: bool,
        number_of_buckets: u32,
        size_of_largest_bucket: u32,
    ) -> Self {
        MinimaxGuess {
            word,
            is_potential_soln,
            number_of_buckets,
            size_of_largest_bucket,
        }
    }

    /// Strict preference order: smaller largest bucket, then guesses that
    /// could themselves be the answer, then more buckets, then word order.
    pub fn improves_upon(&self, other: &MinimaxGuess) -> bool {
        if self.size_of_largest_bucket != other.size_of_largest_bucket {
            return self.size_of_largest_bucket < other.size_of_largest_bucket;
        }
        if self.is_potential_soln != other.is_potential_soln {
            return self.is_potential_soln;
        }
        if self.number_of_buckets != other.number_of_buckets {
            return self.number_of_buckets > other.number_of_buckets;
        }
        self.word < other.word
    }

    pub fn cmp_preference(&self, other: &MinimaxGuess) -> Ordering {
        if self.improves_upon(other) {
            Ordering::Less
        } else if other.improves_upon(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Every bucket is a singleton: the next round is guaranteed to win.
    pub fn perfectly_partitions(&self) -> bool {
        self.size_of_largest_bucket == 1
    }

    /// Combine with a follow-up, deep guess: keep this word and solution
    /// flag but adopt the follow-up's bucket statistics.
    pub fn combine(&self, other: &MinimaxGuess) -> MinimaxGuess {
        MinimaxGuess {
            word: self.word.clone(),
            is_potential_soln: self.is_potential_soln,
            number_of_buckets: other.number_of_buckets,
            size_of_largest_bucket: other.size_of_largest_bucket,
        }
    }
}

impl FromHistogram for MinimaxGuess {
    fn from_histogram(word: Word, is_potential_soln: bool, histogram: &[u32]) -> Self {
        let mut number_of_buckets = 0u32;
        let mut size_of_largest_bucket = 0u32;
        for &count in histogram {
            if count > 0 {
                number_of_buckets += 1;
                size_of_largest_bucket = size_of_largest_bucket.max(count);
            }
        }
        MinimaxGuess {
            word,
            is_potential_soln,
            number_of_buckets,
            size_of_largest_bucket,
        }
    }
}

impl fmt::Display for MinimaxGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

/// A guess ranked by expected information gain.
#[derive(Clone, Debug, PartialEq)]
pub struct EntropyGuess {
    pub word: Word,
    pub is_potential_soln: bool,
    pub entropy: f64,
    pub is_perfect_partition: bool,
}

impl EntropyGuess {
    pub fn new(word: Word, is_potential_soln: bool, entropy: f64, is_perfect_partition: bool) -> Self {
        EntropyGuess {
            word,
            is_potential_soln,
            entropy,
            is_perfect_partition,
        }
    }

    /// Greater entropy wins; near-ties prefer potential solutions, then
    /// word order.
    pub fn improves_upon(&self, other: &EntropyGuess) -> bool {
        if (self.entropy - other.entropy).abs() > FLOAT_TOLERANCE {
            return self.entropy > other.entropy;
        }
        if self.is_potential_soln != other.is_potential_soln {
            return self.is_potential_soln;
        }
        self.word < other.word
    }

    pub fn cmp_preference(&self, other: &EntropyGuess) -> Ordering {
        if self.improves_upon(other) {
            Ordering::Less
        } else if other.improves_upon(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    pub fn perfectly_partitions(&self) -> bool {
        self.is_perfect_partition
    }

    /// Entropies are additive: the deep solver folds the expected inner
    /// entropy into the outer guess.
    pub fn add_entropy(&self, entropy: f64) -> EntropyGuess {
        EntropyGuess {
            word: self.word.clone(),
            is_potential_soln: self.is_potential_soln,
            entropy: self.entropy + entropy,
            is_perfect_partition: self.is_perfect_partition,
        }
    }
}

impl FromHistogram for EntropyGuess {
    fn from_histogram(word: Word, is_potential_soln: bool, histogram: &[u32]) -> Self {
        let mut num_buckets = 0u64;
        let mut num_potential_solns = 0u64;
        for &count in histogram {
            if count > 0 {
                num_buckets += 1;
                num_potential_solns += u64::from(count);
            }
        }

        let n = num_potential_solns as f64;
        let mut entropy = 0.0;
        for &count in histogram {
            if count > 0 {
                let p = f64::from(count) / n;
                entropy -= p * p.log2();
            }
        }

        // Raw Shannon entropy only. A guess that might itself be the answer
        // is preferred through the ordering, not through an entropy bonus.
        EntropyGuess {
            word,
            is_potential_soln,
            entropy,
            is_perfect_partition: num_buckets == num_potential_solns,
        }
    }
}

impl fmt::Display for EntropyGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

/// A composite guess for a simultaneous game: one word summarised across
/// every unsolved board with the minimax heuristic.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimaxSimulGuess {
    pub word: Word,
    pub is_potential_soln: bool,
    /// Product over boards of largest-bucket share, the primary objective.
    pub pct_left: f64,
    pub min: u32,
    pub sum: u32,
    pub max: u32,
    pub num_buckets: u32,
}

impl MinimaxSimulGuess {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        word: Word,
        is_potential_soln: bool,
        pct_left: f64,
        min: u32,
        sum: u32,
        max: u32,
        num_buckets: u32,
    ) -> Self {
        MinimaxSimulGuess {
            word,
            is_potential_soln,
            pct_left,
            min,
            sum,
            max,
            num_buckets,
        }
    }

    pub fn improves_upon(&self, other: &MinimaxSimulGuess) -> bool {
        if (self.pct_left - other.pct_left).abs() > FLOAT_TOLERANCE {
            return self.pct_left < other.pct_left;
        }
        if self.min != other.min {
            return self.min < other.min;
        }
        if self.sum != other.sum {
            return self.sum < other.sum;
        }
        if self.max != other.max {
            return self.max < other.max;
        }
        if self.is_potential_soln != other.is_potential_soln {
            return self.is_potential_soln;
        }
        if self.num_buckets != other.num_buckets {
            return self.num_buckets > other.num_buckets;
        }
        self.word < other.word
    }

    pub fn cmp_preference(&self, other: &MinimaxSimulGuess) -> Ordering {
        if self.improves_upon(other) {
            Ordering::Less
        } else if other.improves_upon(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl fmt::Display for MinimaxSimulGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntropyGuess, FromHistogram, MinimaxGuess, MinimaxSimulGuess};
    use crate::words::Word;

    fn word(s: &str) -> Word {
        Word::new(s)
    }

    #[test]
    fn minimax_prefers_smaller_largest_bucket() {
        let a = MinimaxGuess::new(word("SLATE"), false, 10, 4);
        let b = MinimaxGuess::new(word("CRANE"), true, 20, 5);
        assert!(a.improves_upon(&b));
        assert!(!b.improves_upon(&a));
    }

    #[test]
    fn minimax_ties_prefer_potential_solutions_then_bucket_count() {
        let common = MinimaxGuess::new(word("SLATE"), true, 10, 4);
        let uncommon = MinimaxGuess::new(word("CRANE"), false, 12, 4);
        assert!(common.improves_upon(&uncommon));

        let few = MinimaxGuess::new(word("SLATE"), true, 10, 4);
        let many = MinimaxGuess::new(word("CRANE"), true, 12, 4);
        assert!(many.improves_upon(&few));
    }

    #[test]
    fn minimax_final_tie_break_is_lexicographic() {
        let a = MinimaxGuess::new(word("CRANE"), true, 10, 4);
        let b = MinimaxGuess::new(word("SLATE"), true, 10, 4);
        assert!(a.improves_upon(&b));
    }

    #[test]
    fn minimax_combine_keeps_word_and_takes_inner_stats() {
        let outer = MinimaxGuess::new(word("SLATE"), true, 10, 4);
        let inner = MinimaxGuess::new(word("CRANE"), false, 3, 2);
        let combined = outer.combine(&inner);

        assert_eq!(combined.word, word("SLATE"));
        assert!(combined.is_potential_soln);
        assert_eq!(combined.number_of_buckets, 3);
        assert_eq!(combined.size_of_largest_bucket, 2);
    }

    #[test]
    fn minimax_from_histogram_counts_buckets() {
        let hist = [0u32, 3, 0, 1, 2];
        let guess = MinimaxGuess::from_histogram(word("SLATE"), true, &hist);
        assert_eq!(guess.number_of_buckets, 3);
        assert_eq!(guess.size_of_largest_bucket, 3);
        assert!(!guess.perfectly_partitions());
    }

    #[test]
    fn entropy_from_histogram_matches_shannon_formula() {
        // Buckets 1, 1, 2 over four candidates: H = 1.5 bits.
        let hist = [1u32, 0, 1, 2];
        let guess = EntropyGuess::from_histogram(word("CRANE"), false, &hist);
        assert!((guess.entropy - 1.5).abs() < 1e-12);
        assert!(!guess.is_perfect_partition);

        // The potential-solution flag never inflates the entropy itself;
        // it only breaks ties in the ordering.
        let flagged = EntropyGuess::from_histogram(word("CRANE"), true, &hist);
        assert!((flagged.entropy - 1.5).abs() < 1e-12);
        assert!(flagged.is_potential_soln);
    }

    #[test]
    fn entropy_perfect_partition_is_all_singletons() {
        let hist = [1u32, 1, 1, 0];
        let guess = EntropyGuess::from_histogram(word("CRANE"), false, &hist);
        assert!(guess.is_perfect_partition);
    }

    #[test]
    fn entropy_near_ties_fall_through_to_soln_flag() {
        let a = EntropyGuess::new(word("SLATE"), true, 2.0, false);
        let b = EntropyGuess::new(word("CRANE"), false, 2.0 + 1e-12, false);
        assert!(a.improves_upon(&b));

        let clearly_better = EntropyGuess::new(word("CRANE"), false, 2.1, false);
        assert!(clearly_better.improves_upon(&a));
    }

    #[test]
    fn entropy_addition_preserves_word_and_flags() {
        let base = EntropyGuess::new(word("SLATE"), true, 2.0, true);
        let bumped = base.add_entropy(0.5);
        assert_eq!(bumped.word, word("SLATE"));
        assert!((bumped.entropy - 2.5).abs() < 1e-12);
        assert!(bumped.is_perfect_partition);
    }

    #[test]
    fn simul_guess_orders_by_pct_left_then_stats() {
        let a = MinimaxSimulGuess::new(word("LATER"), false, 0.1, 1, 10, 5, 40);
        let b = MinimaxSimulGuess::new(word("RAISE"), true, 0.2, 1, 8, 4, 50);
        assert!(a.improves_upon(&b));

        let c = MinimaxSimulGuess::new(word("RAISE"), false, 0.1, 1, 9, 5, 40);
        assert!(c.improves_upon(&a));
    }
}

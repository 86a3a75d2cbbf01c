use clap::ValueEnum;

use crate::errors::SolverError;
use crate::guess::{EntropyGuess, MinimaxGuess};
use crate::histogram::HistogramBuilder;
use crate::words::{Word, WordSeries};

/// The heuristic family a solver ranks guesses with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SolverType {
    Minimax,
    Entropy,
}

impl SolverType {
    pub fn from_str(value: &str) -> Result<SolverType, SolverError> {
        match value.to_ascii_uppercase().as_str() {
            "MINIMAX" => Ok(SolverType::Minimax),
            "ENTROPY" => Ok(SolverType::Entropy),
            _ => Err(SolverError::SolverNotSupported(value.to_string())),
        }
    }
}

/// Precomputed opening guess per word length.
pub fn seed(size: usize) -> Option<Word> {
    let word = match size {
        4 => "OLEA",
        5 => "RAISE",
        6 => "TAILER",
        7 => "TENAILS",
        8 => "CENTRALS",
        9 => "SECRETION",
        _ => return None,
    };
    Some(Word::new(word))
}

/// Depth-1 minimax: minimise the size of the largest surviving bucket.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimaxSolver;

impl MinimaxSolver {
    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> MinimaxGuess {
        if potential_solns.len() <= 2 {
            // Cannot do better than guessing a surviving candidate.
            return MinimaxGuess::new(potential_solns.at(0).clone(), true, 1, 1);
        }

        let mut stream = histogram_builder.stream::<MinimaxGuess>(all_words, potential_solns);
        let mut best = stream
            .next()
            .expect("the allowed-guess list is never empty");
        for guess in stream {
            if guess.improves_upon(&best) {
                best = guess;
            }
        }
        best
    }

    /// All guesses ranked best-first by the minimax preference order.
    pub fn sorted_guesses(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> Vec<MinimaxGuess> {
        if potential_solns.len() <= 2 {
            return vec![MinimaxGuess::new(potential_solns.at(0).clone(), true, 1, 1)];
        }

        let mut guesses: Vec<MinimaxGuess> = histogram_builder
            .stream(all_words, potential_solns)
            .collect();
        guesses.sort_by(|a, b| a.cmp_preference(b));
        guesses
    }
}

/// Depth-2 minimax: one-ply lookahead over the strongest depth-1 guesses.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeepMinimaxSolver {
    inner: MinimaxSolver,
}

impl DeepMinimaxSolver {
    const N_GUESSES: usize = 50;
    const N_BRANCHES: usize = 10;

    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> MinimaxGuess {
        let mut best_guesses =
            self.inner
                .sorted_guesses(histogram_builder, all_words, potential_solns);
        best_guesses.truncate(Self::N_GUESSES);

        let mut combined: Vec<(MinimaxGuess, MinimaxGuess)> =
            Vec::with_capacity(best_guesses.len());

        for guess in &best_guesses {
            if guess.perfectly_partitions() {
                // Every bucket is a singleton: the follow-up round is a
                // guaranteed win, so the worst bucket after it is empty.
                let resolved = MinimaxGuess::new(
                    guess.word.clone(),
                    guess.is_potential_soln,
                    guess.number_of_buckets,
                    0,
                );
                return guess.combine(&resolved);
            }

            let buckets = histogram_builder.solns_by_score(potential_solns, &guess.word);
            let mut partitions: Vec<&WordSeries> = buckets.values().collect();
            partitions.sort_by(|a, b| b.len().cmp(&a.len()));

            let worst_inner_best = partitions
                .into_iter()
                .take(Self::N_BRANCHES)
                .map(|part| self.inner.best_guess(histogram_builder, all_words, part))
                .reduce(|worst, inner| {
                    if worst.improves_upon(&inner) {
                        inner
                    } else {
                        worst
                    }
                })
                .expect("a partition of a non-empty candidate set has buckets");

            combined.push((guess.clone(), guess.combine(&worst_inner_best)));
        }

        let mut best = 0;
        for i in 1..combined.len() {
            if combined[i].1.improves_upon(&combined[best].1) {
                best = i;
            }
        }

        // TODO: combined guesses do not carry depth information from the
        // lower levels, so the outer guess is returned with its depth-1
        // statistics. Affects searches of depth 3 and beyond.
        combined[best].0.clone()
    }
}

/// Depth-1 entropy: maximise expected information gain.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropySolver;

impl EntropySolver {
    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> EntropyGuess {
        if potential_solns.len() <= 2 {
            return EntropyGuess::new(potential_solns.at(0).clone(), true, 1.0, true);
        }

        let mut stream = histogram_builder.stream::<EntropyGuess>(all_words, potential_solns);
        let mut best = stream
            .next()
            .expect("the allowed-guess list is never empty");
        for guess in stream {
            if guess.improves_upon(&best) {
                best = guess;
            }
        }
        best
    }

    /// All guesses ranked best-first by the entropy preference order.
    pub fn sorted_guesses(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> Vec<EntropyGuess> {
        if potential_solns.len() <= 2 {
            return vec![EntropyGuess::new(
                potential_solns.at(0).clone(),
                true,
                1.0,
                true,
            )];
        }

        let mut guesses: Vec<EntropyGuess> = histogram_builder
            .stream(all_words, potential_solns)
            .collect();
        guesses.sort_by(|a, b| a.cmp_preference(b));
        guesses
    }
}

/// Depth-2 entropy: add the expected entropy of the best follow-up guess.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeepEntropySolver {
    inner: EntropySolver,
}

impl DeepEntropySolver {
    const N_GUESSES: usize = 10;

    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> EntropyGuess {
        let mut best_guesses =
            self.inner
                .sorted_guesses(histogram_builder, all_words, potential_solns);
        best_guesses.truncate(Self::N_GUESSES);

        let mut deep_guesses: Vec<EntropyGuess> = Vec::with_capacity(best_guesses.len());

        for guess in &best_guesses {
            let buckets = histogram_builder.solns_by_score(potential_solns, &guess.word);

            if guess.is_potential_soln && buckets.values().all(|part| part.len() == 1) {
                // A candidate that splits every survivor apart wins the
                // next round deterministically.
                return EntropyGuess::new(
                    guess.word.clone(),
                    guess.is_potential_soln,
                    f64::INFINITY,
                    true,
                );
            }

            let mut expected_reduction = 0.0;
            for part in buckets.values() {
                let probability = part.len() as f64 / potential_solns.len() as f64;
                let inner_best = self.inner.best_guess(histogram_builder, all_words, part);
                expected_reduction += inner_best.entropy * probability;
            }
            deep_guesses.push(guess.add_entropy(expected_reduction));
        }

        let mut best = 0;
        for i in 1..deep_guesses.len() {
            if deep_guesses[i].improves_upon(&deep_guesses[best]) {
                best = i;
            }
        }
        deep_guesses[best].clone()
    }
}

/// A solver of either heuristic family at either depth, as wired by the
/// factory. The engine only needs the chosen word.
#[derive(Clone, Copy, Debug)]
pub enum Solver {
    Minimax(MinimaxSolver),
    DeepMinimax(DeepMinimaxSolver),
    Entropy(EntropySolver),
    DeepEntropy(DeepEntropySolver),
}

impl Solver {
    /// Depth 1 builds the plain solver; depth 2 and beyond builds the
    /// one-ply lookahead form.
    pub fn from_type(solver_type: SolverType, depth: usize) -> Solver {
        match (solver_type, depth) {
            (SolverType::Minimax, 0 | 1) => Solver::Minimax(MinimaxSolver),
            (SolverType::Minimax, _) => Solver::DeepMinimax(DeepMinimaxSolver::default()),
            (SolverType::Entropy, 0 | 1) => Solver::Entropy(EntropySolver),
            (SolverType::Entropy, _) => Solver::DeepEntropy(DeepEntropySolver::default()),
        }
    }

    pub fn best_guess_word(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        potential_solns: &WordSeries,
    ) -> Word {
        match self {
            Solver::Minimax(solver) => {
                solver
                    .best_guess(histogram_builder, all_words, potential_solns)
                    .word
            }
            Solver::DeepMinimax(solver) => {
                solver
                    .best_guess(histogram_builder, all_words, potential_solns)
                    .word
            }
            Solver::Entropy(solver) => {
                solver
                    .best_guess(histogram_builder, all_words, potential_solns)
                    .word
            }
            Solver::DeepEntropy(solver) => {
                solver
                    .best_guess(histogram_builder, all_words, potential_solns)
                    .word
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        seed, DeepEntropySolver, DeepMinimaxSolver, EntropySolver, MinimaxSolver, SolverType,
    };
    use crate::errors::SolverError;
    use crate::histogram::HistogramBuilder;
    use crate::scoring::Scorer;
    use crate::words::{Word, WordSeries};

    const REMAINING: [&str; 20] = [
        "SNAKE", "SPACE", "SPADE", "SCALE", "SCARE", "SNARE", "SPARE", "SHADE", "SHAKE", "SHAME",
        "SHAPE", "SHAVE", "SHALE", "SHARE", "SHARK", "SKATE", "STAGE", "STAVE", "SLATE", "STALE",
    ];

    const EXTRA_GUESSES: [&str; 5] = ["BLAST", "TRASH", "CARRY", "NYMPH", "PLANT"];

    fn fixture(remaining: &[&str]) -> (HistogramBuilder, WordSeries, WordSeries) {
        let potential_solns = WordSeries::new(remaining.iter().copied());
        let all_words = WordSeries::new(EXTRA_GUESSES.iter().chain(remaining.iter()).copied());
        let builder = HistogramBuilder::new(
            Scorer::new(5),
            all_words.clone(),
            potential_solns.clone(),
            true,
        );
        (builder, all_words, potential_solns)
    }

    #[test]
    fn minimax_best_guess() {
        let (builder, all_words, potential_solns) = fixture(&REMAINING);
        let best = MinimaxSolver.best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("TRASH"));
    }

    #[test]
    fn entropy_best_guess() {
        let (builder, all_words, potential_solns) = fixture(&REMAINING);
        let best = EntropySolver.best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("PLANT"));
    }

    #[test]
    fn deep_minimax_best_guess() {
        let (builder, all_words, potential_solns) = fixture(&REMAINING);
        let best =
            DeepMinimaxSolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("SHARK"));
    }

    #[test]
    fn deep_entropy_best_guess() {
        let (builder, all_words, potential_solns) = fixture(&REMAINING);
        let best =
            DeepEntropySolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("NYMPH"));
    }

    #[test]
    fn two_candidates_short_circuit_to_the_first() {
        let (builder, all_words, potential_solns) = fixture(&["SNAKE", "SPACE"]);

        let minimax =
            DeepMinimaxSolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(minimax.word, Word::new("SNAKE"));

        let entropy =
            DeepEntropySolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(entropy.word, Word::new("SNAKE"));
    }

    #[test]
    fn deep_minimax_returns_early_on_a_perfect_partition() {
        let (builder, all_words, potential_solns) = fixture(&["SNAKE", "SPACE", "SHAPE"]);
        let best =
            DeepMinimaxSolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("SHAPE"));
        assert_eq!(best.size_of_largest_bucket, 0);
    }

    #[test]
    fn deep_entropy_returns_early_on_a_perfect_partition() {
        let (builder, all_words, potential_solns) = fixture(&["SNAKE", "SPACE", "SHAPE"]);
        let best =
            DeepEntropySolver::default().best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(best.word, Word::new("SHAPE"));
        assert_eq!(best.entropy, f64::INFINITY);
    }

    #[test]
    fn identical_inputs_yield_identical_guesses() {
        let (builder, all_words, potential_solns) = fixture(&REMAINING);
        let first = MinimaxSolver.best_guess(&builder, &all_words, &potential_solns);
        let second = MinimaxSolver.best_guess(&builder, &all_words, &potential_solns);
        assert_eq!(first, second);
    }

    #[test]
    fn seeds_cover_the_supported_lengths() {
        assert_eq!(seed(5), Some(Word::new("RAISE")));
        assert_eq!(seed(9), Some(Word::new("SECRETION")));
        assert_eq!(seed(3), None);
    }

    #[test]
    fn solver_type_parsing() {
        assert_eq!(SolverType::from_str("minimax"), Ok(SolverType::Minimax));
        assert_eq!(SolverType::from_str("ENTROPY"), Ok(SolverType::Entropy));
        assert_eq!(
            SolverType::from_str("bayes"),
            Err(SolverError::SolverNotSupported("bayes".to_string()))
        );
    }
}

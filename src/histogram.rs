use std::collections::BTreeMap;
use std::marker::PhantomData;

use once_cell::sync::OnceCell;
use rayon::prelude::*;

use crate::guess::FromHistogram;
use crate::scoring::{Score, Scorer};
use crate::words::{Word, WordSeries};

/// Dense storage of every allowed guess scored against every potential
/// solution.
///
/// Rows are guesses (global all-words index), columns are solutions (global
/// common-words index). Columns are materialised lazily, one `OnceCell` per
/// column, so a column is either fully computed or fully uncomputed and the
/// matrix can be shared read-only across benchmark workers behind `&self`.
pub struct ScoreMatrix {
    scorer: Scorer,
    all_words: WordSeries,
    potential_solns: WordSeries,
    columns: Vec<OnceCell<Box<[Score]>>>,
}

impl ScoreMatrix {
    pub fn new(scorer: Scorer, all_words: WordSeries, potential_solns: WordSeries) -> Self {
        let columns = (0..potential_solns.len()).map(|_| OnceCell::new()).collect();
        ScoreMatrix {
            scorer,
            all_words,
            potential_solns,
            columns,
        }
    }

    pub fn all_words(&self) -> &WordSeries {
        &self.all_words
    }

    pub fn potential_solns(&self) -> &WordSeries {
        &self.potential_solns
    }

    /// Scores of every guess against the solution at `global_col`,
    /// computing the column on first access.
    pub fn column(&self, global_col: usize) -> &[Score] {
        self.columns[global_col].get_or_init(|| self.compute_column(global_col))
    }

    fn compute_column(&self, global_col: usize) -> Box<[Score]> {
        let soln = self.potential_solns.at(global_col);
        self.all_words
            .iter()
            .map(|guess| self.scorer.score_word(soln, guess))
            .collect()
    }

    /// Fill every not-yet-computed column for the given solutions.
    /// Idempotent; already-computed columns are left untouched.
    pub fn precompute(&self, potential_solns: &WordSeries) {
        let todo: Vec<usize> = potential_solns
            .index()
            .iter()
            .map(|&c| c as usize)
            .filter(|&c| self.columns[c].get().is_none())
            .collect();

        todo.par_iter().for_each(|&c| {
            let _ = self.column(c);
        });
    }

    /// Fill the whole matrix. Recommended before multi-run workloads.
    pub fn precompute_all(&self) {
        let all = self.potential_solns.clone();
        self.precompute(&all);
    }

    pub fn is_fully_initialized(&self) -> bool {
        self.columns.iter().all(|c| c.get().is_some())
    }
}

/// Builds histograms of candidate solutions bucketed by score.
///
/// The histogram is fundamental to the solve: knowing how a guess fractures
/// the remaining solution space is what every heuristic ranks guesses by.
pub struct HistogramBuilder {
    scorer: Scorer,
    score_matrix: ScoreMatrix,
}

impl HistogramBuilder {
    /// `lazy_eval` controls whether the score matrix is computed up front.
    /// Lazy gives quick construction but slower first solves; turn it off
    /// for benchmarks and other multi-run workloads.
    pub fn new(
        scorer: Scorer,
        all_words: WordSeries,
        potential_solns: WordSeries,
        lazy_eval: bool,
    ) -> Self {
        let score_matrix = ScoreMatrix::new(scorer.clone(), all_words, potential_solns);
        if !lazy_eval {
            score_matrix.precompute_all();
        }
        HistogramBuilder {
            scorer,
            score_matrix,
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn score_matrix(&self) -> &ScoreMatrix {
        &self.score_matrix
    }

    /// Partition the remaining solutions by the score they would produce
    /// against `guess`. Bucket sizes always sum to the candidate count.
    pub fn solns_by_score(
        &self,
        potential_solns: &WordSeries,
        guess: &Word,
    ) -> BTreeMap<Score, WordSeries> {
        let mut positions: BTreeMap<Score, Vec<usize>> = BTreeMap::new();
        for (pos, soln) in potential_solns.iter().enumerate() {
            let score = self.scorer.score_word(soln, guess);
            positions.entry(score).or_default().push(pos);
        }

        positions
            .into_iter()
            .map(|(score, pos)| (score, potential_solns.select(&pos)))
            .collect()
    }

    /// Stream one guess object per allowed word, each built from the word,
    /// its potential-solution flag, and the histogram of bucketed
    /// candidates. A single count vector of size `3^L` is recycled across
    /// guesses; the inner loop is a linear scan of the candidate scores.
    pub fn stream<'a, G: FromHistogram>(
        &self,
        all_words: &'a WordSeries,
        potential_solns: &WordSeries,
    ) -> GuessStream<'a, G> {
        self.score_matrix.precompute(potential_solns);

        // Flag words that could feasibly be the answer.
        let mut is_common = vec![false; all_words.len()];
        for soln in potential_solns.iter() {
            if let Some(pos) = all_words.find_index(soln) {
                is_common[pos] = true;
            }
        }

        // Gather the candidate columns into one row-major block so the
        // per-guess scan is contiguous.
        let rows = all_words.len();
        let width = potential_solns.len();
        let mut scores = vec![0 as Score; rows * width];
        for (j, &col) in potential_solns.index().iter().enumerate() {
            let column = self.score_matrix.column(col as usize);
            for (i, &score) in column.iter().enumerate() {
                scores[i * width + j] = score;
            }
        }

        let histogram = vec![0u32; usize::pow(3, all_words.word_length() as u32)];

        GuessStream {
            all_words,
            is_common,
            scores,
            width,
            histogram,
            row: 0,
            _marker: PhantomData,
        }
    }
}

/// Lazy iterator over per-guess histograms. See [`HistogramBuilder::stream`].
pub struct GuessStream<'a, G> {
    all_words: &'a WordSeries,
    is_common: Vec<bool>,
    scores: Vec<Score>,
    width: usize,
    histogram: Vec<u32>,
    row: usize,
    _marker: PhantomData<G>,
}

impl<G: FromHistogram> Iterator for GuessStream<'_, G> {
    type Item = G;

    fn next(&mut self) -> Option<G> {
        if self.row >= self.all_words.len() {
            return None;
        }

        self.histogram.fill(0);
        let start = self.row * self.width;
        for &score in &self.scores[start..start + self.width] {
            self.histogram[score as usize] += 1;
        }

        let word = self.all_words.at(self.row).clone();
        let guess = G::from_histogram(word, self.is_common[self.row], &self.histogram);
        self.row += 1;
        Some(guess)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.all_words.len() - self.row;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::{HistogramBuilder, ScoreMatrix};
    use crate::guess::MinimaxGuess;
    use crate::scoring::Scorer;
    use crate::words::{Word, WordSeries};

    fn builder(lazy: bool) -> HistogramBuilder {
        let common = WordSeries::new(["SNAKE", "FLAME", "TOWER", "STICK"]);
        let all = WordSeries::new(["SNAKE", "FLAME", "TOWER", "STICK", "RAISE", "LATER"]);
        HistogramBuilder::new(Scorer::new(5), all, common, lazy)
    }

    #[test]
    fn partition_sizes_sum_to_candidate_count() {
        let sut = builder(true);
        let solns = sut.score_matrix().potential_solns().clone();
        let buckets = sut.solns_by_score(&solns, &Word::new("RAISE"));

        let total: usize = buckets.values().map(WordSeries::len).sum();
        assert_eq!(total, solns.len());
    }

    #[test]
    fn partition_by_candidate_contains_perfect_bucket() {
        let sut = builder(true);
        let solns = sut.score_matrix().potential_solns().clone();
        let buckets = sut.solns_by_score(&solns, &Word::new("SNAKE"));

        let perfect = buckets.get(&242).expect("guessing a candidate wins somewhere");
        assert_eq!(perfect.words(), &[Word::new("SNAKE")]);
    }

    #[test]
    fn stream_yields_one_guess_per_allowed_word() {
        let sut = builder(true);
        let all = sut.score_matrix().all_words().clone();
        let solns = sut.score_matrix().potential_solns().clone();

        let guesses: Vec<MinimaxGuess> = sut.stream(&all, &solns).collect();
        assert_eq!(guesses.len(), all.len());

        // Every histogram covers the full candidate set.
        for guess in &guesses {
            assert!(guess.number_of_buckets >= 1);
            assert!(guess.size_of_largest_bucket as usize <= solns.len());
        }
    }

    #[test]
    fn stream_flags_potential_solutions() {
        let sut = builder(true);
        let all = sut.score_matrix().all_words().clone();
        let solns = sut.score_matrix().potential_solns().clone();

        let by_word: Vec<(String, bool)> = sut
            .stream::<MinimaxGuess>(&all, &solns)
            .map(|g| (g.word.as_str().to_string(), g.is_potential_soln))
            .collect();

        for (word, flag) in by_word {
            let expected = solns.contains(&Word::new(&word));
            assert_eq!(flag, expected, "flag mismatch for {word}");
        }
    }

    #[test]
    fn matrix_precompute_is_idempotent_and_lazy() {
        let common = WordSeries::new(["SNAKE", "FLAME"]);
        let all = WordSeries::new(["SNAKE", "FLAME", "RAISE"]);
        let matrix = ScoreMatrix::new(Scorer::new(5), all, common.clone());

        assert!(!matrix.is_fully_initialized());

        let subset = common.select(&[0]);
        matrix.precompute(&subset);
        assert!(!matrix.is_fully_initialized());

        matrix.precompute(&common);
        matrix.precompute(&common);
        assert!(matrix.is_fully_initialized());

        // FLAME scored against itself sits on the diagonal.
        let col = matrix.column(0);
        assert_eq!(col.len(), 3);
        assert_eq!(col[0], 242);
    }
}

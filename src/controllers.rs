use std::collections::BTreeMap;
use std::error::Error;

use crate::errors::SolverError;
use crate::histogram::HistogramBuilder;
use crate::scoring::{to_ternary, Score, Scorer};
use crate::solver::{seed, Solver};
use crate::views::{HideView, SolveView};
use crate::words::{Dictionary, Word, WordSeries};

/// Drives the interactive solver: propose a guess, read the observed score,
/// narrow the candidates, repeat.
pub struct SolveController {
    pub dictionary: Dictionary,
    pub scorer: Scorer,
    pub histogram_builder: HistogramBuilder,
    pub solver: Solver,
    pub view: SolveView,
}

impl SolveController {
    pub fn solve(&self, first_guess: Option<Word>) -> Result<(), Box<dyn Error>> {
        let (all_words, common_words) = self.dictionary.words();
        let mut available_answers = common_words.clone();

        let mut best_guess = match first_guess {
            Some(word) => word,
            None => seed(self.dictionary.word_length()).ok_or_else(|| {
                SolverError::InvalidInput(format!(
                    "no opening seed for word length {}",
                    self.dictionary.word_length()
                ))
            })?,
        };

        loop {
            let Some((observed_score, guess)) = self.view.get_user_score(&best_guess)? else {
                return Ok(());
            };

            if self.scorer.is_perfect_score(observed_score) {
                self.view.report_success();
                break;
            }

            let mut histogram = self
                .histogram_builder
                .solns_by_score(&available_answers, &guess);
            match histogram.remove(&observed_score) {
                Some(remaining) if !remaining.is_empty() => available_answers = remaining,
                _ => {
                    self.view.report_no_solution();
                    break;
                }
            }

            best_guess =
                self.solver
                    .best_guess_word(&self.histogram_builder, all_words, &available_answers);
            self.view.report_best_guess(&best_guess);
        }

        Ok(())
    }
}

/// The score bucket most evasive for the user: largest surviving set, with
/// any bucket still containing the guess ranked dead last. Ties keep the
/// lowest score.
pub fn most_evasive<'a>(
    histogram: &'a BTreeMap<Score, WordSeries>,
    guess: &Word,
) -> Option<(Score, &'a WordSeries)> {
    let mut best: Option<(usize, Score, &WordSeries)> = None;
    for (&score, bucket) in histogram {
        let rank = if bucket.contains(guess) { 0 } else { bucket.len() };
        match best {
            Some((top, _, _)) if rank <= top => {}
            _ => best = Some((rank, score, bucket)),
        }
    }
    best.map(|(_, score, bucket)| (score, bucket))
}

/// Drives the adversarial mode: the system never commits to an answer, it
/// just keeps the user in the largest possible bucket.
pub struct HideController {
    pub dictionary: Dictionary,
    pub scorer: Scorer,
    pub histogram_builder: HistogramBuilder,
    pub view: HideView,
}

impl HideController {
    const MAX_ROUNDS: usize = 100;

    pub fn hide(&mut self, first_guess: Option<Word>) -> Result<(), Box<dyn Error>> {
        let mut available_answers = self.dictionary.common_words.clone();

        let mut guess = match first_guess {
            Some(word) => word,
            None => match self.view.get_user_guess()? {
                Some(word) => word,
                None => return Ok(()),
            },
        };

        for n in 1..=Self::MAX_ROUNDS {
            let histogram = self
                .histogram_builder
                .solns_by_score(&available_answers, &guess);
            let Some((highest_score, bucket)) = most_evasive(&histogram, &guess) else {
                break;
            };
            available_answers = bucket.clone();

            let num_left = available_answers.len();
            let soln = if num_left == 1 && available_answers.contains(&guess) {
                Some(guess.clone())
            } else {
                None
            };
            let ternary = to_ternary(highest_score, self.dictionary.word_length());
            self.view
                .update(n, &guess, ternary, num_left, soln.as_ref());

            if self.scorer.is_perfect_score(highest_score) {
                self.view.report_success();
                break;
            }

            guess = match self.view.get_user_guess()? {
                Some(word) => word,
                None => break,
            };
        }

        Ok(())
    }
}

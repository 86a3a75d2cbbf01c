use crate::errors::SolverError;
use crate::game::{Game, SimultaneousGame};
use crate::histogram::HistogramBuilder;
use crate::scoring::Scorer;
use crate::simul::SimulSolver;
use crate::solver::{seed, Solver};
use crate::views::RunReporter;
use crate::words::{Dictionary, Word};

/// Round cap for a single board. A simultaneous game gets one extra round
/// per board on top of this.
pub const MAX_ITERS: usize = 20;

/// The game loop for a single board: pick a guess, score it against the
/// truth, shrink the candidate set, repeat until solved or the iteration
/// cap is hit.
pub struct Engine {
    pub dictionary: Dictionary,
    pub scorer: Scorer,
    pub histogram_builder: HistogramBuilder,
    pub solver: Solver,
    pub reporter: Box<dyn RunReporter>,
}

impl Engine {
    pub fn run(&self, soln: &Word, user_guesses: &[Word]) -> Result<Game, SolverError> {
        let (all_words, common_words) = self.dictionary.words();
        let mut game = Game::new(
            common_words.clone(),
            Some(soln.clone()),
            user_guesses.to_vec(),
        );

        let mut guess = match game.user_guess(0) {
            Some(word) => word,
            None => opening_seed(self.dictionary.word_length())?,
        };

        for i in 1..=MAX_ITERS {
            let mut histogram = self
                .histogram_builder
                .solns_by_score(game.potential_solns(), &guess);
            let score = self.scorer.score_word(soln, &guess);
            let remaining = histogram.remove(&score).ok_or_else(|| {
                SolverError::InvalidInput(format!("answer '{soln}' is not a potential solution"))
            })?;
            game.update(i, &guess, score, remaining);
            self.reporter.report_round(&game.scoreboard);

            if game.is_solved {
                return Ok(game);
            }

            guess = match game.user_guess(i) {
                Some(word) => word,
                None => self.solver.best_guess_word(
                    &self.histogram_builder,
                    all_words,
                    game.potential_solns(),
                ),
            };
        }

        Err(SolverError::FailedToFindASolution {
            iterations: MAX_ITERS,
        })
    }
}

/// The game loop for simultaneous boards: one shared guess per round,
/// applied to every board still in play.
pub struct SimulEngine {
    pub dictionary: Dictionary,
    pub scorer: Scorer,
    pub histogram_builder: HistogramBuilder,
    pub solver: SimulSolver,
    pub reporter: Box<dyn RunReporter>,
}

impl SimulEngine {
    pub fn run(
        &self,
        solns: &[Word],
        user_guesses: &[Word],
    ) -> Result<SimultaneousGame, SolverError> {
        let (all_words, common_words) = self.dictionary.words();
        let mut game =
            SimultaneousGame::new(common_words, solns.to_vec(), user_guesses.to_vec());

        let mut guess = match game.user_guess(0) {
            Some(word) => word,
            None => opening_seed(self.dictionary.word_length())?,
        };

        let max_iters = MAX_ITERS + solns.len();
        for i in 1..=max_iters {
            for board in 0..game.games().len() {
                if game.games()[board].is_solved {
                    continue;
                }
                let mut histogram = self
                    .histogram_builder
                    .solns_by_score(game.games()[board].potential_solns(), &guess);
                let score = self.scorer.score_word(&solns[board], &guess);
                let remaining = histogram.remove(&score).ok_or_else(|| {
                    SolverError::InvalidInput(format!(
                        "answer '{}' is not a potential solution",
                        solns[board]
                    ))
                })?;
                game.update(i, board, &guess, score, remaining);
            }
            self.reporter.report_round(&game.scoreboard);

            if game.is_solved() {
                return Ok(game);
            }

            guess = match game.user_guess(i) {
                Some(word) => word,
                None => {
                    self.solver
                        .best_guess_word(&self.histogram_builder, all_words, &game)
                }
            };
        }

        Err(SolverError::FailedToFindASolution {
            iterations: max_iters,
        })
    }
}

fn opening_seed(size: usize) -> Result<Word, SolverError> {
    seed(size).ok_or_else(|| {
        SolverError::InvalidInput(format!("no opening seed for word length {size}"))
    })
}

#[cfg(test)]
mod tests {
    use super::{Engine, SimulEngine};
    use crate::errors::SolverError;
    use crate::histogram::HistogramBuilder;
    use crate::scoring::Scorer;
    use crate::simul::SimulSolver;
    use crate::solver::{Solver, SolverType};
    use crate::views::NullRunReporter;
    use crate::words::{Dictionary, Word, WordSeries};

    const COMMON: [&str; 8] = [
        "STICK", "SNAKE", "FLAME", "TOWER", "STAGE", "SHARE", "TOXIC", "CRANE",
    ];

    fn dictionary() -> Dictionary {
        let extras = ["MULCH", "RAISE", "LATER", "TRASH"];
        Dictionary {
            all_words: WordSeries::new(extras.iter().chain(COMMON.iter()).copied()),
            common_words: WordSeries::new(COMMON),
        }
    }

    fn engine(solver_type: SolverType) -> Engine {
        let dictionary = dictionary();
        let scorer = Scorer::new(5);
        let histogram_builder = HistogramBuilder::new(
            scorer.clone(),
            dictionary.all_words.clone(),
            dictionary.common_words.clone(),
            true,
        );
        Engine {
            dictionary,
            scorer,
            histogram_builder,
            solver: Solver::from_type(solver_type, 1),
            reporter: Box::new(NullRunReporter),
        }
    }

    #[test]
    fn engine_converges_from_a_cold_opening() {
        let sut = engine(SolverType::Minimax);
        let game = sut
            .run(&Word::new("STICK"), &[Word::new("MULCH")])
            .expect("the solver converges");

        assert!(game.is_solved);
        assert!(game.rounds() <= 20);
        let last = game.scoreboard.rows.last().expect("solved games have rows");
        assert_eq!(last.guess, Word::new("STICK"));
        assert_eq!(last.score, "22222");
    }

    #[test]
    fn engine_fails_when_guesses_never_converge() {
        let sut = engine(SolverType::Entropy);
        // Repeating a stale guess adds no information, round after round.
        let stale = vec![Word::new("MULCH"); 25];

        let err = sut.run(&Word::new("STICK"), &stale).unwrap_err();
        assert_eq!(err, SolverError::FailedToFindASolution { iterations: 20 });
    }

    #[test]
    fn engine_rejects_an_unknown_answer() {
        let sut = engine(SolverType::Minimax);
        let err = sut.run(&Word::new("QUIRK"), &[]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn six_letter_games_open_with_the_tailer_seed() {
        let common = ["TAILOR", "SAILOR", "WINTER", "MASTER", "SILVER", "GOLDEN"];
        let dictionary = Dictionary {
            all_words: WordSeries::new(common),
            common_words: WordSeries::new(common),
        };
        let scorer = Scorer::new(6);
        let histogram_builder = HistogramBuilder::new(
            scorer.clone(),
            dictionary.all_words.clone(),
            dictionary.common_words.clone(),
            true,
        );
        let sut = Engine {
            dictionary,
            scorer,
            histogram_builder,
            solver: Solver::from_type(SolverType::Minimax, 1),
            reporter: Box::new(NullRunReporter),
        };

        let game = sut.run(&Word::new("WINTER"), &[]).expect("converges");
        assert!(game.is_solved);
        assert_eq!(game.scoreboard.rows[0].guess, Word::new("TAILER"));
        // TAILER scores every fixture word differently, so round two wins.
        assert_eq!(game.rounds(), 2);
    }

    #[test]
    fn simul_engine_solves_every_board() {
        let dictionary = dictionary();
        let scorer = Scorer::new(5);
        let histogram_builder = HistogramBuilder::new(
            scorer.clone(),
            dictionary.all_words.clone(),
            dictionary.common_words.clone(),
            true,
        );
        let sut = SimulEngine {
            dictionary,
            scorer,
            histogram_builder,
            solver: SimulSolver::from_type(SolverType::Minimax),
            reporter: Box::new(NullRunReporter),
        };

        let solns = [
            Word::new("STICK"),
            Word::new("SNAKE"),
            Word::new("FLAME"),
            Word::new("TOWER"),
        ];
        let game = sut.run(&solns, &[]).expect("all boards converge");

        assert!(game.is_solved());
        assert!(game.rounds() <= 24);
        for (board, soln) in game.games().iter().zip(&solns) {
            let last = board.scoreboard.rows.last().expect("board played rounds");
            assert_eq!(&last.guess, soln);
        }
    }
}

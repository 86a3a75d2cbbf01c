use crate::game::SimultaneousGame;
use crate::guess::{EntropyGuess, MinimaxGuess, MinimaxSimulGuess};
use crate::histogram::HistogramBuilder;
use crate::solver::SolverType;
use crate::words::{Word, WordSeries};

/// Candidate sets of the boards still in play.
fn active_boards(game: &SimultaneousGame) -> Vec<&WordSeries> {
    game.games()
        .iter()
        .filter(|board| !board.is_solved)
        .map(|board| board.potential_solns())
        .collect()
}

/// Simultaneous solver using the minimax heuristic: every unsolved board
/// streams its depth-1 guesses over the same allowed list, and the per-word
/// summaries are folded into one composite guess.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimaxSimulSolver;

impl MinimaxSimulSolver {
    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        game: &SimultaneousGame,
    ) -> MinimaxSimulGuess {
        let boards = active_boards(game);

        // A board down to one candidate dictates the next guess: it solves
        // that board and still feeds information to the others.
        for solns in &boards {
            if solns.len() == 1 {
                return MinimaxSimulGuess::new(solns.at(0).clone(), true, 1.0, 1, 1, 1, 1);
            }
        }

        let mut streams: Vec<_> = boards
            .iter()
            .map(|solns| histogram_builder.stream::<MinimaxGuess>(all_words, solns))
            .collect();
        let board_sizes: Vec<f64> = boards.iter().map(|solns| solns.len() as f64).collect();

        let mut best: Option<MinimaxSimulGuess> = None;
        loop {
            let mut per_board = Vec::with_capacity(streams.len());
            for stream in streams.iter_mut() {
                match stream.next() {
                    Some(guess) => per_board.push(guess),
                    None => {
                        return best.expect("every stream yields one guess per allowed word");
                    }
                }
            }

            let candidate = combine_minimax(&per_board, &board_sizes);
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    if candidate.improves_upon(&current) {
                        candidate
                    } else {
                        current
                    }
                }
            });
        }
    }
}

fn combine_minimax(per_board: &[MinimaxGuess], board_sizes: &[f64]) -> MinimaxSimulGuess {
    let word = per_board[0].word.clone();
    let is_potential_soln = per_board.iter().any(|g| g.is_potential_soln);

    let mut pct_left = 1.0;
    let mut min = u32::MAX;
    let mut sum = 0u32;
    let mut max = 0u32;
    let mut num_buckets = 0u32;

    for (guess, &size) in per_board.iter().zip(board_sizes) {
        let largest = guess.size_of_largest_bucket;
        pct_left *= f64::from(largest) / size;
        min = min.min(largest);
        sum += largest;
        max = max.max(largest);
        num_buckets += guess.number_of_buckets;
    }

    MinimaxSimulGuess::new(word, is_potential_soln, pct_left, min, sum, max, num_buckets)
}

/// Simultaneous solver using the entropy heuristic: entropies are additive,
/// so the composite for a word is the sum of its per-board entropies.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropySimulSolver;

impl EntropySimulSolver {
    pub fn best_guess(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        game: &SimultaneousGame,
    ) -> EntropyGuess {
        let boards = active_boards(game);

        for solns in &boards {
            if solns.len() == 1 {
                return EntropyGuess::new(solns.at(0).clone(), true, 1.0, true);
            }
        }

        let mut streams: Vec<_> = boards
            .iter()
            .map(|solns| histogram_builder.stream::<EntropyGuess>(all_words, solns))
            .collect();

        let mut best: Option<EntropyGuess> = None;
        loop {
            let mut per_board = Vec::with_capacity(streams.len());
            for stream in streams.iter_mut() {
                match stream.next() {
                    Some(guess) => per_board.push(guess),
                    None => {
                        return best.expect("every stream yields one guess per allowed word");
                    }
                }
            }

            let candidate = combine_entropy(&per_board);
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    if candidate.improves_upon(&current) {
                        candidate
                    } else {
                        current
                    }
                }
            });
        }
    }
}

fn combine_entropy(per_board: &[EntropyGuess]) -> EntropyGuess {
    let word = per_board[0].word.clone();
    let is_potential_soln = per_board.iter().any(|g| g.is_potential_soln);
    let entropy = per_board.iter().map(|g| g.entropy).sum();
    let is_perfect_partition = per_board.iter().all(|g| g.is_perfect_partition);
    EntropyGuess::new(word, is_potential_soln, entropy, is_perfect_partition)
}

/// Either simultaneous solver, as wired by the factory.
#[derive(Clone, Copy, Debug)]
pub enum SimulSolver {
    Minimax(MinimaxSimulSolver),
    Entropy(EntropySimulSolver),
}

impl SimulSolver {
    pub fn from_type(solver_type: SolverType) -> SimulSolver {
        match solver_type {
            SolverType::Minimax => SimulSolver::Minimax(MinimaxSimulSolver),
            SolverType::Entropy => SimulSolver::Entropy(EntropySimulSolver),
        }
    }

    pub fn best_guess_word(
        &self,
        histogram_builder: &HistogramBuilder,
        all_words: &WordSeries,
        game: &SimultaneousGame,
    ) -> Word {
        match self {
            SimulSolver::Minimax(solver) => {
                solver.best_guess(histogram_builder, all_words, game).word
            }
            SimulSolver::Entropy(solver) => {
                solver.best_guess(histogram_builder, all_words, game).word
            }
        }
    }
}

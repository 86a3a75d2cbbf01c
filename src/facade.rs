use std::path::Path;

use crate::engine::{Engine, SimulEngine};
use crate::errors::SolverError;
use crate::factory::{create_engine, create_simul_engine};
use crate::game::Scoreboard;
use crate::solver::SolverType;
use crate::views::NullRunReporter;
use crate::words::{load_dictionary, Dictionary, Word};

/// High-level entry point: load the dictionaries once, then play any number
/// of games against known answers. Library counterpart of the `run`
/// subcommand.
pub struct Quibble {
    size: usize,
    engine: Engine,
    simul_engine: SimulEngine,
}

impl Quibble {
    /// Extra words are merged into the dictionaries up front, so unofficial
    /// answers and openers never abort a game later.
    pub fn new(
        dict_dir: &Path,
        size: usize,
        solver_type: SolverType,
        depth: usize,
        extras: &[Word],
    ) -> Result<Quibble, SolverError> {
        let dictionary = load_dictionary(dict_dir, size, extras)
            .map_err(|e| SolverError::InvalidInput(e.to_string()))?;
        Ok(Quibble::with_dictionary(dictionary, solver_type, depth))
    }

    pub fn with_dictionary(
        dictionary: Dictionary,
        solver_type: SolverType,
        depth: usize,
    ) -> Quibble {
        let size = dictionary.word_length();
        let engine = create_engine(
            dictionary.clone(),
            solver_type,
            depth,
            true,
            Box::new(NullRunReporter),
        );
        let simul_engine = create_simul_engine(
            dictionary,
            solver_type,
            depth,
            true,
            Box::new(NullRunReporter),
        );
        Quibble {
            size,
            engine,
            simul_engine,
        }
    }

    pub fn word_length(&self) -> usize {
        self.size
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.engine.dictionary
    }

    /// Play one board per answer with a shared opening-guess list and
    /// return the scoreboard: the per-game board for a single answer, the
    /// interleaved shared board otherwise.
    pub fn play(&self, answers: &[Word], guesses: &[Word]) -> Result<Scoreboard, SolverError> {
        self.check_lengths(answers, "answer")?;
        self.check_lengths(guesses, "guess")?;
        self.check_known(answers, &self.engine.dictionary)?;

        if answers.len() == 1 {
            let game = self.engine.run(&answers[0], guesses)?;
            return Ok(game.scoreboard);
        }

        let simul_game = self.simul_engine.run(answers, guesses)?;
        Ok(simul_game.scoreboard)
    }

    fn check_lengths(&self, words: &[Word], label: &str) -> Result<(), SolverError> {
        let missized: Vec<&Word> = words.iter().filter(|w| w.len() != self.size).collect();
        if missized.is_empty() {
            return Ok(());
        }
        let listed = missized
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(SolverError::InvalidInput(format!(
            "every {label} must be {} letters long: {listed}",
            self.size
        )))
    }

    fn check_known(&self, answers: &[Word], dictionary: &Dictionary) -> Result<(), SolverError> {
        let unknown: Vec<&Word> = answers
            .iter()
            .filter(|w| !dictionary.common_words.contains(w))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        let listed = unknown
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(SolverError::InvalidInput(format!(
            "unknown answers: {listed}; pass them as extras when constructing the solver"
        )))
    }
}

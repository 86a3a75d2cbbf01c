use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use quibble::controllers::{HideController, SolveController};
use quibble::errors::SolverError;
use quibble::factory::{
    create_benchmarker, create_engine, create_models, create_simul_benchmarker,
    create_simul_engine,
};
use quibble::solver::SolverType;
use quibble::views::{ConsoleRunReporter, HideView, SolveView};
use quibble::words::{load_dictionary, Word};

#[derive(Parser)]
#[command(name = "quibble", about = "A Wordle-family solver", version)]
struct Cli {
    /// Directory holding the dictionary JSON files.
    #[arg(long, global = true, default_value = "dictionaries")]
    dict_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive solver guided by your reported scores.
    Solve {
        /// Opening guess; its length sets the game size.
        #[arg(long)]
        guess: Option<String>,
        /// Word length when no opening guess is given.
        #[arg(long, default_value_t = 5)]
        size: usize,
        #[arg(long, value_enum, default_value_t = SolverType::Minimax)]
        solver: SolverType,
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
    /// Adversarial mode: the most evasive partition wins.
    Hide {
        #[arg(long)]
        guess: Option<String>,
        #[arg(long, default_value_t = 5)]
        size: usize,
    },
    /// Simulate one game (or several simultaneous boards) with known answers.
    Run {
        /// Answer word, or a comma-separated list for simultaneous boards.
        #[arg(long)]
        answer: String,
        /// Opening guess(es), comma-separated.
        #[arg(long)]
        guess: Option<String>,
        #[arg(long, value_enum, default_value_t = SolverType::Minimax)]
        solver: SolverType,
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
    /// Benchmark the solver over every answer in the dictionary.
    Benchmark {
        /// Opening guess(es), comma-separated.
        #[arg(long)]
        guess: Option<String>,
        #[arg(long, default_value_t = 5)]
        size: usize,
        #[arg(long, value_enum, default_value_t = SolverType::Minimax)]
        solver: SolverType,
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Number of boards played simultaneously per game.
        #[arg(long, default_value_t = 1)]
        simul: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Solve {
            guess,
            size,
            solver,
            depth,
        } => {
            let (size, extras) = sized_extras(guess.as_deref(), size)?;
            let dictionary = load_dictionary(&cli.dict_dir, size, &extras)?;
            let (scorer, histogram_builder, solver, _) =
                create_models(&dictionary, solver, depth, true);
            let controller = SolveController {
                view: SolveView::new(size),
                dictionary,
                scorer,
                histogram_builder,
                solver,
            };
            controller.solve(extras.first().cloned())
        }

        Command::Hide { guess, size } => {
            let (size, extras) = sized_extras(guess.as_deref(), size)?;
            let dictionary = load_dictionary(&cli.dict_dir, size, &extras)?;
            let (scorer, histogram_builder, _, _) =
                create_models(&dictionary, SolverType::Minimax, 1, true);
            let mut controller = HideController {
                view: HideView::new(size),
                dictionary,
                scorer,
                histogram_builder,
            };
            controller.hide(extras.first().cloned())
        }

        Command::Run {
            answer,
            guess,
            solver,
            depth,
        } => {
            let answers = split_words(&answer)?;
            let size = answers[0].len();
            let guesses = match guess.as_deref() {
                Some(list) => split_words(list)?,
                None => Vec::new(),
            };

            let mut extras = answers.clone();
            extras.extend(guesses.iter().cloned());
            let dictionary = load_dictionary(&cli.dict_dir, size, &extras)?;
            let reporter = Box::new(ConsoleRunReporter::new(size));

            if answers.len() == 1 {
                let engine = create_engine(dictionary, solver, depth, true, reporter);
                engine.run(&answers[0], &guesses)?;
            } else {
                let engine = create_simul_engine(dictionary, solver, depth, true, reporter);
                engine.run(&answers, &guesses)?;
            }
            Ok(())
        }

        Command::Benchmark {
            guess,
            size,
            solver,
            depth,
            simul,
        } => {
            let guesses = match guess.as_deref() {
                Some(list) => split_words(list)?,
                None => Vec::new(),
            };
            let size = guesses.first().map_or(size, Word::len);
            let dictionary = load_dictionary(&cli.dict_dir, size, &guesses)?;

            if simul <= 1 {
                let benchmarker = create_benchmarker(dictionary, solver, depth);
                benchmarker.run_benchmark(&guesses)?;
            } else {
                let benchmarker = create_simul_benchmarker(dictionary, solver, depth);
                benchmarker.run_benchmark(&guesses, simul, 1_000)?;
            }
            Ok(())
        }
    }
}

/// Resolve the game size from an optional opening guess, validating it.
fn sized_extras(guess: Option<&str>, size: usize) -> Result<(usize, Vec<Word>), SolverError> {
    match guess {
        None => Ok((size, Vec::new())),
        Some(raw) => {
            let size = raw.trim().len();
            let word = Word::parse(raw, size).ok_or_else(|| {
                SolverError::InvalidInput(format!("'{raw}' is not a playable word"))
            })?;
            Ok((size, vec![word]))
        }
    }
}

/// Parse a comma-separated word list; every word must share one length.
fn split_words(list: &str) -> Result<Vec<Word>, SolverError> {
    let tokens: Vec<&str> = list.split(',').map(str::trim).collect();
    let size = tokens.first().map_or(0, |t| t.len());

    tokens
        .iter()
        .map(|token| {
            Word::parse(token, size).ok_or_else(|| {
                SolverError::InvalidInput(format!("'{token}' is not a {size}-letter word"))
            })
        })
        .collect()
}

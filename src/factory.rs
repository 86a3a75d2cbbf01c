use crate::benchmark::{Benchmarker, ConsoleBenchmarkReporter, SimulBenchmarker};
use crate::engine::{Engine, SimulEngine};
use crate::histogram::HistogramBuilder;
use crate::scoring::Scorer;
use crate::simul::SimulSolver;
use crate::solver::{Solver, SolverType};
use crate::views::{NullRunReporter, RunReporter};
use crate::words::Dictionary;

/// Wire up the models shared by every entry point: the scorer, the
/// histogram builder over the dictionary, and the solvers.
pub fn create_models(
    dictionary: &Dictionary,
    solver_type: SolverType,
    depth: usize,
    lazy_eval: bool,
) -> (Scorer, HistogramBuilder, Solver, SimulSolver) {
    let scorer = Scorer::new(dictionary.word_length());
    let histogram_builder = HistogramBuilder::new(
        scorer.clone(),
        dictionary.all_words.clone(),
        dictionary.common_words.clone(),
        lazy_eval,
    );
    let solver = Solver::from_type(solver_type, depth);
    let simul_solver = SimulSolver::from_type(solver_type);
    (scorer, histogram_builder, solver, simul_solver)
}

pub fn create_engine(
    dictionary: Dictionary,
    solver_type: SolverType,
    depth: usize,
    lazy_eval: bool,
    reporter: Box<dyn RunReporter>,
) -> Engine {
    let (scorer, histogram_builder, solver, _) =
        create_models(&dictionary, solver_type, depth, lazy_eval);
    Engine {
        dictionary,
        scorer,
        histogram_builder,
        solver,
        reporter,
    }
}

pub fn create_simul_engine(
    dictionary: Dictionary,
    solver_type: SolverType,
    depth: usize,
    lazy_eval: bool,
    reporter: Box<dyn RunReporter>,
) -> SimulEngine {
    let (scorer, histogram_builder, _, simul_solver) =
        create_models(&dictionary, solver_type, depth, lazy_eval);
    SimulEngine {
        dictionary,
        scorer,
        histogram_builder,
        solver: simul_solver,
        reporter,
    }
}

/// Benchmarkers precompute the matrix eagerly and keep per-round output
/// quiet; only the aggregate report is printed.
pub fn create_benchmarker(
    dictionary: Dictionary,
    solver_type: SolverType,
    depth: usize,
) -> Benchmarker {
    let engine = create_engine(
        dictionary,
        solver_type,
        depth,
        false,
        Box::new(NullRunReporter),
    );
    Benchmarker {
        engine,
        reporter: Box::new(ConsoleBenchmarkReporter),
    }
}

pub fn create_simul_benchmarker(
    dictionary: Dictionary,
    solver_type: SolverType,
    depth: usize,
) -> SimulBenchmarker {
    let engine = create_simul_engine(
        dictionary,
        solver_type,
        depth,
        false,
        Box::new(NullRunReporter),
    );
    SimulBenchmarker {
        engine,
        reporter: Box::new(ConsoleBenchmarkReporter),
    }
}

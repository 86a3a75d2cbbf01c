//! A Wordle-family decision engine.
//!
//! Given a hidden target word of fixed length, the engine proposes guesses
//! and narrows a candidate set from the colour feedback until the target is
//! identified. The hot path is the ternary scoring kernel and the dense
//! score matrix behind it; on top sit histogram-driven minimax and entropy
//! solvers (with one-ply lookahead variants), a simultaneous-board solver,
//! the game loop, parallel benchmarking, and an optimal decision-tree
//! builder.

pub mod benchmark;
pub mod controllers;
pub mod engine;
pub mod errors;
pub mod facade;
pub mod factory;
pub mod game;
pub mod guess;
pub mod histogram;
pub mod scoring;
pub mod simul;
pub mod solver;
pub mod tree;
pub mod views;
pub mod words;

pub use benchmark::{Benchmark, Benchmarker, SimulBenchmarker};
pub use engine::{Engine, SimulEngine};
pub use errors::SolverError;
pub use facade::Quibble;
pub use game::{Game, Scoreboard, ScoreboardRow, SimultaneousGame};
pub use histogram::{HistogramBuilder, ScoreMatrix};
pub use scoring::{from_ternary, to_ternary, Score, Scorer};
pub use solver::{Solver, SolverType};
pub use tree::{GuessNode, TreeBuilder};
pub use words::{load_dictionary, Dictionary, Word, WordSeries};

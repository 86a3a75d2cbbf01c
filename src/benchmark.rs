use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engine::{Engine, SimulEngine};
use crate::errors::SolverError;
use crate::game::Scoreboard;
use crate::scoring::{to_ternary, Scorer};
use crate::words::{Dictionary, Word};

/// Fixed seed for simultaneous benchmark sampling, so benchmark outputs are
/// reproducible across runs.
pub const SIMUL_BENCHMARK_SEED: u64 = 13;

/// Minimum work-unit size handed to a benchmark worker.
const CHUNK_SIZE: usize = 20;

/// Aggregate result of a benchmark run: the opening guesses, a histogram of
/// rounds-to-solve, and one scoreboard per game.
#[derive(Clone, Debug, PartialEq)]
pub struct Benchmark {
    pub guesses: Vec<Word>,
    pub histogram: BTreeMap<usize, usize>,
    pub scoreboards: Vec<Scoreboard>,
}

impl Benchmark {
    pub fn new(
        guesses: Vec<Word>,
        histogram: BTreeMap<usize, usize>,
        scoreboards: Vec<Scoreboard>,
    ) -> Self {
        Benchmark {
            guesses,
            histogram,
            scoreboards,
        }
    }

    pub fn num_games(&self) -> usize {
        self.histogram.values().sum()
    }

    pub fn num_guesses(&self) -> usize {
        self.histogram.iter().map(|(k, v)| k * v).sum()
    }

    pub fn mean(&self) -> f64 {
        self.num_guesses() as f64 / self.num_games() as f64
    }

    /// Population standard deviation of rounds-to-solve.
    pub fn std(&self) -> f64 {
        let n = self.num_games() as f64;
        let mean = self.mean();
        let mean_x_squared: f64 = self
            .histogram
            .iter()
            .map(|(&k, &v)| (k * k * v) as f64)
            .sum::<f64>()
            / n;
        (mean_x_squared - mean * mean).sqrt()
    }

    /// The explicit opening guess if one was supplied, else the first guess
    /// actually played.
    pub fn opening_guess(&self) -> Option<Word> {
        if let Some(first) = self.guesses.first() {
            return Some(first.clone());
        }
        self.scoreboards
            .first()
            .and_then(|scoreboard| scoreboard.rows.first())
            .map(|row| row.guess.clone())
    }

    /// Serialise in WordleBot form: one line per game, a comma-separated
    /// list of guesses, the final guess being the solution.
    pub fn build_csv(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.scoreboards.len());
        for scoreboard in &self.scoreboards {
            let guesses: Vec<&str> = scoreboard.rows.iter().map(|row| row.guess.as_str()).collect();
            lines.push(guesses.join(","));
        }
        lines.join("\n")
    }

    pub fn to_csv(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.build_csv() + "\n")
    }

    pub fn read_csv(
        path: &Path,
        dictionary: &Dictionary,
        validate: bool,
    ) -> Result<Benchmark, SolverError> {
        let text = fs::read_to_string(path)
            .map_err(|e| SolverError::InvalidInput(format!("{}: {e}", path.display())))?;
        Benchmark::from_csv(&text, dictionary, validate)
    }

    /// Rebuild a benchmark from WordleBot lines from first principles:
    /// score each guess against the final word and recompute the surviving
    /// candidates round by round.
    pub fn from_csv(
        text: &str,
        dictionary: &Dictionary,
        validate: bool,
    ) -> Result<Benchmark, SolverError> {
        let size = dictionary.word_length();
        let scorer = Scorer::new(size);

        let mut scoreboards: Vec<Scoreboard> = Vec::new();
        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();

        for (line_no, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut guesses: Vec<Word> = Vec::new();
            for token in trimmed.split(',') {
                let word = Word::parse(token, size).ok_or_else(|| {
                    SolverError::InvalidWordleBotFile(format!(
                        "line {}: '{token}' is not a {size}-letter word",
                        line_no + 1
                    ))
                })?;
                guesses.push(word);
            }

            let soln = guesses.last().cloned().ok_or_else(|| {
                SolverError::InvalidWordleBotFile(format!("line {}: empty game", line_no + 1))
            })?;

            let mut scoreboard = Scoreboard::new();
            let mut candidates = dictionary.common_words.clone();
            for (i, guess) in guesses.iter().enumerate() {
                let score = scorer.score_word(&soln, guess);
                let surviving: Vec<usize> = (0..candidates.len())
                    .filter(|&pos| scorer.score_word(candidates.at(pos), guess) == score)
                    .collect();
                candidates = candidates.select(&surviving);
                scoreboard.add_row(
                    i + 1,
                    Some(&soln),
                    guess.clone(),
                    to_ternary(score, size),
                    candidates.len(),
                );
            }

            *histogram.entry(guesses.len()).or_insert(0) += 1;
            scoreboards.push(scoreboard);
        }

        if validate {
            validate_determinism(&scoreboards)?;
        }

        Ok(Benchmark::new(Vec::new(), histogram, scoreboards))
    }
}

/// A deterministic solver must make the same guess after identical score
/// paths. Two games whose score prefixes agree but whose next guesses
/// differ cannot have come from one solver.
fn validate_determinism(scoreboards: &[Scoreboard]) -> Result<(), SolverError> {
    let mut guess_by_prefix: HashMap<String, &Word> = HashMap::new();

    for scoreboard in scoreboards {
        let mut prefix = String::new();
        for row in &scoreboard.rows {
            match guess_by_prefix.get(prefix.as_str()) {
                None => {
                    guess_by_prefix.insert(prefix.clone(), &row.guess);
                }
                Some(&seen) if *seen == row.guess => {}
                Some(&seen) => {
                    return Err(SolverError::InvalidWordleBotFile(format!(
                        "after score path [{prefix}] one game plays {seen} and another plays {}",
                        row.guess
                    )));
                }
            }
            prefix.push_str(&row.score);
            prefix.push('-');
        }
    }

    Ok(())
}

/// Reporter for finished benchmarks.
pub trait BenchmarkReporter: Send + Sync {
    fn display(&self, benchmark: &Benchmark);
}

pub struct NullBenchmarkReporter;

impl BenchmarkReporter for NullBenchmarkReporter {
    fn display(&self, _benchmark: &Benchmark) {}
}

pub struct ConsoleBenchmarkReporter;

impl BenchmarkReporter for ConsoleBenchmarkReporter {
    fn display(&self, benchmark: &Benchmark) {
        println!("{}", BenchmarkPrinter.build_string(benchmark));
    }
}

/// Benchmarks an engine over every possible answer in parallel.
pub struct Benchmarker {
    pub engine: Engine,
    pub reporter: Box<dyn BenchmarkReporter>,
}

impl Benchmarker {
    pub fn run_benchmark(&self, user_guesses: &[Word]) -> Result<Benchmark, SolverError> {
        // Fill the matrix once up front; the workers only read it.
        self.engine.histogram_builder.score_matrix().precompute_all();

        let solns = &self.engine.dictionary.common_words;
        let games: Result<Vec<_>, SolverError> = solns
            .words()
            .par_iter()
            .with_min_len(CHUNK_SIZE)
            .map(|soln| self.engine.run(soln, user_guesses))
            .collect();

        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        let mut scoreboards = Vec::with_capacity(solns.len());
        for game in games? {
            *histogram.entry(game.rounds()).or_insert(0) += 1;
            scoreboards.push(game.scoreboard);
        }

        let benchmark = Benchmark::new(user_guesses.to_vec(), histogram, scoreboards);
        self.reporter.display(&benchmark);
        Ok(benchmark)
    }
}

/// Benchmarks a simultaneous engine over randomly sampled answer tuples.
pub struct SimulBenchmarker {
    pub engine: SimulEngine,
    pub reporter: Box<dyn BenchmarkReporter>,
}

impl SimulBenchmarker {
    pub fn run_benchmark(
        &self,
        user_guesses: &[Word],
        num_simul: usize,
        num_runs: usize,
    ) -> Result<Benchmark, SolverError> {
        let mut rng = StdRng::seed_from_u64(SIMUL_BENCHMARK_SEED);
        let common = &self.engine.dictionary.common_words;

        let soln_tuples: Vec<Vec<Word>> = (0..num_runs)
            .map(|_| {
                (0..num_simul)
                    .map(|_| common.at(rng.gen_range(0..common.len())).clone())
                    .collect()
            })
            .collect();

        self.engine.histogram_builder.score_matrix().precompute_all();

        let games: Result<Vec<_>, SolverError> = soln_tuples
            .par_iter()
            .with_min_len(CHUNK_SIZE)
            .map(|solns| self.engine.run(solns, user_guesses))
            .collect();

        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        let mut scoreboards = Vec::with_capacity(num_runs);
        for game in games? {
            *histogram.entry(game.rounds()).or_insert(0) += 1;
            scoreboards.push(game.scoreboard);
        }

        let benchmark = Benchmark::new(user_guesses.to_vec(), histogram, scoreboards);
        self.reporter.display(&benchmark);
        Ok(benchmark)
    }
}

/// Renders a benchmark as a star chart plus summary statistics.
pub struct BenchmarkPrinter;

impl BenchmarkPrinter {
    const CHART_WIDTH: usize = 50;

    pub fn build_string(&self, benchmark: &Benchmark) -> String {
        let chart = self.bar_chart(&benchmark.histogram);
        let stats = self.describe(benchmark);
        format!("{chart}\n\n{stats}")
    }

    pub fn describe(&self, benchmark: &Benchmark) -> String {
        let guess = if benchmark.guesses.is_empty() {
            benchmark
                .opening_guess()
                .map_or_else(|| "-".to_string(), |word| word.to_string())
        } else {
            benchmark
                .guesses
                .iter()
                .map(Word::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };

        format!(
            "Guess:    {guess}\n\
             Games:    {}\n\
             Guesses:  {}\n\
             Mean:     {:.3}\n\
             Std:      {:.3}",
            group_thousands(benchmark.num_games()),
            group_thousands(benchmark.num_guesses()),
            benchmark.mean(),
            benchmark.std(),
        )
    }

    pub fn bar_chart(&self, histogram: &BTreeMap<usize, usize>) -> String {
        let Some(&worst_score) = histogram.keys().max() else {
            return String::new();
        };
        let largest = histogram.values().copied().max().unwrap_or(0);
        let increment = largest as f64 / Self::CHART_WIDTH as f64;

        let stars: Vec<String> = (1..=worst_score)
            .map(|rounds| {
                let value = histogram.get(&rounds).copied().unwrap_or(0);
                let num = (value as f64 / increment).round() as usize;
                "*".repeat(num)
            })
            .collect();

        let max_stars = stars.iter().map(String::len).max().unwrap_or(0);

        let mut rows: Vec<String> = Vec::with_capacity(stars.len());
        for (i, star) in stars.iter().enumerate() {
            let value = histogram.get(&(i + 1)).copied().unwrap_or(0);
            let counts = format!("{:>9}", format!("({})", group_thousands(value)));
            rows.push(format!("{} | {:<max_stars$}{counts}", i + 1, star));
        }

        rows.join("\n")
    }
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

use std::io::{self, Write};

use crate::game::Scoreboard;
use crate::scoring::{from_ternary, Score};
use crate::words::Word;

/// Sink for per-round progress. The core only ever hands over the
/// scoreboard; rendering beyond this plain table is someone else's job.
pub trait RunReporter: Send + Sync {
    fn report_round(&self, scoreboard: &Scoreboard);
}

/// Reporter that swallows everything; used by benchmarks.
pub struct NullRunReporter;

impl RunReporter for NullRunReporter {
    fn report_round(&self, _scoreboard: &Scoreboard) {}
}

/// Reporter that prints each round as it lands.
pub struct ConsoleRunReporter {
    printer: ScoreboardPrinter,
}

impl ConsoleRunReporter {
    pub fn new(size: usize) -> Self {
        ConsoleRunReporter {
            printer: ScoreboardPrinter::new(size),
        }
    }
}

impl RunReporter for ConsoleRunReporter {
    fn report_round(&self, scoreboard: &Scoreboard) {
        self.printer.print_last_round(scoreboard);
    }
}

/// Plain-text scoreboard table.
pub struct ScoreboardPrinter {
    size: usize,
}

impl ScoreboardPrinter {
    pub fn new(size: usize) -> Self {
        ScoreboardPrinter { size }
    }

    pub fn print(&self, scoreboard: &Scoreboard) {
        println!("{}", self.build_string(scoreboard));
    }

    /// Print only the most recent round; emits the header on round one and
    /// a divider between rounds of a simultaneous game.
    pub fn print_last_round(&self, scoreboard: &Scoreboard) {
        let Some(last) = scoreboard.rows.last() else {
            return;
        };

        if last.n == 1 {
            println!("{}", self.build_header());
        } else if scoreboard.rows.iter().filter(|row| row.n == 1).count() > 1 {
            println!("{}", self.build_divider());
        }

        for row in scoreboard.rows.iter().filter(|row| row.n == last.n) {
            println!("{}", self.build_row(row));
        }
    }

    pub fn build_string(&self, scoreboard: &Scoreboard) -> String {
        let mut lines = vec![self.build_header()];
        for row in scoreboard.iter() {
            lines.push(self.build_row(row));
        }
        lines.join("\n")
    }

    fn pad(&self) -> String {
        " ".repeat(self.size.saturating_sub(5))
    }

    pub fn build_header(&self) -> String {
        let spacing = self.pad();
        format!(
            "\n| # | Soln.{spacing} | Guess{spacing} | Score{spacing} | Poss.{spacing} |\n{}",
            self.build_divider()
        )
    }

    fn build_divider(&self) -> String {
        let dashes = "-".repeat(self.size.saturating_sub(5));
        format!("|---|-------{dashes}|-------{dashes}|-------{dashes}|-------{dashes}|")
    }

    fn build_row(&self, row: &crate::game::ScoreboardRow) -> String {
        let n = format!("{:>2}", row.n);
        let padding = " ".repeat(5usize.saturating_sub(self.size));
        let num_left = if row.guess == row.soln {
            " ".to_string()
        } else {
            row.num_left.to_string()
        };
        let num_left = format!("{:>width$}", num_left, width = self.size.max(5));

        format!(
            "|{n} | {}{padding} | {}{padding} | {}{padding} | {num_left} |",
            row.soln, row.guess, row.score
        )
    }
}

/// A parsed response to "enter the score for GUESS".
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoreResponse {
    /// A bare ternary string, scoring the proposed guess.
    Score(Score),
    /// `WORD=STRING`: the user played a different word and reports its score.
    Override { word: Word, score: Score },
}

/// Parse the user-scored input grammar: either a bare base-3 string of
/// length `size`, or `WORD=STRING` overriding the proposed guess.
pub fn parse_score_response(input: &str, size: usize) -> Option<ScoreResponse> {
    let sanitized = input.trim().replace(' ', "").to_ascii_uppercase();

    if sanitized.len() == size {
        return from_ternary(&sanitized).map(ScoreResponse::Score);
    }

    if sanitized.len() == 2 * size + 1 {
        let (word_part, rest) = sanitized.split_at(size);
        let score_part = rest.strip_prefix('=')?;
        let word = Word::parse(word_part, size)?;
        let score = from_ternary(score_part)?;
        return Some(ScoreResponse::Override { word, score });
    }

    None
}

/// Prompts for the interactive `solve` subcommand.
pub struct SolveView {
    size: usize,
}

impl SolveView {
    pub fn new(size: usize) -> Self {
        SolveView { size }
    }

    /// Ask the user to score a guess, re-prompting until the input parses.
    /// Returns `None` on EOF.
    pub fn get_user_score(&self, guess: &Word) -> io::Result<Option<(Score, Word)>> {
        loop {
            println!("Enter score for {guess}:");
            let Some(line) = read_line_trimmed()? else {
                return Ok(None);
            };
            match parse_score_response(&line, self.size) {
                Some(ScoreResponse::Score(score)) => return Ok(Some((score, guess.clone()))),
                Some(ScoreResponse::Override { word, score }) => {
                    return Ok(Some((score, word)));
                }
                None => {
                    println!(
                        "Please enter {} digits from 0-2, or WORD=SCORE to override the guess.",
                        self.size
                    );
                }
            }
        }
    }

    pub fn report_best_guess(&self, best_guess: &Word) {
        println!("\nThe best guess is {best_guess}");
    }

    pub fn report_success(&self) {
        println!("\nGreat success!");
    }

    pub fn report_no_solution(&self) {
        println!("\nNo known words are consistent with those scores.");
    }
}

/// Prompts and board display for the adversarial `hide` subcommand.
pub struct HideView {
    size: usize,
    printer: ScoreboardPrinter,
    pub scoreboard: Scoreboard,
}

impl HideView {
    pub fn new(size: usize) -> Self {
        HideView {
            size,
            printer: ScoreboardPrinter::new(size),
            scoreboard: Scoreboard::new(),
        }
    }

    /// Ask for the user's next guess, re-prompting until it parses.
    /// Returns `None` on EOF.
    pub fn get_user_guess(&self) -> io::Result<Option<Word>> {
        loop {
            println!("Please enter your guess:");
            let Some(line) = read_line_trimmed()? else {
                return Ok(None);
            };
            match Word::parse(&line, self.size) {
                Some(word) => return Ok(Some(word)),
                None => println!("Please enter a {}-letter word.", self.size),
            }
        }
    }

    pub fn update(
        &mut self,
        n: usize,
        guess: &Word,
        score_str: String,
        num_left: usize,
        soln: Option<&Word>,
    ) {
        self.scoreboard
            .add_row(n, soln, guess.clone(), score_str, num_left);
        self.printer.print(&self.scoreboard);
    }

    pub fn report_success(&self) {
        println!("You win!");
    }
}

/// Read one line from stdin; `None` on EOF.
pub fn read_line_trimmed() -> io::Result<Option<String>> {
    let _ = io::stdout().flush();
    let mut s = String::new();
    let n = io::stdin().read_line(&mut s)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_score_response, ScoreResponse, ScoreboardPrinter};
    use crate::game::Scoreboard;
    use crate::words::Word;

    #[test]
    fn bare_ternary_scores_the_proposed_guess() {
        assert_eq!(
            parse_score_response("20100", 5),
            Some(ScoreResponse::Score(171))
        );
        assert_eq!(
            parse_score_response(" 2 0 1 0 0 ", 5),
            Some(ScoreResponse::Score(171))
        );
    }

    #[test]
    fn word_equals_score_overrides_the_guess() {
        assert_eq!(
            parse_score_response("crate=20100", 5),
            Some(ScoreResponse::Override {
                word: Word::new("CRATE"),
                score: 171,
            })
        );
    }

    #[test]
    fn malformed_responses_are_rejected() {
        assert_eq!(parse_score_response("20103", 5), None);
        assert_eq!(parse_score_response("2010", 5), None);
        assert_eq!(parse_score_response("CRATE-20100", 5), None);
        assert_eq!(parse_score_response("CRAT3=20100", 5), None);
    }

    #[test]
    fn printer_blanks_the_count_on_the_winning_row() {
        let mut scoreboard = Scoreboard::new();
        scoreboard.add_row(1, Some(&Word::new("STICK")), Word::new("RAISE"), "00100".into(), 12);
        scoreboard.add_row(2, Some(&Word::new("STICK")), Word::new("STICK"), "22222".into(), 1);

        let printer = ScoreboardPrinter::new(5);
        let text = printer.build_string(&scoreboard);

        assert!(text.contains("| Soln. | Guess | Score | Poss. |"));
        assert!(text.contains("RAISE"));
        let winning_line = text.lines().last().expect("two rows rendered");
        assert!(!winning_line.contains('1'), "count is blanked when guess == soln: {winning_line}");
    }
}

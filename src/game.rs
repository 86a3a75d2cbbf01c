use crate::scoring::{to_ternary, Score};
use crate::words::{Word, WordSeries};

/// One round of one board: `(n, soln, guess, score, num_left)`.
/// The score is kept in its ternary string form for display and CSV work.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreboardRow {
    pub n: usize,
    pub soln: Word,
    pub guess: Word,
    pub score: String,
    pub num_left: usize,
}

/// The ordered record of rounds played.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Scoreboard {
    pub rows: Vec<ScoreboardRow>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard::default()
    }

    pub fn add_row(
        &mut self,
        n: usize,
        soln: Option<&Word>,
        guess: Word,
        score: String,
        num_left: usize,
    ) -> &ScoreboardRow {
        let answer = soln
            .cloned()
            .unwrap_or_else(|| Word::unknown(guess.len()));
        self.rows.push(ScoreboardRow {
            n,
            soln: answer,
            guess,
            score,
            num_left,
        });
        self.rows.last().expect("row was just pushed")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreboardRow> {
        self.rows.iter()
    }

    /// Split an interleaved simultaneous board into one scoreboard per
    /// solution, in first-appearance order.
    pub fn many(&self) -> Vec<Scoreboard> {
        let mut order: Vec<Word> = Vec::new();
        let mut boards: Vec<Scoreboard> = Vec::new();
        for row in &self.rows {
            let at = match order.iter().position(|soln| soln == &row.soln) {
                Some(at) => at,
                None => {
                    order.push(row.soln.clone());
                    boards.push(Scoreboard::new());
                    boards.len() - 1
                }
            };
            boards[at].rows.push(row.clone());
        }
        boards
    }
}

/// Mutable state of a single board: the surviving candidates, the hidden
/// solution (if known), and the rounds played so far.
#[derive(Clone, Debug)]
pub struct Game {
    potential_solns: WordSeries,
    soln: Option<Word>,
    user_guesses: Vec<Word>,
    pub scoreboard: Scoreboard,
    pub is_solved: bool,
    word_length: usize,
}

impl Game {
    pub fn new(potential_solns: WordSeries, soln: Option<Word>, user_guesses: Vec<Word>) -> Self {
        let word_length = potential_solns.word_length();
        Game {
            potential_solns,
            soln,
            user_guesses,
            scoreboard: Scoreboard::new(),
            is_solved: false,
            word_length,
        }
    }

    pub fn potential_solns(&self) -> &WordSeries {
        &self.potential_solns
    }

    pub fn soln(&self) -> Option<&Word> {
        self.soln.as_ref()
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn num_potential_solns(&self) -> usize {
        self.potential_solns.len()
    }

    /// The user-supplied opening guess for round `i`, if any. Rounds are
    /// zero-indexed here: `user_guess(0)` seeds the first round.
    pub fn user_guess(&self, i: usize) -> Option<Word> {
        self.user_guesses.get(i).cloned()
    }

    /// Rounds played so far; the `n` of the last row.
    pub fn rounds(&self) -> usize {
        self.scoreboard.rows.last().map_or(0, |row| row.n)
    }

    /// Record a round: replace the candidate set, append a scoreboard row,
    /// and mark the game solved on an all-green score.
    pub fn update(
        &mut self,
        n: usize,
        guess: &Word,
        score: Score,
        potential_solns: WordSeries,
    ) -> &ScoreboardRow {
        debug_assert!(!self.is_solved, "a solved game receives no further updates");

        let ternary = to_ternary(score, self.word_length);
        self.is_solved = ternary.bytes().all(|b| b == b'2');
        let num_left = potential_solns.len();
        self.potential_solns = potential_solns;
        self.scoreboard
            .add_row(n, self.soln.as_ref(), guess.clone(), ternary, num_left)
    }
}

/// N boards solved in lockstep with a shared guess sequence. Each child
/// keeps its own scoreboard; the shared scoreboard interleaves every
/// board's rows round by round.
#[derive(Clone, Debug)]
pub struct SimultaneousGame {
    games: Vec<Game>,
    user_guesses: Vec<Word>,
    pub scoreboard: Scoreboard,
}

impl SimultaneousGame {
    pub fn new(potential_solns: &WordSeries, solns: Vec<Word>, user_guesses: Vec<Word>) -> Self {
        let games = solns
            .into_iter()
            .map(|soln| Game::new(potential_solns.clone(), Some(soln), Vec::new()))
            .collect();
        SimultaneousGame {
            games,
            user_guesses,
            scoreboard: Scoreboard::new(),
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn is_solved(&self) -> bool {
        self.games.iter().all(|game| game.is_solved)
    }

    pub fn word_length(&self) -> usize {
        self.games.first().map_or(0, Game::word_length)
    }

    pub fn rounds(&self) -> usize {
        self.scoreboard.rows.last().map_or(0, |row| row.n)
    }

    pub fn user_guess(&self, i: usize) -> Option<Word> {
        self.user_guesses.get(i).cloned()
    }

    pub fn update(
        &mut self,
        n: usize,
        board: usize,
        guess: &Word,
        score: Score,
        potential_solns: WordSeries,
    ) -> ScoreboardRow {
        let row = self.games[board]
            .update(n, guess, score, potential_solns)
            .clone();
        self.scoreboard.rows.push(row.clone());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, SimultaneousGame};
    use crate::words::{Word, WordSeries};

    fn candidates() -> WordSeries {
        WordSeries::new(["STICK", "TOXIC", "SNAKE", "FLAME"])
    }

    #[test]
    fn new_game_has_no_rounds() {
        let game = Game::new(candidates(), Some(Word::new("STICK")), Vec::new());
        assert_eq!(game.rounds(), 0);
        assert_eq!(game.num_potential_solns(), 4);
        assert!(!game.is_solved);
    }

    #[test]
    fn perfect_score_solves_the_game() {
        let mut game = Game::new(candidates(), Some(Word::new("STICK")), Vec::new());
        let remaining = WordSeries::new(["STICK"]);

        let row = game.update(1, &Word::new("STICK"), 242, remaining);
        assert_eq!(row.n, 1);
        assert_eq!(row.score, "22222");
        assert!(game.is_solved);
        assert_eq!(game.rounds(), 1);
    }

    #[test]
    fn imperfect_score_keeps_playing() {
        let mut game = Game::new(candidates(), Some(Word::new("STICK")), Vec::new());
        let remaining = WordSeries::new(["STICK", "TOXIC"]);

        game.update(1, &Word::new("SNAKE"), 165, remaining);
        assert!(!game.is_solved);
        assert_eq!(game.num_potential_solns(), 2);
        assert_eq!(game.scoreboard.rows.last().map(|r| r.num_left), Some(2));
    }

    #[test]
    fn final_row_is_perfect_iff_solved() {
        let mut game = Game::new(candidates(), Some(Word::new("STICK")), Vec::new());
        game.update(1, &Word::new("SNAKE"), 165, WordSeries::new(["STICK", "TOXIC"]));
        game.update(2, &Word::new("STICK"), 242, WordSeries::new(["STICK"]));

        let last = game.scoreboard.rows.last().expect("two rows were added");
        assert!(game.is_solved);
        assert!(last.score.bytes().all(|b| b == b'2'));
    }

    #[test]
    fn hidden_solution_shows_placeholder() {
        let mut game = Game::new(candidates(), None, Vec::new());
        let row = game.update(1, &Word::new("SNAKE"), 165, WordSeries::new(["STICK"]));
        assert_eq!(row.soln, Word::new("?????"));
    }

    #[test]
    fn user_guesses_are_consumed_in_order() {
        let guesses = vec![Word::new("MULCH"), Word::new("FANGO")];
        let game = Game::new(candidates(), Some(Word::new("STICK")), guesses);
        assert_eq!(game.user_guess(0), Some(Word::new("MULCH")));
        assert_eq!(game.user_guess(1), Some(Word::new("FANGO")));
        assert_eq!(game.user_guess(2), None);
    }

    #[test]
    fn simultaneous_game_is_solved_when_every_board_is() {
        let solns = vec![Word::new("STICK"), Word::new("TOXIC")];
        let mut simul = SimultaneousGame::new(&candidates(), solns, Vec::new());
        assert_eq!(simul.rounds(), 0);
        assert!(!simul.is_solved());

        simul.update(1, 0, &Word::new("STICK"), 242, WordSeries::new(["STICK"]));
        assert!(!simul.is_solved());

        simul.update(1, 1, &Word::new("STICK"), 39, WordSeries::new(["TOXIC"]));
        simul.update(2, 1, &Word::new("TOXIC"), 242, WordSeries::new(["TOXIC"]));
        assert!(simul.is_solved());

        // Shared scoreboard interleaves rows from both boards.
        assert_eq!(simul.scoreboard.len(), 3);
        assert_eq!(simul.rounds(), 2);
    }

    #[test]
    fn many_splits_the_shared_board_per_solution() {
        let solns = vec![Word::new("STICK"), Word::new("TOXIC")];
        let mut simul = SimultaneousGame::new(&candidates(), solns, Vec::new());

        simul.update(1, 0, &Word::new("STICK"), 242, WordSeries::new(["STICK"]));
        simul.update(1, 1, &Word::new("STICK"), 39, WordSeries::new(["TOXIC"]));
        simul.update(2, 1, &Word::new("TOXIC"), 242, WordSeries::new(["TOXIC"]));

        let boards = simul.scoreboard.many();
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].len(), 1);
        assert_eq!(boards[0].rows[0].soln, Word::new("STICK"));
        assert_eq!(boards[1].len(), 2);
        assert!(boards[1].rows.iter().all(|r| r.soln == Word::new("TOXIC")));
    }
}

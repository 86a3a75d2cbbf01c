use crate::histogram::HistogramBuilder;
use crate::scoring::{Score, Scorer};
use crate::solver::EntropySolver;
use crate::words::{Word, WordSeries};

/// A score edge in a decision tree. A node holding the perfect score is a
/// WIN leaf; any other score leads to follow-up guesses.
#[derive(Clone, Debug)]
pub struct ScoreNode {
    pub score: Score,
    pub children: Vec<GuessNode>,
}

impl ScoreNode {
    fn new(score: Score) -> Self {
        ScoreNode {
            score,
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, word: Word) -> &mut GuessNode {
        self.children.push(GuessNode::new(word));
        self.children.last_mut().expect("child was just pushed")
    }

    fn count(&self, win: Score) -> usize {
        if self.score == win {
            return 1;
        }
        self.children.iter().map(|child| child.count_with(win)).sum()
    }

    fn guess_count(&self, win: Score) -> usize {
        self.children
            .iter()
            .map(|child| child.guess_count_with(win))
            .sum()
    }

    fn display(&self, prefix: &str, with_scores: bool, win: Score, lines: &mut Vec<String>) {
        if self.score == win {
            if with_scores {
                lines.push(format!("{prefix},{}", self.score));
            } else {
                lines.push(prefix.to_string());
            }
        }

        let new_prefix = if with_scores {
            format!("{prefix},{}", self.score)
        } else {
            prefix.to_string()
        };
        for child in &self.children {
            child.display(&new_prefix, with_scores, win, lines);
        }
    }
}

/// A guess node in a decision tree: the word played, and one score edge per
/// observed colour pattern.
#[derive(Clone, Debug)]
pub struct GuessNode {
    pub word: Word,
    pub children: Vec<ScoreNode>,
}

impl GuessNode {
    pub fn new(word: Word) -> Self {
        GuessNode {
            word,
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, score: Score) -> &mut ScoreNode {
        self.children.push(ScoreNode::new(score));
        self.children.last_mut().expect("child was just pushed")
    }

    fn win_score(&self) -> Score {
        Score::pow(3, self.word.len() as u32) - 1
    }

    /// Number of solutions this tree reaches a WIN for.
    pub fn count(&self) -> usize {
        self.count_with(self.win_score())
    }

    fn count_with(&self, win: Score) -> usize {
        self.children.iter().map(|child| child.count(win)).sum()
    }

    /// Total guesses across every game in the tree: the objective the
    /// builder minimises.
    pub fn guess_count(&self) -> usize {
        self.guess_count_with(self.win_score())
    }

    fn guess_count_with(&self, win: Score) -> usize {
        self.count_with(win)
            + self
                .children
                .iter()
                .map(|child| child.guess_count(win))
                .sum::<usize>()
    }

    /// One line per root-to-WIN path, comma-separated; scores elidable.
    pub fn csv(&self, with_scores: bool) -> String {
        let mut lines = Vec::new();
        self.display("", with_scores, self.win_score(), &mut lines);
        lines.join("\n")
    }

    fn display(&self, prefix: &str, with_scores: bool, win: Score, lines: &mut Vec<String>) {
        let new_prefix = if prefix.is_empty() {
            self.word.to_string()
        } else {
            format!("{prefix},{}", self.word)
        };
        for child in &self.children {
            child.display(&new_prefix, with_scores, win, lines);
        }
    }
}

/// Recursive best-tree search: from a fixed opening word, build the
/// `(guess -> score -> guess -> ...)` tree reaching WIN for every candidate
/// with the smallest total guess count.
pub struct TreeBuilder<'a> {
    scorer: &'a Scorer,
    histogram_builder: &'a HistogramBuilder,
    all_words: &'a WordSeries,
    solver: EntropySolver,
    permutation_limit: usize,
}

impl<'a> TreeBuilder<'a> {
    pub const DEFAULT_PERMUTATION_LIMIT: usize = 10;

    pub fn new(
        scorer: &'a Scorer,
        histogram_builder: &'a HistogramBuilder,
        all_words: &'a WordSeries,
        permutation_limit: usize,
    ) -> Self {
        TreeBuilder {
            scorer,
            histogram_builder,
            all_words,
            solver: EntropySolver,
            permutation_limit,
        }
    }

    pub fn build(&self, potential_solns: &WordSeries, seed: Word) -> GuessNode {
        let mut root = GuessNode::new(seed);
        self.find_best_tree(potential_solns, &mut root, 0);
        root
    }

    fn find_best_tree(&self, potential_solns: &WordSeries, parent: &mut GuessNode, depth: usize) {
        let win = self.scorer.perfect_score();
        let word = parent.word.clone();
        let solns_by_score = self.histogram_builder.solns_by_score(potential_solns, &word);

        for (score, inner_solns) in solns_by_score {
            let score_node = parent.add(score);
            if score == win {
                continue;
            }

            if inner_solns.len() == 1 {
                score_node.add(inner_solns.at(0).clone()).add(win);
                continue;
            }

            if inner_solns.len() == 2 {
                // Guess the first candidate; either it wins outright or its
                // score pins the second.
                let soln0 = inner_solns.at(0).clone();
                let soln1 = inner_solns.at(1).clone();
                let score1 = self.scorer.score_word(&soln1, &soln0);
                score_node.add(soln0.clone()).add(win);
                score_node
                    .add(soln0)
                    .add(score1)
                    .add(soln1)
                    .add(win);
                continue;
            }

            // The branching factor shrinks as the tree deepens.
            let num_branches = self
                .permutation_limit
                .saturating_sub(3 * depth)
                .max(1);
            let mut best_guesses =
                self.solver
                    .sorted_guesses(self.histogram_builder, self.all_words, &inner_solns);
            best_guesses.truncate(num_branches);

            let naive_best = &best_guesses[0];
            if naive_best.is_perfect_partition {
                let guess_node = score_node.add(naive_best.word.clone());
                for soln in inner_solns.iter() {
                    let soln_score = self.scorer.score_word(soln, &naive_best.word);
                    let soln_node = guess_node.add(soln_score);
                    if soln_score != win {
                        soln_node.add(soln.clone()).add(win);
                    }
                }
                continue;
            }

            let mut best: Option<(usize, GuessNode)> = None;
            for guess in &best_guesses {
                let mut subtree = GuessNode::new(guess.word.clone());
                self.find_best_tree(&inner_solns, &mut subtree, depth + 1);
                let guess_count = subtree.guess_count_with(win);
                let replace = best
                    .as_ref()
                    .map_or(true, |(current, _)| guess_count < *current);
                if replace {
                    best = Some((guess_count, subtree));
                }
            }

            let (_, subtree) = best.expect("at least one branch is always explored");
            let guess_node = score_node.add(subtree.word.clone());
            guess_node.children = subtree.children;
        }
    }
}

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

/// An immutable uppercase token of fixed length.
///
/// The backing buffer is shared, so cloning a word (which candidate
/// partitioning does constantly) never copies the text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(Arc<str>);

impl Word {
    pub fn new(value: &str) -> Self {
        Word(value.to_ascii_uppercase().into())
    }

    /// Parse a user-supplied word. Accepts ASCII letters only and requires
    /// an exact length match.
    pub fn parse(value: &str, size: usize) -> Option<Word> {
        let trimmed = value.trim();
        if trimmed.len() != size || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Word::new(trimmed))
    }

    /// Placeholder word for a hidden solution, e.g. "?????".
    pub fn unknown(size: usize) -> Word {
        Word("?".repeat(size).into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sorted, de-duplicated series of words with a parallel global index.
///
/// `index[i]` is the position of `words[i]` in the root series the view was
/// carved from; a root series indexes itself (`0..n`). Slices share word
/// buffers with their parent and never mutate it. The global index is what
/// addresses score-matrix columns consistently across a solve.
#[derive(Clone, Debug)]
pub struct WordSeries {
    words: Vec<Word>,
    index: Vec<u32>,
}

impl WordSeries {
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        let unique: BTreeSet<Word> = words.into_iter().map(Into::into).collect();
        let words: Vec<Word> = unique.into_iter().collect();
        let index = (0..words.len() as u32).collect();
        WordSeries { words, index }
    }

    pub fn from_parts(words: Vec<Word>, index: Vec<u32>) -> Self {
        debug_assert_eq!(words.len(), index.len());
        WordSeries { words, index }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word_length(&self) -> usize {
        self.words.first().map_or(0, Word::len)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn index(&self) -> &[u32] {
        &self.index
    }

    pub fn at(&self, pos: usize) -> &Word {
        &self.words[pos]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.find_index(word).is_some()
    }

    /// Position of `word` within this series, if present.
    pub fn find_index(&self, word: &Word) -> Option<usize> {
        self.words.binary_search(word).ok()
    }

    /// Sub-series of the given positions. Positions must be ascending for
    /// the result to stay sorted; partition buckets always are.
    pub fn select(&self, positions: &[usize]) -> WordSeries {
        let words = positions.iter().map(|&p| self.words[p].clone()).collect();
        let index = positions.iter().map(|&p| self.index[p]).collect();
        WordSeries::from_parts(words, index)
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Word::new(value)
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        Word::new(&value)
    }
}

/// The two word lists a game runs over: every allowed guess and the subset
/// that can ever be an answer.
#[derive(Clone, Debug)]
pub struct Dictionary {
    pub all_words: WordSeries,
    pub common_words: WordSeries,
}

impl Dictionary {
    pub fn word_length(&self) -> usize {
        self.all_words.word_length()
    }

    pub fn words(&self) -> (&WordSeries, &WordSeries) {
        (&self.all_words, &self.common_words)
    }
}

/// Load the dictionaries for a given word length from a directory of JSON
/// word lists. Words are uppercased and filtered by length; `extras` are
/// merged into both lists so an unofficial answer never aborts a run.
pub fn load_dictionary(dir: &Path, size: usize, extras: &[Word]) -> io::Result<Dictionary> {
    let (full_file, answers_file) = if size == 5 {
        // The official Wordle lists for the real game.
        ("dictionary-full-official.json", "dictionary-answers-official.json")
    } else {
        ("dictionary-full.json", "dictionary-answers.json")
    };

    let mut all_words = load_word_file(&dir.join(full_file), size)?;
    let mut common_words = load_word_file(&dir.join(answers_file), size)?;

    for extra in extras {
        if extra.len() == size {
            common_words.insert(extra.clone());
        }
    }

    all_words.extend(common_words.iter().cloned());

    Ok(Dictionary {
        all_words: WordSeries::new(all_words),
        common_words: WordSeries::new(common_words),
    })
}

fn load_word_file(path: &Path, size: usize) -> io::Result<BTreeSet<Word>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let raw: Vec<String> = serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: expected a JSON array of words: {e}", path.display()),
        )
    })?;

    let words: BTreeSet<Word> = raw
        .iter()
        .filter(|w| w.len() == size && w.bytes().all(|b| b.is_ascii_alphabetic()))
        .map(|w| Word::new(w))
        .collect();

    if words.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: no words of length {size}", path.display()),
        ));
    }

    Ok(words)
}

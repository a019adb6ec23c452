use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("word list not loaded")]
    NotLoaded,
    #[error("word list is empty")]
    Empty,
}

/// Dictionary lookup for the letter game. Words are stored uppercase.
#[derive(Debug, Clone, Default)]
pub struct WordValidator {
    words: Option<HashSet<String>>,
}

fn normalize(word: &str) -> String {
    word.trim().to_ascii_uppercase()
}

fn is_candidate(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_ascii_uppercase())
}

impl WordValidator {
    /// An unloaded validator. Lookups fail until a list is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// One word per line. Blank lines and non-alphabetic entries are skipped.
    pub fn from_word_list(text: &str) -> Result<Self, DictionaryError> {
        let mut validator = Self::new();
        validator.load(text.lines())?;
        Ok(validator)
    }

    pub fn load<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) -> Result<usize, DictionaryError> {
        let set: HashSet<String> = words
            .into_iter()
            .map(normalize)
            .filter(|word| is_candidate(word))
            .collect();
        if set.is_empty() {
            return Err(DictionaryError::Empty);
        }
        let count = set.len();
        self.words = Some(set);
        Ok(count)
    }

    pub fn is_loaded(&self) -> bool {
        self.words.is_some()
    }

    pub fn len(&self) -> usize {
        self.words.as_ref().map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, word: &str) -> Result<bool, DictionaryError> {
        let words = self.words.as_ref().ok_or(DictionaryError::NotLoaded)?;
        let word = normalize(word);
        Ok(is_candidate(&word) && words.contains(&word))
    }

    /// Dictionary words spellable from `letters`, longest first.
    pub fn find_words_from_letters(
        &self,
        letters: &[char],
        min_len: usize,
    ) -> Result<Vec<String>, DictionaryError> {
        let words = self.words.as_ref().ok_or(DictionaryError::NotLoaded)?;
        let mut available: HashMap<char, usize> = HashMap::new();
        for letter in letters {
            *available.entry(letter.to_ascii_uppercase()).or_insert(0) += 1;
        }
        let mut found: Vec<String> = words
            .iter()
            .filter(|word| word.len() >= min_len && word.len() <= letters.len())
            .filter(|word| {
                let mut needed: HashMap<char, usize> = HashMap::new();
                for c in word.chars() {
                    *needed.entry(c).or_insert(0) += 1;
                }
                needed
                    .iter()
                    .all(|(c, n)| available.get(c).copied().unwrap_or(0) >= *n)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Ok(found)
    }
}

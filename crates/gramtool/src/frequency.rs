//! Lemma frequency ranking.
//!
//! A frequency list is a text file with one lemma per line, most frequent
//! first. It is used to choose between competing lemmas of an ambiguous
//! word.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Rank of every lemma in a frequency list (0 = most frequent).
#[derive(Debug, Clone, Default)]
pub struct FrequencyList {
    ranks: HashMap<String, usize>,
}

impl FrequencyList {
    /// Parses a frequency list. Lines are trimmed, blank lines are skipped
    /// but still count towards the rank, and the first occurrence of a lemma
    /// defines its rank.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut ranks = HashMap::new();
        for (rank, line) in text.lines().enumerate() {
            let lemma = line.trim();
            if !lemma.is_empty() {
                ranks.entry(lemma.to_string()).or_insert(rank);
            }
        }
        Self { ranks }
    }

    /// Reads a frequency list file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Setup`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::setup(path, e))?;
        Ok(Self::parse(&text))
    }

    /// The rank of `lemma`, or `None` if it is not listed.
    #[must_use]
    pub fn rank(&self, lemma: &str) -> Option<usize> {
        self.ranks.get(lemma).copied()
    }

    /// Number of distinct lemmas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns `true` if no lemma is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

//! Spelling oracles.
//!
//! The engine never decides on its own whether a string is a word. Every
//! candidate surface form is submitted to a [`Speller`], and a paradigm is
//! only accepted when the speller accepts all of its forms. [`WordList`]
//! is the built-in oracle backed by a hunspell-style `.dic` word list; any
//! `Fn(&str) -> bool` closure works as well.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};

/// Judges whether a string is a valid word of the target language.
///
/// Implementations must be safe to call from several threads at once. A
/// speller that cannot represent a word (for example because of an encoding
/// it does not support) should answer `false` rather than fail.
pub trait Speller: Send + Sync {
    /// Returns `true` if `word` is a valid word.
    fn is_valid_word(&self, word: &str) -> bool;

    /// Returns spelling suggestions for `word`, best first.
    fn suggest(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}

impl<F> Speller for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_word(&self, word: &str) -> bool {
        self(word)
    }
}

/// Title-cases `word` the way Python's `str.title` does: the first letter of
/// every run of letters is uppercased and the rest are lowercased.
#[must_use]
pub fn title_case(word: &str) -> String {
    let mut titled = String::with_capacity(word.len());
    let mut in_word = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if in_word {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(c);
            in_word = false;
        }
    }
    titled
}

/// Asks `speller` about `word`, falling back to its title-cased form so that
/// proper nouns stored capitalized are still recognized.
pub fn spell(speller: &dyn Speller, word: &str) -> bool {
    if speller.is_valid_word(word) {
        return true;
    }
    let titled = title_case(word);
    titled != word && speller.is_valid_word(&titled)
}

/// A spelling oracle backed by a fixed set of words.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Builds a word list from any collection of words.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a hunspell `.dic` file: an optional entry count on the first
    /// line, then one entry per line. Affix flags after `/` and
    /// morphological fields after whitespace are ignored.
    #[must_use]
    pub fn parse(dic: &str) -> Self {
        let mut lines = dic.lines().peekable();
        if lines
            .peek()
            .is_some_and(|first| first.trim().parse::<usize>().is_ok())
        {
            lines.next();
        }
        Self::new(lines.filter_map(|line| {
            let entry = line.split_whitespace().next()?;
            let word = entry.split('/').next().unwrap_or(entry);
            (!word.is_empty()).then(|| word.to_string())
        }))
    }

    /// Reads a `.dic` file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Setup`] if the file cannot be read as UTF-8 text.
    pub fn load(path: &Path) -> Result<Self> {
        let dic = std::fs::read_to_string(path).map_err(|e| Error::setup(path, e))?;
        Ok(Self::parse(&dic))
    }

    /// Number of words in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Speller for WordList {
    fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Dictionary words one edit (insertion, deletion, substitution or
    /// adjacent transposition) away from `word`, sorted.
    fn suggest(&self, word: &str) -> Vec<String> {
        let target: Vec<char> = word.chars().collect();
        let mut suggestions: Vec<String> = self
            .words
            .iter()
            .filter(|candidate| candidate.as_str() != word)
            .filter(|candidate| {
                let candidate: Vec<char> = candidate.chars().collect();
                one_edit_apart(&target, &candidate)
            })
            .cloned()
            .collect();
        suggestions.sort();
        suggestions
    }
}

fn one_edit_apart(a: &[char], b: &[char]) -> bool {
    match a.len().abs_diff(b.len()) {
        0 => {
            let diffs: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
            match diffs.as_slice() {
                [_] => true,
                [i, j] => *j == i + 1 && a[*i] == b[*j] && a[*j] == b[*i],
                _ => false,
            }
        }
        1 => {
            let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };
            let split = short
                .iter()
                .zip(long)
                .position(|(s, l)| s != l)
                .unwrap_or(short.len());
            short[split..] == long[split + 1..]
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("vilnius"), "Vilnius");
        assert_eq!(title_case("VILNIUS"), "Vilnius");
        assert_eq!(title_case("šiaulių bankas"), "Šiaulių Bankas");
        assert_eq!(title_case("am+learn-ing"), "Am+Learn-Ing");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_spell_falls_back_to_title_case() {
        let words = WordList::new(["Vilnius", "namas"]);
        assert!(spell(&words, "Vilnius"));
        assert!(spell(&words, "vilnius"));
        assert!(spell(&words, "namas"));
        assert!(!spell(&words, "Namas"));
        assert!(!spell(&words, "vilniaus"));
    }

    #[test]
    fn test_closures_are_spellers() {
        let speller = |word: &str| word.ends_with("as");
        assert!(spell(&speller, "namas"));
        assert!(!spell(&speller, "namo"));
        assert!(speller.suggest("namo").is_empty());
    }

    #[test]
    fn test_parse_dic() {
        let words = WordList::parse("4\nnamas/AB\nnamo\n\nVilnius/X po:noun\n");
        assert_eq!(words.len(), 3);
        assert!(words.is_valid_word("namas"));
        assert!(words.is_valid_word("Vilnius"));
        assert!(!words.is_valid_word("4"));
    }

    #[test]
    fn test_parse_dic_without_count() {
        let words = WordList::parse("namas\nnamo\n");
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_suggest_one_edit() {
        let words = WordList::new(["namas", "namai", "nams", "anmas", "medis", "nnamas"]);
        assert_eq!(
            words.suggest("namas"),
            ["anmas", "namai", "nams", "nnamas"]
        );
        assert_eq!(words.suggest("žmogus"), Vec::<String>::new());
    }

    #[test]
    fn test_load_missing_dic_is_setup_error() {
        assert!(WordList::load(Path::new("/nonexistent/words.dic"))
            .unwrap_err()
            .is_setup());
    }
}

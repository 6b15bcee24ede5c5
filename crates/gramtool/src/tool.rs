//! The lemma and form resolver.
//!
//! [`GramTool`] ties a data directory to the engine: it loads the symbol
//! table, the word list, the compiled grammar and the frequency list on
//! first use and keeps them for the lifetime of the value.
//!
//! ```text
//! <data>/symbols.json
//! <data>/<lang>/grammar
//! <data>/<lang>/words.dic
//! <data>/<lang>/frequency
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::frequency::FrequencyList;
use crate::grammar::{Grammar, RuleSet};
use crate::parser::compile_file;
use crate::spec;
use crate::speller::{Speller, WordList};
use crate::symbols::SymbolTable;

/// Every form of one paradigm realized for a stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paradigm {
    /// Key of the rule the paradigm comes from.
    pub rule: String,

    /// `(spec, surface)` rows in declaration order.
    pub forms: Vec<(String, String)>,
}

/// Lemmatizer and form synthesizer over one language's data.
pub struct GramTool {
    data_dir: PathBuf,
    language: String,
    symbols: OnceLock<SymbolTable>,
    speller: OnceLock<Arc<dyn Speller>>,
    grammar: OnceLock<Grammar>,
    frequency: OnceLock<FrequencyList>,
}

impl GramTool {
    /// Creates a resolver for `language` under `data_dir`. Nothing is read
    /// until the first query.
    pub fn new(data_dir: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            language: language.into(),
            symbols: OnceLock::new(),
            speller: OnceLock::new(),
            grammar: OnceLock::new(),
            frequency: OnceLock::new(),
        }
    }

    /// Uses `speller` instead of the language's word list.
    #[must_use]
    pub fn with_speller(self, speller: Arc<dyn Speller>) -> Self {
        Self {
            speller: OnceLock::from(speller),
            ..self
        }
    }

    /// Creates a resolver from resources that are already in memory.
    #[must_use]
    pub fn from_parts(
        symbols: SymbolTable,
        rules: RuleSet,
        speller: Arc<dyn Speller>,
        frequency: FrequencyList,
    ) -> Self {
        let grammar = Grammar::new(rules, Arc::clone(&speller));
        Self {
            data_dir: PathBuf::new(),
            language: String::new(),
            symbols: OnceLock::from(symbols),
            speller: OnceLock::from(speller),
            grammar: OnceLock::from(grammar),
            frequency: OnceLock::from(frequency),
        }
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Path of the symbol table, shared by every language.
    #[must_use]
    pub fn symbols_path(&self) -> PathBuf {
        self.data_dir.join("symbols.json")
    }

    /// Path of the language's rule source.
    #[must_use]
    pub fn grammar_path(&self) -> PathBuf {
        self.data_dir.join(&self.language).join("grammar")
    }

    /// Path of the language's word list.
    #[must_use]
    pub fn dictionary_path(&self) -> PathBuf {
        self.data_dir.join(&self.language).join("words.dic")
    }

    /// Path of the language's frequency list.
    #[must_use]
    pub fn frequency_path(&self) -> PathBuf {
        self.data_dir.join(&self.language).join("frequency")
    }

    /// The symbol table, loaded on first use.
    ///
    /// # Errors
    ///
    /// Returns a setup error if the symbol table cannot be read or parsed.
    pub fn symbols(&self) -> Result<&SymbolTable> {
        get_or_load(&self.symbols, || {
            let path = self.symbols_path();
            info!(path = %path.display(), "loading symbol table");
            SymbolTable::load(&path)
        })
    }

    /// The spelling oracle, loaded on first use.
    ///
    /// # Errors
    ///
    /// Returns a setup error if the word list cannot be read.
    pub fn speller(&self) -> Result<&Arc<dyn Speller>> {
        get_or_load(&self.speller, || {
            let path = self.dictionary_path();
            info!(path = %path.display(), "loading word list");
            let words = WordList::load(&path)?;
            debug!(words = words.len(), "word list loaded");
            Ok(Arc::new(words) as Arc<dyn Speller>)
        })
    }

    /// The compiled grammar, built on first use.
    ///
    /// # Errors
    ///
    /// Returns a setup error if a data file cannot be read and a syntax error
    /// if the rule source does not compile.
    pub fn grammar(&self) -> Result<&Grammar> {
        get_or_load(&self.grammar, || {
            let symbols = self.symbols()?;
            let speller = Arc::clone(self.speller()?);
            let path = self.grammar_path();
            info!(path = %path.display(), "compiling grammar");
            let rules = compile_file(symbols, &path)?;
            info!(rules = rules.len(), "grammar compiled");
            Ok(Grammar::new(rules, speller))
        })
    }

    /// The frequency list, loaded on first use.
    ///
    /// # Errors
    ///
    /// Returns a setup error if the frequency list cannot be read.
    pub fn frequency(&self) -> Result<&FrequencyList> {
        get_or_load(&self.frequency, || {
            let path = self.frequency_path();
            info!(path = %path.display(), "loading frequency list");
            FrequencyList::load(&path)
        })
    }

    /// The most frequent lemma of `word`, or `None` if no accepted paradigm
    /// contains it. Lemmas missing from the frequency list rank last; ties go
    /// to the first lemma found.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar or the frequency list cannot be loaded.
    pub fn lemma_of(&self, word: &str) -> Result<Option<String>> {
        let grammar = self.grammar()?;
        let frequency = self.frequency()?;
        let mut best: Option<(usize, String)> = None;
        for (lemma, _) in grammar.iter_rules(word) {
            let lemma = lemma.surface();
            let rank = frequency.rank(&lemma).unwrap_or(usize::MAX);
            if best.as_ref().is_none_or(|(best_rank, _)| rank < *best_rank) {
                best = Some((rank, lemma));
            }
        }
        Ok(best.map(|(_, lemma)| lemma))
    }

    /// Lemmatizes the last word of `phrase` and keeps the others, so that
    /// `"Šiaulių banko"` becomes `"Šiaulių bankas"`. Words are re-joined with
    /// single spaces.
    ///
    /// # Errors
    ///
    /// See [`GramTool::lemma_of`].
    pub fn lemma_of_phrase(&self, phrase: &str) -> Result<Option<String>> {
        let mut words: Vec<&str> = phrase.split_whitespace().collect();
        let Some(last) = words.pop() else {
            return Ok(None);
        };
        let Some(lemma) = self.lemma_of(last)? else {
            return Ok(None);
        };
        let mut result = words.join(" ");
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(&lemma);
        Ok(Some(result))
    }

    /// Re-inflects `word` so that it carries the requested property values.
    ///
    /// The first accepted paradigm that contains `word` and also contains the
    /// target spec wins. When several cells of a paradigm share the surface
    /// `word`, the last of them gives the spec that gets changed. Specs are
    /// compared case-insensitively so that an invariant value (`S`,
    /// singular-only) still finds its regular counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spec`](crate::Error::Spec) for unknown property names
    /// or values, and a setup error if the grammar cannot be loaded.
    pub fn change_form(&self, word: &str, properties: &[(&str, &str)]) -> Result<Option<String>> {
        let grammar = self.grammar()?;
        let symbols = self.symbols()?;
        for candidate in grammar.paradigms(word) {
            let mut surfaces: HashMap<String, String> = HashMap::new();
            let mut current = None;
            for (spec, surface) in candidate.rows() {
                if surface == word {
                    current = Some(spec);
                }
                surfaces.insert(spec.to_lowercase(), surface);
            }
            let Some(current) = current else {
                continue;
            };
            let target = spec::apply_change(symbols, current, properties)?;
            if let Some(surface) = surfaces.remove(&target.to_lowercase()) {
                return Ok(Some(surface));
            }
            debug!(rule = %candidate.rule, spec = %target, "paradigm has no such form");
        }
        Ok(None)
    }

    /// Every accepted paradigm `word` could belong to.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded.
    pub fn forms_of(&self, word: &str) -> Result<Vec<Paradigm>> {
        let grammar = self.grammar()?;
        Ok(grammar
            .paradigms(word)
            .map(|candidate| Paradigm {
                rule: candidate.rule.key.clone(),
                forms: candidate
                    .rows()
                    .map(|(spec, surface)| (spec.to_string(), surface))
                    .collect(),
            })
            .collect())
    }

    /// Spelling suggestions for `word` from the oracle.
    ///
    /// # Errors
    ///
    /// Returns a setup error if the word list cannot be loaded.
    pub fn suggest(&self, word: &str) -> Result<Vec<String>> {
        Ok(self.speller()?.suggest(word))
    }

    /// Checks whether `spec` carries the requested property values.
    ///
    /// # Errors
    ///
    /// See [`spec::check`].
    pub fn check(&self, spec: &str, properties: &[(&str, &str)]) -> Result<bool> {
        Ok(spec::check(self.symbols()?, spec, properties)?)
    }

    /// Describes `spec` as `{property: value}`.
    ///
    /// # Errors
    ///
    /// See [`spec::describe`].
    pub fn describe(&self, spec: &str) -> Result<IndexMap<String, String>> {
        Ok(spec::describe(self.symbols()?, spec)?)
    }
}

impl fmt::Debug for GramTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GramTool")
            .field("data_dir", &self.data_dir)
            .field("language", &self.language)
            .field("grammar", &self.grammar.get())
            .finish_non_exhaustive()
    }
}

/// Returns the cached value, loading it first if needed. Concurrent first
/// calls may both load; the first stored value wins.
fn get_or_load<T>(cell: &OnceLock<T>, load: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = load()?;
    Ok(cell.get_or_init(|| value))
}

//! The grammar runtime.
//!
//! A [`Grammar`] owns a compiled [`RuleSet`] together with two lookup
//! indexes derived from it and the [`Speller`] that decides which analyses
//! are real words:
//!
//! - the *stem index* maps the explicit stem of every stand-alone form (a
//!   form with an explicit stem and no suffix) to the rules that declare it;
//! - the *suffix index* maps each literal suffix to the rules that use it,
//!   longest suffix first.
//!
//! Analysis walks both indexes to produce [`Candidate`]s, realizes the whole
//! paradigm of each candidate and keeps it only if the speller accepts every
//! form.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::speller::{spell, Speller};

/// Rule, form and include types produced by the compiler.
pub mod rules;

pub use rules::{Form, Include, IncludeLevel, Rule, RuleSet};

/// A compiled grammar ready for lookups.
///
/// Indexes are built once in [`Grammar::new`]; the grammar is immutable and
/// can be shared between threads afterwards.
pub struct Grammar {
    rules: RuleSet,
    speller: Arc<dyn Speller>,
    stems: HashMap<String, Vec<String>>,
    suffixes: Vec<(String, Vec<String>)>,
}

/// A possible analysis of a word: the word split into a stem and a suffix
/// that `rule` declares.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The word with `suffix` removed (the whole word for stem matches).
    pub stem: &'a str,

    /// The matched suffix, empty for stem matches.
    pub suffix: &'a str,

    /// The rule proposing this analysis.
    pub rule: &'a Rule,
}

impl<'a> Candidate<'a> {
    /// Realizes every form of the rule for this stem.
    pub fn words(&self) -> impl Iterator<Item = String> + 'a {
        self.rule.build_forms(self.stem)
    }

    /// The `(spec, surface)` rows of the paradigm, in declaration order.
    pub fn rows(&self) -> impl Iterator<Item = (&'a str, String)> + 'a {
        let stem = self.stem;
        self.rule
            .forms
            .values()
            .map(move |form| (form.spec.as_str(), form.word(stem)))
    }
}

/// A form realized for a concrete stem.
#[derive(Debug, Clone, Copy)]
pub struct Word<'a> {
    /// The rule the form belongs to.
    pub rule: &'a Rule,

    /// The paradigm cell.
    pub form: &'a Form,

    /// The stem the form is realized with.
    pub stem: &'a str,
}

impl<'a> Word<'a> {
    /// The grammatical properties of this word.
    #[must_use]
    pub fn spec(&self) -> &'a str {
        &self.form.spec
    }

    /// The surface string.
    #[must_use]
    pub fn surface(&self) -> String {
        self.form.word(self.stem)
    }
}

impl fmt::Display for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.surface())
    }
}

impl Grammar {
    /// Builds the lookup indexes over `rules`. Macros are skipped.
    pub fn new(rules: RuleSet, speller: Arc<dyn Speller>) -> Self {
        let (stems, suffixes) = build_indexes(&rules);
        debug!(
            rules = rules.len(),
            stems = stems.len(),
            suffixes = suffixes.len(),
            "built grammar indexes"
        );
        Self {
            rules,
            speller,
            stems,
            suffixes,
        }
    }

    /// All rules, in declaration order.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Looks up a rule by key.
    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the grammar has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The spelling oracle consulted by this grammar.
    #[must_use]
    pub fn speller(&self) -> &dyn Speller {
        self.speller.as_ref()
    }

    /// Yields every rule that could have produced `word`: exact stem matches
    /// first, then suffix matches from the longest suffix to the shortest.
    pub fn find_rules<'a>(&'a self, word: &'a str) -> impl Iterator<Item = Candidate<'a>> + 'a {
        let exact = self
            .stems
            .get(word)
            .into_iter()
            .flatten()
            .filter_map(move |key| {
                Some(Candidate {
                    stem: word,
                    suffix: "",
                    rule: self.rules.get(key)?,
                })
            });
        let by_suffix = self
            .suffixes
            .iter()
            .filter_map(move |(suffix, keys)| {
                word.strip_suffix(suffix.as_str())
                    .map(|stem| (stem, suffix.as_str(), keys))
            })
            .flat_map(move |(stem, suffix, keys)| {
                keys.iter().filter_map(move |key| {
                    Some(Candidate {
                        stem,
                        suffix,
                        rule: self.rules.get(key)?,
                    })
                })
            });
        exact.chain(by_suffix)
    }

    /// Returns `true` if the speller accepts every word, directly or in its
    /// title-cased form. Stops at the first rejection.
    pub fn check_spelling<I>(&self, words: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        words.into_iter().all(|word| {
            let word = word.as_ref();
            let valid = spell(self.speller.as_ref(), word);
            if !valid {
                debug!(word, "rejected by the speller");
            }
            valid
        })
    }

    /// Returns `true` if every form of the candidate's paradigm is spelled
    /// correctly.
    #[must_use]
    pub fn accepts(&self, candidate: &Candidate<'_>) -> bool {
        trace!(rule = %candidate.rule, stem = candidate.stem, suffix = candidate.suffix, "candidate");
        self.check_spelling(candidate.words())
    }

    /// The candidates of `word` whose whole paradigm passes the speller.
    pub fn paradigms<'a>(&'a self, word: &'a str) -> impl Iterator<Item = Candidate<'a>> + 'a {
        self.find_rules(word)
            .filter(move |candidate| self.accepts(candidate))
    }

    /// Yields `(lemma, matched)` for every accepted paradigm cell whose
    /// surface equals `word`. The lemma is the rule's first form.
    pub fn iter_rules<'a>(&'a self, word: &'a str) -> impl Iterator<Item = (Word<'a>, Word<'a>)> + 'a {
        self.paradigms(word).flat_map(move |Candidate { stem, rule, .. }| {
            let lemma = rule.lemma_form().map(|form| Word { rule, form, stem });
            rule.forms
                .values()
                .filter(move |form| form.word(stem) == word)
                .filter_map(move |form| Some((lemma?, Word { rule, form, stem })))
        })
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules.len())
            .field("stems", &self.stems.len())
            .field("suffixes", &self.suffixes.len())
            .finish_non_exhaustive()
    }
}

type Indexes = (HashMap<String, Vec<String>>, Vec<(String, Vec<String>)>);

fn build_indexes(rules: &RuleSet) -> Indexes {
    let mut stems: HashMap<String, Vec<String>> = HashMap::new();
    let mut suffixes: IndexMap<String, Vec<String>> = IndexMap::new();
    for rule in rules.values().filter(|rule| !rule.is_macro) {
        for form in rule.forms.values() {
            if form.suffixes.is_empty() {
                if let Some(stem) = &form.stem {
                    register(stems.entry(stem.clone()).or_default(), &rule.key);
                }
                continue;
            }
            for suffix in &form.suffixes {
                register(suffixes.entry(suffix.clone()).or_default(), &rule.key);
            }
        }
    }
    let mut suffixes: Vec<_> = suffixes.into_iter().collect();
    suffixes.sort_by_key(|(suffix, _)| std::cmp::Reverse(suffix.chars().count()));
    (stems, suffixes)
}

fn register(keys: &mut Vec<String>, key: &str) {
    if !keys.iter().any(|known| known == key) {
        keys.push(key.to_string());
    }
}

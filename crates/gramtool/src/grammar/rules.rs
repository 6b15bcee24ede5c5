//! Core types for representing inflection rules.
//!
//! A [`Rule`] is one paradigm: an ordered set of [`Form`]s keyed by spec,
//! plus the [`Include`] directives still waiting to be resolved. Rules are
//! produced by the [`Parser`](crate::parser::Parser) and are read-only once
//! compilation finishes.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Compiled rules keyed by rule key, in declaration order.
pub type RuleSet = IndexMap<String, Rule>;

/// One paradigm cell: a spec plus the affixes that realize it around a stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// The grammatical properties of this cell.
    pub spec: String,

    /// Inheritance depth at which this form was produced (0 = authored).
    pub level: usize,

    /// Prefixes, concatenated in order before the stem.
    pub prefixes: Vec<String>,

    /// Suffixes, concatenated in order after the stem.
    pub suffixes: Vec<String>,

    /// Stand-alone surface form that replaces the stem, if any.
    pub stem: Option<String>,
}

impl Form {
    /// Realizes this form for `stem`.
    #[must_use]
    pub fn word(&self, stem: &str) -> String {
        let mut word = self.prefixes.concat();
        word.push_str(self.stem.as_deref().unwrap_or(stem));
        for suffix in &self.suffixes {
            word.push_str(suffix);
        }
        word
    }
}

/// The level an include directive is applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeLevel {
    /// Applied while expanding this exact level (`+` is level 0, `+N` is N).
    Level(usize),

    /// Applied at every level (`+*`).
    Any,
}

/// A pending instruction to copy another rule's forms into this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    /// Line of the directive, for diagnostics.
    pub line: usize,

    /// Source text of the directive.
    pub text: String,

    /// `.` for the node being expanded, `@` for the top rule, or a rule key.
    pub key: String,

    /// Spec overlay applied to every copied form.
    pub spec: String,

    /// Prefix added to every copied form.
    pub prefix: String,

    /// Suffix added to every copied form.
    pub suffix: String,

    /// Filter a target form must match to be copied.
    pub filter: String,
}

/// A paradigm: named or anonymous, optionally a macro.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Sequential id in order of declaration, starting at 1.
    pub id: usize,

    /// Declared name, if any.
    pub name: Option<String>,

    /// Lookup key: the name, or the id for anonymous rules.
    pub key: String,

    /// Macros are only include targets and never match words directly.
    pub is_macro: bool,

    /// Line of the `@rule`/`@macro` header.
    pub line: usize,

    /// Forms keyed by spec, in insertion order.
    pub forms: IndexMap<String, Form>,

    /// Include directives grouped by level.
    pub includes: HashMap<IncludeLevel, Vec<Include>>,
}

impl Rule {
    /// Creates an empty rule.
    pub fn new(id: usize, name: Option<String>, is_macro: bool, line: usize) -> Self {
        let key = name.clone().unwrap_or_else(|| id.to_string());
        Self {
            id,
            name,
            key,
            is_macro,
            line,
            forms: IndexMap::new(),
            includes: HashMap::new(),
        }
    }

    /// Realizes every form for `stem`, in declaration order.
    pub fn build_forms<'a>(&'a self, stem: &'a str) -> impl Iterator<Item = String> + 'a {
        self.forms.values().map(move |form| form.word(stem))
    }

    /// The canonical (first declared) form.
    #[must_use]
    pub fn lemma_form(&self) -> Option<&Form> {
        self.forms.first().map(|(_, form)| form)
    }

    /// The directives registered under `level`.
    #[must_use]
    pub fn includes_at(&self, level: IncludeLevel) -> &[Include] {
        self.includes.get(&level).map_or(&[], Vec::as_slice)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

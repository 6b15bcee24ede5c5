//! A rule-driven morphological engine.
//!
//! Inflection rules are written as compact stem/affix tables that can include
//! one another through macros and leveled overlays. The [`parser`] compiles
//! them into flat paradigms, the [`Grammar`] indexes those paradigms by stem
//! and suffix, and [`GramTool`] uses the result to find the lemma of a word
//! or to re-inflect it.
//!
//! ```no_run
//! use gramtool::GramTool;
//!
//! let tool = GramTool::new("data", "lt");
//! assert_eq!(tool.lemma_of("Vilniaus")?.as_deref(), Some("Vilnius"));
//! assert_eq!(
//!     tool.change_form("medis", &[("case", "accusative"), ("number", "plural")])?.as_deref(),
//!     Some("medžius"),
//! );
//! # Ok::<(), gramtool::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Error types shared by the loaders, the compiler and the resolver.
pub mod error;

/// Lemma frequency ranking.
pub mod frequency;

/// The compiled rule table and the lookups built on top of it.
///
/// Everything downstream of compilation (analysis, synthesis, the CLI views)
/// goes through these types.
pub mod grammar;

pub mod parser;
pub mod spec;
pub mod speller;
pub mod symbols;
pub mod tool;

/// Strict checks run while compiling a rule source.
///
/// Validation protects the runtime from specs it cannot interpret: every
/// part of speech, property count and code is checked against the symbol
/// table before a form is accepted.
pub mod validate;

pub mod views;

pub use error::{Error, Result, SpecError, SyntaxError};
pub use frequency::FrequencyList;
pub use grammar::{Candidate, Form, Grammar, Rule, RuleSet, Word};
pub use parser::{compile, compile_file, Parser};
pub use speller::{Speller, WordList};
pub use symbols::SymbolTable;
pub use tool::{GramTool, Paradigm};

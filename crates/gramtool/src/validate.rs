//! Validation routines for rule sources.
//!
//! The compiler calls into this module while it reads a rule file: every
//! form's spec is checked against the [`SymbolTable`] (known part of speech,
//! no surplus properties, every code declared for its property), and every
//! rule key is checked for duplicates. Failures are reported as
//! [`SyntaxError`]s that carry the file name and the 1-based line number.

use indexmap::IndexMap;

use crate::grammar::Rule;
use crate::spec::{FILLER, UNSPECIFIED, WILDCARD};
use crate::symbols::SymbolTable;

/// A located, human-readable error in a rule source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error in {filename}:{line}: {message}")]
pub struct SyntaxError {
    /// Name of the rule source.
    pub filename: String,

    /// 1-based line number of the offending line.
    pub line: usize,

    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    /// Creates a new [`SyntaxError`].
    pub fn new(filename: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line,
            message: message.into(),
        }
    }

    /// Renders the error the way it is shown to grammar authors.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "Error detected in this grammar file:\n\n  {}:{}\n\n{}",
            self.filename, self.line, self.message
        )
    }
}

/// Where in a rule source a check is running.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Location<'a> {
    pub filename: &'a str,
    pub line: usize,
    pub text: &'a str,
}

impl<'a> Location<'a> {
    pub fn new(filename: &'a str, line: usize, text: &'a str) -> Self {
        Self { filename, line, text }
    }

    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.filename, self.line, message)
    }

    /// The source line with its whitespace collapsed, for quoting in messages.
    fn quoted(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Checks that `rule`'s key is not already taken.
pub(crate) fn validate_rule(
    filename: &str,
    rules: &IndexMap<String, Rule>,
    rule: &Rule,
) -> Result<(), SyntaxError> {
    match rules.get(&rule.key) {
        Some(duplicate) => Err(SyntaxError::new(
            filename,
            rule.line,
            format!(
                "rules with name \"{}\" already defined in {} line.",
                rule.key, duplicate.line
            ),
        )),
        None => Ok(()),
    }
}

/// Runs every strict check on a padded spec.
pub(crate) fn validate_spec(
    symbols: &SymbolTable,
    at: Location<'_>,
    spec: &str,
    pos_name: &str,
) -> Result<(), SyntaxError> {
    let props = symbols.properties_of(pos_name);
    validate_props(at, props, spec, pos_name)?;
    validate_symbols(symbols, at, props, spec, pos_name)
}

/// Reports an unknown part-of-speech code.
pub(crate) fn unknown_pos(symbols: &SymbolTable, at: Location<'_>, code: char) -> SyntaxError {
    at.error(format!(
        "unknown part of speech \"{code}\" in \"{}\", available options are:\n\n{}",
        at.quoted(),
        render_options(symbols, "pos")
    ))
}

fn validate_props(
    at: Location<'_>,
    props: &[String],
    spec: &str,
    pos_name: &str,
) -> Result<(), SyntaxError> {
    let given = spec.chars().count() - 1;
    if props.len() < given {
        return Err(at.error(format!(
            "{pos_name} has {} grammatical categories, but \"{}\" provides {given}.\n\n\
             You need to remove extra grammatical categories.",
            props.len(),
            at.quoted()
        )));
    }
    Ok(())
}

fn validate_symbols(
    symbols: &SymbolTable,
    at: Location<'_>,
    props: &[String],
    spec: &str,
    pos_name: &str,
) -> Result<(), SyntaxError> {
    for (i, (code, prop)) in spec.chars().skip(1).zip(props).enumerate() {
        if matches!(code, FILLER | WILDCARD | UNSPECIFIED) {
            continue;
        }
        if symbols.value(prop, code).is_none() {
            return Err(at.error(format!(
                "\"{code}\" in {} position is not valid value for {pos_name} {prop}, \
                 specified in \"{}\".\n\n\
                 {pos_name} {prop} possible options are these:\n\n{}",
                i + 2,
                at.quoted(),
                render_options(symbols, prop)
            )));
        }
    }
    Ok(())
}

fn render_options(symbols: &SymbolTable, property: &str) -> String {
    let options = symbols.options(property);
    if options.is_empty() {
        return "  (none)".to_string();
    }
    options
        .iter()
        .map(|(code, value)| format!("  {code}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

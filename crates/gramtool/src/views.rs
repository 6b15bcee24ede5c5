//! Plain-text renderings of compiled rules and lookup results.

use crate::grammar::{Form, Grammar, RuleSet};
use crate::tool::Paradigm;

/// Renders every rule as a header followed by `spec word` rows, where the
/// word shows its affixes separated by `-` around `stem`.
///
/// ```text
/// @rule bankas
/// nmsn---- (stem)-as
/// ```
#[must_use]
pub fn rules(rules: &RuleSet, stem: &str) -> String {
    let mut out = String::new();
    for rule in rules.values() {
        out.push_str(&format!("@rule {}\n", rule.key));
        for form in rule.forms.values() {
            out.push_str(&format!("{} {}\n", form.spec, segmented(form, stem)));
        }
        out.push('\n');
    }
    out
}

/// One `matched [spec] -> lemma` line per analysis of `word`.
#[must_use]
pub fn analyses(grammar: &Grammar, word: &str) -> String {
    grammar
        .iter_rules(word)
        .map(|(lemma, matched)| format!("{matched} [{}] -> {lemma}\n", matched.spec()))
        .collect()
}

/// Every paradigm as a blank line, the rule key and indented
/// `[spec] surface` rows.
#[must_use]
pub fn paradigms(paradigms: &[Paradigm]) -> String {
    let mut out = String::new();
    for paradigm in paradigms {
        out.push('\n');
        out.push_str(&paradigm.rule);
        out.push('\n');
        for (spec, surface) in &paradigm.forms {
            out.push_str(&format!("  [{spec}] {surface}\n"));
        }
    }
    out
}

fn segmented(form: &Form, stem: &str) -> String {
    let stem = form.stem.as_deref().unwrap_or(stem);
    form.prefixes
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(stem))
        .chain(form.suffixes.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("-")
}

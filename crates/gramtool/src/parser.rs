//! The rule compiler.
//!
//! A rule source is a line-oriented text file:
//!
//! ```text
//! # comment
//! @macro as                # open a macro (include-only rule)
//! nmsn . as                # spec, prefix, suffix (`.` = empty affix)
//! nmsg . o
//!
//! @rule bankas             # open a rule
//! + as                     # include at level 0
//! +1 as nm*a . .  nm**     # level, key, spec overlay, prefix, suffix, filter
//! +* prefixes              # include at every level
//! nmsv banke               # spec and a stand-alone stem
//! ```
//!
//! [`Parser::parse`] reads the whole source first, then resolves includes
//! level by level. For every level it walks the non-macro rules in
//! declaration order, applies the directives registered for that exact level
//! and then those registered for any level. Included forms are copied into
//! the rule under expansion with their specs overlaid and their affixes
//! layered, and the walk recurses into the included rule's own directives so
//! that inheritance composes transitively.

use std::collections::VecDeque;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::grammar::{Form, Include, IncludeLevel, Rule, RuleSet};
use crate::spec::{extend, match_filter, pad, MATCH_ALL, WILDCARD};
use crate::symbols::SymbolTable;
use crate::validate::{self, Location, SyntaxError};

/// Include key naming the rule node currently being expanded.
pub const SELF_KEY: &str = ".";

/// Include key naming the rule under top-level expansion.
pub const TOP_KEY: &str = "@";

/// Affix token denoting the empty affix.
pub const EMPTY_AFFIX: &str = ".";

/// Shapes and validates specs and assembles forms.
#[derive(Debug, Clone, Copy)]
struct FormBuilder<'s> {
    symbols: &'s SymbolTable,
    strict: bool,
}

impl FormBuilder<'_> {
    /// Pads a spec to its part of speech's width and, in strict mode,
    /// validates it.
    fn shape(&self, at: Location<'_>, spec: &str) -> std::result::Result<String, SyntaxError> {
        let Some(code) = spec.chars().next() else {
            return Err(at.error("empty spec"));
        };
        if code == WILDCARD {
            return Ok(spec.to_string());
        }
        let Some(pos) = self.symbols.pos_name(code) else {
            if self.strict {
                return Err(validate::unknown_pos(self.symbols, at, code));
            }
            return Ok(spec.to_string());
        };
        let spec = pad(spec, self.symbols.properties_of(pos).len() + 1);
        if self.strict {
            validate::validate_spec(self.symbols, at, &spec, pos)?;
        }
        Ok(spec)
    }

    /// Shapes `parts.spec`, layers the affixes and inserts the form into
    /// `rule`. A spec the rule already has is an error.
    fn add_form(
        &self,
        rule: &mut Rule,
        at: Location<'_>,
        parts: FormParts,
    ) -> std::result::Result<(), SyntaxError> {
        let FormParts {
            spec,
            prefixes,
            suffixes,
            level,
            stem,
        } = parts;
        let spec = self.shape(at, &spec)?;
        if rule.forms.contains_key(&spec) {
            return Err(at.error(format!("this form \"{spec}\" is already defined")));
        }

        let mut form_prefixes: Vec<String> = Vec::with_capacity(prefixes.len());
        for prefix in prefixes.iter().map(|p| affix(p)) {
            if let Some(outer) = prefix.strip_prefix('<') {
                if !form_prefixes.is_empty() && !outer.is_empty() {
                    form_prefixes.push(outer.to_string());
                }
            } else if !prefix.is_empty() {
                form_prefixes.push(prefix.to_string());
            }
        }

        // Walk outermost-last so each new suffix lands in front of the ones
        // already placed.
        let mut form_suffixes: VecDeque<String> = VecDeque::with_capacity(suffixes.len());
        for suffix in suffixes.iter().rev().map(|s| affix(s)) {
            if let Some(outer) = suffix.strip_suffix('>') {
                if !form_suffixes.is_empty() && !outer.is_empty() {
                    form_suffixes.push_front(outer.to_string());
                }
            } else if !suffix.is_empty() {
                form_suffixes.push_front(suffix.to_string());
            }
        }

        let form = Form {
            spec: spec.clone(),
            level,
            prefixes: form_prefixes,
            suffixes: form_suffixes.into(),
            stem,
        };
        rule.forms.insert(spec, form);
        Ok(())
    }
}

/// A form before its spec is shaped and its affix tokens are layered.
///
/// Prefixes are listed innermost first and suffixes outermost first, the
/// order in which includes stack them.
#[derive(Debug, Clone)]
struct FormParts {
    spec: String,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    level: usize,
    stem: Option<String>,
}

fn affix(token: &str) -> &str {
    if token == EMPTY_AFFIX {
        ""
    } else {
        token
    }
}

/// State carried down one chain of includes.
#[derive(Debug, Clone)]
struct Expansion {
    spec: String,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    filter: String,
    chain: Vec<String>,
}

impl Expansion {
    fn root(key: &str) -> Self {
        Self {
            spec: MATCH_ALL.to_string(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            filter: MATCH_ALL.to_string(),
            chain: vec![key.to_string()],
        }
    }
}

/// Compiles one rule source into a [`RuleSet`].
///
/// A parser holds the in-progress state of a single compilation and is
/// consumed by [`Parser::parse`].
#[derive(Debug)]
pub struct Parser<'s> {
    builder: FormBuilder<'s>,
    filename: String,
    next_id: usize,
    rule: Option<Rule>,
    rules: RuleSet,
    max_include_level: usize,
}

impl<'s> Parser<'s> {
    /// Creates a strict parser over `symbols`.
    #[must_use]
    pub fn new(symbols: &'s SymbolTable) -> Self {
        Self {
            builder: FormBuilder {
                symbols,
                strict: true,
            },
            filename: String::new(),
            next_id: 0,
            rule: None,
            rules: RuleSet::new(),
            max_include_level: 0,
        }
    }

    /// Turns spec validation on or off. Padding still happens for known
    /// parts of speech when validation is off.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.builder.strict = strict;
        self
    }

    /// Parses `source` and resolves every include.
    ///
    /// Macros are dropped from the result; every other rule is returned in
    /// declaration order with its inherited forms materialized.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] locating the first malformed line, duplicate
    /// rule or form, unknown include target or circular include.
    pub fn parse(mut self, source: &str, filename: &str) -> std::result::Result<RuleSet, SyntaxError> {
        self.filename = filename.to_string();
        for (index, raw) in source.lines().enumerate() {
            let lineno = index + 1;
            let Some(line) = strip_comments(raw.trim()) else {
                continue;
            };

            if is_header(line, "@rule") || is_header(line, "@macro") {
                self.close_rule()?;
                self.open_rule(lineno, line);
            } else if line.starts_with('+') {
                self.parse_include(lineno, line)?;
            } else {
                self.parse_form(lineno, line)?;
            }
        }
        self.close_rule()?;
        self.process_includes()
    }

    fn open_rule(&mut self, lineno: usize, line: &str) {
        let (is_macro, rest) = match line.strip_prefix("@macro") {
            Some(rest) => (true, rest),
            None => (false, line.strip_prefix("@rule").unwrap_or_default()),
        };
        let name = Some(rest.trim()).filter(|name| !name.is_empty());
        self.next_id += 1;
        self.rule = Some(Rule::new(self.next_id, name.map(str::to_string), is_macro, lineno));
    }

    fn close_rule(&mut self) -> std::result::Result<(), SyntaxError> {
        if let Some(rule) = self.rule.take() {
            validate::validate_rule(&self.filename, &self.rules, &rule)?;
            self.rules.insert(rule.key.clone(), rule);
        }
        Ok(())
    }

    fn parse_form(&mut self, lineno: usize, line: &str) -> std::result::Result<(), SyntaxError> {
        let at = Location::new(&self.filename, lineno, line);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (spec, prefix, suffix, stem) = match tokens.as_slice() {
            [spec, prefix, suffix] => (*spec, *prefix, *suffix, None),
            [spec, stem] => (*spec, "", "", Some((*stem).to_string())),
            _ => return Err(at.error(format!("invalid rule form \"{line}\""))),
        };
        let Some(rule) = self.rule.as_mut() else {
            return Err(at.error(format!("form \"{line}\" is declared outside of a rule")));
        };
        let parts = FormParts {
            spec: spec.to_string(),
            prefixes: vec![prefix.to_string()],
            suffixes: vec![suffix.to_string()],
            level: 0,
            stem,
        };
        self.builder.add_form(rule, at, parts)
    }

    fn parse_include(&mut self, lineno: usize, line: &str) -> std::result::Result<(), SyntaxError> {
        let at = Location::new(&self.filename, lineno, line);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (level, key, spec, prefix, suffix, filter) = match tokens.as_slice() {
            [level, key] => (*level, *key, MATCH_ALL, "", "", MATCH_ALL),
            [level, key, spec, prefix, suffix] => (*level, *key, *spec, *prefix, *suffix, MATCH_ALL),
            [level, key, spec, prefix, suffix, filter] => (*level, *key, *spec, *prefix, *suffix, *filter),
            _ => return Err(at.error(format!("invalid include \"{line}\""))),
        };

        let level = match level.strip_prefix('+').unwrap_or(level) {
            "" => IncludeLevel::Level(0),
            "*" => IncludeLevel::Any,
            n => match n.parse::<usize>() {
                Ok(n) => IncludeLevel::Level(n),
                Err(_) => return Err(at.error(format!("invalid include level \"{level}\""))),
            },
        };

        if self.rule.is_none() {
            return Err(at.error(format!("include \"{line}\" is declared outside of a rule")));
        }
        let include = Include {
            line: lineno,
            text: line.to_string(),
            key: key.to_string(),
            spec: spec.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            filter: filter.to_string(),
        };
        if let IncludeLevel::Level(n) = level {
            self.max_include_level = self.max_include_level.max(n);
        }
        if let Some(rule) = self.rule.as_mut() {
            rule.includes.entry(level).or_default().push(include);
        }
        Ok(())
    }

    fn process_includes(mut self) -> std::result::Result<RuleSet, SyntaxError> {
        let tops: Vec<usize> = self
            .rules
            .values()
            .enumerate()
            .filter(|(_, rule)| !rule.is_macro)
            .map(|(index, _)| index)
            .collect();

        for level in 0..=self.max_include_level {
            for &top in &tops {
                let root = Expansion::root(&self.rules[top].key);
                self.expand(top, level, IncludeLevel::Level(level), top, &root)?;
                self.expand(top, level, IncludeLevel::Any, top, &root)?;
            }
        }

        self.rules.retain(|_, rule| !rule.is_macro);
        debug!(
            filename = %self.filename,
            rules = self.rules.len(),
            max_include_level = self.max_include_level,
            "compiled rule source"
        );
        Ok(self.rules)
    }

    /// Applies the directives of `node` registered under `bucket` to the top
    /// rule, then recurses into every named target.
    fn expand(
        &mut self,
        top: usize,
        level: usize,
        bucket: IncludeLevel,
        node: usize,
        state: &Expansion,
    ) -> std::result::Result<(), SyntaxError> {
        let includes = self.rules[node].includes_at(bucket).to_vec();
        let next_level = level + 1;

        for include in &includes {
            let prefixes: Vec<String> = std::iter::once(include.prefix.clone())
                .chain(state.prefixes.iter().cloned())
                .collect();
            let suffixes: Vec<String> = state
                .suffixes
                .iter()
                .cloned()
                .chain(std::iter::once(include.suffix.clone()))
                .collect();

            let target = match include.key.as_str() {
                SELF_KEY => node,
                TOP_KEY => top,
                _ => self.resolve(include, node, &state.chain)?,
            };

            let spec = extend(&state.spec, &include.spec);
            let filter = extend(&state.filter, &include.filter);
            let copies: Vec<FormParts> = self.rules[target]
                .forms
                .values()
                .filter(|form| form.level < next_level && match_filter(&filter, &form.spec))
                .map(|form| FormParts {
                    spec: extend(&form.spec, &spec),
                    prefixes: form.prefixes.iter().chain(&prefixes).cloned().collect(),
                    suffixes: suffixes.iter().chain(&form.suffixes).cloned().collect(),
                    level: next_level,
                    stem: form.stem.clone(),
                })
                .collect();

            let at = Location::new(&self.filename, include.line, &include.text);
            for parts in copies {
                self.builder.add_form(&mut self.rules[top], at, parts)?;
            }

            if !matches!(include.key.as_str(), SELF_KEY | TOP_KEY) {
                let mut chain = state.chain.clone();
                chain.push(include.key.clone());
                let nested = Expansion {
                    spec,
                    prefixes,
                    suffixes,
                    filter,
                    chain,
                };
                self.expand(top, level, IncludeLevel::Level(level), target, &nested)?;
                self.expand(top, level, IncludeLevel::Any, target, &nested)?;
            }
        }
        Ok(())
    }

    /// Looks up a named include target, rejecting unknown names and cycles.
    fn resolve(
        &self,
        include: &Include,
        node: usize,
        chain: &[String],
    ) -> std::result::Result<usize, SyntaxError> {
        let at = Location::new(&self.filename, include.line, &include.text);
        let Some(target) = self.rules.get_index_of(&include.key) else {
            return Err(at.error(format!(
                "Specified include name \"{}\" is not defined.",
                include.key
            )));
        };
        if chain.contains(&include.key) {
            return Err(at.error(format!(
                "Circular include detected, while processing {} ({} -> {})",
                self.rules[node],
                chain.join(" -> "),
                include.key
            )));
        }
        Ok(target)
    }
}

fn strip_comments(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        return None;
    }
    let line = match line.split_once('#') {
        Some((code, _comment)) => code.trim(),
        None => line,
    };
    Some(line).filter(|line| !line.is_empty())
}

fn is_header(line: &str, keyword: &str) -> bool {
    line.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'))
}

/// Compiles a rule source held in memory with a strict parser.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn compile(
    symbols: &SymbolTable,
    source: &str,
    filename: &str,
) -> std::result::Result<RuleSet, SyntaxError> {
    Parser::new(symbols).parse(source, filename)
}

/// Reads and compiles a rule file with a strict parser.
///
/// # Errors
///
/// Returns [`Error::Setup`] if the file cannot be read and [`Error::Syntax`]
/// if it does not compile.
pub fn compile_file(symbols: &SymbolTable, path: &Path) -> Result<RuleSet> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::setup(path, e))?;
    Ok(compile(symbols, &source, &path.display().to_string())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::tests::nouns;
    use crate::views;
    use pretty_assertions::assert_eq;

    const FAKE: &str = r#"{
        "pos": {"x": "fake"},
        "grammar": {"fake": ["a", "b", "c", "d", "e"]}
    }"#;

    fn fake() -> SymbolTable {
        SymbolTable::from_json(FAKE).unwrap()
    }

    fn strip(s: &str) -> String {
        s.trim()
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn parse(source: &str) -> std::result::Result<RuleSet, SyntaxError> {
        let symbols = fake();
        Parser::new(&symbols).strict(false).parse(&strip(source), "rules.gram")
    }

    /// Compiles `source` and renders every rule for `stem`.
    fn genforms(source: &str, stem: &str) -> String {
        let rules = parse(source).unwrap();
        strip(&views::rules(&rules, stem))
    }

    #[test]
    fn test_rule_include() {
        let forms = genforms(
            "
            @rule a
            xa . as

            @rule b
            xb . is
            + a

            @rule c
            + b x*c . z>
            x-c . os
            ",
            "(stem)",
        );
        assert_eq!(
            forms,
            strip(
                "
                @rule a
                xa---- (stem)-as

                @rule b
                xb---- (stem)-is
                xa---- (stem)-as

                @rule c
                x-c--- (stem)-os
                xbc--- (stem)-z-is
                xac--- (stem)-z-as
                "
            )
        );
    }

    #[test]
    fn test_macro_include() {
        let forms = genforms(
            "
            @macro a
            xa . as

            @macro b
            xb . is
            + a

            @rule c
            + b x*c . z>
            x-c . os
            ",
            "(stem)",
        );
        assert_eq!(
            forms,
            strip(
                "
                @rule c
                x-c--- (stem)-os
                xbc--- (stem)-z-is
                xac--- (stem)-z-as
                "
            )
        );
    }

    #[test]
    fn test_macro_include_levels_and_affixes() {
        let rules = parse(
            "
            @macro a
            xa . as

            @macro b
            xb . is
            + a

            @rule c
            + b x*c . z>
            x-c . os
            ",
        )
        .unwrap();
        let c = &rules["c"];
        let summary: Vec<(&str, usize, Vec<&str>)> = c
            .forms
            .values()
            .map(|f| (f.spec.as_str(), f.level, f.suffixes.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            summary,
            [
                ("x-c---", 0, vec!["os"]),
                ("xbc---", 1, vec!["z", "is"]),
                ("xac---", 1, vec!["z", "as"]),
            ]
        );
    }

    const GALVOTI: &str = "
        @rule galvoti
        x-----  galvo-ti
        x---s-  galvo-tis
        xn----  ne-galvo-ti
        x-b---  is-galvo-ti
        xnb---  ne-is-galvo-ti
        x--p--  su-galvo-ti
        xn-p--  ne-su-galvo-ti
        xn--s-  ne-si-galvo-ti
        x-b-s-  is-si-galvo-ti
        xnb-s-  ne-is-si-galvo-ti
        x--ps-  su-si-galvo-ti
        xn-ps-  ne-su-si-galvo-ti
    ";

    fn collapse(s: &str) -> String {
        strip(s)
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_levels() {
        let forms = genforms(
            "
            @rule galvoti
            x     . ti
            x---s . tis
            +  . xn     ne .  x***-
            +1 . x*b    is .  x***-
            +1 . x**p   su .  x***-
            +2 . x***s <si . !x---*
            ",
            "galvo",
        );
        assert_eq!(forms, collapse(GALVOTI));
    }

    #[test]
    fn test_levels_macro() {
        let forms = genforms(
            "
            @macro prefixes
            +  @ xn     ne .  x***-
            +1 @ x*b    is .  x***-
            +1 @ x**p   su .  x***-

            @rule galvoti
            x     . ti
            x---s . tis
            +* prefixes
            +2 . ****s <si . !x---*
            ",
            "galvo",
        );
        assert_eq!(forms, collapse(GALVOTI));
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let source = "
            @macro prefixes
            +  @ xn     ne .  x***-
            +1 @ x*b    is .  x***-

            @rule galvoti
            x     . ti
            +* prefixes
            +2 . ****s <si . !x---*
        ";
        let first = parse(source).unwrap();
        let second = parse(source).unwrap();
        let shape = |rules: &RuleSet| -> Vec<Form> {
            rules.values().flat_map(|r| r.forms.values().cloned()).collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let rules = parse(
            "
            # a leading comment
            @rule a   # trailing comment

            xa . as   # accusative

            #xb . is
            ",
        )
        .unwrap();
        assert_eq!(rules["a"].forms.len(), 1);
    }

    #[test]
    fn test_anonymous_rules_are_keyed_by_id() {
        let rules = parse(
            "
            @rule
            xa . as
            @macro m
            xb . is
            @rule
            + m
            ",
        )
        .unwrap();
        let keys: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(keys, ["1", "3"]);
        assert_eq!(rules["3"].forms["xb----"].suffixes, ["is"]);
    }

    #[test]
    fn test_explicit_stems_survive_inclusion() {
        let rules = parse(
            "
            @macro suo
            xa šuo
            xb šuns

            @rule dog
            + suo
            ",
        )
        .unwrap();
        let stems: Vec<_> = rules["dog"].forms.values().map(|f| f.stem.as_deref()).collect();
        assert_eq!(stems, [Some("šuo"), Some("šuns")]);
    }

    #[test]
    fn test_outer_prefix_requires_existing_prefix() {
        let rules = parse(
            "
            @rule a
            xa . as
            xb ne as
            + . **c <si .
            ",
        )
        .unwrap();
        let a = &rules["a"];
        assert!(a.forms["xac---"].prefixes.is_empty());
        assert_eq!(a.forms["xbc---"].prefixes, ["ne", "si"]);
    }

    #[test]
    fn test_duplicate_form() {
        let err = parse(
            "
            @rule a
            xa . as
            xa . is
            ",
        )
        .unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "this form \"xa----\" is already defined");
    }

    #[test]
    fn test_duplicate_form_from_include() {
        let err = parse(
            "
            @rule a
            xa . as
            @rule b
            xa . is
            + a
            ",
        )
        .unwrap_err();
        assert_eq!(err.line, 5);
    }

    #[test]
    fn test_duplicate_rule() {
        let err = parse(
            "
            @rule a
            xa . as
            @macro a
            xb . is
            ",
        )
        .unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "rules with name \"a\" already defined in 1 line.");
    }

    #[test]
    fn test_unknown_include() {
        let err = parse(
            "
            @rule a
            + missing
            ",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error in rules.gram:2: Specified include name \"missing\" is not defined.");
    }

    #[test]
    fn test_circular_include() {
        let err = parse(
            "
            @rule a
            xa . as
            + b

            @rule b
            xb . is
            + a
            ",
        )
        .unwrap_err();
        assert_eq!(err.line, 7);
        assert!(err.message.starts_with("Circular include detected"), "{}", err.message);
    }

    #[test]
    fn test_circular_include_through_macros() {
        let err = parse(
            "
            @macro m1
            + m2
            @macro m2
            + m1
            @rule r
            xa . as
            + m1
            ",
        )
        .unwrap_err();
        assert!(err.message.starts_with("Circular include detected"), "{}", err.message);
    }

    #[test]
    fn test_self_include_by_name_is_circular() {
        let err = parse(
            "
            @rule a
            xa . as
            +1 a
            ",
        )
        .unwrap_err();
        assert!(err.message.starts_with("Circular include detected"));
    }

    #[test]
    fn test_invalid_form_token_count() {
        let err = parse(
            "
            @rule a
            xa . as extra
            ",
        )
        .unwrap_err();
        assert_eq!(err.message, "invalid rule form \"xa . as extra\"");
    }

    #[test]
    fn test_invalid_include_token_count() {
        let err = parse(
            "
            @rule a
            + b xa .
            ",
        )
        .unwrap_err();
        assert_eq!(err.message, "invalid include \"+ b xa .\"");
    }

    #[test]
    fn test_invalid_include_level() {
        let err = parse(
            "
            @rule a
            +x b
            ",
        )
        .unwrap_err();
        assert_eq!(err.message, "invalid include level \"+x\"");
    }

    #[test]
    fn test_lines_outside_rules() {
        assert!(parse("xa . as").is_err());
        assert!(parse("+ a").is_err());
    }

    #[test]
    fn test_strict_mode_validates_specs() {
        let symbols = nouns();
        let ok = Parser::new(&symbols).parse("@rule a\nnmsn . as\nnm . o", "lt");
        assert_eq!(ok.unwrap()["a"].forms.keys().collect::<Vec<_>>(), ["nmsn", "nm--"]);

        let err = Parser::new(&symbols)
            .parse("@rule a\nqmsn . as", "lt")
            .unwrap_err();
        assert!(err.message.starts_with("unknown part of speech \"q\""));

        let err = Parser::new(&symbols)
            .parse("@rule a\nnmsnn . as", "lt")
            .unwrap_err();
        assert!(err.message.starts_with("noun has 3 grammatical categories"));

        let err = Parser::new(&symbols)
            .parse("@rule a\nnmzn . as", "lt")
            .unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.starts_with("\"z\" in 3 position"));
    }

    #[test]
    fn test_non_strict_mode_keeps_unknown_pos_unpadded() {
        let symbols = nouns();
        let rules = Parser::new(&symbols)
            .strict(false)
            .parse("@rule a\n%xs1p go\nnmzn . as", "lt")
            .unwrap();
        assert_eq!(rules["a"].forms.keys().collect::<Vec<_>>(), ["%xs1p", "nmzn"]);
    }

    #[test]
    fn test_compile_file_missing_is_setup_error() {
        let symbols = fake();
        let err = compile_file(&symbols, Path::new("/nonexistent/grammar")).unwrap_err();
        assert!(err.is_setup());
    }
}

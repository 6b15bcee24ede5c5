//! The symbol table: the schema every spec is interpreted against.
//!
//! A symbol table names the parts of speech, lists the ordered grammatical
//! properties of each part of speech and maps every property's single
//! character codes to readable value names. It is loaded from JSON with
//! [`facet_json`] and is read-only afterwards.

use facet::Facet;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Name of the pseudo-property that addresses slot 0 of a spec.
pub const POS: &str = "pos";

/// Suffix marking a value that is fixed for the word (e.g. `singular-only`).
pub const ONLY_MARKER: &str = "-only";

/// The grammatical categories of a language.
///
/// ```json
/// {
///   "pos": {"n": "noun"},
///   "grammar": {"noun": ["gender", "number", "case"]},
///   "properties": {"number": {"s": "singular", "S": "singular-only"}}
/// }
/// ```
#[derive(Debug, Clone, Default, Facet)]
pub struct SymbolTable {
    /// Part-of-speech code to part-of-speech name.
    pub pos: HashMap<String, String>,

    /// Part-of-speech name to its ordered property names.
    pub grammar: HashMap<String, Vec<String>>,

    /// Property name to its code-to-value map.
    #[facet(default)]
    pub properties: HashMap<String, HashMap<String, String>>,
}

/// Problems found while loading a symbol table.
#[derive(Debug, thiserror::Error)]
pub enum SymbolsError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("JSON parse error: {0}")]
    Json(String),

    /// A code in `pos` or in a property map is not exactly one character.
    #[error("code {code:?} of '{property}' must be a single character")]
    Code {
        /// The table the code was found in (`pos` or a property name).
        property: String,
        /// The offending code.
        code: String,
    },
}

impl SymbolTable {
    /// Parse a symbol table from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolsError::Json`] for malformed documents and
    /// [`SymbolsError::Code`] when a code is not a single character.
    pub fn from_json(json: &str) -> std::result::Result<Self, SymbolsError> {
        let table: SymbolTable =
            facet_json::from_str(json).map_err(|e| SymbolsError::Json(e.to_string()))?;
        table.check_codes()?;
        Ok(table)
    }

    /// Read and parse a symbol table file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Setup`] if the file cannot be read and
    /// [`Error::SymbolTable`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::setup(path, e))?;
        Self::from_json(&json).map_err(|e| Error::SymbolTable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn check_codes(&self) -> std::result::Result<(), SymbolsError> {
        let tables = std::iter::once((POS, &self.pos))
            .chain(self.properties.iter().map(|(k, v)| (k.as_str(), v)));
        for (property, codes) in tables {
            if let Some(code) = codes.keys().find(|code| code.chars().count() != 1) {
                return Err(SymbolsError::Code {
                    property: property.to_string(),
                    code: code.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the part-of-speech name for a code.
    #[must_use]
    pub fn pos_name(&self, code: char) -> Option<&str> {
        lookup(&self.pos, code)
    }

    /// Returns the ordered property names of a part of speech (empty when the
    /// part of speech declares none).
    #[must_use]
    pub fn properties_of(&self, pos_name: &str) -> &[String] {
        self.grammar.get(pos_name).map_or(&[], Vec::as_slice)
    }

    /// Returns the slot names of a spec for the given part of speech: `pos`
    /// followed by its properties.
    pub fn slots<'a>(&'a self, pos_name: &str) -> impl Iterator<Item = &'a str> {
        std::iter::once(POS).chain(self.properties_of(pos_name).iter().map(String::as_str))
    }

    /// Returns the code map of a property. `pos` resolves to the part of
    /// speech table.
    #[must_use]
    pub fn symbols(&self, property: &str) -> Option<&HashMap<String, String>> {
        if property == POS {
            Some(&self.pos)
        } else {
            self.properties.get(property)
        }
    }

    /// Returns `true` if the property is `pos` or has a code map.
    #[must_use]
    pub fn is_known(&self, property: &str) -> bool {
        self.symbols(property).is_some()
    }

    /// Returns the value name of `code` for `property`.
    #[must_use]
    pub fn value(&self, property: &str, code: char) -> Option<&str> {
        self.symbols(property).and_then(|codes| lookup(codes, code))
    }

    /// Returns `true` if `value` is one of the property's value names.
    #[must_use]
    pub fn has_value(&self, property: &str, value: &str) -> bool {
        self.symbols(property)
            .is_some_and(|codes| codes.values().any(|v| v == value))
    }

    /// Returns the code whose value name is exactly `value`. When several
    /// codes share the value the smallest code wins.
    #[must_use]
    pub fn code_of(&self, property: &str, value: &str) -> Option<char> {
        self.symbols(property)?
            .iter()
            .filter(|(_, v)| *v == value)
            .filter_map(|(k, _)| k.chars().next())
            .min()
    }

    /// Returns the `(code, value)` pairs of a property sorted by code.
    #[must_use]
    pub fn options(&self, property: &str) -> Vec<(char, &str)> {
        let mut options: Vec<(char, &str)> = self
            .symbols(property)
            .into_iter()
            .flatten()
            .filter_map(|(k, v)| k.chars().next().map(|c| (c, v.as_str())))
            .collect();
        options.sort_unstable();
        options
    }
}

fn lookup(codes: &HashMap<String, String>, code: char) -> Option<&str> {
    let mut buf = [0u8; 4];
    codes.get(&*code.encode_utf8(&mut buf)).map(String::as_str)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const NOUNS: &str = r#"{
        "pos": {"n": "noun", "v": "verb"},
        "grammar": {"noun": ["gender", "number", "case"], "verb": []},
        "properties": {
            "gender": {"m": "masculine", "M": "masculine-only", "f": "feminine"},
            "number": {"s": "singular", "S": "singular-only", "p": "plural"},
            "case": {
                "n": "nominative", "g": "genitive", "d": "dative", "a": "accusative",
                "i": "instrumental", "l": "locative", "v": "vocative"
            }
        }
    }"#;

    pub(crate) fn nouns() -> SymbolTable {
        SymbolTable::from_json(NOUNS).unwrap()
    }

    #[test]
    fn test_parse_symbol_table() {
        let symbols = nouns();
        assert_eq!(symbols.pos_name('n'), Some("noun"));
        assert_eq!(symbols.pos_name('x'), None);
        assert_eq!(symbols.properties_of("noun"), ["gender", "number", "case"]);
        assert!(symbols.properties_of("verb").is_empty());
        assert!(symbols.properties_of("adverb").is_empty());
    }

    #[test]
    fn test_slots_start_with_pos() {
        let symbols = nouns();
        let slots: Vec<_> = symbols.slots("noun").collect();
        assert_eq!(slots, ["pos", "gender", "number", "case"]);
    }

    #[test]
    fn test_value_lookups() {
        let symbols = nouns();
        assert_eq!(symbols.value("number", 'S'), Some("singular-only"));
        assert_eq!(symbols.value("pos", 'v'), Some("verb"));
        assert_eq!(symbols.value("number", '-'), None);
        assert_eq!(symbols.code_of("case", "accusative"), Some('a'));
        assert_eq!(symbols.code_of("case", "ablative"), None);
        assert!(symbols.has_value("gender", "masculine-only"));
        assert!(symbols.is_known("pos"));
        assert!(!symbols.is_known("tense"));
    }

    #[test]
    fn test_options_are_sorted() {
        let symbols = nouns();
        assert_eq!(
            symbols.options("number"),
            [('S', "singular-only"), ('p', "plural"), ('s', "singular")]
        );
    }

    #[test]
    fn test_multi_character_code_is_rejected() {
        let json = r#"{"pos": {"nn": "noun"}, "grammar": {}}"#;
        let err = SymbolTable::from_json(json).unwrap_err();
        assert!(matches!(err, SymbolsError::Code { ref code, .. } if code == "nn"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = SymbolTable::from_json("{\"pos\": ").unwrap_err();
        assert!(matches!(err, SymbolsError::Json(_)));
    }

    #[test]
    fn test_load_missing_file_is_setup_error() {
        let err = SymbolTable::load(Path::new("/nonexistent/symbols.json")).unwrap_err();
        assert!(err.is_setup());
    }
}

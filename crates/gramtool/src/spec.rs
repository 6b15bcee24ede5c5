//! Spec algebra: pure functions over fixed-width code strings.
//!
//! A spec encodes a word form's grammatical properties one character per
//! slot. Slot 0 holds the part-of-speech code; the remaining slots follow the
//! property order the [`SymbolTable`] declares for that part of speech.
//!
//! Two families of functions live here. The wildcard functions ([`extend`],
//! [`match_filter`]) are purely positional and drive include resolution in
//! the compiler. The table-driven functions ([`check`], [`apply_change`],
//! [`describe`]) interpret a spec through the symbol table and back the
//! query surface.

use indexmap::IndexMap;

use crate::symbols::{SymbolTable, ONLY_MARKER, POS};

/// Matches any code; in an overlay it keeps the base code.
pub const WILDCARD: char = '*';

/// Marks an absent property; used to pad short specs.
pub const FILLER: char = '-';

/// Leading character of a filter that inverts the whole match.
pub const NEGATION: char = '!';

/// A deliberately unspecified slot, accepted by strict validation.
pub const UNSPECIFIED: char = '?';

/// The overlay/filter that matches everything.
pub const MATCH_ALL: &str = "*";

/// Invalid arguments passed to the table-driven spec functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The spec is empty, so it has no part of speech.
    #[error("unknown 'pos' symbol")]
    MissingPos,

    /// The part-of-speech code is not in the symbol table.
    #[error("unknown symbol '{0}' of 'pos'")]
    UnknownPos(char),

    /// The property name is not in the symbol table.
    #[error("unknown symbol '{0}'")]
    UnknownProperty(String),

    /// The value is not one of the property's value names.
    #[error("unknown symbol '{value}' of '{property}'")]
    UnknownValue {
        /// The property that was queried.
        property: String,
        /// The requested value name.
        value: String,
    },

    /// The spec is too short to hold the property.
    #[error("unknown '{property}' symbol at position {position}")]
    MissingSlot {
        /// The property whose slot is missing.
        property: String,
        /// 1-based position of the missing slot.
        position: usize,
    },

    /// The slot holds a code the property does not declare.
    #[error("unknown symbol '{code}' of '{property}' at position {position}")]
    UnknownCode {
        /// The property of the slot.
        property: String,
        /// The undeclared code.
        code: char,
        /// 1-based position of the slot.
        position: usize,
    },
}

/// Overlays `overlay` onto `base` position by position.
///
/// Positions where the overlay holds [`WILDCARD`] keep the base code. The
/// shorter string is padded with wildcards, so the result is as long as the
/// longer input. An overlay of exactly `*` returns `base` unchanged.
#[must_use]
pub fn extend(base: &str, overlay: &str) -> String {
    if overlay == MATCH_ALL {
        return base.to_string();
    }
    let base: Vec<char> = base.chars().collect();
    let overlay: Vec<char> = overlay.chars().collect();
    let len = base.len().max(overlay.len());
    (0..len)
        .map(|i| {
            let b = base.get(i).copied().unwrap_or(WILDCARD);
            match overlay.get(i).copied().unwrap_or(WILDCARD) {
                WILDCARD => b,
                o => o,
            }
        })
        .collect()
}

/// Returns `true` if `spec` matches `filter` position by position.
///
/// [`WILDCARD`] matches any code; every other filter character matches only
/// itself. A filter longer than the spec never matches. A leading
/// [`NEGATION`] inverts the final result, including the length failure.
#[must_use]
pub fn match_filter(filter: &str, spec: &str) -> bool {
    let (filter, expected) = match filter.strip_prefix(NEGATION) {
        Some(rest) => (rest, false),
        None => (filter, true),
    };
    if filter.chars().count() > spec.chars().count() {
        return !expected;
    }
    let matched = filter
        .chars()
        .zip(spec.chars())
        .all(|(f, s)| f == WILDCARD || f == s);
    matched == expected
}

/// Pads `spec` on the right with [`FILLER`] up to `len` characters.
#[must_use]
pub fn pad(spec: &str, len: usize) -> String {
    let missing = len.saturating_sub(spec.chars().count());
    let mut padded = String::with_capacity(spec.len() + missing);
    padded.push_str(spec);
    padded.extend(std::iter::repeat_n(FILLER, missing));
    padded
}

/// Returns the part-of-speech name of a spec.
fn pos_of<'a>(symbols: &'a SymbolTable, spec: &str) -> Result<&'a str, SpecError> {
    let code = spec.chars().next().ok_or(SpecError::MissingPos)?;
    symbols.pos_name(code).ok_or(SpecError::UnknownPos(code))
}

/// Returns the slot index of `property` in specs of `pos`, if it has one.
fn slot_of(symbols: &SymbolTable, pos: &str, property: &str) -> Option<usize> {
    symbols.slots(pos).position(|slot| slot == property)
}

/// Checks whether a spec carries the requested property values.
///
/// A slot accepts `value` if its value name is `value` or `value-only`. A
/// property that is declared in the table but is not a slot of this part of
/// speech is ignored. Filler and missing slots never match.
///
/// # Errors
///
/// Returns [`SpecError::UnknownProperty`] for property names the table does
/// not know, [`SpecError::UnknownValue`] for values the property does not
/// declare and [`SpecError::UnknownPos`]/[`SpecError::MissingPos`] when the
/// spec's part of speech cannot be resolved.
pub fn check(symbols: &SymbolTable, spec: &str, wanted: &[(&str, &str)]) -> Result<bool, SpecError> {
    let pos = pos_of(symbols, spec)?;
    for &(property, value) in wanted {
        let Some(index) = slot_of(symbols, pos, property) else {
            if symbols.is_known(property) {
                continue;
            }
            return Err(SpecError::UnknownProperty(property.to_string()));
        };
        if !symbols.has_value(property, value) {
            return Err(SpecError::UnknownValue {
                property: property.to_string(),
                value: value.to_string(),
            });
        }
        let name = spec
            .chars()
            .nth(index)
            .and_then(|code| symbols.value(property, code));
        let accepted = name.is_some_and(|name| {
            name == value || name.strip_suffix(ONLY_MARKER) == Some(value)
        });
        if !accepted {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Rewrites the slots of the requested properties to the codes of the
/// requested values.
///
/// # Errors
///
/// Same conditions as [`check`].
pub fn apply_change(
    symbols: &SymbolTable,
    spec: &str,
    wanted: &[(&str, &str)],
) -> Result<String, SpecError> {
    let pos = pos_of(symbols, spec)?;
    let mut codes: Vec<char> = spec.chars().collect();
    for &(property, value) in wanted {
        let Some(index) = slot_of(symbols, pos, property) else {
            if symbols.is_known(property) {
                continue;
            }
            return Err(SpecError::UnknownProperty(property.to_string()));
        };
        let code = symbols
            .code_of(property, value)
            .ok_or_else(|| SpecError::UnknownValue {
                property: property.to_string(),
                value: value.to_string(),
            })?;
        if codes.len() <= index {
            codes.resize(index + 1, FILLER);
        }
        codes[index] = code;
    }
    Ok(codes.into_iter().collect())
}

/// Expands a spec into its ordered `{slot: value}` description.
///
/// The `-only` marker is stripped from values, so an invariant singular
/// reads as `singular`.
///
/// # Errors
///
/// Returns an error naming the first slot that is missing or holds a code the
/// table does not declare.
pub fn describe(symbols: &SymbolTable, spec: &str) -> Result<IndexMap<String, String>, SpecError> {
    let pos = pos_of(symbols, spec)?;
    let codes: Vec<char> = spec.chars().collect();
    let mut properties = IndexMap::new();
    properties.insert(POS.to_string(), pos.to_string());
    for (index, property) in symbols.properties_of(pos).iter().enumerate().map(|(i, p)| (i + 1, p)) {
        let code = *codes.get(index).ok_or_else(|| SpecError::MissingSlot {
            property: property.clone(),
            position: index + 1,
        })?;
        let value = symbols
            .value(property, code)
            .ok_or_else(|| SpecError::UnknownCode {
                property: property.clone(),
                code,
                position: index + 1,
            })?;
        let value = value.strip_suffix(ONLY_MARKER).unwrap_or(value);
        properties.insert(property.clone(), value.to_string());
    }
    Ok(properties)
}

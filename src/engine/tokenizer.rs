//! Template tokenizer.
//!
//! A template is scanned left to right against the locale's ordered matcher
//! table; the first matcher that fits at the current position wins. Raw
//! matches are then merged so that each unit token carries the literal text
//! that belongs to it:
//!
//! ```text
//! "h [hours], m [minutes]"
//!   raw:    h | " " | hours | "," | " " | m | " " | minutes
//!   merged: (Hours, " hours, ") (Minutes, " minutes")
//! ```
//!
//! With left-hand units the merge runs right to left and the text attaches to
//! the unit that follows it instead.

use crate::locale::LocaleData;
use crate::{Token, UnitType};

/// Tokenized template plus the distinct unit types it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    pub tokens: Vec<Token>,
    /// Distinct temporal units, largest first.
    pub units: Vec<UnitType>,
}

impl Template {
    /// Concatenated literal text, used when no unit token was found.
    pub fn literal_text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn length_of(&self, unit: UnitType) -> usize {
        self.tokens.iter().find(|t| t.unit == Some(unit)).map_or(0, |t| t.length)
    }

    pub fn is_stop_trim(&self, unit: UnitType) -> bool {
        self.tokens.iter().any(|t| t.unit == Some(unit) && t.stop_trim)
    }
}

/// Replace every `_ALIAS_` with its expansion.
pub(crate) fn expand_aliases(template: &str, locale: &LocaleData) -> String {
    let mut out = template.to_string();
    for (alias, expansion) in locale.time_templates() {
        out = out.replace(&format!("_{alias}_"), expansion);
    }
    out
}

/// Scan `template` into raw tokens. Escapes and general characters come back
/// with `unit == None`.
fn scan(template: &str, locale: &LocaleData) -> Vec<Token> {
    let mut raw = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        let rest = &template[pos..];
        let hit = locale.matchers().iter().find_map(|(unit, re)| {
            let caps = re.captures(rest)?;
            let whole = caps.get(0)?;
            (!whole.as_str().is_empty()).then(|| (*unit, whole.as_str(), caps.get(1).map(|m| m.as_str())))
        });

        let (unit, matched, inner) = match hit {
            Some(hit) => hit,
            // Only reachable with a custom matcher table lacking a catch-all.
            None => {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                (UnitType::General, &rest[..len], None)
            }
        };
        pos += matched.len();

        let token = match unit {
            UnitType::Escape => {
                Token { unit: None, text: inner.unwrap_or(matched).to_string(), length: 0, stop_trim: false }
            }
            UnitType::General => Token { unit: None, text: matched.to_string(), length: 0, stop_trim: false },
            unit => {
                let stop_trim = matched.starts_with('*');
                let body = matched.strip_prefix('*').unwrap_or(matched);
                Token { unit: Some(unit), text: String::new(), length: body.chars().count(), stop_trim }
            }
        };
        raw.push(token);
    }

    raw
}

/// Fold literal tokens into their neighbouring unit tokens.
fn merge(raw: Vec<Token>, use_left_units: bool) -> Vec<Token> {
    let mut raw = raw;
    if use_left_units {
        raw.reverse();
    }

    let mut merged = Vec::new();
    let mut current = Token { unit: None, text: String::new(), length: 0, stop_trim: false };

    for token in raw {
        if token.unit.is_some() {
            if current.unit.is_some() || !current.text.is_empty() {
                merged.push(current);
            }
            current = token;
            continue;
        }
        if use_left_units {
            current.text.insert_str(0, &token.text);
        } else {
            current.text.push_str(&token.text);
        }
    }
    if current.unit.is_some() || !current.text.is_empty() {
        merged.push(current);
    }

    if use_left_units {
        merged.reverse();
    }
    merged
}

pub(crate) fn tokenize(template: &str, locale: &LocaleData, use_left_units: bool) -> Template {
    let expanded = expand_aliases(template, locale);
    let mut tokens = merge(scan(&expanded, locale), use_left_units);

    // All tokens of a unit take the first occurrence's length.
    let mut units: Vec<(UnitType, usize)> = Vec::new();
    for token in &mut tokens {
        let Some(unit) = token.unit else { continue };
        match units.iter().find(|(u, _)| *u == unit) {
            Some((_, length)) => token.length = *length,
            None => units.push((unit, token.length)),
        }
    }

    let mut units: Vec<UnitType> = units.into_iter().map(|(u, _)| u).collect();
    units.sort();

    Template { tokens, units }
}

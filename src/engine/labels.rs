//! Unit labels.
//!
//! Two mechanisms, tried in order:
//!
//! 1. Placeholders. `__` (standard) and `_` (short) in a token's text are
//!    replaced with the pluralized label. The standard placeholder is checked
//!    first so `__` is not consumed as two short ones.
//! 2. Plural correction. Without a placeholder, a label already written in the
//!    template (`s [seconds]`) is swapped for the correct plural form.

use super::values::UnitValue;
use crate::locale::{Label, LocaleData};

/// Plural key for a rendered value, from its canonical digits.
pub(crate) fn plural_key(value: &UnitValue, locale: &LocaleData) -> Option<String> {
    let code = value.unit.label_code()?;
    let (int_part, frac_part) = value.canonical_digits.split_once('.').unwrap_or((value.canonical_digits.as_str(), ""));
    let integer = int_part.parse::<u64>().unwrap_or(0);
    let decimal = (!frac_part.is_empty()).then(|| format!("0.{frac_part}").parse::<f64>().unwrap_or(0.0));
    Some(locale.plural_key(code, integer, decimal))
}

/// Localize the literal text attached to a unit token.
pub(crate) fn localize(text: &str, value: &UnitValue, locale: &LocaleData, use_plural: bool) -> String {
    let Some(code) = value.unit.label_code() else { return text.to_string() };
    let Some(key) = plural_key(value, locale) else { return text.to_string() };
    let labels = locale.labels_for(code);

    let mut out = text.to_string();
    let mut auto_localized = false;

    for label_type in locale.label_types() {
        if !out.contains(&label_type.placeholder) {
            continue;
        }
        let Some(label) = labels.iter().find(|l| l.label_type == label_type.name && l.key == key) else { continue };
        out = out.replacen(&label_type.placeholder, &label.text, 1);
        auto_localized = true;
    }

    if use_plural && !auto_localized {
        out = correct_plural(out, &labels, &key);
    }
    out
}

fn correct_plural(text: String, labels: &[&Label], key: &str) -> String {
    let mut by_length: Vec<&Label> = labels.to_vec();
    by_length.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

    for label in by_length {
        if !text.contains(&label.text) {
            continue;
        }
        if label.key == key {
            return text;
        }
        let Some(correct) = labels.iter().find(|l| l.label_type == label.label_type && l.key == key) else {
            return text;
        };
        return text.replacen(&label.text, &correct.text, 1);
    }
    text
}

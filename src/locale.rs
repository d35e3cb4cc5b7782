//! Locale data for unit labels and pluralization.
//!
//! A locale bundles:
//!
//! - the ordered unit matcher table the tokenizer scans templates with,
//! - time-template aliases (`_HMS_` -> `h:mm:ss`),
//! - label tables, one per label type (`standard`, `short`), keyed by unit
//!   code (`s` singular, `ss` plural),
//! - a plural rule choosing the key for a rendered value.
//!
//! `en` is built in. Other locales can be registered at runtime; lookups that
//! miss fall back to the language part of the tag, then to `en`.

use crate::{FormatError, UnitType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Chooses a label key from a unit code and the rendered value split into
/// its integer part and (when present) decimal part.
pub type PluralRule = fn(code: char, integer: u64, decimal: Option<f64>) -> String;

/// A family of labels plus the placeholder that auto-inserts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelType {
    pub name: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Name of the [`LabelType`] this label belongs to.
    pub label_type: String,
    /// Plural key, e.g. `s` or `ss`.
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct LocaleData {
    name: String,
    matchers: Vec<(UnitType, Regex)>,
    time_templates: Vec<(String, String)>,
    label_types: Vec<LabelType>,
    labels: Vec<Label>,
    plural_rule: PluralRule,
}

static LOCALES: Lazy<RwLock<HashMap<String, Arc<LocaleData>>>> = Lazy::new(|| {
    let en = Arc::new(LocaleData::english());
    RwLock::new(HashMap::from([(en.name.clone(), en)]))
});

/// Register (or replace) a locale.
pub fn register_locale(data: LocaleData) {
    let mut locales = LOCALES.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    locales.insert(data.name.clone(), Arc::new(data));
}

/// Look up locale data, falling back to the language subtag and then `en`.
pub fn locale_data(name: &str) -> Arc<LocaleData> {
    let locales = LOCALES.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    let language = name.split(['-', '_']).next().unwrap_or(name);
    locales
        .get(name)
        .or_else(|| locales.get(language))
        .or_else(|| locales.get("en"))
        .cloned()
        .unwrap_or_else(|| Arc::new(LocaleData::english()))
}

impl LocaleData {
    /// A locale with English matchers, label types and plural rule but no
    /// labels or aliases. Fill it in with the `with_*` methods.
    pub fn new(name: impl Into<String>) -> Self {
        LocaleData {
            name: name.into(),
            matchers: default_matchers(),
            time_templates: Vec::new(),
            label_types: vec![
                LabelType { name: "standard".to_string(), placeholder: "__".to_string() },
                LabelType { name: "short".to_string(), placeholder: "_".to_string() },
            ],
            labels: Vec::new(),
            plural_rule: english_plural_key,
        }
    }

    pub fn english() -> Self {
        let standard = [
            ("S", "millisecond"),
            ("SS", "milliseconds"),
            ("s", "second"),
            ("ss", "seconds"),
            ("m", "minute"),
            ("mm", "minutes"),
            ("h", "hour"),
            ("hh", "hours"),
            ("d", "day"),
            ("dd", "days"),
            ("w", "week"),
            ("ww", "weeks"),
            ("M", "month"),
            ("MM", "months"),
            ("y", "year"),
            ("yy", "years"),
        ];
        let short = [
            ("S", "msec"),
            ("SS", "msecs"),
            ("s", "sec"),
            ("ss", "secs"),
            ("m", "min"),
            ("mm", "mins"),
            ("h", "hr"),
            ("hh", "hrs"),
            ("d", "dy"),
            ("dd", "dys"),
            ("w", "wk"),
            ("ww", "wks"),
            ("M", "mo"),
            ("MM", "mos"),
            ("y", "yr"),
            ("yy", "yrs"),
        ];

        let mut data = LocaleData::new("en")
            .with_time_template("HMS", "h:mm:ss")
            .with_time_template("HM", "h:mm")
            .with_time_template("MS", "m:ss");
        for (key, text) in standard {
            data = data.with_label("standard", key, text);
        }
        for (key, text) in short {
            data = data.with_label("short", key, text);
        }
        data
    }

    pub fn with_time_template(mut self, alias: impl Into<String>, expansion: impl Into<String>) -> Self {
        self.time_templates.push((alias.into(), expansion.into()));
        self
    }

    pub fn with_label(
        mut self,
        label_type: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let label = Label { label_type: label_type.into(), key: key.into(), text: text.into() };
        self.labels.retain(|l| !(l.label_type == label.label_type && l.key == label.key));
        self.labels.push(label);
        self
    }

    /// Replace the label types. Placeholders are tried in the given order.
    pub fn with_label_types(mut self, label_types: Vec<LabelType>) -> Self {
        self.label_types = label_types;
        self
    }

    pub fn with_plural_rule(mut self, rule: PluralRule) -> Self {
        self.plural_rule = rule;
        self
    }

    /// Replace the matcher for one unit. The pattern is anchored to the scan
    /// position automatically.
    pub fn with_unit_pattern(mut self, unit: UnitType, pattern: &str) -> Result<Self, FormatError> {
        let regex = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|err| FormatError::InvalidPattern { unit: unit.to_string(), message: err.to_string() })?;
        match self.matchers.iter_mut().find(|(u, _)| *u == unit) {
            Some(entry) => entry.1 = regex,
            None => {
                self.matchers.push((unit, regex));
                self.matchers.sort_by_key(|(u, _)| *u);
            }
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn matchers(&self) -> &[(UnitType, Regex)] {
        &self.matchers
    }

    pub(crate) fn time_templates(&self) -> &[(String, String)] {
        &self.time_templates
    }

    pub(crate) fn label_types(&self) -> &[LabelType] {
        &self.label_types
    }

    /// All labels of every type whose key belongs to `code`.
    pub(crate) fn labels_for(&self, code: char) -> Vec<&Label> {
        self.labels.iter().filter(|l| l.key.starts_with(code)).collect()
    }

    pub(crate) fn plural_key(&self, code: char, integer: u64, decimal: Option<f64>) -> String {
        (self.plural_rule)(code, integer, decimal)
    }
}

/// Singular for `1`, but not for `1.0`.
fn english_plural_key(code: char, integer: u64, decimal: Option<f64>) -> String {
    if integer == 1 && decimal.is_none() { code.to_string() } else { format!("{code}{code}") }
}

fn default_matchers() -> Vec<(UnitType, Regex)> {
    vec![
        (UnitType::Escape, regex!(r"^\[(.+?)\]").clone()),
        (UnitType::Years, regex!(r"^\*?[Yy]+").clone()),
        (UnitType::Months, regex!(r"^\*?M+").clone()),
        (UnitType::Weeks, regex!(r"^\*?[Ww]+").clone()),
        (UnitType::Days, regex!(r"^\*?[Dd]+").clone()),
        (UnitType::Hours, regex!(r"^\*?[Hh]+").clone()),
        (UnitType::Minutes, regex!(r"^\*?m+").clone()),
        (UnitType::Seconds, regex!(r"^\*?s+").clone()),
        (UnitType::Milliseconds, regex!(r"^\*?S+").clone()),
        (UnitType::General, regex!(r"^(?s).").clone()),
    ]
}

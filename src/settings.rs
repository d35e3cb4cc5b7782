//! Per-call formatting configuration.

use crate::{FormatError, UnitType};
use std::str::FromStr;

bitflags::bitflags! {
    /// Which zero-valued units get removed from the output.
    ///
    /// `LARGE` trims from the front, `SMALL` from the back, `MID` removes
    /// interior zeros and `FINAL` drops a lone remaining zero unit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrimPolicy: u8 {
        const LARGE = 1 << 0;
        const SMALL = 1 << 1;
        const MID   = 1 << 2;
        const FINAL = 1 << 3;
        const BOTH  = Self::LARGE.bits() | Self::SMALL.bits();
        const ALL   = Self::BOTH.bits() | Self::MID.bits() | Self::FINAL.bits();
    }
}

impl TrimPolicy {
    /// Trimming disabled.
    pub const NONE: TrimPolicy = TrimPolicy::empty();
}

/// Space or comma separated keywords, combined: `"large mid"`, `"both final"`.
/// `left`/`right` are aliases of `large`/`small`; `none`, `false` and the
/// empty string disable trimming.
impl FromStr for TrimPolicy {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut policy = TrimPolicy::NONE;
        for word in s.split(|c: char| c.is_whitespace() || c == ',').filter(|w| !w.is_empty()) {
            policy |= match word.to_ascii_lowercase().as_str() {
                "none" | "false" => TrimPolicy::NONE,
                "large" | "left" | "true" => TrimPolicy::LARGE,
                "small" | "right" => TrimPolicy::SMALL,
                "both" => TrimPolicy::BOTH,
                "mid" => TrimPolicy::MID,
                "final" => TrimPolicy::FINAL,
                "all" => TrimPolicy::ALL,
                _ => return Err(FormatError::UnknownTrim(word.to_string())),
            };
        }
        Ok(policy)
    }
}

/// Formatting options. Every field has an explicit default; build variations
/// with the `with_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSettings {
    /// `None` picks a template from the duration's own magnitude.
    pub template: Option<String>,
    /// `None` resolves to `ALL` when `largest`, `max_value` or significant
    /// digits are in use, `LARGE` otherwise.
    pub trim: Option<TrimPolicy>,
    pub stop_trim: Vec<UnitType>,
    pub largest: Option<usize>,
    pub max_value: Option<f64>,
    pub min_value: Option<f64>,
    /// Fraction digits on the smallest unit; negative values round the
    /// integer part to tens, hundreds, ...
    pub precision: i32,
    pub truncate: bool,
    pub force_length: Option<bool>,
    pub use_left_units: bool,
    pub use_plural: bool,
    /// Treat `precision` as a significant-digit budget shared by all units.
    pub use_significant_digits: bool,
    pub use_grouping: bool,
    pub grouping_sizes: Vec<usize>,
    pub grouping_separator: String,
    pub decimal_separator: String,
    pub locale: String,
    /// Delegate numerals to the platform formatter when it is available.
    pub use_native_formatter: bool,
    /// Show exactly these units, overriding every trim setting.
    pub output_types: Option<Vec<UnitType>>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        FormatSettings {
            template: None,
            trim: None,
            stop_trim: Vec::new(),
            largest: None,
            max_value: None,
            min_value: None,
            precision: 0,
            truncate: false,
            force_length: None,
            use_left_units: false,
            use_plural: true,
            use_significant_digits: false,
            use_grouping: true,
            grouping_sizes: vec![3],
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            locale: "en".to_string(),
            use_native_formatter: true,
            output_types: None,
        }
    }
}

impl FormatSettings {
    pub fn new(template: impl Into<String>) -> Self {
        FormatSettings { template: Some(template.into()), ..Default::default() }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_trim(mut self, trim: TrimPolicy) -> Self {
        self.trim = Some(trim);
        self
    }

    pub fn with_stop_trim(mut self, units: impl IntoIterator<Item = UnitType>) -> Self {
        self.stop_trim = units.into_iter().collect();
        self
    }

    pub fn with_largest(mut self, largest: usize) -> Self {
        self.largest = Some(largest);
        self
    }

    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn with_force_length(mut self, force_length: bool) -> Self {
        self.force_length = Some(force_length);
        self
    }

    pub fn with_left_units(mut self, use_left_units: bool) -> Self {
        self.use_left_units = use_left_units;
        self
    }

    pub fn with_plural(mut self, use_plural: bool) -> Self {
        self.use_plural = use_plural;
        self
    }

    pub fn with_significant_digits(mut self, use_significant_digits: bool) -> Self {
        self.use_significant_digits = use_significant_digits;
        self
    }

    pub fn with_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    pub fn with_grouping_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.grouping_sizes = sizes;
        self
    }

    pub fn with_grouping_separator(mut self, separator: impl Into<String>) -> Self {
        self.grouping_separator = separator.into();
        self
    }

    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = separator.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_native_formatter(mut self, use_native_formatter: bool) -> Self {
        self.use_native_formatter = use_native_formatter;
        self
    }

    pub fn with_output_types(mut self, units: impl IntoIterator<Item = UnitType>) -> Self {
        self.output_types = Some(units.into_iter().collect());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), FormatError> {
        if self.grouping_sizes.is_empty() || self.grouping_sizes.contains(&0) {
            return Err(FormatError::InvalidGrouping);
        }
        if let Some(unit) = self.stop_trim.iter().chain(self.output_types.iter().flatten()).find(|u| !u.is_temporal())
        {
            return Err(FormatError::UnknownUnit(unit.to_string()));
        }
        Ok(())
    }

    /// Size of the significant-digit budget, zero when not in use.
    pub(crate) fn significant_digits(&self) -> usize {
        if self.use_significant_digits && self.precision > 0 { self.precision as usize } else { 0 }
    }

    pub(crate) fn effective_largest(&self) -> Option<usize> {
        self.largest.filter(|n| *n > 0)
    }

    /// Trim policy with defaults applied. `fallback` is the policy a default
    /// template asks for when none was configured.
    pub(crate) fn resolved_trim(&self, fallback: Option<TrimPolicy>) -> TrimPolicy {
        match self.trim.or(fallback) {
            Some(trim) => trim,
            None if self.effective_largest().is_some()
                || self.max_value.is_some()
                || self.significant_digits() > 0 =>
            {
                TrimPolicy::ALL
            }
            None => TrimPolicy::LARGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_keywords_combine() {
        assert_eq!("large mid".parse::<TrimPolicy>().unwrap(), TrimPolicy::LARGE | TrimPolicy::MID);
        assert_eq!("both".parse::<TrimPolicy>().unwrap(), TrimPolicy::BOTH);
        assert_eq!("all".parse::<TrimPolicy>().unwrap(), TrimPolicy::ALL);
        assert_eq!("left, right".parse::<TrimPolicy>().unwrap(), TrimPolicy::BOTH);
        assert_eq!("".parse::<TrimPolicy>().unwrap(), TrimPolicy::NONE);
        assert_eq!("false".parse::<TrimPolicy>().unwrap(), TrimPolicy::NONE);
        assert_eq!(
            "sideways".parse::<TrimPolicy>(),
            Err(FormatError::UnknownTrim("sideways".to_string()))
        );
    }

    #[test]
    fn all_is_both_mid_and_final() {
        assert!(TrimPolicy::ALL.contains(TrimPolicy::BOTH | TrimPolicy::MID | TrimPolicy::FINAL));
        assert!(TrimPolicy::BOTH.contains(TrimPolicy::LARGE | TrimPolicy::SMALL));
    }

    #[test]
    fn unset_trim_depends_on_other_settings() {
        assert_eq!(FormatSettings::default().resolved_trim(None), TrimPolicy::LARGE);
        assert_eq!(FormatSettings::default().with_largest(2).resolved_trim(None), TrimPolicy::ALL);
        assert_eq!(FormatSettings::default().with_max_value(5.0).resolved_trim(None), TrimPolicy::ALL);
        assert_eq!(
            FormatSettings::default().with_precision(3).with_significant_digits(true).resolved_trim(None),
            TrimPolicy::ALL
        );
        assert_eq!(FormatSettings::default().resolved_trim(Some(TrimPolicy::BOTH)), TrimPolicy::BOTH);
        assert_eq!(
            FormatSettings::default().with_trim(TrimPolicy::NONE).resolved_trim(Some(TrimPolicy::BOTH)),
            TrimPolicy::NONE
        );
    }

    #[test]
    fn validate_rejects_bad_grouping_and_token_kinds() {
        assert!(FormatSettings::default().validate().is_ok());
        assert_eq!(
            FormatSettings::default().with_grouping_sizes(vec![3, 0]).validate(),
            Err(FormatError::InvalidGrouping)
        );
        assert!(FormatSettings::default().with_stop_trim([UnitType::General]).validate().is_err());
    }
}

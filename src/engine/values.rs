//! Unit value resolution.
//!
//! Splits the absolute duration across the template's unit types, largest
//! first. Years and months are peeled off a month-based remainder; the fixed
//! units use a millisecond-based one, so "1 month 3 days" does not drift by the
//! length of an average month.

use crate::duration::{Duration, DurationValue};
use crate::settings::FormatSettings;
use crate::UnitType;

use super::tokenizer::Template;

/// Which edge of the displayable range the duration fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Max,
    Min,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UnitValue {
    pub unit: UnitType,
    pub raw_value: f64,
    pub whole_value: f64,
    /// Fractional remainder; only the smallest unit keeps one.
    pub decimal_value: f64,
    pub is_largest: bool,
    pub is_smallest: bool,
    pub token_length: usize,
    pub stop_trim: bool,
    /// Significant-digit cap applied on the last render.
    pub significant_digits: Option<usize>,
    pub rendered_value: f64,
    pub formatted_text: String,
    /// `en` digits without grouping, used for bubbling and plural keys.
    pub canonical_digits: String,
    /// Two-character rendering for an `SS` token.
    pub millisecond_text: Option<String>,
}

impl UnitValue {
    pub fn is_zero(&self) -> bool {
        self.whole_value == 0.0 && self.rendered_value == 0.0
    }

    pub fn integer_digits(&self) -> &str {
        self.canonical_digits.split('.').next().unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.raw_value = 0.0;
        self.whole_value = 0.0;
        self.decimal_value = 0.0;
        self.rendered_value = 0.0;
        self.canonical_digits = "0".to_string();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
    pub values: Vec<UnitValue>,
    pub boundary: Option<Boundary>,
    pub negative: bool,
    /// `force_length` with the largest-token default applied.
    pub force_length: bool,
}

pub(crate) fn resolve_values(duration: &dyn DurationValue, template: &Template, settings: &FormatSettings) -> Resolved {
    let valid = duration.is_valid();
    let total_ms = if valid { duration.as_unit(UnitType::Milliseconds) } else { 0.0 };
    let total_months = if valid { duration.as_unit(UnitType::Months) } else { 0.0 };

    let mut remainder = Duration::from_millis(total_ms.abs());
    let mut remainder_months = Duration::from_unit(total_months.abs(), UnitType::Months);

    let count = template.units.len();
    let mut force_length = settings.force_length;
    let mut boundary = None;
    let mut values = Vec::with_capacity(count);

    for (index, &unit) in template.units.iter().enumerate() {
        let is_largest = index == 0;
        let is_smallest = index + 1 == count;

        let raw_value = match unit {
            UnitType::Years | UnitType::Months => remainder_months.as_unit(unit),
            _ => remainder.as_unit(unit),
        };
        let whole_value = raw_value.floor();
        let decimal_value = if is_smallest { raw_value - whole_value } else { 0.0 };

        remainder.subtract(whole_value, unit);
        remainder_months.subtract(whole_value, unit);

        let token_length = template.length_of(unit);
        if is_largest && token_length > 1 && force_length.is_none() {
            force_length = Some(true);
        }

        if is_largest && settings.max_value.is_some_and(|max| raw_value > max) {
            boundary = Some(Boundary::Max);
        }
        if is_smallest && boundary.is_none() {
            let original = if valid { duration.as_unit(unit).abs() } else { 0.0 };
            if settings.min_value.is_some_and(|min| original < min) {
                boundary = Some(Boundary::Min);
            }
        }

        values.push(UnitValue {
            unit,
            raw_value,
            whole_value,
            decimal_value,
            is_largest,
            is_smallest,
            token_length,
            stop_trim: template.is_stop_trim(unit) || settings.stop_trim.contains(&unit),
            significant_digits: None,
            rendered_value: 0.0,
            formatted_text: String::new(),
            canonical_digits: String::new(),
            millisecond_text: None,
        });
    }

    Resolved { values, boundary, negative: total_ms < 0.0, force_length: force_length.unwrap_or(false) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tokenizer::tokenize;
    use crate::locale::LocaleData;

    fn resolve(d: Duration, template: &str, settings: &FormatSettings) -> Resolved {
        let t = tokenize(template, &LocaleData::english(), false);
        resolve_values(&d, &t, settings)
    }

    #[test]
    fn splits_across_units_largest_first() {
        let r = resolve(Duration::from_unit(3903.5, UnitType::Seconds), "h:mm:ss", &FormatSettings::default());
        let wholes: Vec<f64> = r.values.iter().map(|v| v.whole_value).collect();
        assert_eq!(wholes, vec![1.0, 5.0, 3.0]);
        assert_eq!(r.values[2].decimal_value, 0.5);
        assert_eq!(r.values[0].decimal_value, 0.0);
        assert!(r.values[0].is_largest && r.values[2].is_smallest);
        assert!(!r.negative);
    }

    #[test]
    fn months_come_from_the_month_remainder() {
        let d = Duration::from_unit(1.0, UnitType::Months).plus(3.0, UnitType::Days);
        let r = resolve(d, "M d", &FormatSettings::default());
        assert_eq!(r.values[0].whole_value, 1.0);
        assert_eq!(r.values[1].whole_value, 3.0);
    }

    #[test]
    fn negative_durations_resolve_on_the_magnitude() {
        let r = resolve(Duration::from_millis(-90_000.0), "m:ss", &FormatSettings::default());
        assert!(r.negative);
        assert_eq!(r.values[0].whole_value, 1.0);
        assert_eq!(r.values[1].whole_value, 30.0);
    }

    #[test]
    fn largest_long_token_forces_length() {
        let r = resolve(Duration::from_unit(5.0, UnitType::Minutes), "hh:mm", &FormatSettings::default());
        assert!(r.force_length);
        let r = resolve(Duration::from_unit(5.0, UnitType::Minutes), "h:mm", &FormatSettings::default());
        assert!(!r.force_length);
        let settings = FormatSettings::default().with_force_length(false);
        let r = resolve(Duration::from_unit(5.0, UnitType::Minutes), "hh:mm", &settings);
        assert!(!r.force_length);
    }

    #[test]
    fn detects_boundaries() {
        let max = FormatSettings::default().with_max_value(5.0);
        let r = resolve(Duration::from_unit(10.0, UnitType::Hours), "h", &max);
        assert_eq!(r.boundary, Some(Boundary::Max));

        let min = FormatSettings::default().with_min_value(1.0);
        let r = resolve(Duration::from_unit(30.0, UnitType::Seconds), "m", &min);
        assert_eq!(r.boundary, Some(Boundary::Min));

        let r = resolve(Duration::from_unit(3.0, UnitType::Hours), "h", &max);
        assert_eq!(r.boundary, None);
    }

    #[test]
    fn invalid_duration_resolves_to_zero() {
        let r = resolve(Duration::invalid(), "h:mm", &FormatSettings::default());
        assert!(r.values.iter().all(|v| v.raw_value == 0.0));
    }
}

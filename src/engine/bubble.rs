//! Rendering of unit values and carry ("bubbling") between units.
//!
//! Rendering can produce a value that belongs to the next unit up: `59.96`
//! seconds at one fraction digit prints as `60.0`. After the first render the
//! canonical digits of each unit are compared against [`BUBBLES`]; a unit that
//! reached its threshold is zeroed and its target incremented, and everything
//! is rendered once more. A second pass never bubbles again.

use super::native::NumberRenderer;
use super::number::{NumberOptions, format_number, round_places};
use super::values::{Boundary, UnitValue};
use crate::settings::FormatSettings;
use crate::UnitType;

/// Source unit -> (target unit, threshold), checked in order.
///
/// The month and year thresholds are display heuristics (31-day months,
/// 365-day years), not calendar arithmetic.
pub(crate) const BUBBLES: &[(UnitType, &[(UnitType, f64)])] = &[
    (
        UnitType::Seconds,
        &[
            (UnitType::Minutes, 60.0),
            (UnitType::Hours, 3600.0),
            (UnitType::Days, 86400.0),
            (UnitType::Weeks, 604800.0),
            (UnitType::Months, 2678400.0),
            (UnitType::Years, 31536000.0),
        ],
    ),
    (
        UnitType::Minutes,
        &[
            (UnitType::Hours, 60.0),
            (UnitType::Days, 1440.0),
            (UnitType::Weeks, 10080.0),
            (UnitType::Months, 44640.0),
            (UnitType::Years, 525600.0),
        ],
    ),
    (
        UnitType::Hours,
        &[(UnitType::Days, 24.0), (UnitType::Weeks, 168.0), (UnitType::Months, 744.0), (UnitType::Years, 8760.0)],
    ),
    (UnitType::Days, &[(UnitType::Weeks, 7.0), (UnitType::Months, 31.0), (UnitType::Years, 365.0)]),
    (UnitType::Months, &[(UnitType::Years, 12.0)]),
];

/// Everything a render pass needs besides the values themselves.
pub(crate) struct RenderPass<'a> {
    pub settings: &'a FormatSettings,
    pub numbers: &'a NumberRenderer,
    pub boundary: Option<Boundary>,
    pub force_length: bool,
    pub trim_disabled: bool,
}

impl RenderPass<'_> {
    /// Render all values, bubble once if needed. Returns whether a bubble fired.
    pub fn render_with_bubbling(&self, values: &mut [UnitValue]) -> bool {
        self.render_all(values, false);

        if values.len() < 2 || self.boundary.is_some() {
            return false;
        }

        let fired = bubble(values);
        if fired {
            trace!("[bubble] re-rendering after carry");
            self.render_all(values, true);
        }
        fired
    }

    fn render_all(&self, values: &mut [UnitValue], bubbled: bool) {
        let mut budget = self.settings.significant_digits() as i64;
        let mut found_first = false;
        for value in values.iter_mut() {
            self.render(value, bubbled, &mut budget, &mut found_first);
        }
    }

    fn render(&self, v: &mut UnitValue, bubbled: bool, budget: &mut i64, found_first: &mut bool) {
        let settings = self.settings;
        let significant_mode = settings.significant_digits() > 0;
        let truncate = settings.truncate;
        let precision = settings.precision;

        let mut options = NumberOptions {
            truncate,
            use_grouping: settings.use_grouping,
            grouping_sizes: settings.grouping_sizes.clone(),
            grouping_separator: settings.grouping_separator.clone(),
            decimal_separator: settings.decimal_separator.clone(),
            ..Default::default()
        };

        v.significant_digits = None;
        if significant_mode {
            if *budget <= 0 {
                v.raw_value = 0.0;
                v.whole_value = 0.0;
                v.decimal_value = 0.0;
            } else {
                v.significant_digits = Some(*budget as usize);
                options.maximum_significant_digits = v.significant_digits;
            }
        }

        if !bubbled {
            match self.boundary {
                Some(Boundary::Max) => {
                    let target = v.is_largest;
                    pin(v, target, settings.max_value);
                }
                Some(Boundary::Min) => {
                    let target = v.is_smallest;
                    pin(v, target, settings.min_value);
                }
                None => {}
            }
        }

        let whole_len = v.whole_value.abs().to_string().len() as i64;
        let budget_spent = v.significant_digits.is_some_and(|sd| sd as i64 - whole_len <= 0);

        let value = if v.is_smallest || budget_spent {
            if precision < 0 {
                round_places(v.whole_value, precision, truncate)
            } else if precision == 0 {
                round_places(v.whole_value + v.decimal_value, 0, truncate)
            } else if v.significant_digits.is_some() {
                let places = (*budget - whole_len) as i32;
                let value = if truncate { round_places(v.raw_value, places, true) } else { v.raw_value };
                if v.whole_value != 0.0 {
                    *budget -= whole_len;
                }
                value
            } else if significant_mode {
                // Budget already exhausted; the value was zeroed above.
                v.whole_value
            } else {
                options.fraction_digits = precision as usize;
                let total = v.whole_value + v.decimal_value;
                if truncate { round_places(total, precision, true) } else { total }
            }
        } else {
            if v.significant_digits.is_some() && v.whole_value != 0.0 {
                *budget -= whole_len;
            }
            v.whole_value
        };

        if v.token_length > 1 && (self.force_length || *found_first) {
            options.minimum_integer_digits = v.token_length;
            if bubbled && options.maximum_significant_digits.is_some_and(|sd| sd < v.token_length) {
                options.maximum_significant_digits = None;
            }
        }

        if !*found_first
            && (value > 0.0
                || self.trim_disabled
                || v.stop_trim
                || settings.output_types.as_ref().is_some_and(|types| types.contains(&v.unit)))
        {
            *found_first = true;
        }

        v.rendered_value = value;
        v.formatted_text = self.numbers.format(value, &options);
        v.canonical_digits = format_number(value, &options.canonical());
        v.millisecond_text = (v.unit == UnitType::Milliseconds && v.token_length == 2).then(|| {
            let padded = NumberOptions { minimum_integer_digits: 3, ..options.canonical() };
            format_number(value, &padded).chars().take(2).collect()
        });
    }
}

/// Pin a unit to a boundary value: `target` gets `limit`, everything else 0.
fn pin(v: &mut UnitValue, target: bool, limit: Option<f64>) {
    let pinned = if target { limit.unwrap_or(0.0) } else { 0.0 };
    v.raw_value = pinned;
    v.whole_value = pinned;
    v.decimal_value = 0.0;
}

/// Apply every matching carry from [`BUBBLES`]. Returns whether one fired.
fn bubble(values: &mut [UnitValue]) -> bool {
    let mut fired = false;
    for (source, targets) in BUBBLES {
        let Some(si) = values.iter().position(|v| v.unit == *source) else { continue };
        for (target, threshold) in targets.iter() {
            let Some(ti) = values.iter().position(|v| v.unit == *target) else { continue };
            let reached = values[si].integer_digits().parse::<f64>().is_ok_and(|n| n == *threshold);
            if !reached {
                continue;
            }

            trace!("[bubble] {} {} -> +1 {}", threshold, source, target);
            values[si].clear();
            let t = &mut values[ti];
            t.raw_value += 1.0;
            t.whole_value += 1.0;
            t.decimal_value = 0.0;
            t.canonical_digits = t.whole_value.to_string();
            fired = true;
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::engine::native::{Capabilities, NumberFormatCache};
    use crate::engine::tokenizer::tokenize;
    use crate::engine::values::resolve_values;
    use crate::locale::LocaleData;

    fn render(duration: Duration, template: &str, settings: &FormatSettings) -> (Vec<UnitValue>, bool) {
        let t = tokenize(template, &LocaleData::english(), false);
        let mut resolved = resolve_values(&duration, &t, settings);
        let cache = NumberFormatCache::new();
        let numbers = NumberRenderer::new(&cache, Capabilities::FALLBACK_ONLY, settings);
        let pass = RenderPass {
            settings,
            numbers: &numbers,
            boundary: resolved.boundary,
            force_length: resolved.force_length,
            trim_disabled: false,
        };
        let fired = pass.render_with_bubbling(&mut resolved.values);
        (resolved.values, fired)
    }

    fn texts(values: &[UnitValue]) -> Vec<&str> {
        values.iter().map(|v| v.formatted_text.as_str()).collect()
    }

    #[test]
    fn pads_after_the_first_non_zero_unit() {
        let d = Duration::from_unit(3903.0, UnitType::Seconds);
        let (values, fired) = render(d, "h:mm:ss", &FormatSettings::default());
        assert!(!fired);
        assert_eq!(texts(&values), vec!["1", "05", "03"]);
    }

    #[test]
    fn rounding_carries_into_the_next_unit() {
        let settings = FormatSettings::default().with_precision(1);
        let (values, fired) = render(Duration::from_millis(59_960.0), "m:ss", &settings);
        assert!(fired);
        assert_eq!(texts(&values), vec!["1", "00.0"]);
    }

    #[test]
    fn truncation_never_carries() {
        let settings = FormatSettings::default().with_precision(1).with_truncate(true);
        let (values, fired) = render(Duration::from_millis(59_960.0), "m:ss", &settings);
        assert!(!fired);
        assert_eq!(texts(&values), vec!["0", "59.9"]);
    }

    #[test]
    fn carry_cascades_through_the_table() {
        let settings = FormatSettings::default().with_precision(0);
        let d = Duration::from_unit(59.0, UnitType::Minutes).plus(59.6, UnitType::Seconds);
        let (values, fired) = render(d, "h:mm:ss", &settings);
        assert!(fired);
        assert_eq!(texts(&values), vec!["1", "00", "00"]);
    }

    #[test]
    fn negative_precision_rounds_integers() {
        let settings = FormatSettings::default().with_precision(-2);
        let (values, _) = render(Duration::from_unit(1234.0, UnitType::Seconds), "s", &settings);
        assert_eq!(texts(&values), vec!["1,200"]);
    }

    #[test]
    fn significant_digits_share_a_budget() {
        let settings = FormatSettings::default().with_precision(2).with_significant_digits(true);
        let (values, _) = render(Duration::from_millis(5_400_000.0), "h [hours]", &settings);
        assert_eq!(texts(&values), vec!["1.5"]);

        let d = Duration::from_unit(12.0, UnitType::Hours).plus(30.0, UnitType::Minutes);
        let (values, _) = render(d, "h m", &settings);
        assert_eq!(values[1].rendered_value, 0.0);
    }

    #[test]
    fn boundaries_pin_values() {
        let settings = FormatSettings::default().with_max_value(5.0);
        let (values, fired) = render(Duration::from_unit(10.0, UnitType::Hours), "h m", &settings);
        assert!(!fired);
        assert_eq!(texts(&values), vec!["5", "0"]);
    }

    #[test]
    fn two_digit_milliseconds_are_truncated() {
        let (values, _) = render(Duration::from_millis(1234.0), "s.SS", &FormatSettings::default());
        assert_eq!(values[1].millisecond_text.as_deref(), Some("23"));
        let (values, _) = render(Duration::from_millis(1005.0), "s.SS", &FormatSettings::default());
        assert_eq!(values[1].millisecond_text.as_deref(), Some("00"));
    }

    #[test]
    fn truncation_keeps_exact_decimals() {
        let settings = FormatSettings::default().with_precision(1).with_truncate(true);
        for (expected, millis) in [("59.3", 59_300.0), ("4.1", 4_100.0), ("9.7", 9_700.0)] {
            let (values, fired) = render(Duration::from_millis(millis), "s", &settings);
            assert!(!fired);
            assert_eq!(texts(&values), vec![expected], "{millis} ms");
        }
    }

    #[test]
    fn truncated_significant_digits_stay_within_budget() {
        let settings = FormatSettings::default().with_precision(2).with_significant_digits(true).with_truncate(true);
        let (values, _) = render(Duration::from_millis(5_940_000.0), "h [hours]", &settings);
        assert_eq!(texts(&values), vec!["1.6"]);
    }
}

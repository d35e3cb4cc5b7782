//! Native (ICU4X) number formatting and the formatter cache.
//!
//! ICU formatters are relatively expensive to build, so they are cached per
//! `(locale, grouping)` in a [`NumberFormatCache`] owned by the formatting
//! context. Digit-level options (fraction digits, significant digits, integer
//! padding) are applied to the `Decimal` before formatting and do not need
//! their own formatter.
//!
//! Whether the native path is used at all is decided by [`Capabilities`],
//! detected once per context against a table of known-good outputs.

use fixed_decimal::{Decimal, FloatPrecision, SignedRoundingMode, UnsignedRoundingMode};
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::{DecimalFormatter, DecimalFormatterPreferences};
use icu::locale::Locale as IcuLocale;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::number::{NumberOptions, format_number};
use crate::settings::FormatSettings;

const HALF_EXPAND: SignedRoundingMode = SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand);
const TRUNC: SignedRoundingMode = SignedRoundingMode::Unsigned(UnsignedRoundingMode::Trunc);

pub(crate) struct NativeFormat {
    formatter: DecimalFormatter,
}

impl NativeFormat {
    fn new(locale: &str, use_grouping: bool) -> Option<Self> {
        let locale: IcuLocale = locale.parse().ok()?;
        let prefs = DecimalFormatterPreferences::from(&locale);
        let mut opts = DecimalFormatterOptions::default();
        opts.grouping_strategy = Some(if use_grouping { GroupingStrategy::Auto } else { GroupingStrategy::Never });
        let formatter = DecimalFormatter::try_new(prefs, opts).ok()?;
        Some(NativeFormat { formatter })
    }

    /// Format the magnitude of `value` with the locale's own separators.
    pub fn format(&self, value: f64, options: &NumberOptions) -> String {
        let value = if value.is_finite() { value.abs() } else { 0.0 };
        let mut dec = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).unwrap_or_else(|_| Decimal::from(0));
        let mode = if options.truncate { TRUNC } else { HALF_EXPAND };

        match options.maximum_significant_digits.filter(|p| *p > 0) {
            Some(digits) => {
                if !dec.absolute.is_zero() {
                    let start = dec.absolute.nonzero_magnitude_start();
                    dec.round_with_mode(start - digits as i16 + 1, mode);
                    dec.absolute.trim_end();
                }
            }
            None => {
                let fraction = options.fraction_digits as i16;
                dec.round_with_mode(-fraction, mode);
                dec.absolute.trim_end();
                if fraction > 0 {
                    dec.absolute.pad_end(-fraction);
                }
                if options.minimum_integer_digits > 1 {
                    dec.absolute.pad_start(options.minimum_integer_digits as i16 - 1);
                }
            }
        }

        let mut text = self.formatter.format(&dec).to_string();

        // pad_start is unreliable for zero.
        if options.maximum_significant_digits.is_none() {
            let leading = text.chars().take_while(|c| c.is_numeric()).count();
            if leading < options.minimum_integer_digits {
                text.insert_str(0, &"0".repeat(options.minimum_integer_digits - leading));
            }
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NativeKey {
    locale: String,
    use_grouping: bool,
}

/// Process-scoped cache of native formatters. Entries are never evicted.
#[derive(Default)]
pub struct NumberFormatCache {
    entries: RwLock<HashMap<NativeKey, Arc<NativeFormat>>>,
}

impl NumberFormatCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached formatters.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` when ICU has no usable formatter for the locale.
    pub(crate) fn get_or_create(&self, locale: &str, use_grouping: bool) -> Option<Arc<NativeFormat>> {
        let key = NativeKey { locale: locale.to_string(), use_grouping };
        if let Some(found) = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner()).get(&key) {
            return Some(Arc::clone(found));
        }

        // Two threads may both build the formatter; the later insert wins.
        let created = Arc::new(NativeFormat::new(locale, use_grouping)?);
        trace!("[native] cached formatter locale={} grouping={}", key.locale, key.use_grouping);
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(Arc::clone(entries.entry(key).or_insert(created)))
    }
}

impl std::fmt::Debug for NumberFormatCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberFormatCache").field("len", &self.len()).finish()
    }
}

/// What the native formatter can be trusted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Native formatting exists and honours integer, fraction,
    /// significant-digit and grouping options.
    pub native_available: bool,
    /// Native half-up rounding matches decimal rounding (`3.55` -> `3.6`).
    pub native_rounding_correct: bool,
}

impl Capabilities {
    pub const FALLBACK_ONLY: Capabilities = Capabilities { native_available: false, native_rounding_correct: false };

    /// Feature-test the native formatter for `en`.
    pub fn detect(cache: &NumberFormatCache) -> Capabilities {
        let (Some(plain), Some(grouped)) = (cache.get_or_create("en", false), cache.get_or_create("en", true)) else {
            return Capabilities::FALLBACK_ONLY;
        };
        let (plain, grouped) = (plain.as_ref(), grouped.as_ref());

        let integer = |digits| NumberOptions { minimum_integer_digits: digits, ..Default::default() };
        let fixed = |digits| NumberOptions { fraction_digits: digits, ..Default::default() };
        let significant = |digits| NumberOptions { maximum_significant_digits: Some(digits), ..Default::default() };

        let cases: Vec<(&NativeFormat, f64, NumberOptions, &str)> = vec![
            (plain, 1.0, integer(1), "1"),
            (plain, 1.0, integer(2), "01"),
            (plain, 1.0, integer(3), "001"),
            (plain, 99.99, fixed(0), "100"),
            (plain, 99.99, fixed(1), "100.0"),
            (plain, 99.99, fixed(2), "99.99"),
            (plain, 99.99, fixed(3), "99.990"),
            (plain, 99.99, significant(1), "100"),
            (plain, 99.99, significant(2), "100"),
            (plain, 99.99, significant(3), "100"),
            (plain, 99.99, significant(4), "99.99"),
            (plain, 99.99, significant(5), "99.99"),
            (grouped, 1000.0, NumberOptions::default(), "1,000"),
            (plain, 1000.0, NumberOptions::default(), "1000"),
        ];

        let native_available = cases.iter().all(|(format, value, options, expected)| {
            let got = format.format(*value, options);
            if got != *expected {
                trace!("[capabilities] {value} {options:?}: expected {expected:?}, got {got:?}");
            }
            got == *expected
        });
        let native_rounding_correct = native_available && plain.format(3.55, &fixed(1)) == "3.6";

        Capabilities { native_available, native_rounding_correct }
    }
}

/// How numerals get rendered for one format call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    Native,
    /// Round with the string formatter first, then let the native formatter
    /// localize the already-rounded value.
    NativePreRounded,
    Fallback,
}

impl Strategy {
    pub fn select(capabilities: Capabilities, use_native_formatter: bool) -> Strategy {
        match (use_native_formatter && capabilities.native_available, capabilities.native_rounding_correct) {
            (false, _) => Strategy::Fallback,
            (true, true) => Strategy::Native,
            (true, false) => Strategy::NativePreRounded,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Native => "native",
            Strategy::NativePreRounded => "native (pre-rounded)",
            Strategy::Fallback => "fallback",
        }
    }
}

/// Strategy bound to its native formatter, if any.
pub(crate) struct NumberRenderer {
    strategy: Strategy,
    native: Option<Arc<NativeFormat>>,
}

impl NumberRenderer {
    pub fn new(cache: &NumberFormatCache, capabilities: Capabilities, settings: &FormatSettings) -> Self {
        let strategy = Strategy::select(capabilities, settings.use_native_formatter);
        let native = match strategy {
            Strategy::Fallback => None,
            _ => cache.get_or_create(&settings.locale, settings.use_grouping),
        };
        match native {
            Some(native) => NumberRenderer { strategy, native: Some(native) },
            None => NumberRenderer { strategy: Strategy::Fallback, native: None },
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn format(&self, value: f64, options: &NumberOptions) -> String {
        match (&self.native, self.strategy) {
            (Some(native), Strategy::Native) => native.format(value, options),
            (Some(native), Strategy::NativePreRounded) => {
                let rounded = format_number(value, &options.canonical());
                native.format(rounded.parse().unwrap_or(value), options)
            }
            _ => format_number(value, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_follows_capabilities() {
        let good = Capabilities { native_available: true, native_rounding_correct: true };
        let sloppy = Capabilities { native_available: true, native_rounding_correct: false };
        assert_eq!(Strategy::select(good, true), Strategy::Native);
        assert_eq!(Strategy::select(sloppy, true), Strategy::NativePreRounded);
        assert_eq!(Strategy::select(good, false), Strategy::Fallback);
        assert_eq!(Strategy::select(Capabilities::FALLBACK_ONLY, true), Strategy::Fallback);
    }

    #[test]
    fn cache_reuses_formatters() {
        let cache = NumberFormatCache::new();
        assert!(cache.is_empty());
        let a = cache.get_or_create("en", true).unwrap();
        let b = cache.get_or_create("en", true).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        cache.get_or_create("en", false).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn native_formats_en_digits() {
        let cache = NumberFormatCache::new();
        let native = cache.get_or_create("en", true).unwrap();
        let opts = NumberOptions { fraction_digits: 1, ..Default::default() };
        assert_eq!(native.format(3.55, &opts), "3.6");
        assert_eq!(native.format(1234567.0, &NumberOptions::default()), "1,234,567");
        let padded = NumberOptions { minimum_integer_digits: 2, ..Default::default() };
        assert_eq!(native.format(0.0, &padded), "00");
    }

    #[test]
    fn native_truncation_drops_digits() {
        let cache = NumberFormatCache::new();
        let native = cache.get_or_create("en", false).unwrap();
        let opts = NumberOptions { fraction_digits: 1, truncate: true, ..Default::default() };
        assert_eq!(native.format(59.3, &opts), "59.3");
        assert_eq!(native.format(1.999, &opts), "1.9");
    }

    #[test]
    fn detection_accepts_icu() {
        let caps = Capabilities::detect(&NumberFormatCache::new());
        assert!(caps.native_available);
        assert!(caps.native_rounding_correct);
    }

    #[test]
    fn pre_rounded_path_uses_string_rounding() {
        let cache = NumberFormatCache::new();
        let sloppy = Capabilities { native_available: true, native_rounding_correct: false };
        let renderer = NumberRenderer::new(&cache, sloppy, &FormatSettings::default());
        assert_eq!(renderer.strategy(), Strategy::NativePreRounded);
        let opts = NumberOptions { fraction_digits: 1, ..Default::default() };
        assert_eq!(renderer.format(3.55, &opts), "3.6");
    }
}

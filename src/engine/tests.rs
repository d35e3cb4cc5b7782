use crate::api::DurationFormatter;
use crate::duration::Duration;
use crate::engine::Capabilities;
use crate::locale::{LocaleData, register_locale};
use crate::settings::{FormatSettings, TrimPolicy};
use crate::{FormatError, UnitType};

fn fallback() -> DurationFormatter {
    DurationFormatter::with_capabilities(Capabilities::FALLBACK_ONLY)
}

#[test]
fn format_examples_matching() {
    // (expected, milliseconds, settings)
    let cases: Vec<(&str, f64, FormatSettings)> = vec![
        ("1:05:03", 3_903_000.0, FormatSettings::new("h:mm:ss")),
        ("2:05", 125_000.0, FormatSettings::new("h:mm:ss")),
        ("1:00.0", 59_960.0, FormatSettings::new("m:ss").with_precision(1)),
        ("59.9", 59_960.0, FormatSettings::new("m:ss").with_precision(1).with_truncate(true)),
        ("", 0.0, FormatSettings::new("h:mm:ss").with_trim(TrimPolicy::ALL)),
        ("1 second", 1_000.0, FormatSettings::new("s __")),
        ("1.0 seconds", 1_000.0, FormatSettings::new("s __").with_precision(1)),
        ("1 second", 1_000.0, FormatSettings::new("s [seconds]")),
        ("5 seconds", 5_000.0, FormatSettings::new("s [second]")),
        ("5 secs", 5_000.0, FormatSettings::new("s _")),
        ("-1:30", -90_000.0, FormatSettings::new("m:ss")),
        ("1 day, 2 hours", 93_780_000.0, FormatSettings::new("d [days], h [hours], m [minutes]").with_largest(2)),
        (
            "0 hours, 0 minutes, 45 seconds",
            45_000.0,
            FormatSettings::new("h [hours], m [minutes], s [seconds]").with_output_types([
                UnitType::Hours,
                UnitType::Minutes,
                UnitType::Seconds,
            ]),
        ),
        ("day 1, hours 2", 93_600_000.0, FormatSettings::new("__ d, __ h").with_left_units(true)),
        ("> 5 hours", 36_000_000.0, FormatSettings::new("h [hours]").with_max_value(5.0)),
        ("< 1 minute", 30_000.0, FormatSettings::new("m [minutes]").with_min_value(1.0)),
        ("1.5 hours", 5_400_000.0, FormatSettings::new("h [hours]").with_precision(2).with_significant_digits(true)),
        ("1,200", 1_234_000.0, FormatSettings::new("s").with_precision(-2)),
        ("1234", 1_234_000.0, FormatSettings::new("s").with_grouping(false)),
        ("0:00:05", 5_000.0, FormatSettings::new("*h:mm:ss")),
        ("0:00:05", 5_000.0, FormatSettings::new("h:mm:ss").with_stop_trim([UnitType::Hours])),
        ("5", 5_000.0, FormatSettings::new("m:ss")),
        ("1.23", 1_234.0, FormatSettings::new("s.SS")),
        ("no units here", 60_000.0, FormatSettings::new("[no units here]")),
    ];

    let formatter = fallback();
    for (expected, millis, settings) in cases {
        let out = formatter.format(&Duration::from_millis(millis), &settings).unwrap();
        assert_eq!(out, expected, "{millis} ms with template {:?}", settings.template);
    }
}

#[test]
fn truncation_matching() {
    // (expected, milliseconds, settings)
    let truncated = |template: &str, precision: i32| {
        FormatSettings::new(template).with_precision(precision).with_truncate(true)
    };
    let cases: Vec<(&str, f64, FormatSettings)> = vec![
        ("59.3", 59_300.0, truncated("s", 1)),
        ("4.1", 4_100.0, truncated("s", 1)),
        ("9.7", 9_700.0, truncated("s", 1)),
        ("1.9", 1_999.0, truncated("s", 1)),
        ("1", 1_999.0, truncated("s", 0)),
        ("1,200", 1_299_000.0, truncated("s", -2)),
        ("4.1", 4_100.0, truncated("s", 2).with_significant_digits(true)),
        ("1.6 hours", 5_940_000.0, truncated("h [hours]", 2).with_significant_digits(true)),
        ("1.3 hours", 4_740_000.0, truncated("h [hours]", 2).with_significant_digits(true)),
    ];

    let formatter = fallback();
    for (expected, millis, settings) in cases {
        let out = formatter.format(&Duration::from_millis(millis), &settings).unwrap();
        assert_eq!(out, expected, "{millis} ms, precision {}", settings.precision);
    }
}

#[test]
fn large_precision_pads_instead_of_overflowing() {
    let settings = FormatSettings::new("s").with_precision(400).with_truncate(true);
    let out = fallback().format(&Duration::from_millis(1_300.0), &settings).unwrap();
    assert_eq!(out, format!("1.3{}", "0".repeat(399)));
}

#[test]
fn registered_locale_labels_and_plurals() {
    fn singular_up_to_one(code: char, integer: u64, decimal: Option<f64>) -> String {
        if integer <= 1 && decimal.is_none() { code.to_string() } else { format!("{code}{code}") }
    }
    register_locale(
        LocaleData::new("xx-fr")
            .with_label("standard", "s", "seconde")
            .with_label("standard", "ss", "secondes")
            .with_plural_rule(singular_up_to_one),
    );

    let formatter = fallback();
    let settings = FormatSettings::new("s __").with_locale("xx-fr");
    let cases: Vec<(&str, f64, FormatSettings)> = vec![
        ("1 seconde", 1_000.0, settings.clone()),
        ("5 secondes", 5_000.0, settings.clone()),
        ("1.5 secondes", 1_500.0, settings.with_precision(1)),
    ];
    for (expected, millis, settings) in cases {
        let out = formatter.format(&Duration::from_millis(millis), &settings).unwrap();
        assert_eq!(out, expected, "{millis} ms in xx-fr");
    }
}

#[test]
fn default_templates_end_to_end() {
    let cases: Vec<(&str, Duration)> = vec![
        ("1:01:01", Duration::from_millis(3_661_000.0)),
        ("1 day, 3 hours", Duration::from_unit(27.0, UnitType::Hours)),
        ("0:45", Duration::from_unit(45.0, UnitType::Seconds)),
        ("500 milliseconds", Duration::from_millis(500.0)),
        ("0 seconds", Duration::ZERO),
        ("2 days", Duration::from_unit(2.0, UnitType::Days)),
    ];

    let formatter = fallback();
    for (expected, duration) in cases {
        let out = formatter.format(&duration, &FormatSettings::default()).unwrap();
        assert_eq!(out, expected, "default template for {duration:?}");
    }
}

#[test]
fn native_and_fallback_agree_on_rounding() {
    let native = DurationFormatter::new();
    let fallback = fallback();
    let settings = FormatSettings::new("m").with_precision(1);
    let d = Duration::from_unit(213.0, UnitType::Seconds);
    assert_eq!(fallback.format(&d, &settings).unwrap(), "3.6");
    assert_eq!(native.format(&d, &settings).unwrap(), "3.6");
}

#[test]
fn formatting_is_deterministic() {
    let formatter = fallback();
    let settings = FormatSettings::new("d [days], h:mm:ss").with_precision(2);
    let d = Duration::from_millis(123_456_789.0);
    let first = formatter.format(&d, &settings).unwrap();
    for _ in 0..5 {
        assert_eq!(formatter.format(&d, &settings).unwrap(), first);
    }
}

#[test]
fn invalid_durations_format_as_zero() {
    let formatter = fallback();
    let settings = FormatSettings::new("m:ss").with_trim(TrimPolicy::NONE);
    let out = formatter.format(&Duration::invalid(), &settings).unwrap();
    assert_eq!(out, "0:00");
}

#[test]
fn format_many_aligns_output_types() {
    let formatter = fallback();
    let durations = [Duration::from_unit(45.0, UnitType::Seconds), Duration::from_unit(2.0, UnitType::Hours)];
    let out = formatter.format_many(&durations, &FormatSettings::new("h:mm:ss")).unwrap();
    assert_eq!(out, vec!["0:00:45", "2:00:00"]);
}

#[test]
fn unknown_units_are_rejected() {
    let formatter = fallback();
    let settings = FormatSettings::new("h").with_stop_trim([UnitType::Escape]);
    let err = formatter.format(&Duration::ZERO, &settings).unwrap_err();
    assert!(matches!(err, FormatError::UnknownUnit(_)), "got {err:?}");
}

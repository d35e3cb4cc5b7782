//! Duration values consumed by the formatter.
//!
//! The engine only needs a small interface ([`DurationValue`]): convert the
//! whole span into a unit, subtract an amount of a unit, and report validity.
//! [`Duration`] is the bundled implementation. It keeps months, days and
//! milliseconds in separate stores, so "1 month" stays a month instead of
//! collapsing into a fixed number of milliseconds, and converts between them
//! with the 400-year Gregorian average (146097 days per 4800 months).

use crate::{FormatError, UnitType};
use std::str::FromStr;

const MS_PER_SECOND: f64 = 1e3;
const MS_PER_MINUTE: f64 = 6e4;
const MS_PER_HOUR: f64 = 36e5;
const MS_PER_DAY: f64 = 864e5;
const MS_PER_WEEK: f64 = 6048e5;

/// A signed span of time the formatter can decompose.
pub trait DurationValue {
    /// Total length of the span expressed in `unit` (signed).
    fn as_unit(&self, unit: UnitType) -> f64;

    /// Remove `amount` of `unit` from the span.
    fn subtract(&mut self, amount: f64, unit: UnitType);

    /// Invalid values are formatted as a zero-length duration.
    fn is_valid(&self) -> bool {
        true
    }

    /// Calendar-style breakdown used to pick a default template.
    fn components(&self) -> Components {
        Duration::from_millis(self.as_unit(UnitType::Milliseconds)).components()
    }
}

/// Bubbled-up breakdown of a duration (`1500ms` -> 1 second, 500 ms).
///
/// There is no weeks field: weeks are only ever derived from days.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Components {
    pub years: f64,
    pub months: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
}

impl Components {
    pub fn get(&self, unit: UnitType) -> f64 {
        match unit {
            UnitType::Years => self.years,
            UnitType::Months => self.months,
            UnitType::Days => self.days,
            UnitType::Hours => self.hours,
            UnitType::Minutes => self.minutes,
            UnitType::Seconds => self.seconds,
            UnitType::Milliseconds => self.milliseconds,
            UnitType::Weeks | UnitType::Escape | UnitType::General => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Duration {
    milliseconds: f64,
    days: f64,
    months: f64,
    invalid: bool,
}

impl Duration {
    pub const ZERO: Duration = Duration { milliseconds: 0.0, days: 0.0, months: 0.0, invalid: false };

    pub fn from_millis(milliseconds: f64) -> Self {
        Self::from_unit(milliseconds, UnitType::Milliseconds)
    }

    pub fn from_unit(amount: f64, unit: UnitType) -> Self {
        Self::ZERO.plus(amount, unit)
    }

    /// A duration that reports `is_valid() == false`.
    pub fn invalid() -> Self {
        Duration { invalid: true, ..Self::ZERO }
    }

    /// Builder form of [`Duration::add`].
    pub fn plus(mut self, amount: f64, unit: UnitType) -> Self {
        self.add(amount, unit);
        self
    }

    pub fn add(&mut self, amount: f64, unit: UnitType) {
        if !amount.is_finite() {
            self.invalid = true;
            return;
        }
        match unit {
            UnitType::Years => self.months += amount * 12.0,
            UnitType::Months => self.months += amount,
            UnitType::Weeks => self.days += amount * 7.0,
            UnitType::Days => self.days += amount,
            UnitType::Hours => self.milliseconds += amount * MS_PER_HOUR,
            UnitType::Minutes => self.milliseconds += amount * MS_PER_MINUTE,
            UnitType::Seconds => self.milliseconds += amount * MS_PER_SECOND,
            UnitType::Milliseconds => self.milliseconds += amount,
            UnitType::Escape | UnitType::General => {}
        }
    }

    pub fn negated(self) -> Self {
        Duration { milliseconds: -self.milliseconds, days: -self.days, months: -self.months, invalid: self.invalid }
    }

    pub fn is_negative(&self) -> bool {
        self.as_unit(UnitType::Milliseconds) < 0.0
    }
}

impl DurationValue for Duration {
    fn as_unit(&self, unit: UnitType) -> f64 {
        if self.invalid {
            return 0.0;
        }

        match unit {
            UnitType::Years | UnitType::Months => {
                let days = self.days + self.milliseconds / MS_PER_DAY;
                let months = self.months + days_to_months(days);
                if unit == UnitType::Years { months / 12.0 } else { months }
            }
            _ => {
                let days = self.days + round_half_up(months_to_days(self.months));
                match unit {
                    UnitType::Weeks => days / 7.0 + self.milliseconds / MS_PER_WEEK,
                    UnitType::Days => days + self.milliseconds / MS_PER_DAY,
                    UnitType::Hours => days * 24.0 + self.milliseconds / MS_PER_HOUR,
                    UnitType::Minutes => days * 1440.0 + self.milliseconds / MS_PER_MINUTE,
                    UnitType::Seconds => days * 86400.0 + self.milliseconds / MS_PER_SECOND,
                    UnitType::Milliseconds => (days * MS_PER_DAY).floor() + self.milliseconds,
                    _ => 0.0,
                }
            }
        }
    }

    fn subtract(&mut self, amount: f64, unit: UnitType) {
        self.add(-amount, unit);
    }

    fn is_valid(&self) -> bool {
        !self.invalid
    }

    fn components(&self) -> Components {
        if self.invalid {
            return Components::default();
        }

        let mut milliseconds = self.milliseconds;
        let mut days = self.days;
        let mut months = self.months;

        // Mixed signs: fold everything into milliseconds first.
        let all_positive = milliseconds >= 0.0 && days >= 0.0 && months >= 0.0;
        let all_negative = milliseconds <= 0.0 && days <= 0.0 && months <= 0.0;
        if !(all_positive || all_negative) {
            milliseconds += abs_ceil(months_to_days(months) + days) * MS_PER_DAY;
            days = 0.0;
            months = 0.0;
        }

        let seconds = abs_floor(milliseconds / 1000.0);
        let minutes = abs_floor(seconds / 60.0);
        let hours = abs_floor(minutes / 60.0);

        days += abs_floor(hours / 24.0);
        let months_from_days = abs_floor(days_to_months(days));
        months += months_from_days;
        days -= abs_ceil(months_to_days(months_from_days));

        Components {
            years: abs_floor(months / 12.0),
            months: months % 12.0,
            days,
            hours: hours % 24.0,
            minutes: minutes % 60.0,
            seconds: seconds % 60.0,
            milliseconds: milliseconds % 1000.0,
        }
    }
}

impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        Duration::from_millis(value.as_secs_f64() * 1000.0)
    }
}

impl From<chrono::TimeDelta> for Duration {
    fn from(value: chrono::TimeDelta) -> Self {
        let millis = match value.num_microseconds() {
            Some(us) => us as f64 / 1000.0,
            None => value.num_milliseconds() as f64,
        };
        Duration::from_millis(millis)
    }
}

/// Parses a millisecond count (`"90000"`) or an ISO-8601 duration
/// (`"P1Y2M3DT4H5M6.5S"`, `"-PT30S"`, decimal commas allowed).
impl FromStr for Duration {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ms) = trimmed.parse::<f64>() {
            if ms.is_finite() {
                return Ok(Duration::from_millis(ms));
            }
        }

        let re = regex!(
            r"(?x)^([-+])?P
            (?:([-+]?[0-9,.]*)Y)?(?:([-+]?[0-9,.]*)M)?(?:([-+]?[0-9,.]*)W)?(?:([-+]?[0-9,.]*)D)?
            (?:T(?:([-+]?[0-9,.]*)H)?(?:([-+]?[0-9,.]*)M)?(?:([-+]?[0-9,.]*)S)?)?$"
        );
        let caps = re.captures(trimmed).ok_or_else(|| FormatError::InvalidDuration(s.to_string()))?;
        let sign = if caps.get(1).is_some_and(|m| m.as_str() == "-") { -1.0 } else { 1.0 };

        let units = [
            (2, UnitType::Years),
            (3, UnitType::Months),
            (4, UnitType::Weeks),
            (5, UnitType::Days),
            (6, UnitType::Hours),
            (7, UnitType::Minutes),
            (8, UnitType::Seconds),
        ];

        let mut duration = Duration::ZERO;
        let mut seen = false;
        for (group, unit) in units {
            let Some(m) = caps.get(group) else { continue };
            let amount = m
                .as_str()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| FormatError::InvalidDuration(s.to_string()))?;
            duration.add(amount * sign, unit);
            seen = true;
        }

        if !seen {
            return Err(FormatError::InvalidDuration(s.to_string()));
        }
        Ok(duration)
    }
}

fn days_to_months(days: f64) -> f64 {
    days * 4800.0 / 146097.0
}

fn months_to_days(months: f64) -> f64 {
    months * 146097.0 / 4800.0
}

/// Round half toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn abs_floor(x: f64) -> f64 {
    if x < 0.0 { x.ceil() } else { x.floor() }
}

fn abs_ceil(x: f64) -> f64 {
    if x < 0.0 { x.floor() } else { x.ceil() }
}

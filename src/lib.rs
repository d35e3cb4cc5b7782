//! Template-driven duration formatting.
//!
//! ```
//! use durfmt::{Duration, FormatSettings, UnitType, format};
//!
//! let d = Duration::from_unit(3903.0, UnitType::Seconds);
//! let out = format(&d, &FormatSettings::new("h:mm:ss")).unwrap();
//! assert_eq!(out, "1:05:03");
//! ```

#[macro_use]
mod macros;
mod api;
mod duration;
mod engine;
mod error;
mod locale;
mod settings;

pub use api::{DurationFormatter, FormatDetails, UnitSummary, format, format_many, format_verbose};
pub use duration::{Components, Duration, DurationValue};
pub use engine::{Capabilities, NumberFormatCache};
pub use error::FormatError;
pub use locale::{Label, LabelType, LocaleData, PluralRule, locale_data, register_locale};
pub use settings::{FormatSettings, TrimPolicy};

use std::fmt;
use std::str::FromStr;

// --- Unit types -------------------------------------------------------------

/// Kinds of template token.
///
/// The declaration order is the tokenizer precedence, and for the temporal
/// variants it is also descending magnitude, so sorting a list of units puts
/// the largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitType {
    Escape,
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
    General,
}

impl UnitType {
    /// Temporal units, largest first.
    pub const TEMPORAL: [UnitType; 8] = [
        UnitType::Years,
        UnitType::Months,
        UnitType::Weeks,
        UnitType::Days,
        UnitType::Hours,
        UnitType::Minutes,
        UnitType::Seconds,
        UnitType::Milliseconds,
    ];

    /// True for every variant except `Escape` and `General`.
    pub fn is_temporal(self) -> bool {
        !matches!(self, UnitType::Escape | UnitType::General)
    }

    /// Single-character code used to key locale labels (`s` / `ss`, ...).
    pub fn label_code(self) -> Option<char> {
        match self {
            UnitType::Years => Some('y'),
            UnitType::Months => Some('M'),
            UnitType::Weeks => Some('w'),
            UnitType::Days => Some('d'),
            UnitType::Hours => Some('h'),
            UnitType::Minutes => Some('m'),
            UnitType::Seconds => Some('s'),
            UnitType::Milliseconds => Some('S'),
            UnitType::Escape | UnitType::General => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnitType::Escape => "escape",
            UnitType::Years => "years",
            UnitType::Months => "months",
            UnitType::Weeks => "weeks",
            UnitType::Days => "days",
            UnitType::Hours => "hours",
            UnitType::Minutes => "minutes",
            UnitType::Seconds => "seconds",
            UnitType::Milliseconds => "milliseconds",
            UnitType::General => "general",
        }
    }

    /// Parse a whitespace or comma separated list of units.
    pub fn parse_list(s: &str) -> Result<Vec<UnitType>, FormatError> {
        s.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty()).map(str::parse).collect()
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts unit names (`hours`, `hour`) and template tokens (`h`, `hh`, `*h`).
impl FromStr for UnitType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.to_ascii_lowercase().as_str() {
            "years" | "year" => Some(UnitType::Years),
            "months" | "month" => Some(UnitType::Months),
            "weeks" | "week" => Some(UnitType::Weeks),
            "days" | "day" => Some(UnitType::Days),
            "hours" | "hour" => Some(UnitType::Hours),
            "minutes" | "minute" => Some(UnitType::Minutes),
            "seconds" | "second" => Some(UnitType::Seconds),
            "milliseconds" | "millisecond" => Some(UnitType::Milliseconds),
            _ => None,
        };
        if let Some(unit) = unit {
            return Ok(unit);
        }

        let token = s.strip_prefix('*').unwrap_or(s);
        let mut chars = token.chars();
        let first = chars.next().ok_or_else(|| FormatError::UnknownUnit(s.to_string()))?;
        if !chars.all(|c| c == first) {
            return Err(FormatError::UnknownUnit(s.to_string()));
        }
        match first {
            'y' | 'Y' => Ok(UnitType::Years),
            'M' => Ok(UnitType::Months),
            'w' | 'W' => Ok(UnitType::Weeks),
            'd' | 'D' => Ok(UnitType::Days),
            'h' | 'H' => Ok(UnitType::Hours),
            'm' => Ok(UnitType::Minutes),
            's' => Ok(UnitType::Seconds),
            'S' => Ok(UnitType::Milliseconds),
            _ => Err(FormatError::UnknownUnit(s.to_string())),
        }
    }
}

// --- Internal types ---------------------------------------------------------

/// A template token after literal text has been merged into unit tokens.
///
/// `unit` is `None` for a literal-only token (text before the first unit, or
/// after the last one with left-hand units).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub unit: Option<UnitType>,
    pub text: String,
    /// Character count of the unit token, used as the zero-padding width.
    pub length: usize,
    pub stop_trim: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_type_parses_names_and_tokens() {
        assert_eq!("hours".parse::<UnitType>().unwrap(), UnitType::Hours);
        assert_eq!("Minute".parse::<UnitType>().unwrap(), UnitType::Minutes);
        assert_eq!("hh".parse::<UnitType>().unwrap(), UnitType::Hours);
        assert_eq!("*m".parse::<UnitType>().unwrap(), UnitType::Minutes);
        assert_eq!("M".parse::<UnitType>().unwrap(), UnitType::Months);
        assert_eq!("SS".parse::<UnitType>().unwrap(), UnitType::Milliseconds);
        assert!("hm".parse::<UnitType>().is_err());
        assert!("x".parse::<UnitType>().is_err());
    }

    #[test]
    fn sorting_units_orders_by_descending_magnitude() {
        let mut units = vec![UnitType::Seconds, UnitType::Years, UnitType::Hours];
        units.sort();
        assert_eq!(units, vec![UnitType::Years, UnitType::Hours, UnitType::Seconds]);
    }

    #[test]
    fn parse_list_splits_on_spaces_and_commas() {
        let units = UnitType::parse_list("h, mm s").unwrap();
        assert_eq!(units, vec![UnitType::Hours, UnitType::Minutes, UnitType::Seconds]);
    }
}

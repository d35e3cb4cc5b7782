//! Output assembly.

use super::labels::localize;
use super::values::{Boundary, UnitValue};
use crate::locale::LocaleData;
use crate::{Token, UnitType};

pub(crate) struct Assembly<'a> {
    pub locale: &'a LocaleData,
    pub use_left_units: bool,
    pub use_plural: bool,
    pub negative: bool,
    pub boundary: Option<Boundary>,
    pub trim_disabled: bool,
    pub output_types: Option<&'a [UnitType]>,
}

impl Assembly<'_> {
    /// Join tokens into the final string. `kept` holds the units that
    /// survived trimming.
    pub fn assemble(&self, tokens: &[Token], kept: &[UnitValue]) -> String {
        let mut out = String::new();
        let mut prefixed = false;

        for token in tokens {
            let Some(unit) = token.unit else {
                out.push_str(&token.text);
                continue;
            };
            let Some(value) = kept.iter().find(|v| v.unit == unit) else { continue };

            let text = localize(&token.text, value, self.locale, self.use_plural);
            if self.use_left_units {
                out.push_str(&text);
            }

            if !prefixed && self.qualifies(value) {
                prefixed = true;
                if let Some(marker) = self.marker() {
                    out.push_str(marker);
                }
                if self.negative {
                    out.push('-');
                }
            }

            match (&value.millisecond_text, token.length) {
                (Some(ms), 2) => out.push_str(ms),
                _ => out.push_str(&value.formatted_text),
            }

            if !self.use_left_units {
                out.push_str(&text);
            }
        }

        out.trim_matches(|c: char| c == ',' || c == ':' || c == '.' || c.is_whitespace()).to_string()
    }

    /// First unit that gets the sign and boundary marker.
    fn qualifies(&self, value: &UnitValue) -> bool {
        value.rendered_value > 0.0
            || self.trim_disabled
            || value.stop_trim
            || self.output_types.is_some_and(|types| types.contains(&value.unit))
    }

    fn marker(&self) -> Option<&'static str> {
        match (self.boundary?, self.negative) {
            (Boundary::Max, false) | (Boundary::Min, true) => Some("> "),
            (Boundary::Min, false) | (Boundary::Max, true) => Some("< "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(unit: UnitType, rendered: f64, text: &str) -> UnitValue {
        UnitValue {
            unit,
            raw_value: rendered,
            whole_value: rendered,
            decimal_value: 0.0,
            is_largest: false,
            is_smallest: false,
            token_length: 1,
            stop_trim: false,
            significant_digits: None,
            rendered_value: rendered,
            formatted_text: text.to_string(),
            canonical_digits: text.to_string(),
            millisecond_text: None,
        }
    }

    fn token(unit: Option<UnitType>, text: &str) -> Token {
        Token { unit, text: text.to_string(), length: 1, stop_trim: false }
    }

    fn assembly(locale: &LocaleData) -> Assembly<'_> {
        Assembly {
            locale,
            use_left_units: false,
            use_plural: true,
            negative: false,
            boundary: None,
            trim_disabled: false,
            output_types: None,
        }
    }

    #[test]
    fn trimmed_units_and_edge_punctuation_disappear() {
        let en = LocaleData::english();
        let tokens = [
            token(Some(UnitType::Hours), ":"),
            token(Some(UnitType::Minutes), ":"),
            token(Some(UnitType::Seconds), ""),
        ];
        let kept = [value(UnitType::Minutes, 1.0, "1"), value(UnitType::Seconds, 30.0, "30")];
        assert_eq!(assembly(&en).assemble(&tokens, &kept), "1:30");
    }

    #[test]
    fn sign_goes_before_the_first_non_zero_unit() {
        let en = LocaleData::english();
        let tokens = [token(Some(UnitType::Minutes), ":"), token(Some(UnitType::Seconds), "")];
        let kept = [value(UnitType::Minutes, 1.0, "1"), value(UnitType::Seconds, 30.0, "30")];
        let a = Assembly { negative: true, ..assembly(&en) };
        assert_eq!(a.assemble(&tokens, &kept), "-1:30");
    }

    #[test]
    fn boundary_markers() {
        let en = LocaleData::english();
        let tokens = [token(Some(UnitType::Hours), " hours")];
        let kept = [value(UnitType::Hours, 5.0, "5")];
        let max = Assembly { boundary: Some(Boundary::Max), ..assembly(&en) };
        assert_eq!(max.assemble(&tokens, &kept), "> 5 hours");
        let min = Assembly { boundary: Some(Boundary::Min), ..assembly(&en) };
        assert_eq!(min.assemble(&tokens, &kept), "< 5 hours");
        let negative_max = Assembly { boundary: Some(Boundary::Max), negative: true, ..assembly(&en) };
        assert_eq!(negative_max.assemble(&tokens, &kept), "< -5 hours");
    }

    #[test]
    fn literal_tokens_pass_through() {
        let en = LocaleData::english();
        let tokens = [token(None, "took "), token(Some(UnitType::Seconds), " __")];
        let kept = [value(UnitType::Seconds, 1.0, "1")];
        assert_eq!(assembly(&en).assemble(&tokens, &kept), "took 1 second");
    }

    #[test]
    fn left_units_put_text_first() {
        let en = LocaleData::english();
        let tokens = [token(Some(UnitType::Days), "__ "), token(Some(UnitType::Hours), ", __ ")];
        let kept = [value(UnitType::Days, 1.0, "1"), value(UnitType::Hours, 2.0, "2")];
        let a = Assembly { use_left_units: true, ..assembly(&en) };
        assert_eq!(a.assemble(&tokens, &kept), "day 1, hours 2");
    }
}

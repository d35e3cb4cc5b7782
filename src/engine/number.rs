//! String-based number formatting.
//!
//! Rounding is done on the decimal digit string rather than on the float, so
//! `3.55` with one fraction digit gives `3.6` even though the nearest `f64` is
//! `3.5499999...`. The value is printed with one digit more than requested,
//! that extra digit is rounded away by hand, and the result is shifted,
//! padded and grouped. Truncation starts from the shortest decimal form of
//! the float (`59.3`, not `59.29999...`) and drops digits without carrying.

/// Formatting options understood by both the string formatter and the native
/// delegate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NumberOptions {
    pub minimum_integer_digits: usize,
    pub fraction_digits: usize,
    /// Replaces `fraction_digits` and `minimum_integer_digits` when set.
    pub maximum_significant_digits: Option<usize>,
    /// Drop excess digits instead of rounding them.
    pub truncate: bool,
    pub use_grouping: bool,
    pub grouping_sizes: Vec<usize>,
    pub grouping_separator: String,
    pub decimal_separator: String,
}

impl Default for NumberOptions {
    fn default() -> Self {
        NumberOptions {
            minimum_integer_digits: 1,
            fraction_digits: 0,
            maximum_significant_digits: None,
            truncate: false,
            use_grouping: false,
            grouping_sizes: vec![3],
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

impl NumberOptions {
    /// Same digits, `en` punctuation and no grouping.
    pub fn canonical(&self) -> NumberOptions {
        NumberOptions {
            use_grouping: false,
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            ..self.clone()
        }
    }
}

/// Format the magnitude of `value`. Non-finite input formats as zero.
pub(crate) fn format_number(value: f64, options: &NumberOptions) -> String {
    let value = if value.is_finite() { value.abs() } else { 0.0 };
    let significant = options.maximum_significant_digits.filter(|p| *p > 0);

    let rendered = match significant {
        _ if options.truncate => format!("{value}"),
        Some(p) => to_precision(value, p + 1),
        None => format!("{:.*}", options.fraction_digits + 1, value),
    };

    let (mantissa, exponent) = match rendered.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (rendered.clone(), 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa.as_str(), ""));
    let mut integer = int_part.to_string();
    let mut fraction = frac_part.to_string();

    let needs_round = match significant {
        _ if options.truncate => false,
        Some(p) => count_significant(&integer, &fraction) == p + 1,
        None => fraction.len() == options.fraction_digits + 1,
    };
    if needs_round {
        let digits = format!("{integer}{fraction}");
        let mut rounded = string_round(&digits);
        let mut int_len = integer.len();
        if rounded.len() > digits.len() {
            int_len += 1;
        }
        if !fraction.is_empty() {
            rounded.pop();
        }
        integer = rounded[..int_len].to_string();
        fraction = rounded[int_len..].to_string();
    }

    if let Some(p) = significant.filter(|_| options.truncate) {
        keep_significant(&mut integer, &mut fraction, p);
    }

    if exponent > 0 {
        let shift = exponent as usize;
        if fraction.len() <= shift {
            integer.push_str(&fraction);
            integer.push_str(&"0".repeat(shift - fraction.len()));
            fraction.clear();
        } else {
            let moved: String = fraction.drain(..shift).collect();
            integer.push_str(&moved);
        }
    } else if exponent < 0 {
        let zeros = (exponent.unsigned_abs() as usize).saturating_sub(integer.len());
        fraction = format!("{}{integer}{fraction}", "0".repeat(zeros));
        integer = "0".to_string();
    }

    if significant.is_some() {
        fraction.truncate(fraction.trim_end_matches('0').len());
    }

    if significant.is_none() {
        if fraction.len() > options.fraction_digits {
            fraction.truncate(options.fraction_digits);
        } else {
            let pad = options.fraction_digits - fraction.len();
            fraction.push_str(&"0".repeat(pad));
        }
        if integer.len() < options.minimum_integer_digits {
            integer.insert_str(0, &"0".repeat(options.minimum_integer_digits - integer.len()));
        }
    }

    if options.use_grouping {
        integer = group_digits(&integer, &options.grouping_sizes, &options.grouping_separator);
    }

    if fraction.is_empty() { integer } else { format!("{integer}{}{fraction}", options.decimal_separator) }
}

/// `Number.prototype.toPrecision`: `precision` significant digits, switching
/// to exponent notation when the exponent is below -6 or at least
/// `precision`.
pub(crate) fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return if precision > 1 { format!("0.{}", "0".repeat(precision - 1)) } else { "0".to_string() };
    }

    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -6 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exp.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    if exp >= 0 {
        let split = exp as usize + 1;
        let (int, frac) = digits.split_at(split);
        if frac.is_empty() { int.to_string() } else { format!("{int}.{frac}") }
    } else {
        format!("0.{}{digits}", "0".repeat(exp.unsigned_abs() as usize - 1))
    }
}

/// Round (or truncate) `value` at `places` decimal places on its shortest
/// decimal form. Negative places round to tens, hundreds, ...
pub(crate) fn round_places(value: f64, places: i32, truncate: bool) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let text = format!("{}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let digits = format!("{int_part}{frac_part}");

    let keep = int_part.len() as i64 + i64::from(places);
    if keep < 0 {
        return 0.0;
    }
    let keep = keep as usize;
    if keep >= digits.len() {
        return value;
    }

    // Kept digits plus the first dropped one, which decides the rounding.
    let mut head = digits[..=keep].to_string();
    let head = if truncate {
        head.pop();
        head.push('0');
        head
    } else {
        string_round(&head)
    };
    let point = int_part.len() + (head.len() - (keep + 1));

    let rounded = if point >= head.len() {
        format!("{head}{}", "0".repeat(point - head.len()))
    } else {
        format!("{}.{}", &head[..point], &head[point..])
    };
    let rounded = rounded.parse::<f64>().unwrap_or(0.0);
    if value < 0.0 { -rounded } else { rounded }
}

/// Round away the last digit of a digit string. The last digit becomes `0`;
/// a carry may lengthen the string by one.
pub(crate) fn string_round(digits: &str) -> String {
    let mut reversed: Vec<u8> = digits.bytes().rev().collect();
    let Some(last) = reversed.first_mut() else { return String::new() };

    let mut carry = *last >= b'5';
    *last = b'0';
    for digit in reversed.iter_mut().skip(1) {
        if !carry {
            break;
        }
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
        }
    }
    if carry {
        reversed.push(b'1');
    }

    reversed.iter().rev().map(|b| *b as char).collect()
}

/// Group integer digits from the right. Sizes are consumed in order and the
/// last one repeats.
pub(crate) fn group_digits(integer: &str, sizes: &[usize], separator: &str) -> String {
    if sizes.is_empty() || sizes.contains(&0) {
        return integer.to_string();
    }

    let mut groups = Vec::new();
    let mut rest = integer;
    let mut index = 0;
    while !rest.is_empty() {
        let size = sizes[index.min(sizes.len() - 1)];
        if rest.len() <= size {
            groups.push(rest);
            break;
        }
        let split = rest.len() - size;
        groups.push(&rest[split..]);
        rest = &rest[..split];
        index += 1;
    }

    groups.reverse();
    groups.join(separator)
}

/// Zero every digit after the first `p` significant ones.
fn keep_significant(integer: &mut String, fraction: &mut String, p: usize) {
    let mut seen = 0;
    for part in [integer, fraction] {
        let mut kept = String::with_capacity(part.len());
        for c in part.chars() {
            if seen >= p {
                kept.push('0');
                continue;
            }
            if c != '0' || seen > 0 {
                seen += 1;
            }
            kept.push(c);
        }
        *part = kept;
    }
}

fn count_significant(integer: &str, fraction: &str) -> usize {
    let digits = format!("{integer}{fraction}");
    digits.trim_start_matches('0').len()
}

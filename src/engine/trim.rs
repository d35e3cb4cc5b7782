//! Trim policy.
//!
//! Decides which rendered units survive. `output_types` short-circuits every
//! other setting; otherwise the policy steps run in a fixed order:
//!
//! ```text
//! large -> largest -> small -> mid -> final
//! ```
//!
//! Applying the same policy to its own output changes nothing.

use super::values::{Boundary, UnitValue};
use crate::settings::TrimPolicy;
use crate::UnitType;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrimOptions<'a> {
    pub policy: TrimPolicy,
    pub largest: Option<usize>,
    pub output_types: Option<&'a [UnitType]>,
    pub boundary: Option<Boundary>,
    pub truncate: bool,
    pub min_value: Option<f64>,
}

pub(crate) fn apply_trim(values: Vec<UnitValue>, options: &TrimOptions<'_>) -> Vec<UnitValue> {
    let policy = options.policy;
    let max_without_trim = options.boundary == Some(Boundary::Max) && policy.is_empty();

    if let Some(types) = options.output_types.filter(|_| !max_without_trim) {
        return values.into_iter().filter(|v| types.contains(&v.unit)).collect();
    }

    let mut values = values;

    if policy.contains(TrimPolicy::LARGE) {
        let keep_from =
            values.iter().position(|v| v.is_smallest || !v.is_zero() || v.stop_trim).unwrap_or(values.len());
        values.drain(..keep_from);
    }

    if let Some(largest) = options.largest {
        values.truncate(largest);
    }

    if policy.contains(TrimPolicy::SMALL) && values.len() > 1 {
        while values.len() > 1 && values.last().is_some_and(|v| v.is_zero() && !v.stop_trim) {
            values.pop();
        }
    }

    if policy.contains(TrimPolicy::MID) && values.len() > 2 {
        let last = values.len() - 1;
        let mut index = 0;
        values.retain(|v| {
            let interior = index != 0 && index != last;
            index += 1;
            !(interior && v.is_zero() && !v.stop_trim)
        });
    }

    if policy.contains(TrimPolicy::FINAL) && values.len() == 1 {
        let v = &values[0];
        let held_by_min = !options.truncate && v.is_smallest && options.min_value.is_some_and(|min| v.raw_value < min);
        if v.whole_value == 0.0 && v.rendered_value == 0.0 && !v.stop_trim && !held_by_min {
            values.clear();
        }
    }

    values
}

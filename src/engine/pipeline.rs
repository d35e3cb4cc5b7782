//! One format call, end to end.
//!
//! ```text
//! settings ── validate
//! template ── tokenize (tokenizer.rs) ──▶ no units? literal text
//!                │
//! duration ── resolve_values (values.rs)
//!                │
//!           RenderPass::render_with_bubbling (bubble.rs, native.rs, number.rs)
//!                │
//!           apply_trim (trim.rs)
//!                │
//!           Assembly::assemble (assemble.rs, labels.rs) ──▶ String
//! ```

use super::assemble::Assembly;
use super::bubble::RenderPass;
use super::native::{Capabilities, NumberFormatCache, NumberRenderer, Strategy};
use super::tokenizer::tokenize;
use super::trim::{TrimOptions, apply_trim};
use super::values::{UnitValue, resolve_values};
use crate::duration::DurationValue;
use crate::locale::locale_data;
use crate::settings::{FormatSettings, TrimPolicy};
use crate::{FormatError, UnitType};

/// Everything a format call produced, for callers that want more than the
/// string.
#[derive(Debug, Clone)]
pub(crate) struct FormatRun {
    pub output: String,
    /// Template after defaulting (aliases not yet expanded).
    pub template: String,
    pub trim: TrimPolicy,
    /// Distinct units in the template, largest first.
    pub units: Vec<UnitType>,
    pub values: Vec<UnitValue>,
    /// Units that survived trimming.
    pub kept: Vec<UnitType>,
    pub bubbled: bool,
    pub strategy: Strategy,
}

pub(crate) fn run(
    duration: &dyn DurationValue,
    settings: &FormatSettings,
    cache: &NumberFormatCache,
    capabilities: Capabilities,
) -> Result<FormatRun, FormatError> {
    settings.validate()?;
    let locale = locale_data(&settings.locale);

    let (template, template_trim) = match &settings.template {
        Some(template) => (template.clone(), None),
        None => default_template(duration),
    };
    let tokenized = tokenize(&template, &locale, settings.use_left_units);

    let mut trim = settings.resolved_trim(template_trim);
    if settings.effective_largest().is_some() {
        trim |= TrimPolicy::LARGE;
    }
    let numbers = NumberRenderer::new(cache, capabilities, settings);

    if tokenized.units.is_empty() {
        trace!("[format] template={template:?} has no units");
        return Ok(FormatRun {
            output: tokenized.literal_text(),
            template,
            trim,
            units: Vec::new(),
            values: Vec::new(),
            kept: Vec::new(),
            bubbled: false,
            strategy: numbers.strategy(),
        });
    }

    let resolved = resolve_values(duration, &tokenized, settings);
    let mut values = resolved.values;
    trace!(
        "[format] template={template:?} units={:?} trim={trim:?} boundary={:?} strategy={:?}",
        tokenized.units,
        resolved.boundary,
        numbers.strategy()
    );

    let pass = RenderPass {
        settings,
        numbers: &numbers,
        boundary: resolved.boundary,
        force_length: resolved.force_length,
        trim_disabled: trim.is_empty(),
    };
    let bubbled = pass.render_with_bubbling(&mut values);

    let trim_options = TrimOptions {
        policy: trim,
        largest: settings.effective_largest(),
        output_types: settings.output_types.as_deref(),
        boundary: resolved.boundary,
        truncate: settings.truncate,
        min_value: settings.min_value,
    };
    let kept = apply_trim(values.clone(), &trim_options);

    for v in &values {
        trace!(
            "[unit] {} raw={} whole={} rendered={} text={:?} kept={}",
            v.unit,
            v.raw_value,
            v.whole_value,
            v.rendered_value,
            v.formatted_text,
            kept.iter().any(|k| k.unit == v.unit)
        );
    }

    let assembly = Assembly {
        locale: &locale,
        use_left_units: settings.use_left_units,
        use_plural: settings.use_plural,
        negative: resolved.negative,
        boundary: resolved.boundary,
        trim_disabled: trim.is_empty(),
        output_types: settings.output_types.as_deref(),
    };
    let output = assembly.assemble(&tokenized.tokens, &kept);
    trace!("[format] output={output:?}");

    Ok(FormatRun {
        output,
        template,
        trim,
        units: tokenized.units,
        kept: kept.iter().map(|v| v.unit).collect(),
        values,
        bubbled,
        strategy: numbers.strategy(),
    })
}

/// Template picked from the duration's own magnitude, plus the trim policy
/// it asks for when none is configured.
pub(crate) fn default_template(duration: &dyn DurationValue) -> (String, Option<TrimPolicy>) {
    let components = duration.components();
    let order = [
        UnitType::Years,
        UnitType::Months,
        UnitType::Days,
        UnitType::Hours,
        UnitType::Minutes,
        UnitType::Seconds,
        UnitType::Milliseconds,
    ];
    let present: Vec<UnitType> = order.into_iter().filter(|u| components.get(*u) != 0.0).collect();
    let single = present.len() == 1;

    let (template, trim) = match present.first() {
        Some(UnitType::Milliseconds) => ("S __", None),
        Some(UnitType::Seconds | UnitType::Minutes) => ("*_MS_", None),
        Some(UnitType::Hours) => ("_HMS_", None),
        Some(UnitType::Days) if single => ("d __", None),
        Some(UnitType::Weeks) if single => ("w __", None),
        Some(UnitType::Days | UnitType::Weeks) => ("w __, d __, h __", Some(TrimPolicy::BOTH)),
        Some(UnitType::Months) if single => ("M __", None),
        Some(UnitType::Years) if single => ("y __", None),
        Some(UnitType::Months | UnitType::Years) => ("y __, M __, d __", Some(TrimPolicy::BOTH)),
        _ => ("y __, d __, h __, m __, s __", Some(TrimPolicy::BOTH)),
    };
    (template.to_string(), trim)
}

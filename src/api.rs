use crate::duration::DurationValue;
use crate::engine::{self, Capabilities, FormatRun, NumberFormatCache};
use crate::settings::{FormatSettings, TrimPolicy};
use crate::{FormatError, UnitType};
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};

static DEFAULT_FORMATTER: Lazy<DurationFormatter> = Lazy::new(DurationFormatter::new);

/// Formatting context.
///
/// Owns the native formatter cache and the capability flags detected when it
/// was created. The free functions ([`format`], [`format_many`]) share one
/// process-wide instance; create your own to control detection or to keep
/// caches separate.
#[derive(Debug)]
pub struct DurationFormatter {
    cache: NumberFormatCache,
    capabilities: Capabilities,
}

impl Default for DurationFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-unit view of a format call, returned by [`format_verbose`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    pub unit: UnitType,
    pub raw_value: f64,
    pub whole_value: f64,
    pub rendered_value: f64,
    /// Localized numeral, before labels.
    pub text: String,
    /// Whether the unit survived trimming.
    pub kept: bool,
}

/// Output plus the decisions that led to it.
#[derive(Debug, Clone)]
pub struct FormatDetails {
    pub output: String,
    /// Template after defaulting.
    pub template: String,
    /// Trim policy after defaulting.
    pub trim: TrimPolicy,
    /// Which number formatter produced the numerals.
    pub numerals: &'static str,
    /// Whether a carry between units fired.
    pub bubbled: bool,
    pub units: Vec<UnitSummary>,
    pub elapsed: Duration,
}

impl DurationFormatter {
    /// A context with freshly detected capabilities.
    pub fn new() -> Self {
        let cache = NumberFormatCache::new();
        let capabilities = Capabilities::detect(&cache);
        trace!("[formatter] capabilities={capabilities:?}");
        DurationFormatter { cache, capabilities }
    }

    /// A context with fixed capabilities; nothing is detected.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        DurationFormatter { cache: NumberFormatCache::new(), capabilities }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn cache(&self) -> &NumberFormatCache {
        &self.cache
    }

    pub fn format(&self, duration: &dyn DurationValue, settings: &FormatSettings) -> Result<String, FormatError> {
        Ok(self.run(duration, settings)?.output)
    }

    /// Format several durations so that they all show the same units.
    ///
    /// Unless `settings.output_types` is given, each duration is first
    /// trimmed on its own (ignoring `largest`); the union of the surviving
    /// units, capped at `largest`, is then used as `output_types` for all of
    /// them.
    pub fn format_many<D: DurationValue>(
        &self,
        durations: &[D],
        settings: &FormatSettings,
    ) -> Result<Vec<String>, FormatError> {
        if durations.is_empty() {
            return Ok(Vec::new());
        }
        settings.validate()?;

        let shared = match settings.output_types {
            Some(_) => settings.clone(),
            None => {
                let unbounded = FormatSettings { largest: None, ..settings.clone() };
                let mut union: Vec<UnitType> = Vec::new();
                let mut smallest = None;
                for duration in durations {
                    let run = self.run(duration, &unbounded)?;
                    if smallest.is_none() {
                        smallest = run.units.last().copied();
                    }
                    for unit in run.kept {
                        if !union.contains(&unit) {
                            union.push(unit);
                        }
                    }
                }
                union.sort();
                if let Some(largest) = settings.effective_largest() {
                    union.truncate(largest);
                }
                if union.is_empty() {
                    union.extend(smallest);
                }
                trace!("[format_many] shared output types {union:?}");
                FormatSettings { output_types: Some(union), ..settings.clone() }
            }
        };

        durations.iter().map(|d| self.format(d, &shared)).collect()
    }

    /// Format and report per-unit details and timing.
    pub fn format_verbose(
        &self,
        duration: &dyn DurationValue,
        settings: &FormatSettings,
    ) -> Result<FormatDetails, FormatError> {
        let start = Instant::now();
        let run = self.run(duration, settings)?;
        let elapsed = start.elapsed();

        let units = run
            .values
            .iter()
            .map(|v| UnitSummary {
                unit: v.unit,
                raw_value: v.raw_value,
                whole_value: v.whole_value,
                rendered_value: v.rendered_value,
                text: v.formatted_text.clone(),
                kept: run.kept.contains(&v.unit),
            })
            .collect();

        Ok(FormatDetails {
            output: run.output,
            template: run.template,
            trim: run.trim,
            numerals: run.strategy.name(),
            bubbled: run.bubbled,
            units,
            elapsed,
        })
    }

    fn run(&self, duration: &dyn DurationValue, settings: &FormatSettings) -> Result<FormatRun, FormatError> {
        engine::run(duration, settings, &self.cache, self.capabilities)
    }
}

/// Format `duration` with the shared default context.
///
/// # Example
/// ```
/// use durfmt::{Duration, FormatSettings, UnitType, format};
///
/// let d = Duration::from_unit(90.0, UnitType::Minutes);
/// let out = format(&d, &FormatSettings::new("h [hrs], m [min]")).unwrap();
/// assert_eq!(out, "1 hr, 30 mins");
/// ```
pub fn format(duration: &dyn DurationValue, settings: &FormatSettings) -> Result<String, FormatError> {
    DEFAULT_FORMATTER.format(duration, settings)
}

/// Format several durations with aligned units. See
/// [`DurationFormatter::format_many`].
pub fn format_many<D: DurationValue>(durations: &[D], settings: &FormatSettings) -> Result<Vec<String>, FormatError> {
    DEFAULT_FORMATTER.format_many(durations, settings)
}

pub fn format_verbose(duration: &dyn DurationValue, settings: &FormatSettings) -> Result<FormatDetails, FormatError> {
    DEFAULT_FORMATTER.format_verbose(duration, settings)
}

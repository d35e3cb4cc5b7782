//! Duration formatting engine.
//!
//! The engine turns a duration plus a template into a string. It is split into
//! focused submodules under `src/engine/`, each owning one stage, with
//! `pipeline.rs` wiring them together.
//!
//! ## How the parts work together
//!
//! ```text
//! template ── tokenize ─────────────────┐        (tokenizer.rs)
//!                                       │
//! duration ── resolve_values ───────────┼─ one UnitValue per unit type
//!                                       │        (values.rs)
//!                                       v
//!                     RenderPass::render_with_bubbling (bubble.rs)
//!                       - significant-digit budget
//!                       - boundary pinning
//!                       - numerals via NumberRenderer (native.rs)
//!                         or the string formatter (number.rs)
//!                       - carry into larger units, one re-render
//!                                       │
//!                                       v
//!                     apply_trim (trim.rs)
//!                                       │
//!                                       v
//!                     Assembly::assemble (assemble.rs)
//!                       - labels and plurals (labels.rs)
//!                       - sign / boundary marker
//!                                       │
//!                                       v
//!                                    String
//! ```
//!
//! Rendering happens before trimming because trimming looks at rendered
//! values: `59.96` seconds rounds to a whole minute and the seconds unit then
//! counts as zero.
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: alias expansion, ordered matcher scan, literal merging.
//! - `values.rs`: splits the duration into per-unit raw/whole/decimal values
//!   and detects max/min boundaries.
//! - `number.rs`: digit-string number formatter (rounding, padding,
//!   grouping) that never trusts float rounding.
//! - `native.rs`: ICU-backed formatter, [`NumberFormatCache`],
//!   [`Capabilities`] detection and the per-call strategy.
//! - `bubble.rs`: per-unit rendering and the carry table.
//! - `trim.rs`: trim policy and `output_types` filtering.
//! - `labels.rs`: placeholder labels and plural correction.
//! - `assemble.rs`: joins tokens into the output string.
//! - `pipeline.rs`: runs one format call and records what happened.
//!
//! ## Debugging
//!
//! Set `DURFMT_DEBUG=1` to print per-call and per-unit traces to stderr.

#[path = "engine/assemble.rs"]
mod assemble;
#[path = "engine/bubble.rs"]
mod bubble;
#[path = "engine/labels.rs"]
mod labels;
#[path = "engine/native.rs"]
mod native;
#[path = "engine/number.rs"]
mod number;
#[path = "engine/pipeline.rs"]
mod pipeline;
#[path = "engine/tokenizer.rs"]
mod tokenizer;
#[path = "engine/trim.rs"]
mod trim;
#[path = "engine/values.rs"]
mod values;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use native::{Capabilities, NumberFormatCache};
pub(crate) use pipeline::{FormatRun, run};

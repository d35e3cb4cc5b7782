use thiserror::Error;

/// Configuration and input errors.
///
/// Formatting itself never fails: invalid durations render as zero and
/// unrecognised template text is copied through. These errors only come from
/// settings or duration strings that cannot be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown trim keyword '{0}'")]
    UnknownTrim(String),
    #[error("unknown unit type '{0}'")]
    UnknownUnit(String),
    #[error("invalid duration '{0}' (expected ISO-8601 like P1DT2H or a millisecond count)")]
    InvalidDuration(String),
    #[error("grouping sizes must be non-empty and greater than zero")]
    InvalidGrouping,
    #[error("invalid unit pattern for {unit}: {message}")]
    InvalidPattern { unit: String, message: String },
}

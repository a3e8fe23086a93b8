use thiserror::Error;

/// A single malformed record line.
///
/// These are collected on the host report, never propagated: one bad line
/// must not take down monitoring of an otherwise healthy host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A status line with fewer than the four expected fields.
    #[error("status line {line_no}: missing field {field:?}")]
    MissingField { line_no: usize, field: &'static str },

    /// A numeric field that did not parse after trimming.
    #[error("status line {line_no}: invalid {field} count {value:?}")]
    InvalidCount {
        line_no: usize,
        field: &'static str,
        value: String,
    },
}

//! Errors for host-supplied positions that do not exist in the document.

use thiserror::Error;

/// Errors returned by [`DocumentAnalyzer`](crate::DocumentAnalyzer).
///
/// Text content never causes an error: unbalanced or unterminated constructs are
/// classified as unmatched instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Character offset past the end of the document.
    #[error("invalid offset: {0}")]
    InvalidOffset(usize),
    /// Line/column pair outside the document.
    #[error("invalid position: line {line}, column {column}")]
    InvalidPosition {
        /// Logical line index.
        line: usize,
        /// Column in characters.
        column: usize,
    },
    /// Character range that is reversed or extends past the document.
    #[error("invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Line index past the last line.
    #[error("invalid line: {0}")]
    InvalidLine(usize),
}

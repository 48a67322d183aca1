//! Call stack errors.

/// Invariant violation detected while navigating or validating a call stack.
///
/// Structural misses (no parent, no sibling) are not errors; they are
/// reported as `None` by the navigation methods.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallStackError {
    /// An exit call has no corresponding opening call before it.
    #[error("No opening call found for `{tag}` exit at index {index}")]
    NoOpeningCall {
        /// Tag name of the exit call.
        tag: String,
        /// Index of the exit call.
        index: usize,
    },
    /// An enter call has no corresponding exit call after it.
    #[error("No closing call found for `{tag}` enter at index {index}")]
    NoClosingCall {
        /// Tag name of the enter call.
        tag: String,
        /// Index of the enter call.
        index: usize,
    },
    /// The cursor is not on a call of the state required by the operation.
    #[error("Cursor is not on {expected} call")]
    UnexpectedCursor {
        /// Description of the required call (e.g. "an exit").
        expected: &'static str,
    },
    /// An exit call closes a tag other than the innermost open one.
    #[error("Unbalanced sequence at index {index}: expected `{expected}` exit, found `{found}`")]
    Unbalanced {
        /// Index of the offending exit call.
        index: usize,
        /// Innermost open tag name.
        expected: String,
        /// Tag name of the exit call.
        found: String,
    },
}

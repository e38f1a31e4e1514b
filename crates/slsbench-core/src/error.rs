//! Error types for the selection capability
//!
//! A failed selection is never fatal to the caller: enrichment abandons the
//! one field, the scenario builder abandons the one action.

/// Why a selection produced no choice
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// Scripted selector ran out of recorded answers
    #[error("selection script exhausted")]
    Exhausted,

    /// The user cancelled the prompt
    #[error("selection interrupted")]
    Interrupted,

    /// The chosen index is not a valid option
    #[error("selection index {index} out of range for {len} options")]
    OutOfRange { index: usize, len: usize },

    /// Nothing to choose from
    #[error("no options to select from")]
    NoOptions,

    /// Terminal or other backend failure
    #[error("selection backend failed: {0}")]
    Backend(String),
}

impl SelectError {
    /// Whether the user asked to stop, as opposed to a scripted or backend failure
    #[inline]
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        matches!(self, SelectError::Interrupted)
    }
}

/// Result type alias for selections
pub type SelectResult<T> = Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = SelectError::OutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "selection index 5 out of range for 3 options");
    }

    #[test]
    fn only_interrupted_is_interrupt() {
        assert!(SelectError::Interrupted.is_interrupt());
        assert!(!SelectError::Exhausted.is_interrupt());
    }
}

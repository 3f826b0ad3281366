//! Error types for the clock crate.

/// Failures reading a time source.
///
/// These are environment failures: the demo has no way to recover from them
/// and simply propagates them to the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// The system clock reports a time earlier than the Unix epoch
    #[error("system clock is {behind_ms} ms behind the Unix epoch")]
    BeforeEpoch {
        /// How far behind the epoch the clock is, in milliseconds
        behind_ms: u64,
    },

    /// The millisecond reading does not fit in a `u64`
    #[error("clock reading overflows a 64-bit millisecond counter")]
    Overflow,
}

/// Result alias for clock operations.
pub type ClockResult<T = u64> = Result<T, ClockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_epoch_display_mentions_offset() {
        let err = ClockError::BeforeEpoch { behind_ms: 42 };
        assert!(err.to_string().contains("42 ms"));
    }

    #[test]
    fn test_errors_compare_by_value() {
        assert_eq!(ClockError::Overflow, ClockError::Overflow);
        assert_ne!(
            ClockError::BeforeEpoch { behind_ms: 1 },
            ClockError::BeforeEpoch { behind_ms: 2 }
        );
    }
}

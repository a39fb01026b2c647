// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Interval with start >= end, or one reaching past the media end
    InvalidInterval(String),
    /// Media duration that cannot be planned against
    InvalidDuration(String),
    /// Interval list not ordered by start
    UnsortedIntervals(String),
    /// Edit settings out of range
    InvalidSettings(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidInterval(msg) => write!(f, "Invalid interval: {}", msg),
            DomainError::InvalidDuration(msg) => write!(f, "Invalid duration: {}", msg),
            DomainError::UnsortedIntervals(msg) => write!(f, "Unsorted intervals: {}", msg),
            DomainError::InvalidSettings(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

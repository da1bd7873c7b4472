//! Error types for histogram peak detection

use std::fmt;

/// Errors that can occur during peak detection and lattice lookups
#[derive(Debug, Clone, PartialEq)]
pub enum PeakError {
    /// Invalid input data or parameters
    InvalidInput(String),

    /// Lattice query lies beyond the tolerated range of the lattice
    OutOfRange(String),

    /// Lattice has no successor/predecessor for the queried interval
    Exhausted(String),

    /// Detection method is missing something it requires (e.g. a lattice)
    Configuration(String),
}

impl fmt::Display for PeakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PeakError::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            PeakError::Exhausted(msg) => write!(f, "Exhausted: {}", msg),
            PeakError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PeakError {}

//! Error types for throw tuning.
//!
//! The simulation itself never fails: missing references are retried and
//! degenerate input falls back to defaults. Only loading and validating
//! tuning data can produce an error.

use std::fmt;

/// Errors that can occur while loading or validating [`crate::ThrowTuning`].
#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read.
    Io(std::io::Error),
    /// The tuning JSON could not be parsed.
    Parse(serde_json::Error),
    /// Mass must be positive and finite.
    InvalidMass,
    /// Hit radius must be non-negative and finite.
    InvalidHitRadius,
    /// A timestep must be positive and finite.
    InvalidTimestep { field: &'static str },
    /// A scalar that must be non-negative was negative or not finite.
    NegativeValue { field: &'static str },
    /// A value that may have any sign was infinite or NaN.
    NonFinite { field: &'static str },
    /// The preview would allocate more points than allowed.
    PreviewSteps { steps: usize, max: usize },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning: {}", e),
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {}", e),
            TuningError::InvalidMass => write!(f, "mass must be positive and finite"),
            TuningError::InvalidHitRadius => {
                write!(f, "hit radius must be non-negative and finite")
            }
            TuningError::InvalidTimestep { field } => {
                write!(f, "{} must be a positive, finite timestep", field)
            }
            TuningError::NegativeValue { field } => {
                write!(f, "{} must be non-negative and finite", field)
            }
            TuningError::NonFinite { field } => write!(f, "{} must be finite", field),
            TuningError::PreviewSteps { steps, max } => {
                write!(f, "preview_steps {} exceeds the maximum of {}", steps, max)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

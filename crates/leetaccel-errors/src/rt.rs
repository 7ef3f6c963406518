//! Hot-path diagnostic codes.
//!
//! The interception callback never returns an error to its caller. When it
//! has to fall back (fail open, clamp, saturate a guard) it records one of
//! these codes instead:
//! - `Copy` semantics, no heap allocations
//! - Fixed `#[repr(u8)]` representation
//! - Stable numeric codes for counters and logs

use core::fmt;

use crate::common::ErrorSeverity;

/// Real-time diagnostic codes (pre-allocated for the event path).
///
/// # Examples
///
/// ```
/// use leetaccel_errors::{RTError, ErrorSeverity};
///
/// let err = RTError::UnexpectedEcho;
///
/// assert_eq!(err.code(), 3);
/// assert_eq!(err.severity(), ErrorSeverity::Warning);
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RTError {
    /// The active curve could not produce a multiplier; raw deltas were passed through
    CurveConfig = 1,
    /// A transformed delta exceeded the `i32` range and was clamped
    OutputOverflow = 2,
    /// A self-emitted event arrived with no outstanding echo guard
    UnexpectedEcho = 3,
    /// The echo guard reached its maximum and could not count another emission
    GuardSaturated = 4,
}

impl RTError {
    /// Every code, in numeric order.
    pub const ALL: [RTError; 4] = [
        RTError::CurveConfig,
        RTError::OutputOverflow,
        RTError::UnexpectedEcho,
        RTError::GuardSaturated,
    ];

    /// Get the numeric error code.
    ///
    /// ```
    /// use leetaccel_errors::RTError;
    ///
    /// assert_eq!(RTError::CurveConfig.code(), 1);
    /// assert_eq!(RTError::GuardSaturated.code(), 4);
    /// ```
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the error severity.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            RTError::CurveConfig => ErrorSeverity::Error,
            RTError::OutputOverflow => ErrorSeverity::Warning,
            RTError::UnexpectedEcho => ErrorSeverity::Warning,
            RTError::GuardSaturated => ErrorSeverity::Error,
        }
    }

    /// Check if the pipeline recovers on its own at the next window.
    ///
    /// A curve fault persists until new parameters are applied.
    pub fn is_recoverable(self) -> bool {
        !matches!(self, RTError::CurveConfig)
    }

    /// Create an error from a code.
    ///
    /// Returns `None` if the code does not correspond to a known error.
    ///
    /// ```
    /// use leetaccel_errors::RTError;
    ///
    /// assert_eq!(RTError::from_code(2), Some(RTError::OutputOverflow));
    /// assert_eq!(RTError::from_code(0), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RTError::CurveConfig),
            2 => Some(RTError::OutputOverflow),
            3 => Some(RTError::UnexpectedEcho),
            4 => Some(RTError::GuardSaturated),
            _ => None,
        }
    }
}

impl fmt::Display for RTError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RTError::CurveConfig => write!(f, "Curve configuration fault, passing raw motion"),
            RTError::OutputOverflow => write!(f, "Output delta clamped to i32 range"),
            RTError::UnexpectedEcho => write!(f, "Synthetic event without pending echo guard"),
            RTError::GuardSaturated => write!(f, "Echo guard saturated"),
        }
    }
}

impl std::error::Error for RTError {}

//! Device enumeration and binding errors.

use crate::common::ErrorSeverity;

/// Device errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Device not found
    #[error("Device not found: {0}")]
    NotFound(String),

    /// Attaching or detaching the interception point failed
    #[error("Failed to bind device {device} to driver {driver}: {reason}")]
    BindingFailure {
        /// Device identifier
        device: String,
        /// Driver the device was being bound to
        driver: String,
        /// Failure reason reported by the registry
        reason: String,
    },

    /// Device list could not be read
    #[error("Device enumeration failed: {0}")]
    Enumeration(String),

    /// Permission denied
    #[error("Permission denied for device: {0}")]
    PermissionDenied(String),
}

impl DeviceError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DeviceError::NotFound(_) => ErrorSeverity::Warning,
            DeviceError::BindingFailure { .. } => ErrorSeverity::Error,
            DeviceError::Enumeration(_) => ErrorSeverity::Error,
            DeviceError::PermissionDenied(_) => ErrorSeverity::Error,
        }
    }

    /// Create a device not found error.
    pub fn not_found(device: impl Into<String>) -> Self {
        DeviceError::NotFound(device.into())
    }

    /// Create a binding failure.
    pub fn binding_failure(
        device: impl Into<String>,
        driver: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DeviceError::BindingFailure {
            device: device.into(),
            driver: driver.into(),
            reason: reason.into(),
        }
    }

    /// Create an enumeration error.
    pub fn enumeration(msg: impl Into<String>) -> Self {
        DeviceError::Enumeration(msg.into())
    }

    /// Create a permission denied error.
    pub fn permission_denied(device: impl Into<String>) -> Self {
        DeviceError::PermissionDenied(device.into())
    }
}

//! Prelude module for convenient error handling imports.
//!
//! ```
//! use leetaccel_errors::prelude::*;
//!
//! fn bind(device: &str) -> Result<(), DeviceError> {
//!     if device.is_empty() {
//!         return Err(DeviceError::not_found(device));
//!     }
//!     Ok(())
//! }
//! # assert!(bind("").is_err());
//! ```

pub use crate::{
    RTResult, common::ErrorSeverity,
    config::ConfigError,
    device::DeviceError,
    rt::RTError,
};

//! Centralized error types for leetaccel
//!
//! This crate provides the error taxonomy shared by the curve engine, the
//! parameter store, device binding and the interception pipeline. Errors are
//! split by the path they occur on:
//!
//! - [`rt`]: hot-path diagnostic codes, `Copy` and allocation-free
//! - [`config`]: out-of-domain parameters and malformed lookup-table text
//! - [`device`]: enumeration and bind/unbind failures
//! - [`common`]: the [`ErrorSeverity`] scale every code maps onto
//!
//! # RT Safety
//!
//! Nothing on the per-event path propagates an error. The pipeline absorbs
//! faults locally with a safe fallback and records an [`RTError`] code, which
//! is `Copy` and can be queued without allocating. Only configuration-time
//! errors reach the caller.
//!
//! # Example
//!
//! ```
//! use leetaccel_errors::prelude::*;
//!
//! fn check_sensitivity(value: f64) -> Result<f64, ConfigError> {
//!     if !(value > 0.0) {
//!         return Err(ConfigError::out_of_range("Sensitivity", value, "(0, inf)"));
//!     }
//!     Ok(value)
//! }
//!
//! assert!(check_sensitivity(0.0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod config;
pub mod device;
pub mod prelude;
pub mod rt;

pub use common::ErrorSeverity;
pub use config::ConfigError;
pub use device::DeviceError;
pub use rt::RTError;

/// A specialized `Result` type for hot-path operations.
pub type RTResult<T = ()> = std::result::Result<T, RTError>;

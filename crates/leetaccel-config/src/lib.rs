//! Named driver parameters for leetaccel.
//!
//! The live driver exposes its configuration as independently settable
//! named values. This crate provides:
//! - [`ParamName`] and [`ParamValue`], the store's vocabulary
//! - the [`ParameterStore`] interface and an in-memory [`MemoryStore`]
//! - [`load_parameters`] and [`save_parameters`], which map a whole
//!   [`Parameters`](leetaccel_curves::Parameters) snapshot onto the store
//! - [`repair_parameters`], which rewrites missing or unreadable entries
//!
//! # Lookup table layout
//!
//! The table travels as `LutSize` (entry count) plus one bulk `LutDataBuf`
//! of `2 * LutSize` floats: every x value, then every y value. A size that
//! disagrees with the buffer is a configuration error. A consistent table
//! longer than 512 entries keeps its first 512 and the load reports the cut.
//!
//! # Example
//!
//! ```
//! use leetaccel_config::prelude::*;
//! use leetaccel_curves::{AccelMode, Parameters};
//!
//! let mut params = Parameters::for_mode(AccelMode::LookupTable);
//! params.lookup_table = "0,1;10,2".parse()?;
//!
//! let store = MemoryStore::new();
//! save_parameters(&params, &store)?;
//! assert_eq!(
//!     store.get(ParamName::LutDataBuf)?,
//!     ParamValue::Table(vec![0.0, 10.0, 1.0, 2.0])
//! );
//! assert_eq!(load_parameters(&store)?, params);
//! # Ok::<(), leetaccel_errors::ConfigError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod name;
pub mod parameters;
pub mod prelude;
pub mod store;

pub use name::{ParamName, ParamValue, ValueKind};
pub use parameters::{
    LoadReport, entries, load_parameters, load_parameters_report, repair_parameters,
    save_parameters,
};
pub use store::{MemoryStore, ParameterStore};

/// Result type for parameter store operations
pub type Result<T> = std::result::Result<T, leetaccel_errors::ConfigError>;

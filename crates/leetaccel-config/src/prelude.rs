//! Convenience re-exports for common types

pub use crate::name::{ParamName, ParamValue, ValueKind};
pub use crate::parameters::{
    LoadReport, load_parameters, load_parameters_report, repair_parameters, save_parameters,
};
pub use crate::store::{MemoryStore, ParameterStore};

pub use leetaccel_errors::ConfigError;

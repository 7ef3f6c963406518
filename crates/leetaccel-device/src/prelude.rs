//! Convenience re-exports for common types

pub use crate::registry::{
    BindOutcome, DeviceRegistry, GENERIC_HID_DRIVER, PIPELINE_DRIVER, attach, detach,
    discover_pointers,
};
pub use crate::{DeviceId, DeviceInfo, InterfaceDescriptor};

pub use leetaccel_errors::DeviceError;

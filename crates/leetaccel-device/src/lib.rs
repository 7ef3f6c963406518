//! Device types for pointer interception
//!
//! This crate describes the pointer devices the pipeline can attach to and
//! the registry through which a device is moved between drivers. The
//! registry itself is an interface; the kernel-facing implementation lives
//! outside this workspace.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod prelude;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use registry::{
    BindOutcome, DeviceRegistry, GENERIC_HID_DRIVER, PIPELINE_DRIVER, attach, detach,
    discover_pointers,
};

/// USB class code for human interface devices.
pub const HID_CLASS: u8 = 3;
/// HID sub-class for boot-protocol interfaces.
pub const BOOT_SUBCLASS: u8 = 1;
/// Boot-protocol code for a mouse.
pub const MOUSE_PROTOCOL: u8 = 2;

/// Bus identifier of one device interface, e.g. `3-1.2:1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a bus identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Class, sub-class and protocol codes of a USB interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub class: u8,
    pub sub_class: u8,
    pub protocol: u8,
}

impl InterfaceDescriptor {
    /// HID boot mouse interface.
    pub const BOOT_MOUSE: Self = Self {
        class: HID_CLASS,
        sub_class: BOOT_SUBCLASS,
        protocol: MOUSE_PROTOCOL,
    };

    pub fn is_boot_mouse(&self) -> bool {
        *self == Self::BOOT_MOUSE
    }

    /// Readable class name.
    pub fn class_name(&self) -> &'static str {
        match self.class {
            0x00 => "Per-interface",
            0x01 => "Audio",
            0x02 => "Communications",
            HID_CLASS => "HID",
            0x07 => "Printer",
            0x08 => "Mass Storage",
            0x09 => "Hub",
            0x0E => "Video",
            0xE0 => "Wireless Controller",
            0xEF => "Miscellaneous",
            0xFE => "Application Specific",
            0xFF => "Vendor Specific",
            _ => "Unknown",
        }
    }

    /// Readable sub-class name.
    pub fn sub_class_name(&self) -> &'static str {
        match self.sub_class {
            0 => "None",
            BOOT_SUBCLASS => "Boot Interface",
            _ => "Unknown",
        }
    }

    /// Readable protocol name. Only meaningful for HID interfaces.
    pub fn protocol_name(&self) -> &'static str {
        if self.class != HID_CLASS {
            return "Unknown";
        }
        match self.protocol {
            0 => "None",
            1 => "Keyboard",
            MOUSE_PROTOCOL => "Mouse",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.class_name(),
            self.sub_class_name(),
            self.protocol_name()
        )
    }
}

/// One enumerated device interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    /// Product name.
    pub name: String,
    pub manufacturer: String,
    /// Driver currently bound, if any.
    pub driver: Option<String>,
    pub interface: InterfaceDescriptor,
    /// Reported maximum power draw, e.g. `100mA`.
    pub max_power: Option<String>,
}

impl DeviceInfo {
    /// Create an unbound device with no power information.
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, interface: InterfaceDescriptor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            manufacturer: String::new(),
            driver: None,
            interface,
            max_power: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn with_max_power(mut self, max_power: impl Into<String>) -> Self {
        self.max_power = Some(max_power.into());
        self
    }

    /// True when the interception driver owns this interface.
    pub fn is_bound_to_pipeline(&self) -> bool {
        self.driver.as_deref() == Some(PIPELINE_DRIVER)
    }

    /// HID boot mouse whose product name does not contain `Keyboard`.
    pub fn is_pointer_candidate(&self) -> bool {
        self.interface.is_boot_mouse() && !self.name.contains("Keyboard")
    }
}

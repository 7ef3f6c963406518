//! Device registry interface and the attach/detach workflow.
//!
//! Attaching moves an interface from whatever driver holds it to the
//! interception driver; detaching hands it back to the generic HID driver.
//! Both are unbind-then-bind, and a failed bind re-binds the previous driver
//! so the device is never left without one. There is no retry.

use leetaccel_errors::DeviceError;
use tracing::{debug, error, info, warn};

use crate::{DeviceId, DeviceInfo};

/// Driver that runs the interception pipeline.
pub const PIPELINE_DRIVER: &str = "leetmouse";
/// Generic driver a detached device is returned to.
pub const GENERIC_HID_DRIVER: &str = "usbhid";

/// Enumerate devices and move them between drivers.
pub trait DeviceRegistry {
    /// Every device interface currently present.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, DeviceError>;

    /// Bind `id` to `driver`.
    fn bind(&self, id: &DeviceId, driver: &str) -> Result<(), DeviceError>;

    /// Release `id` from `driver`.
    fn unbind(&self, id: &DeviceId, driver: &str) -> Result<(), DeviceError>;
}

/// What [`attach`] or [`detach`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The device was already on the requested driver.
    Unchanged,
    /// The device moved, releasing `previous` (if it had a driver).
    Rebound {
        /// Driver the device was released from.
        previous: Option<String>,
    },
}

/// Pointer candidates, sorted by name.
pub fn discover_pointers<R: DeviceRegistry + ?Sized>(
    registry: &R,
) -> Result<Vec<DeviceInfo>, DeviceError> {
    let mut devices: Vec<DeviceInfo> = registry
        .list_devices()?
        .into_iter()
        .filter(DeviceInfo::is_pointer_candidate)
        .collect();
    devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    debug!(count = devices.len(), "Discovered pointer devices");
    Ok(devices)
}

/// Bind `id` to [`PIPELINE_DRIVER`].
///
/// # Errors
///
/// [`DeviceError::NotFound`] for an unknown id, otherwise
/// [`DeviceError::BindingFailure`] naming the step that failed. A failed
/// bind has already been reverted when this returns.
pub fn attach<R: DeviceRegistry + ?Sized>(
    registry: &R,
    id: &DeviceId,
) -> Result<BindOutcome, DeviceError> {
    rebind(registry, id, PIPELINE_DRIVER)
}

/// Return `id` to [`GENERIC_HID_DRIVER`].
///
/// # Errors
///
/// As for [`attach`].
pub fn detach<R: DeviceRegistry + ?Sized>(
    registry: &R,
    id: &DeviceId,
) -> Result<BindOutcome, DeviceError> {
    rebind(registry, id, GENERIC_HID_DRIVER)
}

fn rebind<R: DeviceRegistry + ?Sized>(
    registry: &R,
    id: &DeviceId,
    target: &str,
) -> Result<BindOutcome, DeviceError> {
    let info = registry
        .list_devices()?
        .into_iter()
        .find(|d| &d.id == id)
        .ok_or_else(|| DeviceError::not_found(id.as_str()))?;

    let previous = info.driver;
    if previous.as_deref() == Some(target) {
        debug!(device = %id, driver = target, "Device already bound");
        return Ok(BindOutcome::Unchanged);
    }

    if let Some(current) = previous.as_deref() {
        registry.unbind(id, current).map_err(|e| {
            warn!(device = %id, driver = current, error = %e, "Unbind failed");
            DeviceError::binding_failure(
                id.as_str(),
                target,
                format!("unbind from {current} failed: {e}"),
            )
        })?;
    }

    if let Err(e) = registry.bind(id, target) {
        warn!(device = %id, driver = target, error = %e, "Bind failed, reverting");
        let mut reason = e.to_string();
        if let Some(current) = previous.as_deref()
            && let Err(revert) = registry.bind(id, current)
        {
            error!(
                device = %id,
                driver = current,
                error = %revert,
                "Revert failed, device has no driver"
            );
            reason = format!(
                "{reason}; revert to {current} also failed: {revert}; device may now have no driver"
            );
        }
        return Err(DeviceError::binding_failure(id.as_str(), target, reason));
    }

    info!(device = %id, from = ?previous, to = target, "Device rebound");
    Ok(BindOutcome::Rebound { previous })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterfaceDescriptor;

    struct FixedRegistry(Vec<DeviceInfo>);

    impl DeviceRegistry for FixedRegistry {
        fn list_devices(&self) -> Result<Vec<DeviceInfo>, DeviceError> {
            Ok(self.0.clone())
        }

        fn bind(&self, _id: &DeviceId, _driver: &str) -> Result<(), DeviceError> {
            Ok(())
        }

        fn unbind(&self, _id: &DeviceId, _driver: &str) -> Result<(), DeviceError> {
            Ok(())
        }
    }

    #[test]
    fn test_discover_filters_and_sorts() -> Result<(), DeviceError> {
        let registry = FixedRegistry(vec![
            DeviceInfo::new("1-2:1.0", "Zowie", InterfaceDescriptor::BOOT_MOUSE),
            DeviceInfo::new("1-3:1.0", "Apex Keyboard", InterfaceDescriptor::BOOT_MOUSE),
            DeviceInfo::new("1-1:1.0", "Basilisk", InterfaceDescriptor::BOOT_MOUSE),
            DeviceInfo::new("1-4:1.0", "Hub", InterfaceDescriptor::default()),
        ]);
        let names: Vec<String> = discover_pointers(&registry)?
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Basilisk", "Zowie"]);
        Ok(())
    }

    #[test]
    fn test_unknown_device() {
        let registry = FixedRegistry(Vec::new());
        assert_eq!(
            attach(&registry, &DeviceId::new("9-9:1.0")),
            Err(DeviceError::NotFound("9-9:1.0".to_string()))
        );
    }

    #[test]
    fn test_already_attached_is_unchanged() {
        let registry = FixedRegistry(vec![
            DeviceInfo::new("1-1:1.0", "m", InterfaceDescriptor::BOOT_MOUSE).with_driver(PIPELINE_DRIVER),
        ]);
        assert_eq!(attach(&registry, &DeviceId::new("1-1:1.0")), Ok(BindOutcome::Unchanged));
    }
}

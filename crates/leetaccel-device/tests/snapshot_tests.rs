//! Snapshot tests for device descriptions.

use insta::assert_snapshot;
use leetaccel_device::prelude::*;

#[test]
fn test_device_json() {
    let info = DeviceInfo::new("3-1.2:1.0", "G Pro", InterfaceDescriptor::BOOT_MOUSE)
        .with_manufacturer("Logitech")
        .with_driver(PIPELINE_DRIVER)
        .with_max_power("98mA");
    let json = match serde_json::to_string(&info) {
        Ok(json) => json,
        Err(e) => panic!("unexpected Err: {e:?}"),
    };
    assert_snapshot!(json, @r#"{"id":"3-1.2:1.0","name":"G Pro","manufacturer":"Logitech","driver":"leetmouse","interface":{"class":3,"sub_class":1,"protocol":2},"max_power":"98mA"}"#);
}

#[test]
fn test_binding_failure_message() {
    let err = DeviceError::binding_failure("3-1:1.0", PIPELINE_DRIVER, "Permission denied for device: 3-1:1.0");
    assert_snapshot!(err.to_string(), @"Failed to bind device 3-1:1.0 to driver leetmouse: Permission denied for device: 3-1:1.0");
}

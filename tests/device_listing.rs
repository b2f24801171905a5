//! Integration tests for the unified device listing
//!
//! Exercises the full parse-and-merge path for both platforms against
//! canned tool output, without requiring Xcode or the Android SDK.

use vdev_core::{DeviceState, Platform, OFFLINE_ID};
use vdev_devices::adb::{parse_adb_devices, parse_avd_list, RunningInstance};
use vdev_devices::directory::merge_android_devices;
use vdev_devices::simctl::parse_device_list;

const SIMCTL_JSON: &str = r#"{
    "devices": {
        "com.apple.CoreSimulator.SimRuntime.iOS-17-2": [
            {
                "udid": "U1",
                "name": "iPhone 15 Pro",
                "state": "Booted",
                "deviceTypeIdentifier": "com.apple.CoreSimulator.SimDeviceType.iPhone-15-Pro",
                "isAvailable": true
            }
        ]
    }
}"#;

#[test]
fn full_listing_merges_both_platforms() {
    // One booted simulator
    let mut devices = parse_device_list(SIMCTL_JSON).unwrap();

    // Two declared AVDs, one of them running as emulator-5554
    let declared = parse_avd_list("Pixel\nOtherAVD\n");
    let serials = parse_adb_devices("List of devices attached\nemulator-5554\tdevice\n");
    assert_eq!(serials, vec!["emulator-5554"]);

    let running = vec![RunningInstance {
        serial: serials[0].clone(),
        avd_name: "Pixel".to_string(),
    }];
    devices.extend(merge_android_devices(declared, running));

    assert_eq!(devices.len(), 3);

    let sim = &devices[0];
    assert_eq!(sim.platform, Platform::Ios);
    assert_eq!(sim.id, "U1");
    assert_eq!(sim.state, DeviceState::Booted);
    assert_eq!(sim.runtime.as_deref(), Some("iOS 17.2"));

    let pixel = devices.iter().find(|d| d.name == "Pixel").unwrap();
    assert_eq!(pixel.platform, Platform::Android);
    assert_eq!(pixel.id, "emulator-5554");
    assert_eq!(pixel.state, DeviceState::Booted);

    let other = devices.iter().find(|d| d.name == "OtherAVD").unwrap();
    assert_eq!(other.id, OFFLINE_ID);
    assert_eq!(other.state, DeviceState::Shutdown);

    // The running AVD never appears twice
    assert_eq!(devices.iter().filter(|d| d.name == "Pixel").count(), 1);
}

#[test]
fn listing_tolerates_empty_platforms() {
    let devices = merge_android_devices(parse_avd_list(""), Vec::new());
    assert!(devices.is_empty());
}

//! iOS simulator discovery and lifecycle using xcrun simctl
//!
//! Device discovery uses `xcrun simctl list devices --json`; lifecycle and
//! capture go through the corresponding simctl subcommands. Boot and
//! shutdown are idempotent: simctl's "current state" complaints are treated
//! as success.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::{Child, Command};

use vdev_core::prelude::*;
use vdev_core::{Device, DeviceState, Platform};

use crate::exec;

/// JSON output from `xcrun simctl list devices --json`
#[derive(Debug, Deserialize)]
struct SimctlList {
    devices: HashMap<String, Vec<SimctlDevice>>,
}

#[derive(Debug, Deserialize)]
struct SimctlDevice {
    udid: String,
    name: String,
    state: String,
    #[serde(rename = "deviceTypeIdentifier")]
    device_type_identifier: Option<String>,
    #[serde(rename = "isAvailable")]
    is_available: Option<bool>,
}

/// List all available iOS simulators
pub async fn list_devices() -> Result<Vec<Device>> {
    let output = exec::run_checked("xcrun", ["simctl", "list", "devices", "--json"]).await?;
    parse_device_list(&exec::stdout_text(&output))
}

/// Parse simctl's JSON device listing into the shared device model
///
/// Entries are grouped by runtime identifier; unavailable entries (stale
/// runtimes) are skipped. Output is sorted newest runtime first, then name.
pub fn parse_device_list(json: &str) -> Result<Vec<Device>> {
    let parsed: SimctlList = serde_json::from_str(json)?;

    let mut devices = Vec::new();
    for (runtime_key, entries) in parsed.devices {
        let runtime = parse_runtime_name(&runtime_key);

        for entry in entries {
            if entry.is_available == Some(false) {
                continue;
            }

            devices.push(Device {
                platform: Platform::Ios,
                name: entry.name,
                id: entry.udid,
                state: DeviceState::from(entry.state.as_str()),
                runtime: Some(runtime.clone()),
                device_type: entry.device_type_identifier,
            });
        }
    }

    devices.sort_by(|a, b| b.runtime.cmp(&a.runtime).then_with(|| a.name.cmp(&b.name)));

    Ok(devices)
}

/// Parse a runtime identifier to a friendly name
/// "com.apple.CoreSimulator.SimRuntime.iOS-17-2" -> "iOS 17.2"
pub fn parse_runtime_name(identifier: &str) -> String {
    if let Some(suffix) = identifier.strip_prefix("com.apple.CoreSimulator.SimRuntime.") {
        if let Some((os_name, version)) = suffix.split_once('-') {
            format!("{} {}", os_name, version.replace('-', "."))
        } else {
            suffix.to_string()
        }
    } else {
        identifier.to_string()
    }
}

/// Boot a simulator by UDID
///
/// Booting an already-booted simulator is a success.
pub async fn boot(udid: &str) -> Result<()> {
    let output = exec::run("xcrun", ["simctl", "boot", udid]).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // "Unable to boot device in current state: Booted" is not an error
        if !stderr.contains("Booted") {
            return Err(Error::command_failed(
                format!("xcrun simctl boot {udid}"),
                output.status.code(),
                stderr,
            ));
        }
    }

    Ok(())
}

/// Shutdown a simulator by UDID
///
/// Shutting down an already-stopped simulator is a success.
pub async fn shutdown(udid: &str) -> Result<()> {
    let output = exec::run("xcrun", ["simctl", "shutdown", udid]).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Ignore "Unable to shutdown device in current state: Shutdown"
        if !stderr.contains("Shutdown") {
            return Err(Error::command_failed(
                format!("xcrun simctl shutdown {udid}"),
                output.status.code(),
                stderr,
            ));
        }
    }

    Ok(())
}

/// Permanently remove a simulator
pub async fn delete(udid: &str) -> Result<()> {
    exec::run_checked("xcrun", ["simctl", "delete", udid]).await?;
    Ok(())
}

/// Open the Simulator app so the booted device gets a window
pub async fn open_simulator_app() -> Result<()> {
    exec::run_checked("open", ["-a", "Simulator"]).await?;
    Ok(())
}

/// Capture a screenshot straight to a host file
pub async fn screenshot(udid: &str, output: &Path) -> Result<()> {
    exec::run_checked(
        "xcrun",
        [
            "simctl".as_ref(),
            "io".as_ref(),
            udid.as_ref(),
            "screenshot".as_ref(),
            output.as_os_str(),
        ],
    )
    .await?;
    Ok(())
}

/// Spawn the asynchronous screen-recording child process
///
/// The child records until it receives SIGINT; the caller owns the handle
/// and is responsible for stopping and reaping it.
pub fn spawn_recording(udid: &str, output: &Path) -> Result<Child> {
    Command::new("xcrun")
        .arg("simctl")
        .arg("io")
        .arg(udid)
        .arg("recordVideo")
        .arg("--codec=h264")
        .arg("--force")
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_missing("xcrun")
            } else {
                Error::Io(e)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_name() {
        assert_eq!(
            parse_runtime_name("com.apple.CoreSimulator.SimRuntime.iOS-17-2"),
            "iOS 17.2"
        );
        assert_eq!(
            parse_runtime_name("com.apple.CoreSimulator.SimRuntime.watchOS-10-5"),
            "watchOS 10.5"
        );
        assert_eq!(parse_runtime_name("custom-runtime"), "custom-runtime");
    }

    #[test]
    fn test_parse_device_list() {
        let json = r#"{
            "devices": {
                "com.apple.CoreSimulator.SimRuntime.iOS-17-2": [
                    {
                        "udid": "702ABC1F-5EA5-4F83-84AB-6380CA91D39A",
                        "name": "iPhone 15 Pro",
                        "state": "Booted",
                        "deviceTypeIdentifier": "com.apple.CoreSimulator.SimDeviceType.iPhone-15-Pro",
                        "isAvailable": true
                    },
                    {
                        "udid": "8D2371C2-1234-4F83-84AB-000000000000",
                        "name": "iPhone 14",
                        "state": "Shutdown",
                        "isAvailable": true
                    }
                ]
            }
        }"#;

        let devices = parse_device_list(json).unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "iPhone 14");
        assert_eq!(devices[0].state, DeviceState::Shutdown);
        assert_eq!(devices[1].name, "iPhone 15 Pro");
        assert_eq!(devices[1].state, DeviceState::Booted);
        assert_eq!(devices[1].runtime.as_deref(), Some("iOS 17.2"));
        assert_eq!(devices[1].platform, Platform::Ios);
    }

    #[test]
    fn test_parse_device_list_skips_unavailable() {
        let json = r#"{
            "devices": {
                "com.apple.CoreSimulator.SimRuntime.iOS-16-0": [
                    {
                        "udid": "DEAD-BEEF",
                        "name": "Broken",
                        "state": "Shutdown",
                        "isAvailable": false
                    }
                ]
            }
        }"#;

        let devices = parse_device_list(json).unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn test_parse_device_list_sorts_newest_runtime_first() {
        let json = r#"{
            "devices": {
                "com.apple.CoreSimulator.SimRuntime.iOS-16-0": [
                    {"udid": "A", "name": "iPhone 13", "state": "Shutdown", "isAvailable": true}
                ],
                "com.apple.CoreSimulator.SimRuntime.iOS-17-2": [
                    {"udid": "B", "name": "iPhone 15", "state": "Shutdown", "isAvailable": true}
                ]
            }
        }"#;

        let devices = parse_device_list(json).unwrap();
        assert_eq!(devices[0].runtime.as_deref(), Some("iOS 17.2"));
        assert_eq!(devices[1].runtime.as_deref(), Some("iOS 16.0"));
    }

    #[test]
    fn test_parse_device_list_rejects_garbage() {
        assert!(parse_device_list("not json").is_err());
    }

    #[tokio::test]
    #[ignore] // Requires Xcode
    async fn test_list_devices_integration() {
        match list_devices().await {
            Ok(devices) => {
                for device in devices {
                    println!("{} [{}] {}", device.name, device.id, device.state);
                }
            }
            Err(Error::ToolMissing { .. }) => {
                println!("xcrun not found - skipping integration test");
            }
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }
}

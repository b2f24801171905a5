//! Unified device directory across both platforms
//!
//! The directory never fails the overall listing: a platform whose tooling
//! is absent or erroring contributes an empty set and a warning, nothing
//! more.

use std::collections::HashSet;

use vdev_core::prelude::*;
use vdev_core::Device;

use crate::adb::{self, RunningInstance};
use crate::simctl;
use crate::tools::ToolAvailability;

/// Result of a full directory listing
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub devices: Vec<Device>,

    /// Per-platform diagnostics for probes that failed
    pub warnings: Vec<String>,
}

/// Queries each platform's device registry and normalizes the results
#[derive(Debug, Clone)]
pub struct DeviceDirectory {
    tools: ToolAvailability,
}

impl DeviceDirectory {
    pub fn new(tools: ToolAvailability) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolAvailability {
        &self.tools
    }

    /// List every known device across both platforms
    pub async fn list_all(&self) -> DirectoryListing {
        let mut devices = Vec::new();
        let mut warnings = Vec::new();

        if self.tools.ios_capable() {
            match self.ios_devices().await {
                Ok(mut ios) => devices.append(&mut ios),
                Err(err) => {
                    warn!("could not list iOS simulators: {}", err);
                    warnings.push(format!("could not list iOS simulators: {err}"));
                }
            }
        }

        match self.android_devices().await {
            Ok(mut android) => devices.append(&mut android),
            Err(err) => {
                warn!("could not list Android emulators: {}", err);
                warnings.push(format!("could not list Android emulators: {err}"));
            }
        }

        DirectoryListing { devices, warnings }
    }

    /// Full iOS simulator directory (any state)
    pub async fn ios_devices(&self) -> Result<Vec<Device>> {
        simctl::list_devices().await
    }

    /// Android directory: declared AVDs unioned with running instances
    ///
    /// A failing running-instance probe degrades to "nothing running";
    /// a failing declared-device probe fails the Android listing.
    pub async fn android_devices(&self) -> Result<Vec<Device>> {
        let declared = adb::list_avds(&self.tools).await?;
        let running = match self.running_instances().await {
            Ok(running) => running,
            Err(err) => {
                debug!("could not list running emulators: {}", err);
                Vec::new()
            }
        };

        Ok(merge_android_devices(declared, running))
    }

    /// Running Android instances only (name-resolved)
    pub async fn running_instances(&self) -> Result<Vec<RunningInstance>> {
        adb::running_instances().await
    }
}

/// Build the deduplicated union of declared AVDs and running instances
///
/// An AVD name present in both sets yields exactly one Booted entry carrying
/// the running serial. Declared AVDs with no instance get the offline
/// sentinel id; running instances with no surviving declaration are kept as
/// Booted entries.
pub fn merge_android_devices(declared: Vec<String>, running: Vec<RunningInstance>) -> Vec<Device> {
    let declared_names: HashSet<&str> = declared.iter().map(String::as_str).collect();

    let mut devices: Vec<Device> = declared
        .iter()
        .map(|name| {
            match running.iter().find(|instance| instance.avd_name == *name) {
                Some(instance) => Device::running_emulator(name.as_str(), instance.serial.as_str()),
                None => Device::offline_emulator(name.as_str()),
            }
        })
        .collect();

    for instance in &running {
        if !declared_names.contains(instance.avd_name.as_str()) {
            devices.push(Device::running_emulator(
                instance.avd_name.as_str(),
                instance.serial.as_str(),
            ));
        }
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdev_core::{DeviceState, OFFLINE_ID};

    fn running(serial: &str, name: &str) -> RunningInstance {
        RunningInstance {
            serial: serial.to_string(),
            avd_name: name.to_string(),
        }
    }

    #[test]
    fn test_merge_running_avd_appears_exactly_once() {
        let declared = vec!["Pixel".to_string(), "OtherAVD".to_string()];
        let instances = vec![running("emulator-5554", "Pixel")];

        let devices = merge_android_devices(declared, instances);

        assert_eq!(devices.len(), 2);

        let pixels: Vec<_> = devices.iter().filter(|d| d.name == "Pixel").collect();
        assert_eq!(pixels.len(), 1);
        assert_eq!(pixels[0].id, "emulator-5554");
        assert_eq!(pixels[0].state, DeviceState::Booted);

        let other = devices.iter().find(|d| d.name == "OtherAVD").unwrap();
        assert_eq!(other.id, OFFLINE_ID);
        assert_eq!(other.state, DeviceState::Shutdown);
    }

    #[test]
    fn test_merge_keeps_undeclared_running_instance() {
        let declared = vec!["Pixel".to_string()];
        let instances = vec![
            running("emulator-5554", "Pixel"),
            running("emulator-5556", "Deleted_AVD"),
        ];

        let devices = merge_android_devices(declared, instances);

        assert_eq!(devices.len(), 2);
        let orphan = devices.iter().find(|d| d.name == "Deleted_AVD").unwrap();
        assert_eq!(orphan.id, "emulator-5556");
        assert_eq!(orphan.state, DeviceState::Booted);
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_android_devices(Vec::new(), Vec::new()).is_empty());

        let only_declared = merge_android_devices(vec!["Pixel".to_string()], Vec::new());
        assert_eq!(only_declared.len(), 1);
        assert_eq!(only_declared[0].id, OFFLINE_ID);
    }

    #[test]
    fn test_merge_duplicate_instances_for_same_avd() {
        let declared = vec!["Pixel".to_string()];
        let instances = vec![
            running("emulator-5554", "Pixel"),
            running("emulator-5556", "Pixel"),
        ];

        let devices = merge_android_devices(declared, instances);

        // First instance wins; the duplicate never produces a second entry
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "emulator-5554");
    }
}

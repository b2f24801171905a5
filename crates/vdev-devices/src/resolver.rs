//! Free-form identifier resolution
//!
//! Maps a user-supplied identifier (name, UDID, AVD name, or adb serial) to
//! a concrete device. iOS is always probed before Android; probe failures
//! are swallowed into the not-found path so an absent toolchain on one
//! platform never blocks the other.

use vdev_core::prelude::*;
use vdev_core::Device;

use crate::directory::DeviceDirectory;

/// Resolves identifiers against the device directory
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    directory: &'a DeviceDirectory,
}

/// Whether an identifier has the canonical UDID shape
/// (36 characters with exactly 4 internal separators)
pub fn is_udid_shaped(identifier: &str) -> bool {
    identifier.len() == 36 && identifier.bytes().filter(|b| *b == b'-').count() == 4
}

/// First device matching an identifier by case-insensitive name or id
pub fn match_identifier<'d>(devices: &'d [Device], identifier: &str) -> Option<&'d Device> {
    devices.iter().find(|d| d.matches(identifier))
}

/// iOS matching rule
///
/// A UDID-shaped identifier matches by native id verbatim and nothing else;
/// any other identifier matches name or id case-insensitively.
pub fn match_ios<'d>(devices: &'d [Device], identifier: &str) -> Option<&'d Device> {
    if is_udid_shaped(identifier) {
        devices.iter().find(|d| d.id == identifier)
    } else {
        match_identifier(devices, identifier)
    }
}

impl<'a> Resolver<'a> {
    pub fn new(directory: &'a DeviceDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &DeviceDirectory {
        self.directory
    }

    /// Resolve an identifier to a concrete device
    ///
    /// A UDID-shaped identifier is only ever looked up verbatim as an iOS
    /// native id; it is never reinterpreted as a name. Otherwise the iOS
    /// directory (full, any state) is searched first on capable hosts,
    /// then Android *running instances* by AVD name.
    pub async fn resolve(&self, identifier: &str) -> Result<Device> {
        if is_udid_shaped(identifier) || self.directory.tools().ios_capable() {
            let devices = self.ios_devices_or_empty().await;
            if let Some(device) = match_ios(&devices, identifier) {
                return Ok(device.clone());
            }

            // A UDID-shaped identifier is never reinterpreted as a name
            if is_udid_shaped(identifier) {
                return Err(Error::not_found(identifier));
            }
        }

        if let Some(device) = self.running_emulator_by_name(identifier).await {
            return Ok(device);
        }

        Err(Error::not_found(identifier))
    }

    /// Find an iOS simulator by name or id across the full directory
    ///
    /// With `booted_only`, only a currently running simulator matches.
    pub async fn find_simulator(&self, identifier: &str, booted_only: bool) -> Result<Device> {
        let devices = self.ios_devices_or_empty().await;

        devices
            .iter()
            .filter(|d| !booted_only || d.is_booted())
            .find(|d| d.matches(identifier))
            .cloned()
            .ok_or_else(|| {
                if booted_only {
                    Error::not_running(identifier)
                } else {
                    Error::not_found(identifier)
                }
            })
    }

    /// Find a running Android instance by AVD name
    pub async fn running_emulator_by_name(&self, name: &str) -> Option<Device> {
        let instances = match self.directory.running_instances().await {
            Ok(instances) => instances,
            Err(err) => {
                debug!("running-emulator probe failed: {}", err);
                return None;
            }
        };

        instances
            .into_iter()
            .find(|instance| instance.avd_name.eq_ignore_ascii_case(name))
            .map(|instance| Device::running_emulator(instance.avd_name, instance.serial))
    }

    /// Canonical name of a declared AVD matching `name` case-insensitively
    ///
    /// The platform tools want the declared spelling, not the user's.
    pub async fn declared_avd(&self, name: &str) -> Option<String> {
        match crate::adb::list_avds(self.directory.tools()).await {
            Ok(avds) => avds.into_iter().find(|avd| avd.eq_ignore_ascii_case(name)),
            Err(err) => {
                debug!("declared-AVD probe failed: {}", err);
                None
            }
        }
    }

    /// Pick the implicit capture target: the first booted iOS simulator in
    /// directory order, else the first running Android instance.
    pub async fn active_device(&self) -> Result<Device> {
        if self.directory.tools().ios_capable() {
            let devices = self.ios_devices_or_empty().await;
            if let Some(device) = devices.into_iter().find(Device::is_booted) {
                return Ok(device);
            }
        }

        let instances = self.directory.running_instances().await.unwrap_or_default();
        if let Some(instance) = instances.into_iter().next() {
            return Ok(Device::running_emulator(instance.avd_name, instance.serial));
        }

        Err(Error::NoActiveDevice)
    }

    async fn ios_devices_or_empty(&self) -> Vec<Device> {
        match self.directory.ios_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                debug!("iOS directory probe failed: {}", err);
                Vec::new()
            }
        }
    }
}

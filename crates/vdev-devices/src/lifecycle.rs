//! Idempotent device lifecycle operations
//!
//! Each operation tries iOS first (only on a capable host) and falls
//! through to Android; per-platform misses and failures are logged, and a
//! failure of both surfaces as the single operation-level error the CLI
//! reports. Successful starts record the device in the last-started store.

use vdev_core::prelude::*;
use vdev_core::{Device, DeviceState, LastStartedStore, Platform};

use crate::adb;
use crate::resolver::Resolver;
use crate::simctl;

/// Placeholder native id recorded when an emulator boot was just spawned
/// and the adb serial is not known yet.
pub const BOOT_PENDING_ID: &str = "starting";

/// Outcome of a start operation
#[derive(Debug, Clone)]
pub struct Started {
    pub device: Device,

    /// The target was already running; no boot was issued
    pub already_running: bool,
}

/// Per-platform start/stop/shutdown/restart/delete, built on the resolver
pub struct LifecycleController<'a> {
    resolver: Resolver<'a>,
    store: &'a LastStartedStore,
}

impl<'a> LifecycleController<'a> {
    pub fn new(resolver: Resolver<'a>, store: &'a LastStartedStore) -> Self {
        Self { resolver, store }
    }

    /// Boot a device by name or id
    pub async fn start(&self, identifier: &str) -> Result<Started> {
        if self.ios_capable() {
            match self.start_simulator(identifier).await {
                Ok(started) => return Ok(started),
                Err(err) => debug!("iOS start for '{}' did not succeed: {}", identifier, err),
            }
        }

        self.start_emulator(identifier).await.map_err(|err| {
            debug!("Android start for '{}' did not succeed: {}", identifier, err);
            Error::operation_failed(identifier, "start")
        })
    }

    /// Stop a currently running device
    pub async fn stop(&self, identifier: &str) -> Result<Device> {
        self.stop_running(identifier).await.map_err(|err| {
            debug!("stop for '{}' did not succeed: {}", identifier, err);
            Error::operation_failed(identifier, "stop")
        })
    }

    /// Shutdown a currently running device
    ///
    /// Android has no distinct shutdown; the verb routes to the same kill
    /// primitive as stop.
    pub async fn shutdown(&self, identifier: &str) -> Result<Device> {
        self.stop_running(identifier).await.map_err(|err| {
            debug!("shutdown for '{}' did not succeed: {}", identifier, err);
            Error::operation_failed(identifier, "shutdown")
        })
    }

    /// Best-effort shutdown followed by a mandatory boot
    pub async fn restart(&self, identifier: &str) -> Result<Started> {
        if self.ios_capable() {
            match self.restart_simulator(identifier).await {
                Ok(started) => return Ok(started),
                Err(err) => debug!("iOS restart for '{}' did not succeed: {}", identifier, err),
            }
        }

        self.restart_emulator(identifier).await.map_err(|err| {
            debug!("Android restart for '{}' did not succeed: {}", identifier, err);
            Error::operation_failed(identifier, "restart")
        })
    }

    /// Permanently remove a device registration
    pub async fn delete(&self, identifier: &str) -> Result<Device> {
        if self.ios_capable() {
            match self.delete_simulator(identifier).await {
                Ok(device) => return Ok(device),
                Err(err) => debug!("iOS delete for '{}' did not succeed: {}", identifier, err),
            }
        }

        self.delete_emulator(identifier).await.map_err(|err| {
            debug!("Android delete for '{}' did not succeed: {}", identifier, err);
            Error::operation_failed(identifier, "delete")
        })
    }

    // ─────────────────────────────────────────────────────────────
    // iOS
    // ─────────────────────────────────────────────────────────────

    async fn start_simulator(&self, identifier: &str) -> Result<Started> {
        let device = self.resolver.find_simulator(identifier, false).await?;
        info!("booting iOS simulator '{}' ({})", device.name, device.id);
        self.boot_simulator_device(device).await
    }

    async fn restart_simulator(&self, identifier: &str) -> Result<Started> {
        let device = self.resolver.find_simulator(identifier, false).await?;
        info!("restarting iOS simulator '{}' ({})", device.name, device.id);

        // Best-effort: the simulator may already be down
        if let Err(err) = simctl::shutdown(&device.id).await {
            debug!("pre-restart shutdown of '{}': {}", device.id, err);
        }

        self.boot_simulator_device(device).await
    }

    /// Boot an already-resolved simulator and record it as last started
    async fn boot_simulator_device(&self, mut device: Device) -> Result<Started> {
        simctl::boot(&device.id).await?;

        // The viewer is cosmetic; a failure to open it must not fail the boot
        if let Err(err) = simctl::open_simulator_app().await {
            warn!("could not open Simulator app: {}", err);
        }

        device.state = DeviceState::Booted;
        self.record_last_started(&device);

        Ok(Started {
            device,
            already_running: false,
        })
    }

    async fn delete_simulator(&self, identifier: &str) -> Result<Device> {
        let device = self.resolver.find_simulator(identifier, false).await?;
        info!("deleting iOS simulator '{}' ({})", device.name, device.id);

        // Best-effort: the simulator may already be down
        if let Err(err) = simctl::shutdown(&device.id).await {
            debug!("pre-delete shutdown of '{}': {}", device.id, err);
        }

        simctl::delete(&device.id).await?;
        Ok(device)
    }

    // ─────────────────────────────────────────────────────────────
    // Android
    // ─────────────────────────────────────────────────────────────

    async fn start_emulator(&self, identifier: &str) -> Result<Started> {
        if let Some(device) = self.resolver.running_emulator_by_name(identifier).await {
            info!("emulator '{}' already running as {}", device.name, device.id);
            self.record_last_started(&device);
            return Ok(Started {
                device,
                already_running: true,
            });
        }

        let avd_name = self
            .resolver
            .declared_avd(identifier)
            .await
            .ok_or_else(|| Error::not_found(identifier))?;

        info!("booting Android emulator '{}'", avd_name);
        adb::boot_avd(&avd_name, self.resolver.directory().tools()).await?;

        // The serial is unknowable until the instance registers with adb
        let device = Device {
            platform: Platform::Android,
            name: avd_name,
            id: BOOT_PENDING_ID.to_string(),
            state: DeviceState::Booted,
            runtime: Some("Android".to_string()),
            device_type: None,
        };
        self.record_last_started(&device);

        Ok(Started {
            device,
            already_running: false,
        })
    }

    async fn restart_emulator(&self, identifier: &str) -> Result<Started> {
        // Best-effort: the instance may not be running
        match self.stop_emulator(identifier).await {
            Ok(device) => info!("stopped emulator '{}' for restart", device.name),
            Err(err) => debug!("pre-restart stop of '{}': {}", identifier, err),
        }

        self.start_emulator(identifier).await
    }

    async fn stop_emulator(&self, identifier: &str) -> Result<Device> {
        let mut device = self
            .resolver
            .running_emulator_by_name(identifier)
            .await
            .ok_or_else(|| Error::not_running(identifier))?;

        info!("stopping Android emulator '{}' ({})", device.name, device.id);
        adb::kill(&device.id).await?;
        device.state = DeviceState::Shutdown;
        Ok(device)
    }

    async fn delete_emulator(&self, identifier: &str) -> Result<Device> {
        let avd_name = self
            .resolver
            .declared_avd(identifier)
            .await
            .ok_or_else(|| Error::not_found(identifier))?;

        // Best-effort: stop a running instance before removal
        if let Err(err) = self.stop_emulator(identifier).await {
            debug!("pre-delete stop of '{}': {}", identifier, err);
        }

        info!("deleting Android emulator '{}'", avd_name);
        adb::delete_avd(&avd_name).await?;
        Ok(Device::offline_emulator(avd_name))
    }

    // ─────────────────────────────────────────────────────────────
    // Shared
    // ─────────────────────────────────────────────────────────────

    async fn stop_running(&self, identifier: &str) -> Result<Device> {
        if self.ios_capable() {
            match self.stop_simulator(identifier).await {
                Ok(device) => return Ok(device),
                Err(err) => debug!("iOS stop for '{}' did not succeed: {}", identifier, err),
            }
        }

        self.stop_emulator(identifier).await
    }

    async fn stop_simulator(&self, identifier: &str) -> Result<Device> {
        let mut device = self.resolver.find_simulator(identifier, true).await?;
        info!("stopping iOS simulator '{}' ({})", device.name, device.id);
        simctl::shutdown(&device.id).await?;
        device.state = DeviceState::Shutdown;
        Ok(device)
    }

    fn ios_capable(&self) -> bool {
        self.resolver.directory().tools().ios_capable()
    }

    /// Persistence failures never fail the operation itself
    fn record_last_started(&self, device: &Device) {
        if let Err(err) = self.store.save(device) {
            warn!("could not save last started device: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DeviceDirectory;
    use crate::tools::ToolAvailability;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_start_unknown_identifier_reports_operation_failure() {
        let dir = TempDir::new().unwrap();
        let store = LastStartedStore::new(dir.path().join("last_device.json"));
        let directory = DeviceDirectory::new(ToolAvailability::default());
        let resolver = Resolver::new(&directory);
        let controller = LifecycleController::new(resolver, &store);

        let err = controller
            .start("definitely-not-a-device-xyz")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "'definitely-not-a-device-xyz' not found or failed to start"
        );
        // A failed start must not leave a last-started record behind
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_unknown_identifier_uses_stop_verb() {
        let dir = TempDir::new().unwrap();
        let store = LastStartedStore::new(dir.path().join("last_device.json"));
        let directory = DeviceDirectory::new(ToolAvailability::default());
        let resolver = Resolver::new(&directory);
        let controller = LifecycleController::new(resolver, &store);

        let err = controller.stop("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "'nope' not found or failed to stop");

        let err = controller.shutdown("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "'nope' not found or failed to shutdown");
    }
}

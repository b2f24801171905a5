//! The capture capability and its two platform implementations
//!
//! Both variants share the same recording protocol: spawn the platform's
//! capture child process, block on the cancellation signal, deliver a
//! graceful interrupt (forced kill as fallback), and wait for exit. A clean
//! exit or an exit caused by the interrupt itself counts as success.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Child;

use vdev_core::prelude::*;
use vdev_core::{Device, Platform};
use vdev_devices::adb;
use vdev_devices::resolver::Resolver;
use vdev_devices::simctl;

use crate::artifact::ensure_extension;
use crate::session::CancelSignal;

/// Fixed on-device scratch paths for the adb capture protocol
const DEVICE_SCREENSHOT_PATH: &str = "/sdcard/screenshot.png";
const DEVICE_RECORDING_PATH: &str = "/sdcard/recording.mp4";

/// Screen-capture capability of a running device
#[trait_variant::make(Capture: Send)]
pub trait LocalCapture {
    /// Capture a still image to `output` (extension normalized to .png)
    async fn screenshot(&self, output: &Path) -> Result<PathBuf>;

    /// Record the screen to `output` until `cancel` fires
    async fn record(&self, cancel: &CancelSignal, output: &Path) -> Result<PathBuf>;

    /// Display name of the device being captured
    fn name(&self) -> &str;
}

// ─────────────────────────────────────────────────────────────────
// iOS simulator
// ─────────────────────────────────────────────────────────────────

/// Captures a booted iOS simulator through simctl
#[derive(Debug, Clone)]
pub struct SimulatorCapturer {
    udid: String,
    name: String,
}

impl Capture for SimulatorCapturer {
    async fn screenshot(&self, output: &Path) -> Result<PathBuf> {
        let path = ensure_extension(output, "png");
        info!("taking screenshot of iOS simulator '{}'", self.name);
        simctl::screenshot(&self.udid, &path).await?;
        Ok(path)
    }

    async fn record(&self, cancel: &CancelSignal, output: &Path) -> Result<PathBuf> {
        let path = ensure_extension(output, "mp4");
        info!(
            "recording iOS simulator '{}' to {}",
            self.name,
            path.display()
        );

        let child = simctl::spawn_recording(&self.udid, &path)?;
        stop_on_cancel(child, cancel, "simctl recordVideo").await?;

        Ok(path)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ─────────────────────────────────────────────────────────────────
// Android emulator
// ─────────────────────────────────────────────────────────────────

/// Captures a running Android emulator through adb
///
/// Screenshots and recordings land on the device first, get pulled to the
/// host, and the on-device copy is removed on every exit path.
#[derive(Debug, Clone)]
pub struct EmulatorCapturer {
    serial: String,
    name: String,
}

impl EmulatorCapturer {
    async fn capture_and_pull(&self, host_path: &Path) -> Result<()> {
        adb::screencap(&self.serial, DEVICE_SCREENSHOT_PATH).await?;
        adb::pull(&self.serial, DEVICE_SCREENSHOT_PATH, host_path).await?;
        Ok(())
    }

    async fn record_and_pull(&self, cancel: &CancelSignal, host_path: &Path) -> Result<()> {
        let child = adb::spawn_screenrecord(&self.serial, DEVICE_RECORDING_PATH)?;
        stop_on_cancel(child, cancel, "adb shell screenrecord").await?;
        adb::pull(&self.serial, DEVICE_RECORDING_PATH, host_path).await?;
        Ok(())
    }

    /// Remove an on-device scratch file; its failure is only logged
    async fn cleanup_device_file(&self, device_path: &str) {
        if let Err(err) = adb::remove_file(&self.serial, device_path).await {
            warn!(
                "could not remove {} on {}: {}",
                device_path, self.serial, err
            );
        }
    }
}

impl Capture for EmulatorCapturer {
    async fn screenshot(&self, output: &Path) -> Result<PathBuf> {
        let path = ensure_extension(output, "png");
        info!("taking screenshot of Android emulator '{}'", self.name);

        let result = self.capture_and_pull(&path).await;
        self.cleanup_device_file(DEVICE_SCREENSHOT_PATH).await;

        result.map(|()| path)
    }

    async fn record(&self, cancel: &CancelSignal, output: &Path) -> Result<PathBuf> {
        let path = ensure_extension(output, "mp4");
        info!(
            "recording Android emulator '{}' to {}",
            self.name,
            path.display()
        );

        let result = self.record_and_pull(cancel, &path).await;
        self.cleanup_device_file(DEVICE_RECORDING_PATH).await;

        result.map(|()| path)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ─────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────

/// A capturer for whichever platform the target device runs on
#[derive(Debug)]
pub enum DeviceCapturer {
    Simulator(SimulatorCapturer),
    Emulator(EmulatorCapturer),
}

impl DeviceCapturer {
    /// Resolve an identifier (or pick the active device) to a capturer
    pub async fn resolve(resolver: &Resolver<'_>, identifier: Option<&str>) -> Result<Self> {
        let device = match identifier {
            Some(identifier) => resolver.resolve(identifier).await?,
            None => resolver.active_device().await?,
        };

        Self::from_device(device)
    }

    /// Build a capturer for an already-resolved device
    ///
    /// Capture needs a running instance; anything else is NotRunning.
    pub fn from_device(device: Device) -> Result<Self> {
        if !device.is_booted() {
            return Err(Error::not_running(device.name));
        }

        Ok(match device.platform {
            Platform::Ios => DeviceCapturer::Simulator(SimulatorCapturer {
                udid: device.id,
                name: device.name,
            }),
            Platform::Android => DeviceCapturer::Emulator(EmulatorCapturer {
                serial: device.id,
                name: device.name,
            }),
        })
    }
}

impl Capture for DeviceCapturer {
    async fn screenshot(&self, output: &Path) -> Result<PathBuf> {
        match self {
            DeviceCapturer::Simulator(sim) => Capture::screenshot(sim, output).await,
            DeviceCapturer::Emulator(emu) => Capture::screenshot(emu, output).await,
        }
    }

    async fn record(&self, cancel: &CancelSignal, output: &Path) -> Result<PathBuf> {
        match self {
            DeviceCapturer::Simulator(sim) => Capture::record(sim, cancel, output).await,
            DeviceCapturer::Emulator(emu) => Capture::record(emu, cancel, output).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            DeviceCapturer::Simulator(sim) => Capture::name(sim),
            DeviceCapturer::Emulator(emu) => Capture::name(emu),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Child-process stop protocol
// ─────────────────────────────────────────────────────────────────

/// Block on the cancellation signal, then stop and reap the capture child
async fn stop_on_cancel(mut child: Child, cancel: &CancelSignal, command: &str) -> Result<()> {
    cancel.cancelled().await;

    match child.id() {
        Some(pid) => {
            if let Err(err) = interrupt_child(pid) {
                warn!("could not interrupt {} (pid {}): {}", command, pid, err);
                if let Err(err) = child.start_kill() {
                    warn!("could not kill {}: {}", command, err);
                }
            }
        }
        None => debug!("{} exited before cancellation", command),
    }

    let status = child.wait().await?;
    if recording_status_ok(&status) {
        Ok(())
    } else {
        Err(Error::command_failed(
            command,
            status.code(),
            "recording process exited abnormally",
        ))
    }
}

#[cfg(unix)]
fn interrupt_child(pid: u32) -> std::io::Result<()> {
    // SAFETY: plain syscall on a pid we spawned and still own
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGINT) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn interrupt_child(_pid: u32) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "no graceful interrupt on this platform",
    ))
}

/// A clean exit, or an exit caused by our own interrupt, is a success
fn recording_status_ok(status: &ExitStatus) -> bool {
    if status.success() {
        return true;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if status.signal() == Some(libc::SIGINT) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdev_core::DeviceState;

    fn booted_ios_device() -> Device {
        Device {
            platform: Platform::Ios,
            name: "iPhone 15 Pro".to_string(),
            id: "702ABC1F-5EA5-4F83-84AB-6380CA91D39A".to_string(),
            state: DeviceState::Booted,
            runtime: Some("iOS 17.2".to_string()),
            device_type: None,
        }
    }

    #[test]
    fn test_from_device_requires_booted() {
        let mut device = booted_ios_device();
        device.state = DeviceState::Shutdown;

        let err = DeviceCapturer::from_device(device).unwrap_err();
        assert!(matches!(err, Error::NotRunning { .. }));
    }

    #[test]
    fn test_from_device_picks_platform_variant() {
        let capturer = DeviceCapturer::from_device(booted_ios_device()).unwrap();
        assert!(matches!(capturer, DeviceCapturer::Simulator(_)));
        assert_eq!(Capture::name(&capturer), "iPhone 15 Pro");

        let capturer =
            DeviceCapturer::from_device(Device::running_emulator("Pixel_5", "emulator-5554"))
                .unwrap();
        assert!(matches!(capturer, DeviceCapturer::Emulator(_)));
        assert_eq!(Capture::name(&capturer), "Pixel_5");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::process::ExitStatusExt;
        use std::time::{Duration, Instant};
        use tokio::process::Command;

        #[test]
        fn test_recording_status_ok() {
            // Clean exit
            assert!(recording_status_ok(&ExitStatus::from_raw(0)));
            // Terminated by our interrupt
            assert!(recording_status_ok(&ExitStatus::from_raw(libc::SIGINT)));
            // Any other nonzero exit is a failure
            assert!(!recording_status_ok(&ExitStatus::from_raw(0x100)));
            assert!(!recording_status_ok(&ExitStatus::from_raw(libc::SIGKILL)));
        }

        #[tokio::test]
        async fn test_stop_protocol_interrupts_child_after_cancel() {
            let child = Command::new("sleep")
                .arg("30")
                .spawn()
                .expect("sleep should spawn");

            let cancel = CancelSignal::new();
            let producer = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                producer.cancel();
            });

            let started = Instant::now();
            stop_on_cancel(child, &cancel, "sleep").await.unwrap();

            // The child must die from our interrupt, not its own 30s timer
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[tokio::test]
        async fn test_stop_protocol_accepts_already_exited_child() {
            let child = Command::new("true").spawn().expect("true should spawn");

            let cancel = CancelSignal::new();
            cancel.cancel();

            stop_on_cancel(child, &cancel, "true").await.unwrap();
        }
    }
}

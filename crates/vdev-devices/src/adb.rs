//! Android emulator discovery and lifecycle using emulator/adb/avdmanager
//!
//! Declared devices come from `emulator -list-avds` (one name per line);
//! running instances come from `adb devices`, filtered to connected
//! `emulator-<port>` serials, with the owning AVD name resolved through a
//! per-instance `adb emu avd name` query.

use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;
use tokio::process::{Child, Command};

use vdev_core::prelude::*;

use crate::exec;
use crate::tools::ToolAvailability;

/// Matches a connected emulator row in `adb devices` output
static EMULATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(emulator-\d+)\s+device\b").expect("invalid emulator row regex"));

/// A running emulator instance as seen by adb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningInstance {
    /// adb serial, e.g. "emulator-5554"
    pub serial: String,
    /// Name of the AVD this instance was booted from
    pub avd_name: String,
}

/// List declared AVD names
pub async fn list_avds(tools: &ToolAvailability) -> Result<Vec<String>> {
    let output = exec::run_checked(tools.emulator_command(), ["-list-avds"]).await?;
    Ok(parse_avd_list(&exec::stdout_text(&output)))
}

/// Parse the output of `emulator -list-avds` (one name per line)
pub fn parse_avd_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// List the serials of connected emulator instances
pub async fn running_serials() -> Result<Vec<String>> {
    let output = exec::run_checked("adb", ["devices"]).await?;
    Ok(parse_adb_devices(&exec::stdout_text(&output)))
}

/// Parse `adb devices` output into emulator serials
///
/// Rows for physical devices, offline or unauthorized instances are ignored.
pub fn parse_adb_devices(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| EMULATOR_ROW.captures(line.trim()))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Resolve the AVD name behind a running instance
///
/// `adb emu avd name` prints the name followed by a protocol "OK" line, so
/// only the first non-empty line is the answer.
pub async fn avd_name(serial: &str) -> Result<String> {
    let output = exec::run_checked("adb", ["-s", serial, "emu", "avd", "name"]).await?;
    exec::stdout_text(&output)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::command_failed(format!("adb -s {serial} emu avd name"), None, ""))
}

/// List running instances with their AVD names resolved
///
/// Instances whose name query fails are skipped.
pub async fn running_instances() -> Result<Vec<RunningInstance>> {
    let serials = running_serials().await?;

    let mut instances = Vec::with_capacity(serials.len());
    for serial in serials {
        match avd_name(&serial).await {
            Ok(name) => instances.push(RunningInstance {
                serial,
                avd_name: name,
            }),
            Err(err) => debug!("could not resolve AVD name for {}: {}", serial, err),
        }
    }

    Ok(instances)
}

/// Boot an AVD by name
///
/// Launches the emulator detached and returns immediately; the emulator
/// process keeps running independently of this CLI.
pub async fn boot_avd(avd_name: &str, tools: &ToolAvailability) -> Result<()> {
    let mut child = Command::new(tools.emulator_command())
        .args(["-avd", avd_name])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_missing(tools.emulator_command())
            } else {
                Error::Io(e)
            }
        })?;

    // Reap the child in the background; we never wait for boot to finish
    tokio::spawn(async move {
        let _ = child.wait().await;
    });

    Ok(())
}

/// Stop a running instance by serial
pub async fn kill(serial: &str) -> Result<()> {
    exec::run_checked("adb", ["-s", serial, "emu", "kill"]).await?;
    Ok(())
}

/// Permanently remove an AVD registration
pub async fn delete_avd(avd_name: &str) -> Result<()> {
    exec::run_checked("avdmanager", ["delete", "avd", "-n", avd_name]).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Capture primitives
// ─────────────────────────────────────────────────────────────────

/// Capture a screenshot to a path on the device
pub async fn screencap(serial: &str, device_path: &str) -> Result<()> {
    exec::run_checked("adb", ["-s", serial, "shell", "screencap", "-p", device_path]).await?;
    Ok(())
}

/// Pull a file from the device to the host
pub async fn pull(serial: &str, device_path: &str, host_path: &Path) -> Result<()> {
    exec::run_checked(
        "adb",
        [
            "-s".as_ref(),
            serial.as_ref(),
            "pull".as_ref(),
            device_path.as_ref(),
            host_path.as_os_str(),
        ],
    )
    .await?;
    Ok(())
}

/// Remove a file on the device
pub async fn remove_file(serial: &str, device_path: &str) -> Result<()> {
    exec::run_checked("adb", ["-s", serial, "shell", "rm", device_path]).await?;
    Ok(())
}

/// Spawn the asynchronous on-device screen-recording child process
///
/// The child records until it receives SIGINT; the caller owns the handle
/// and is responsible for stopping and reaping it.
pub fn spawn_screenrecord(serial: &str, device_path: &str) -> Result<Child> {
    Command::new("adb")
        .args(["-s", serial, "shell", "screenrecord", device_path])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_missing("adb")
            } else {
                Error::Io(e)
            }
        })
}

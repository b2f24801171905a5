//! Tool availability checking for device management
//!
//! Probes for the external tools needed for device discovery and lifecycle
//! control, specifically `xcrun simctl` (iOS) and `emulator` (Android SDK).

use std::process::Stdio;

use tokio::process::Command;

/// Cached availability of external tools, checked once at startup
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    /// Whether `xcrun simctl` is available (macOS with Xcode)
    pub xcrun_simctl: bool,

    /// Whether the `emulator` command is available (Android SDK)
    pub android_emulator: bool,

    /// Path to the emulator command if found
    pub emulator_path: Option<String>,
}

impl ToolAvailability {
    /// Check tool availability (run once at startup)
    pub async fn check() -> Self {
        let xcrun_simctl = Self::check_xcrun_simctl().await;
        let (android_emulator, emulator_path) = Self::check_android_emulator().await;

        Self {
            xcrun_simctl,
            android_emulator,
            emulator_path,
        }
    }

    /// Whether this host can run iOS simulators at all
    pub fn ios_capable(&self) -> bool {
        self.xcrun_simctl
    }

    /// The emulator command to invoke, falling back to PATH lookup
    pub fn emulator_command(&self) -> &str {
        self.emulator_path.as_deref().unwrap_or("emulator")
    }

    /// Check if xcrun simctl is available
    async fn check_xcrun_simctl() -> bool {
        // Only available on macOS
        #[cfg(not(target_os = "macos"))]
        return false;

        #[cfg(target_os = "macos")]
        {
            Command::new("xcrun")
                .args(["simctl", "help"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|s| s.success())
                .inspect_err(|e| tracing::debug!("xcrun simctl check failed: {}", e))
                .unwrap_or(false)
        }
    }

    /// Check if the Android emulator is available
    async fn check_android_emulator() -> (bool, Option<String>) {
        for path in Self::emulator_paths() {
            if Command::new(&path)
                .arg("-list-avds")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|s| s.success())
                .inspect_err(|e| tracing::debug!("emulator check failed for {}: {}", path, e))
                .unwrap_or(false)
            {
                return (true, Some(path));
            }
        }

        (false, None)
    }

    /// Candidate locations for the emulator command
    fn emulator_paths() -> Vec<String> {
        let mut paths = vec!["emulator".to_string()];

        if let Ok(android_home) = std::env::var("ANDROID_HOME") {
            paths.push(format!("{}/emulator/emulator", android_home));
        }

        if let Ok(sdk_root) = std::env::var("ANDROID_SDK_ROOT") {
            paths.push(format!("{}/emulator/emulator", sdk_root));
        }

        paths
    }

    /// User-facing note when iOS tooling is unavailable
    pub fn ios_unavailable_message(&self) -> Option<&'static str> {
        if self.xcrun_simctl {
            None
        } else {
            #[cfg(target_os = "macos")]
            {
                Some("Xcode not installed. Install Xcode to manage iOS simulators.")
            }

            #[cfg(not(target_os = "macos"))]
            {
                Some("iOS simulators are only available on macOS.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_availability_default() {
        let availability = ToolAvailability::default();
        assert!(!availability.xcrun_simctl);
        assert!(!availability.android_emulator);
        assert!(availability.emulator_path.is_none());
        assert!(!availability.ios_capable());
    }

    #[test]
    fn test_emulator_command_falls_back_to_path() {
        let availability = ToolAvailability::default();
        assert_eq!(availability.emulator_command(), "emulator");

        let availability = ToolAvailability {
            emulator_path: Some("/sdk/emulator/emulator".to_string()),
            ..Default::default()
        };
        assert_eq!(availability.emulator_command(), "/sdk/emulator/emulator");
    }

    #[test]
    fn test_emulator_paths_includes_default() {
        let paths = ToolAvailability::emulator_paths();
        assert!(paths.contains(&"emulator".to_string()));
    }

    #[test]
    fn test_ios_unavailable_message() {
        let availability = ToolAvailability::default();
        assert!(availability.ios_unavailable_message().is_some());

        let availability = ToolAvailability {
            xcrun_simctl: true,
            ..Default::default()
        };
        assert!(availability.ios_unavailable_message().is_none());
    }
}

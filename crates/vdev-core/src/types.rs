//! Device model shared by both platform backends

use serde::{Deserialize, Serialize};

/// Sentinel native id for a declared device with no running instance.
pub const OFFLINE_ID: &str = "N/A";

/// Platform a virtual device belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Human-readable device-kind label, as shown in listings
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS Simulator",
            Platform::Android => "Android Emulator",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Ios => write!(f, "iOS"),
            Platform::Android => write!(f, "Android"),
        }
    }
}

/// Lifecycle state of a virtual device
///
/// Always derived from the platform tools, never asserted by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceState {
    #[default]
    Shutdown,
    Booted,
    Booting,
    ShuttingDown,
    Unknown,
}

impl From<&str> for DeviceState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "shutdown" => DeviceState::Shutdown,
            "booted" => DeviceState::Booted,
            "booting" => DeviceState::Booting,
            "shutting down" => DeviceState::ShuttingDown,
            _ => DeviceState::Unknown,
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceState::Shutdown => write!(f, "Shutdown"),
            DeviceState::Booted => write!(f, "Booted"),
            DeviceState::Booting => write!(f, "Booting"),
            DeviceState::ShuttingDown => write!(f, "Shutting Down"),
            DeviceState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A virtual device known to one of the platform directories
///
/// `id` is the platform-native identifier: the UDID for iOS simulators, the
/// AVD name for declared Android emulators, or the adb serial
/// (`emulator-<port>`) for a running Android instance. Unique per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub platform: Platform,

    /// Human-readable device name
    pub name: String,

    /// Platform-native identifier
    pub id: String,

    pub state: DeviceState,

    /// Runtime/OS version (e.g. "iOS 17.2", "Android")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Native device-type descriptor (simctl deviceTypeIdentifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl Device {
    /// An Android emulator entry backed by a running adb instance
    pub fn running_emulator(name: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            platform: Platform::Android,
            name: name.into(),
            id: serial.into(),
            state: DeviceState::Booted,
            runtime: Some("Android".to_string()),
            device_type: None,
        }
    }

    /// A declared Android emulator with no running instance
    pub fn offline_emulator(name: impl Into<String>) -> Self {
        Self {
            platform: Platform::Android,
            name: name.into(),
            id: OFFLINE_ID.to_string(),
            state: DeviceState::Shutdown,
            runtime: Some("Android".to_string()),
            device_type: None,
        }
    }

    pub fn is_booted(&self) -> bool {
        self.state == DeviceState::Booted
    }

    /// Case-insensitive match against display name or native id
    pub fn matches(&self, identifier: &str) -> bool {
        self.name.eq_ignore_ascii_case(identifier) || self.id.eq_ignore_ascii_case(identifier)
    }
}

//! # vdev-devices - Device Discovery and Lifecycle
//!
//! Everything that talks to the platform tooling for device management:
//!
//! - [`ToolAvailability`] - startup probe for `xcrun simctl` / `emulator`
//! - [`simctl`] / [`adb`] - per-platform tool invocation and output parsing
//! - [`DeviceDirectory`] - the unified device listing across both platforms
//! - [`Resolver`] - free-form identifier to concrete device resolution
//! - [`LifecycleController`] - idempotent start/stop/shutdown/restart/delete

pub mod adb;
pub mod directory;
pub mod exec;
pub mod lifecycle;
pub mod resolver;
pub mod simctl;
pub mod tools;

pub use directory::{DeviceDirectory, DirectoryListing};
pub use lifecycle::{LifecycleController, Started};
pub use resolver::Resolver;
pub use tools::ToolAvailability;

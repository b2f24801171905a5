//! # vdev-core - Core Domain Types
//!
//! Foundation crate for vdev. Provides the device model shared by both
//! platform backends, error handling, logging setup, and the persisted
//! last-started-device store.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing, dirs).

pub mod error;
pub mod last_started;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all vdev crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, trace, warn};
}

pub use error::{Error, Result};
pub use last_started::LastStartedStore;
pub use types::{Device, DeviceState, Platform, OFFLINE_ID};

//! Persisted record of the last successfully started device
//!
//! A single JSON file at a fixed per-user location; the rest of the system
//! only ever reads the whole record or replaces it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Device;

const RECORD_FILENAME: &str = "last_device.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_started_device: Option<Device>,
}

/// JSON-backed store for the last started device
#[derive(Debug, Clone)]
pub struct LastStartedStore {
    path: PathBuf,
}

impl LastStartedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user config location (`<config dir>/vdev/`)
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::config("could not determine user config directory"))?;
        Ok(Self::new(base.join("vdev").join(RECORD_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last started device, if any was ever recorded
    pub fn load(&self) -> Result<Option<Device>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(&self.path)?;
        let record: Record = serde_json::from_str(&data)?;
        Ok(record.last_started_device)
    }

    /// Replace the record with `device`
    pub fn save(&self, device: &Device) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let record = Record {
            last_started_device: Some(device.clone()),
        };
        let data = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

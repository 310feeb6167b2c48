//! Chart surface that writes each mounted configuration to a JSON file.

use std::fs;
use std::path::PathBuf;

use spendview_core::chart::{ChartConfig, ChartSurface, SurfaceError};
use tracing::debug;

/// Overwrites `path` with the latest chart configuration on every mount
#[derive(Debug)]
pub struct JsonSurface {
    path: PathBuf,
    mounts: usize,
}

impl JsonSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mounts: 0,
        }
    }
}

impl ChartSurface for JsonSurface {
    type Handle = usize;

    fn mount(&mut self, config: &ChartConfig) -> Result<usize, SurfaceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(config).map_err(|e| SurfaceError::Rejected {
            message: e.to_string(),
        })?;
        fs::write(&self.path, json)?;

        self.mounts += 1;
        debug!("Chart config written to {}", self.path.display());
        Ok(self.mounts)
    }

    fn dispose(&mut self, _handle: usize) {}
}

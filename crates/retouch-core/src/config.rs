// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::OutputFormat;

/// Settings for the request-handling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// How long an uploaded original stays addressable by its handle.
    pub session_ttl_secs: u64,
    /// Container used to encode transform results.
    pub output_format: OutputFormat,
    /// Largest accepted upload, measured after base64 decoding.
    pub max_upload_bytes: usize,
    /// Largest pixel count a resize may produce.
    pub max_output_pixels: u64,
}

impl ServiceConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Like [`ServiceConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(crate::RetouchError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 600,
            output_format: OutputFormat::Png,
            max_upload_bytes: 20 * 1024 * 1024,
            max_output_pixels: 40_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ServiceConfig = serde_json::from_str(r#"{"session_ttl_secs": 30}"#).unwrap();
        assert_eq!(config.session_ttl(), Duration::from_secs(30));
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.max_upload_bytes, ServiceConfig::default().max_upload_bytes);
    }

    #[test]
    fn jpeg_format_round_trips_through_json() {
        let config = ServiceConfig {
            output_format: OutputFormat::Jpeg { quality: 75 },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServiceConfig::load_or_default("/nonexistent/retouch/config.json").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }
}

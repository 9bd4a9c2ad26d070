//! Catalog files.
//!
//! A catalog file is a YAML document declaring kernel properties and the
//! service descriptor set:
//!
//! ```yaml
//! properties:
//!   - "domain=example"
//! services:
//!   store:
//!     implementation: memstore
//!     parameters:
//!       - "dir=/var/lib/store"
//!     load:
//!       level: STANDBY
//!     stop:
//!       level: STANDBY
//!       on_failure: CORE_STORE
//! ```
//!
//! Levels are accepted in symbolic or numeric form. Descriptors are built
//! in sorted-id order so registration sequence numbers (and with them the
//! ordering tie-breaker) are reproducible for a given file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::StaticCatalog;
use crate::descriptor::{LifecycleAction, ServiceDescriptor};
use crate::errors::{KernelError, Result};
use crate::level::RunLevel;

fn default_enabled() -> bool {
    true
}

/// Root structure of a catalog file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogFile {
    /// Kernel properties as "key=value" entries, passed to the context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,

    #[serde(default)]
    pub services: HashMap<String, RawDescriptor>,
}

/// One service entry as written in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDescriptor {
    /// Implementation key resolved through the constructor registry.
    pub implementation: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Service parameters as "key=value" entries, order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<RawAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<RawAction>,
}

/// One lifecycle action as written in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAction {
    pub level: RunLevel,

    #[serde(default)]
    pub sequence: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<String>,
}

impl CatalogFile {
    /// Refuse to read files larger than this; a catalog is a small document.
    const MAX_FILE_SIZE: u64 = 1024 * 1024;

    /// Load and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KernelError::CatalogNotFound(path.to_path_buf())
            } else {
                KernelError::Internal(format!(
                    "Failed to stat catalog '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        if metadata.len() > Self::MAX_FILE_SIZE {
            return Err(KernelError::Internal(format!(
                "Catalog file '{}' is too large ({} bytes, max {} bytes)",
                path.display(),
                metadata.len(),
                Self::MAX_FILE_SIZE,
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KernelError::CatalogNotFound(path.to_path_buf())
            } else {
                KernelError::Internal(format!(
                    "Failed to read catalog '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let de = serde_yaml::Deserializer::from_str(&contents);
        serde_path_to_error::deserialize(de).map_err(|e| KernelError::CatalogParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Build the descriptor catalog declared by this file.
    pub fn build(&self) -> Result<StaticCatalog> {
        let mut catalog = StaticCatalog::new();

        let mut ids: Vec<&String> = self.services.keys().collect();
        ids.sort();

        for id in ids {
            let raw = &self.services[id];
            let mut descriptor =
                ServiceDescriptor::new(id, &raw.implementation).with_enabled(raw.enabled);

            for entry in &raw.parameters {
                let (key, value) = split_key_value(entry)?;
                descriptor = descriptor.with_parameter(key, value);
            }

            if let Some(raw_load) = &raw.load {
                let mut action = LifecycleAction::load(raw_load.level.number())
                    .with_sequence(raw_load.sequence);
                if let Some(code) = &raw_load.on_failure {
                    action = action.with_failure_code(code);
                }
                descriptor = descriptor.with_load(action);
            }

            if let Some(raw_stop) = &raw.stop {
                let mut action = LifecycleAction::stop(raw_stop.level.number())
                    .with_sequence(raw_stop.sequence);
                if let Some(code) = &raw_stop.on_failure {
                    action = action.with_failure_code(code);
                }
                descriptor = descriptor.with_stop(action);
            }

            catalog.insert(descriptor)?;
        }

        Ok(catalog)
    }

    /// Kernel properties as a map, for the context.
    pub fn context_properties(&self) -> Result<HashMap<String, String>> {
        let mut properties = HashMap::new();
        for entry in &self.properties {
            let (key, value) = split_key_value(entry)?;
            properties.insert(key.to_string(), value.to_string());
        }
        Ok(properties)
    }
}

/// Split one "key=value" entry.
fn split_key_value(entry: &str) -> Result<(&str, &str)> {
    entry
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim(), value))
        .ok_or_else(|| {
            KernelError::Catalog(format!("Malformed key=value entry: '{}'", entry))
        })
}

/// Load a catalog file and build the descriptor catalog in one step.
pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    CatalogFile::load(path)?.build()
}

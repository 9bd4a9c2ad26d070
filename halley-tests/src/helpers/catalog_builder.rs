//! Programmatic catalog creation with builder pattern

use halley_kernel::config::{CatalogFile, RawAction, RawDescriptor};
use halley_kernel::level::RunLevel;
use std::collections::HashMap;
use std::path::PathBuf;

/// Builder for creating test catalog files
pub struct TestCatalogBuilder {
    properties: Vec<String>,
    services: HashMap<String, RawDescriptor>,
}

impl TestCatalogBuilder {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            services: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.push(format!("{}={}", key, value));
        self
    }

    pub fn add_service(mut self, name: &str, service: RawDescriptor) -> Self {
        self.services.insert(name.to_string(), service);
        self
    }

    pub fn build(self) -> CatalogFile {
        CatalogFile {
            properties: self.properties,
            services: self.services,
        }
    }

    /// Write the catalog to a YAML file and return the path
    pub fn write_to_file(&self, dir: &std::path::Path) -> std::io::Result<PathBuf> {
        let file = CatalogFile {
            properties: self.properties.clone(),
            services: self.services.clone(),
        };

        let path = dir.join("halley.yaml");
        let contents = serde_yaml::to_string(&file).map_err(std::io::Error::other)?;
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Default for TestCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test service descriptors
pub struct TestServiceBuilder {
    implementation: String,
    enabled: bool,
    parameters: Vec<String>,
    load: Option<RawAction>,
    stop: Option<RawAction>,
}

impl TestServiceBuilder {
    pub fn new(implementation: &str) -> Self {
        Self {
            implementation: implementation.to_string(),
            enabled: true,
            parameters: Vec::new(),
            load: None,
            stop: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push(format!("{}={}", key, value));
        self
    }

    pub fn with_load(mut self, level: RunLevel, sequence: i32) -> Self {
        self.load = Some(RawAction {
            level,
            sequence,
            on_failure: None,
        });
        self
    }

    pub fn with_stop(mut self, level: RunLevel, sequence: i32) -> Self {
        self.stop = Some(RawAction {
            level,
            sequence,
            on_failure: None,
        });
        self
    }

    /// Mark the load action fatal with the given failure code.
    pub fn with_load_failure_code(mut self, code: &str) -> Self {
        if let Some(load) = &mut self.load {
            load.on_failure = Some(code.to_string());
        }
        self
    }

    /// Mark the stop action fatal with the given failure code.
    pub fn with_stop_failure_code(mut self, code: &str) -> Self {
        if let Some(stop) = &mut self.stop {
            stop.on_failure = Some(code.to_string());
        }
        self
    }

    pub fn build(self) -> RawDescriptor {
        RawDescriptor {
            implementation: self.implementation,
            enabled: self.enabled,
            parameters: self.parameters,
            load: self.load,
            stop: self.stop,
        }
    }
}

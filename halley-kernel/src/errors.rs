use std::path::PathBuf;
use thiserror::Error;

use crate::service::ServiceError;

/// Format a YAML error for user-friendly display, including the field path
fn format_yaml_error(e: &serde_path_to_error::Error<serde_yaml::Error>) -> String {
    let path = e.path().to_string();
    let inner = e.inner();
    let msg = inner.to_string();

    let located = if let Some(loc) = inner.location() {
        format!("Line {}, Column {}: {}", loc.line(), loc.column(), msg)
    } else {
        msg
    };

    if path.is_empty() {
        located
    } else {
        format!("{}: {}", path, located)
    }
}

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Failed to parse catalog file '{}':\n  {}", .path.display(), format_yaml_error(.source))]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_yaml::Error>,
    },

    #[error("Catalog file not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Duplicate service id: {0}")]
    DuplicateService(String),

    #[error("Unknown implementation '{implementation}' for service {service}")]
    UnknownImplementation {
        service: String,
        implementation: String,
    },

    #[error("Failed to construct service {service}: {source}")]
    Construction {
        service: String,
        #[source]
        source: ServiceError,
    },

    #[error("Failed to initialize service {service}: {source}")]
    Initialization {
        service: String,
        #[source]
        source: ServiceError,
    },

    #[error("Failed to stop service {service}: {source}")]
    Shutdown {
        service: String,
        #[source]
        source: ServiceError,
    },

    #[error("Service {0} already has a live initialized instance")]
    DuplicateInitialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;

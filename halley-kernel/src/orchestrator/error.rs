//! Error types for run level orchestration

/// Errors that can abort a level transition.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Invalid run level {0}: transitions may only target a major level")]
    InvalidLevel(i32),

    #[error("Unknown run level: {0}")]
    UnknownLevel(String),

    #[error("Fatal failure in service {service} (code {code}): {source}")]
    Fatal {
        service: String,
        code: String,
        #[source]
        source: crate::errors::KernelError,
    },

    #[error("Kernel error: {0}")]
    Kernel(#[from] crate::errors::KernelError),
}

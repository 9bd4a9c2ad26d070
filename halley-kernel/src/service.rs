//! The pluggable service contract.

use crate::context::KernelContext;

/// Error type service implementations fail with. The kernel wraps these
/// with the service id and lifecycle phase.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// A pluggable service instance.
///
/// Construction happens through a registered constructor and must have no
/// side effects beyond allocation; `initialize` is the second phase and is
/// where the service touches the outside world. A service that has been
/// initialized is live until `stop` succeeds.
pub trait Service: Send + Sync {
    /// Second construction phase: bring the service up with the shared
    /// kernel context and the descriptor's parameters.
    fn initialize(
        &self,
        context: &KernelContext,
        parameters: &[(String, String)],
    ) -> Result<(), ServiceError>;

    /// Tear the service down.
    fn stop(&self) -> Result<(), ServiceError>;
}

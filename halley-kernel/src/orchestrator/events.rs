//! Level change events and the listener contract.
//!
//! Listeners observe every elementary level boundary, including the pre and
//! post markers, in the exact order the orchestrator traverses them. Each
//! step notifies a copy-on-notify snapshot of the listener set, so
//! registration may change concurrently with a transition.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::level::RunLevel;

/// One elementary level change.
#[derive(Debug, Clone)]
pub struct LevelChange {
    pub from: RunLevel,
    pub to: RunLevel,
    /// Whether the driving transition was requested with the force flag.
    pub forced: bool,
    pub timestamp: DateTime<Utc>,
}

impl LevelChange {
    pub fn new(from: RunLevel, to: RunLevel, forced: bool) -> Self {
        Self {
            from,
            to,
            forced,
            timestamp: Utc::now(),
        }
    }

    pub fn is_climbing(&self) -> bool {
        self.to > self.from
    }
}

/// Passive observer of level changes.
///
/// Notification is synchronous and sequential; a listener that blocks,
/// blocks the whole transition.
pub trait LifecycleListener: Send + Sync {
    fn on_level_change(&self, event: &LevelChange);
}

/// Listener that logs every level change through `tracing`. The usual
/// instrumentation attachment for hosts that want one.
pub struct LoggingListener;

impl LifecycleListener for LoggingListener {
    fn on_level_change(&self, event: &LevelChange) {
        info!(
            "Run level {} -> {}{}",
            event.from,
            event.to,
            if event.forced { " (forced)" } else { "" }
        );
    }
}

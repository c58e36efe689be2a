//! Error types for the engine loop.

use std::io;

use glidewheel_scheduler::SchedulerError;
use thiserror::Error;

/// Fatal conditions that terminate the smoothing loop.
///
/// Sink write failures are deliberately absent: a best-effort smoothing
/// daemon does not crash over one dropped motion event, so those are
/// logged and swallowed at the call site.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Timer or poller plumbing failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Terminal read error or end-of-stream on the source device
    /// (typically hot-unplug).
    #[error("source device read failed: {0}")]
    SourceRead(#[source] io::Error),
}

/// Result alias for engine operations.
pub type EngineResult<T = ()> = Result<T, EngineError>;

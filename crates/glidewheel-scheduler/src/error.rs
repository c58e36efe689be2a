//! Error types for the scheduler crate.

use std::io;

use thiserror::Error;

/// Failures in timer and readiness plumbing.
///
/// These are all resource-acquisition or wait failures; nothing in the hot
/// emission path can produce one.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// timerfd_create failed.
    #[error("failed to create tick timer: {0}")]
    TimerCreate(#[source] io::Error),

    /// timerfd_settime failed.
    #[error("failed to arm tick timer: {0}")]
    TimerArm(#[source] io::Error),

    /// Reading the expiration counter failed.
    #[error("failed to read tick timer: {0}")]
    TimerRead(#[source] io::Error),

    /// epoll_create1 failed.
    #[error("failed to create poller: {0}")]
    PollCreate(#[source] io::Error),

    /// epoll_ctl ADD failed.
    #[error("failed to register fd with poller: {0}")]
    PollRegister(#[source] io::Error),

    /// epoll_wait failed with something other than EINTR.
    #[error("readiness wait failed: {0}")]
    PollWait(#[source] io::Error),
}

/// Result alias for scheduler operations.
pub type SchedulerResult<T = ()> = Result<T, SchedulerError>;

//! Minimal epoll readiness multiplexer.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::error::{SchedulerError, SchedulerResult};

/// Which registered source became ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The input device has events to drain.
    Input,
    /// The periodic tick timer expired.
    Timer,
}

impl Readiness {
    fn token(self) -> u64 {
        match self {
            Readiness::Input => 0,
            Readiness::Timer => 1,
        }
    }

    fn from_token(token: u64) -> Option<Self> {
        match token {
            0 => Some(Readiness::Input),
            1 => Some(Readiness::Timer),
            _ => None,
        }
    }
}

/// One batch of readiness results from a single wait.
///
/// At most two sources exist, so this is inline storage; an interrupted
/// wait produces an empty batch, which gives the caller a natural point to
/// re-check its cancellation token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadyBatch {
    slots: [Option<Readiness>; 2],
    len: usize,
}

impl ReadyBatch {
    /// Iterate the ready sources in kernel-reported order.
    pub fn iter(&self) -> impl Iterator<Item = Readiness> + '_ {
        self.slots.iter().take(self.len).filter_map(|slot| *slot)
    }

    /// Whether the wait returned without any ready source.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Blocking epoll wrapper multiplexing the input source and tick timer.
#[derive(Debug)]
pub struct Poller {
    epfd: OwnedFd,
}

impl Poller {
    /// Create an empty poller.
    pub fn new() -> SchedulerResult<Self> {
        // SAFETY: plain fd-returning syscall; ownership transfers on success.
        let raw = unsafe { libc::epoll_create1(libc::EPOLL_CLOEXEC) };
        if raw < 0 {
            return Err(SchedulerError::PollCreate(io::Error::last_os_error()));
        }
        // SAFETY: raw is a freshly created, unowned fd.
        let epfd = unsafe { OwnedFd::from_raw_fd(raw) };
        Ok(Self { epfd })
    }

    /// Register a source fd for input readiness under the given tag.
    pub fn register(&self, fd: RawFd, readiness: Readiness) -> SchedulerResult {
        let mut event = libc::epoll_event {
            events: libc::EPOLLIN as u32,
            u64: readiness.token(),
        };
        // SAFETY: epfd is a live epoll fd, event is a valid epoll_event.
        let rc = unsafe { libc::epoll_ctl(self.epfd.as_raw_fd(), libc::EPOLL_CTL_ADD, fd, &mut event) };
        if rc < 0 {
            return Err(SchedulerError::PollRegister(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Block until at least one source is ready (or a signal interrupts).
    ///
    /// EINTR returns an empty batch rather than an error so the caller's
    /// loop can observe a pending cancellation before waiting again.
    pub fn wait(&mut self) -> SchedulerResult<ReadyBatch> {
        let mut events: [libc::epoll_event; 2] = [libc::epoll_event { events: 0, u64: 0 }; 2];

        // SAFETY: events points to writable storage for exactly 2 entries.
        let n = unsafe {
            libc::epoll_wait(
                self.epfd.as_raw_fd(),
                events.as_mut_ptr(),
                events.len() as i32,
                -1,
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(ReadyBatch::default());
            }
            return Err(SchedulerError::PollWait(err));
        }

        let mut batch = ReadyBatch::default();
        for event in events.iter().take(n as usize) {
            if let Some(readiness) = Readiness::from_token(event.u64) {
                batch.slots[batch.len] = Some(readiness);
                batch.len += 1;
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TickTimer;
    use std::time::Duration;

    #[test]
    fn timer_readiness_is_reported() {
        let mut poller = Poller::new().expect("epoll");
        let timer = TickTimer::new(Duration::from_millis(2)).expect("timerfd");
        poller.register(timer.as_raw_fd(), Readiness::Timer).expect("register");

        let batch = poller.wait().expect("wait");
        assert!(batch.iter().any(|r| r == Readiness::Timer));
    }

    #[test]
    fn unknown_tokens_are_dropped() {
        assert_eq!(Readiness::from_token(7), None);
    }
}

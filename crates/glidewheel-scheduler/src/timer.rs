//! Absolute-deadline periodic timer backed by timerfd.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::time::Duration;

use crate::error::{SchedulerError, SchedulerResult};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Current CLOCK_MONOTONIC time in nanoseconds.
pub fn monotonic_now_ns() -> i64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: ts is a valid, writable timespec; CLOCK_MONOTONIC always exists.
    unsafe {
        libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
    }
    ts.tv_sec * NANOS_PER_SEC + ts.tv_nsec
}

/// Fixed-period timer scheduled on absolute CLOCK_MONOTONIC deadlines.
///
/// The timer is armed one-shot with `TFD_TIMER_ABSTIME` and re-armed on
/// every [`acknowledge`](Self::acknowledge) by advancing the stored target
/// by exactly one period. Because the next deadline derives from the
/// previous *target* rather than the possibly-late wake time, wake latency
/// never accumulates into drift: a tick that fires late still leaves every
/// later tick on the original grid.
#[derive(Debug)]
pub struct TickTimer {
    fd: OwnedFd,
    period_ns: i64,
    next_deadline_ns: i64,
}

impl TickTimer {
    /// Create and arm a timer with the given period.
    pub fn new(period: Duration) -> SchedulerResult<Self> {
        let period_ns = i64::try_from(period.as_nanos())
            .unwrap_or(i64::MAX)
            .max(1);

        // SAFETY: plain fd-returning syscall; ownership is transferred to
        // OwnedFd immediately on success.
        let raw = unsafe {
            libc::timerfd_create(
                libc::CLOCK_MONOTONIC,
                libc::TFD_NONBLOCK | libc::TFD_CLOEXEC,
            )
        };
        if raw < 0 {
            return Err(SchedulerError::TimerCreate(io::Error::last_os_error()));
        }
        // SAFETY: raw is a freshly created, unowned fd.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        let mut timer = Self {
            fd,
            period_ns,
            next_deadline_ns: monotonic_now_ns() + period_ns,
        };
        timer.arm()?;
        Ok(timer)
    }

    /// Consume a readiness notification and schedule the following tick.
    ///
    /// Reads (and discards) the expiration counter, then advances the
    /// deadline by one period from the previous target and re-arms. If the
    /// loop stalled past several periods the deadline may still lie in the
    /// past, in which case the timer fires again immediately and the loop
    /// catches up one tick per pass.
    pub fn acknowledge(&mut self) -> SchedulerResult {
        let mut expirations: u64 = 0;
        // SAFETY: reading 8 bytes into a valid u64, the timerfd wire format.
        let n = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                std::ptr::addr_of_mut!(expirations).cast(),
                std::mem::size_of::<u64>(),
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            // A spurious wakeup before expiry is harmless.
            if err.kind() != io::ErrorKind::WouldBlock {
                return Err(SchedulerError::TimerRead(err));
            }
        }

        self.next_deadline_ns += self.period_ns;
        self.arm()
    }

    /// Arm the timer one-shot at the stored absolute deadline.
    fn arm(&mut self) -> SchedulerResult {
        let spec = libc::itimerspec {
            it_interval: libc::timespec {
                tv_sec: 0,
                tv_nsec: 0,
            },
            it_value: libc::timespec {
                tv_sec: self.next_deadline_ns / NANOS_PER_SEC,
                tv_nsec: self.next_deadline_ns % NANOS_PER_SEC,
            },
        };
        // SAFETY: fd is a live timerfd and spec is a valid itimerspec.
        let rc = unsafe {
            libc::timerfd_settime(
                self.fd.as_raw_fd(),
                libc::TFD_TIMER_ABSTIME,
                &spec,
                std::ptr::null_mut(),
            )
        };
        if rc < 0 {
            return Err(SchedulerError::TimerArm(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// The period in nanoseconds.
    #[inline]
    pub fn period_ns(&self) -> i64 {
        self.period_ns
    }

    /// The absolute CLOCK_MONOTONIC deadline of the next tick.
    #[inline]
    pub fn next_deadline_ns(&self) -> i64 {
        self.next_deadline_ns
    }
}

impl AsRawFd for TickTimer {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

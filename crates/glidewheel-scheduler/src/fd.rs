//! Small fd helpers for the readiness loop.

use std::io;
use std::os::fd::RawFd;

/// Put a file descriptor into non-blocking mode.
///
/// The drain phase of the loop reads the source until EAGAIN; a blocking fd
/// there would stall the tick instead.
pub fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fcntl on a caller-provided fd; no memory is involved beyond
    // the flag word.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

use libc::{FIONREAD, c_int, fsync, ioctl, iovec, read, write, writev};
use std::io;
use std::os::fd::RawFd;

/// Reads from a file descriptor into the given buffer.
///
/// Returns the number of bytes read, or a negative value on error.
/// The file descriptor **must** be non-blocking.
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    unsafe { read(fd, buffer.as_mut_ptr() as *mut _, buffer.len()) }
}

/// Writes the buffer to a file descriptor.
///
/// Returns the number of bytes written, or a negative value on error.
/// The file descriptor **must** be non-blocking.
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    unsafe { write(fd, buffer.as_ptr() as *const _, buffer.len()) }
}

/// Writes a gathered set of buffers with `writev(2)`.
///
/// Returns the number of bytes written across all segments, or a
/// negative value on error. The file descriptor **must** be
/// non-blocking.
pub(crate) fn sys_writev(fd: RawFd, segments: &[iovec]) -> isize {
    unsafe { writev(fd, segments.as_ptr(), segments.len() as c_int) }
}

/// Returns the number of bytes available to read without blocking.
pub(crate) fn sys_available(fd: RawFd) -> io::Result<usize> {
    let mut available: c_int = 0;
    let rc = unsafe { ioctl(fd, FIONREAD, &mut available) };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(available as usize)
    }
}

/// Requests durability for a file descriptor with `fsync(2)`.
pub(crate) fn sys_fsync(fd: RawFd) -> io::Result<()> {
    let rc = unsafe { fsync(fd) };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

//! Platform syscall wrappers.
//!
//! Thin `libc` shims used by the engine and the sanitize module. Raw
//! `isize` returns for the read/write class (the caller inspects
//! `io::Error::last_os_error()` on negative results, which is where
//! would-block is told apart from real failures); `io::Result` for
//! fallible setup calls.

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub(crate) use unix::*;

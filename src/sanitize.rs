//! OS-process hygiene for daemon startup.
//!
//! A daemon inheriting its parent's descriptor table and environment
//! starts from an unknown state: stray descriptors leak resources and
//! privileges into children, and attacker-controlled variables like
//! `IFS` or `PATH` change what subprocesses execute. These helpers reset
//! both to a known baseline before the daemon does anything else.
//!
//! The approach follows the classic secure-programming recipe: close
//! everything above stderr that is not explicitly kept, make sure the
//! three standard descriptors exist (on `/dev/null` if need be), and
//! rebuild the environment from a short allow-list.

use std::env;
use std::ffi::CString;
use std::io;
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt;

use libc::{STDERR_FILENO, STDIN_FILENO};

/// Fallback descriptor-table size when the OS will not report one.
const OPEN_MAX: RawFd = 256;

/// Entries every clean environment starts with.
const CLEAN_ENVIRON: &[&str] = &["IFS= \t\n", "PATH=/usr/bin:/bin:/usr/sbin:/sbin"];

/// Variables preserved from the current environment by default.
const PRESERVE_ENVIRON: &[&str] = &["TZ"];

/// Closes every descriptor above stderr except those in `keep`, then
/// verifies the standard descriptors are open, re-opening any closed
/// one on `/dev/null`.
///
/// Returns `false` when a standard descriptor cannot be secured; the
/// process should not continue as a daemon in that state.
pub fn sanitize_files(keep: &[RawFd]) -> bool {
    let table = match unsafe { libc::sysconf(libc::_SC_OPEN_MAX) } {
        n if n < 0 => OPEN_MAX,
        n => n as RawFd,
    };

    for fd in (STDERR_FILENO + 1)..table {
        if !keep.contains(&fd) {
            unsafe { libc::close(fd) };
        }
    }

    for fd in STDIN_FILENO..=STDERR_FILENO {
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(fd, &mut st) } == -1 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::EBADF) || !open_devnull(fd) {
                return false;
            }
        }
    }

    true
}

/// Re-opens a closed standard descriptor on `/dev/null`.
fn open_devnull(fd: RawFd) -> bool {
    let flags = if fd == STDIN_FILENO {
        libc::O_RDONLY
    } else {
        libc::O_WRONLY
    };

    let opened = unsafe { libc::open(c"/dev/null".as_ptr(), flags) };
    if opened < 0 {
        return false;
    }
    if opened == fd {
        return true;
    }

    let rc = unsafe { libc::dup2(opened, fd) };
    unsafe { libc::close(opened) };
    rc == fd
}

/// Builds a minimal clean environment block.
///
/// The block contains, in order: the pinned baseline (`IFS`, `PATH`),
/// the default preserved variables (`TZ`) and then `preserve` entries
/// copied from the current environment (unset variables are skipped),
/// and finally the caller's `add` entries verbatim (`NAME=value`).
/// Entries that cannot be represented as C strings are skipped.
pub fn build_clean_environ(preserve: &[&str], add: &[&str]) -> Vec<CString> {
    let mut environ = Vec::new();

    for entry in CLEAN_ENVIRON {
        if let Ok(entry) = CString::new(*entry) {
            environ.push(entry);
        }
    }

    for name in PRESERVE_ENVIRON.iter().chain(preserve) {
        let Some(value) = env::var_os(name) else {
            continue;
        };

        let mut entry = Vec::with_capacity(name.len() + value.len() + 1);
        entry.extend_from_slice(name.as_bytes());
        entry.push(b'=');
        entry.extend_from_slice(value.as_bytes());
        if let Ok(entry) = CString::new(entry) {
            environ.push(entry);
        }
    }

    for entry in add {
        if let Ok(entry) = CString::new(*entry) {
            environ.push(entry);
        }
    }

    environ
}

#![cfg(unix)]

// Only the environment half is exercised here: sanitize_files closes
// descriptors process-wide, which would tear the test harness out from
// under itself.

use std::env;
use std::ffi::CString;

use alveus::build_clean_environ;

fn entry(s: &str) -> CString {
    CString::new(s).expect("no interior nul")
}

#[test]
fn test_baseline_comes_first() {
    let environ = build_clean_environ(&[], &[]);

    assert!(environ.len() >= 2);
    assert_eq!(environ[0], entry("IFS= \t\n"));
    assert_eq!(environ[1], entry("PATH=/usr/bin:/bin:/usr/sbin:/sbin"));
}

#[test]
fn test_unset_preserve_variables_are_skipped() {
    let environ = build_clean_environ(&["ALVEUS_TEST_SURELY_UNSET_1"], &[]);

    assert!(
        !environ
            .iter()
            .any(|e| e.to_bytes().starts_with(b"ALVEUS_TEST_SURELY_UNSET_1"))
    );
}

#[test]
fn test_preserved_variable_is_copied_from_environment() {
    unsafe { env::set_var("ALVEUS_TEST_PRESERVE_2", "kept") };

    let environ = build_clean_environ(&["ALVEUS_TEST_PRESERVE_2"], &[]);

    assert!(environ.contains(&entry("ALVEUS_TEST_PRESERVE_2=kept")));
    unsafe { env::remove_var("ALVEUS_TEST_PRESERVE_2") };
}

#[test]
fn test_added_entries_come_last_verbatim() {
    let environ = build_clean_environ(&[], &["DAEMON_MODE=1", "LISTEN_FDS=3"]);

    let n = environ.len();
    assert_eq!(environ[n - 2], entry("DAEMON_MODE=1"));
    assert_eq!(environ[n - 1], entry("LISTEN_FDS=3"));
}

#[test]
fn test_tz_is_preserved_by_default_when_set() {
    unsafe { env::set_var("TZ", "UTC") };

    let environ = build_clean_environ(&[], &[]);

    assert!(environ.contains(&entry("TZ=UTC")));
    unsafe { env::remove_var("TZ") };
}

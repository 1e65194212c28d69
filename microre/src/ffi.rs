//! C API for the host runtime
//!
//! The interpreter core is C, so pattern objects are exposed as opaque
//! handles. All functions are marked with #[unsafe(no_mangle)] and use C
//! calling conventions. Strings crossing the boundary are null-terminated
//! UTF-8; strings returned to C must be released with `microre_string_free`.

use crate::regexp::{ExecResult, RegExp};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

/// Opaque handle to a pattern object
pub struct RegExpHandle {
    regexp: RegExp,
}

/// Opaque handle to an exec result
pub struct MatchHandle {
    result: ExecResult,
}

unsafe fn set_error(error: *mut *mut c_char, message: &str) {
    if error.is_null() {
        return;
    }
    let message = CString::new(message.replace('\0', " ")).unwrap_or_default();
    unsafe {
        *error = message.into_raw();
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, what: &str, error: *mut *mut c_char) -> Option<&'a str> {
    unsafe {
        if ptr.is_null() {
            set_error(error, &format!("{what} is null"));
            return None;
        }
        match CStr::from_ptr(ptr).to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                set_error(error, &format!("{what} is not valid UTF-8"));
                None
            }
        }
    }
}

fn to_c_string(text: &str) -> *mut c_char {
    match CString::new(text) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Create a pattern object
///
/// # Safety
/// - pattern and flags must be valid null-terminated UTF-8 strings
/// - flags may be null, meaning no flags
/// - error pointer can be null if you don't need error messages
///
/// Returns a handle, or null on error
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_regexp_new(
    pattern: *const c_char,
    flags: *const c_char,
    error: *mut *mut c_char,
) -> *mut RegExpHandle {
    unsafe {
        let Some(pattern) = read_str(pattern, "pattern", error) else {
            return std::ptr::null_mut();
        };
        let flags = if flags.is_null() {
            ""
        } else {
            match read_str(flags, "flags", error) {
                Some(flags) => flags,
                None => return std::ptr::null_mut(),
            }
        };

        match RegExp::new(pattern, flags) {
            Ok(regexp) => Box::into_raw(Box::new(RegExpHandle { regexp })),
            Err(e) => {
                set_error(error, &e.to_string());
                std::ptr::null_mut()
            }
        }
    }
}

/// Free a pattern handle
///
/// # Safety
/// - handle must be a valid pointer returned by microre_regexp_new
/// - handle must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_regexp_free(handle: *mut RegExpHandle) {
    unsafe {
        if !handle.is_null() {
            drop(Box::from_raw(handle));
        }
    }
}

/// Run `test` on the input
///
/// # Safety
/// - handle must be a valid pattern handle
/// - input must be a valid null-terminated UTF-8 string
///
/// Returns 1 on a match, 0 on no match, -1 on error
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_test(
    handle: *mut RegExpHandle,
    input: *const c_char,
    error: *mut *mut c_char,
) -> c_int {
    unsafe {
        if handle.is_null() {
            set_error(error, "handle is null");
            return -1;
        }
        let Some(input) = read_str(input, "input", error) else {
            return -1;
        };

        match (*handle).regexp.test(input) {
            Ok(true) => 1,
            Ok(false) => 0,
            Err(e) => {
                set_error(error, &e.to_string());
                -1
            }
        }
    }
}

/// Run `exec` on the input, updating the handle's last index
///
/// # Safety
/// - handle must be a valid pattern handle
/// - input must be a valid null-terminated UTF-8 string
/// - error pointer can be null
///
/// Returns a match handle, or null on no match or error (error is set on error)
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_exec(
    handle: *mut RegExpHandle,
    input: *const c_char,
    error: *mut *mut c_char,
) -> *mut MatchHandle {
    unsafe {
        if handle.is_null() {
            set_error(error, "handle is null");
            return std::ptr::null_mut();
        }
        let Some(input) = read_str(input, "input", error) else {
            return std::ptr::null_mut();
        };

        match (*handle).regexp.exec(input) {
            Ok(Some(result)) => Box::into_raw(Box::new(MatchHandle { result })),
            Ok(None) => std::ptr::null_mut(),
            Err(e) => {
                set_error(error, &e.to_string());
                std::ptr::null_mut()
            }
        }
    }
}

/// Get the persisted last index
///
/// # Safety
/// - handle must be a valid pattern handle; returns 0 if null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_last_index(handle: *const RegExpHandle) -> usize {
    unsafe {
        if handle.is_null() {
            return 0;
        }
        (*handle).regexp.last_index()
    }
}

/// Set the persisted last index
///
/// # Safety
/// - handle must be a valid pattern handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_set_last_index(handle: *mut RegExpHandle, last_index: usize) {
    unsafe {
        if !handle.is_null() {
            (*handle).regexp.set_last_index(last_index);
        }
    }
}

/// Free a match handle
///
/// # Safety
/// - handle must be a valid pointer returned by microre_exec
/// - handle must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_match_free(handle: *mut MatchHandle) {
    unsafe {
        if !handle.is_null() {
            drop(Box::from_raw(handle));
        }
    }
}

/// Offset of the match in the input
///
/// # Safety
/// - handle must be a valid match handle
/// - returns -1 if handle is null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_match_index(handle: *const MatchHandle) -> isize {
    unsafe {
        if handle.is_null() {
            return -1;
        }
        (*handle).result.index as isize
    }
}

/// Number of capture groups in the result
///
/// # Safety
/// - handle must be a valid match handle; returns 0 if null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_match_group_count(handle: *const MatchHandle) -> usize {
    unsafe {
        if handle.is_null() {
            return 0;
        }
        (*handle).result.captures.len()
    }
}

/// Text of group `n`, where 0 is the whole match
///
/// # Safety
/// - handle must be a valid match handle
/// - returns null if handle is null or the group is absent
/// - caller must free the returned string with microre_string_free
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_match_group(handle: *const MatchHandle, n: usize) -> *mut c_char {
    unsafe {
        if handle.is_null() {
            return std::ptr::null_mut();
        }
        match (*handle).result.get(n) {
            Some(text) => to_c_string(text),
            None => std::ptr::null_mut(),
        }
    }
}

/// Free a string returned by the API, including error messages
///
/// # Safety
/// - ptr must be a valid pointer returned by this API
/// - ptr must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn microre_string_free(ptr: *mut c_char) {
    unsafe {
        if !ptr.is_null() {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Get the API version
#[unsafe(no_mangle)]
pub extern "C" fn microre_version() -> *const c_char {
    const VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr() as *const c_char
}

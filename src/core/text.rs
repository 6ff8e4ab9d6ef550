//! Purpose: Bounded scanning and UTF-8 decoding of NUL-terminated native buffers.
//! Exports: `MAX_SCAN_LEN`, `terminated_bytes`, `decode_utf8`, `decode_utf8_lossy`.
//! Role: Shared by `OutString` and any caller holding a raw C string.
//! Invariants: Never reads more than `max` bytes past the start pointer.
//! Invariants: Missing terminator and invalid UTF-8 are `Decode` errors, never substituted.
use std::os::raw::c_char;
use std::slice;

use crate::core::error::{Error, ErrorKind};

/// Default scan window for buffers of unknown length.
pub const MAX_SCAN_LEN: usize = 16 * 1024 * 1024;

/// Returns the bytes before the first NUL, scanning at most `max` bytes.
///
/// # Safety
///
/// `ptr` must be non-null and readable up to the terminator or `max` bytes,
/// whichever comes first, for the lifetime `'a`.
pub unsafe fn terminated_bytes<'a>(ptr: *const c_char, max: usize) -> Result<&'a [u8], Error> {
    let len = unsafe { libc::strnlen(ptr, max) };
    if len < max {
        tracing::trace!(len, "found terminator");
        return Ok(unsafe { slice::from_raw_parts(ptr as *const u8, len) });
    }
    Err(Error::new(ErrorKind::Decode)
        .with_message("no terminator within scan window")
        .with_address(ptr as usize as u64)
        .with_limit(max))
}

pub fn decode_utf8(bytes: &[u8]) -> Result<String, Error> {
    #[cfg(test)]
    DECODE_CALLS.with(|calls| calls.set(calls.get() + 1));
    if bytes.is_empty() {
        return Ok(String::new());
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(err) => Err(Error::new(ErrorKind::Decode)
            .with_message("invalid utf-8")
            .with_offset(err.valid_up_to())
            .with_source(err)),
    }
}

pub fn decode_utf8_lossy(bytes: &[u8]) -> String {
    #[cfg(test)]
    DECODE_CALLS.with(|calls| calls.set(calls.get() + 1));
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
thread_local! {
    static DECODE_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

#[cfg(test)]
pub(crate) fn decode_call_count() -> usize {
    DECODE_CALLS.with(std::cell::Cell::get)
}

//! Purpose: Own a NUL-terminated string that native code returns through a `char **` slot.
//! Exports: `OutString`.
//! Role: Capture, decode, and free `return_string`-style outputs.
//! Invariants: Exactly one `free` per captured non-null pointer; the slot is nulled first.
//! Invariants: Decoding never frees; a null slot decodes to "" without touching the decoder.
//! Invariants: Scans are bounded by `scan_limit` (default `MAX_SCAN_LEN`).
//! Invariants: Strict UTF-8 is the default policy; lossy decoding is an explicit call.
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::os::raw::c_char;
use std::ptr;

use crate::core::error::Error;
use crate::core::libfoo::{BufferDeallocator, LibC};
use crate::core::text::{self, MAX_SCAN_LEN};

pub struct OutString<F: BufferDeallocator = LibC> {
    ptr: *mut c_char,
    scan_limit: usize,
    _deallocator: PhantomData<F>,
}

impl OutString<LibC> {
    pub fn new() -> Self {
        Self::empty()
    }

    /// Hands the internal slot to `producer`; whatever it writes (null included) is
    /// owned by the returned value and later passed to libc `free`.
    pub fn capture_from<P>(producer: P) -> Self
    where
        P: FnOnce(*mut *mut c_char),
    {
        Self::capture_with(producer)
    }
}

impl Default for OutString<LibC> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: BufferDeallocator> OutString<F> {
    pub fn empty() -> Self {
        Self {
            ptr: ptr::null_mut(),
            scan_limit: MAX_SCAN_LEN,
            _deallocator: PhantomData,
        }
    }

    pub fn capture_with<P>(producer: P) -> Self
    where
        P: FnOnce(*mut *mut c_char),
    {
        let mut out = Self::empty();
        producer(out.slot());
        tracing::debug!(address = ?out.ptr, "captured native string");
        out
    }

    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Output slot for a native `char **` parameter. A previously captured buffer is
    /// released first.
    pub fn slot(&mut self) -> *mut *mut c_char {
        if !self.ptr.is_null() {
            tracing::warn!(address = ?self.ptr, "releasing captured string before slot reuse");
            self.release();
        }
        &mut self.ptr as *mut *mut c_char
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.ptr
    }

    pub fn as_bytes(&self) -> Result<&[u8], Error> {
        if self.ptr.is_null() {
            return Ok(&[]);
        }
        unsafe { text::terminated_bytes(self.ptr, self.scan_limit) }
    }

    pub fn to_text(&self) -> Result<String, Error> {
        if self.ptr.is_null() {
            return Ok(String::new());
        }
        text::decode_utf8(self.as_bytes()?)
    }

    /// Like `to_text`, but replaces invalid sequences with U+FFFD. A missing
    /// terminator is still an error.
    pub fn to_text_lossy(&self) -> Result<String, Error> {
        if self.ptr.is_null() {
            return Ok(String::new());
        }
        Ok(text::decode_utf8_lossy(self.as_bytes()?))
    }

    /// Gives up ownership without freeing.
    pub fn into_raw(self) -> *mut c_char {
        let this = ManuallyDrop::new(self);
        this.ptr
    }

    pub fn release(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
        tracing::debug!(address = ?ptr, "freeing native string");
        if let Err(err) = unsafe { F::free(ptr) } {
            tracing::warn!(error = %err, "native string release failed");
        }
    }
}

impl<F: BufferDeallocator> Drop for OutString<F> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<F: BufferDeallocator> TryFrom<&OutString<F>> for String {
    type Error = Error;

    fn try_from(value: &OutString<F>) -> Result<Self, Self::Error> {
        value.to_text()
    }
}

impl<F: BufferDeallocator> fmt::Debug for OutString<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutString")
            .field("ptr", &self.ptr)
            .field("scan_limit", &self.scan_limit)
            .finish()
    }
}

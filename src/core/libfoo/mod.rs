//! Purpose: Typed seams over the libfoo native boundary.
//! Exports: `HandleAllocator`, `BufferDeallocator`, `LibFoo`, `LibC`, `compute`, `return_string`.
//! Role: The only place that names the raw allocate/free entry points.
//! Invariants: Handle memory and string memory come from different allocators; the two
//! Invariants: deallocator traits are never implemented by one function.
//! Invariants: All FFI interaction is confined to this module + `sys`.
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::core::error::Error;

pub mod sys;

pub use sys::handle_t;

/// Allocator pair for opaque `handle_t` objects.
///
/// `allocate` reports failure with a null pointer, matching the native ABI.
pub trait HandleAllocator {
    fn allocate() -> *mut handle_t;

    /// # Safety
    ///
    /// `handle` must come from `allocate` of the same implementation and must not
    /// have been passed to `deallocate` before.
    unsafe fn deallocate(handle: *mut handle_t) -> Result<(), Error>;
}

/// Deallocator for NUL-terminated buffers written through an out-parameter.
pub trait BufferDeallocator {
    /// # Safety
    ///
    /// `ptr` must be non-null, owned by the caller, and produced by the allocator
    /// this implementation pairs with.
    unsafe fn free(ptr: *mut c_char) -> Result<(), Error>;
}

/// Production handle allocator: `handle_alloc` / `handle_free`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibFoo;

impl HandleAllocator for LibFoo {
    fn allocate() -> *mut handle_t {
        let mut out: *mut handle_t = ptr::null_mut();
        unsafe {
            sys::handle_alloc(&mut out as *mut *mut handle_t);
        }
        out
    }

    unsafe fn deallocate(handle: *mut handle_t) -> Result<(), Error> {
        unsafe {
            sys::handle_free(handle);
        }
        Ok(())
    }
}

/// Production buffer deallocator: the C runtime's `free`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibC;

impl BufferDeallocator for LibC {
    unsafe fn free(ptr: *mut c_char) -> Result<(), Error> {
        unsafe {
            libc::free(ptr as *mut libc::c_void);
        }
        Ok(())
    }
}

pub fn compute(value: i32) -> i32 {
    let mut out: c_int = 0;
    unsafe {
        sys::doit(value as c_int, &mut out as *mut c_int);
    }
    out as i32
}

/// Writes a freshly `malloc`ed string into `slot`. Pair the result with [`LibC`].
///
/// # Safety
///
/// `slot` must be valid for a pointer-sized write. Any pointer already in the slot
/// is overwritten, not freed.
pub unsafe fn return_string(slot: *mut *mut c_char) {
    unsafe {
        sys::return_string(slot);
    }
}

/// Per-thread counters kept by the native side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NativeStats {
    pub live_handles: i64,
    pub handle_frees: i64,
}

pub fn native_stats() -> NativeStats {
    unsafe {
        NativeStats {
            live_handles: sys::libfoo_live_handles() as i64,
            handle_frees: sys::libfoo_handle_frees() as i64,
        }
    }
}

/// Makes the next `handle_alloc` on the calling thread report failure.
pub fn fail_next_alloc() {
    unsafe {
        sys::libfoo_fail_next_alloc();
    }
}

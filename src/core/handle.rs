//! Purpose: Exactly-once ownership of an opaque libfoo `handle_t`.
//! Exports: `FooHandle`.
//! Role: Owning wrapper for native handles plus non-owning views of foreign ones.
//! Invariants: A null address means invalid; a valid address only ever changes to null.
//! Invariants: `release` nulls the address before calling the deallocator, so repeats are no-ops.
//! Invariants: Non-owning views never call the deallocator.
//! Invariants: Not `Send`/`Sync`; native handles are single-threaded.
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr;

use crate::core::error::{Error, ErrorKind};
use crate::core::libfoo::{HandleAllocator, LibFoo, handle_t};

pub struct FooHandle<A: HandleAllocator = LibFoo> {
    ptr: *mut handle_t,
    owns_resource: bool,
    _allocator: PhantomData<A>,
}

impl FooHandle<LibFoo> {
    /// Allocates a handle through `handle_alloc`.
    pub fn create() -> Result<Self, Error> {
        Self::create_with()
    }
}

impl<A: HandleAllocator> FooHandle<A> {
    /// Allocates a handle through `A`. A null result is an `Allocation` error and no
    /// handle value is produced.
    pub fn create_with() -> Result<Self, Error> {
        let ptr = A::allocate();
        if ptr.is_null() {
            return Err(Error::new(ErrorKind::Allocation).with_message("failed to allocate handle"));
        }
        tracing::debug!(address = ?ptr, "allocated handle");
        Ok(Self {
            ptr,
            owns_resource: true,
            _allocator: PhantomData,
        })
    }

    /// Wraps an address owned elsewhere. The view never releases it.
    pub fn from_raw(ptr: *mut handle_t) -> Self {
        Self {
            ptr,
            owns_resource: false,
            _allocator: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *mut handle_t {
        self.ptr
    }

    pub fn raw_address(&self) -> u64 {
        self.ptr as usize as u64
    }

    pub fn is_invalid(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn owns_resource(&self) -> bool {
        self.owns_resource
    }

    /// Gives up ownership without releasing. The caller becomes responsible for
    /// passing the pointer to the matching deallocator.
    pub fn into_raw(self) -> *mut handle_t {
        let this = ManuallyDrop::new(self);
        this.ptr
    }

    pub fn release(&mut self) {
        if !self.owns_resource || self.ptr.is_null() {
            return;
        }
        let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
        tracing::debug!(address = ?ptr, "releasing handle");
        if let Err(err) = unsafe { A::deallocate(ptr) } {
            tracing::warn!(error = %err, "handle release failed");
        }
    }
}

impl<A: HandleAllocator> Drop for FooHandle<A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<A: HandleAllocator> From<&FooHandle<A>> for *mut handle_t {
    fn from(handle: &FooHandle<A>) -> Self {
        handle.ptr
    }
}

impl<A: HandleAllocator> From<&FooHandle<A>> for u64 {
    fn from(handle: &FooHandle<A>) -> Self {
        handle.raw_address()
    }
}

impl From<*mut handle_t> for FooHandle<LibFoo> {
    fn from(ptr: *mut handle_t) -> Self {
        Self::from_raw(ptr)
    }
}

impl<A: HandleAllocator> fmt::Debug for FooHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FooHandle")
            .field("address", &format_args!("{:#x}", self.raw_address()))
            .field("owns_resource", &self.owns_resource)
            .finish()
    }
}

impl<A: HandleAllocator> fmt::LowerHex for FooHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.raw_address(), f)
    }
}

impl<A: HandleAllocator> fmt::UpperHex for FooHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.raw_address(), f)
    }
}

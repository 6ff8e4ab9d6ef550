//! Purpose: Safe ownership layer over the libfoo native boundary.
//! Exports: `core` (handle and string wrappers, decoding, errors), `session`.
//! Role: Library backing the `foo-demo` binary and integration tests.
//! Invariants: Every native resource has exactly one owning wrapper and one release path.
//! Invariants: Raw pointers only leave the wrappers through borrow or explicit `into_raw`.
pub mod core;
pub mod session;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::handle::FooHandle;
pub use crate::core::out_string::OutString;

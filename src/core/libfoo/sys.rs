// Raw FFI bindings to libfoo (c/libfoo.c).
use std::os::raw::{c_char, c_int, c_long};

#[repr(C)]
#[allow(non_camel_case_types)]
pub struct handle_t {
    _private: [u8; 0],
}

unsafe extern "C" {
    pub fn handle_alloc(handle: *mut *mut handle_t);

    pub fn handle_free(handle: *mut handle_t);

    pub fn doit(valin: c_int, res: *mut c_int);

    pub fn return_string(p: *mut *mut c_char);

    pub fn libfoo_live_handles() -> c_long;

    pub fn libfoo_handle_frees() -> c_long;

    pub fn libfoo_fail_next_alloc();
}

// Ownership wrappers against the real libfoo boundary (c/libfoo.c).
use foosafe::core::libfoo::{self, HandleAllocator, LibFoo, native_stats};
use foosafe::{ErrorKind, FooHandle, OutString};

#[test]
fn handle_lifecycle_frees_exactly_once() {
    let before = native_stats();

    let mut handle = FooHandle::create().expect("create");
    assert_ne!(handle.raw_address(), 0);
    assert!(!handle.is_invalid());
    assert_eq!(native_stats().live_handles, before.live_handles + 1);

    handle.release();
    assert!(handle.is_invalid());
    handle.release();
    drop(handle);

    let after = native_stats();
    assert_eq!(after.live_handles, before.live_handles);
    assert_eq!(after.handle_frees, before.handle_frees + 1);
}

#[test]
fn abandoned_handle_is_released_on_drop() {
    let before = native_stats();
    {
        let _handle = FooHandle::create().expect("create");
        assert_eq!(native_stats().live_handles, before.live_handles + 1);
    }
    assert_eq!(native_stats().live_handles, before.live_handles);
}

#[test]
fn non_owning_view_never_frees() {
    let before = native_stats();
    let owner = FooHandle::create().expect("create");
    {
        let mut view: FooHandle = owner.as_ptr().into();
        assert!(!view.owns_resource());
        assert_eq!(view.raw_address(), owner.raw_address());
        view.release();
    }
    assert_eq!(native_stats().handle_frees, before.handle_frees);
    drop(owner);
    assert_eq!(native_stats().handle_frees, before.handle_frees + 1);
}

#[test]
fn allocation_failure_leaves_no_handle() {
    let before = native_stats();
    libfoo::fail_next_alloc();
    let err = FooHandle::create().expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::Allocation);
    assert_eq!(native_stats(), before);
}

#[test]
fn captured_string_reads_twice_then_releases() {
    let mut out = OutString::capture_from(|slot| unsafe { libfoo::return_string(slot) });
    assert!(!out.is_null());
    assert_eq!(out.to_text().expect("first"), "deadbeef");
    assert_eq!(out.to_text().expect("second"), "deadbeef");
    assert!(!out.is_null());
    out.release();
    assert!(out.is_null());
    out.release();
    assert_eq!(out.to_text().expect("after release"), "");
}

#[test]
fn slot_can_be_filled_directly() {
    let mut out = OutString::new();
    unsafe { libfoo::return_string(out.slot()) };
    let text: String = (&out).try_into().expect("text");
    assert_eq!(text, "deadbeef");
}

#[test]
fn short_scan_window_rejects_native_string() {
    let out = OutString::capture_from(|slot| unsafe { libfoo::return_string(slot) })
        .with_scan_limit(8);
    let err = out.to_text().expect_err("terminator is the ninth byte");
    assert_eq!(err.kind(), ErrorKind::Decode);

    let out = OutString::capture_from(|slot| unsafe { libfoo::return_string(slot) })
        .with_scan_limit(9);
    assert_eq!(out.to_text().expect("fits"), "deadbeef");
}

#[test]
fn borrowed_pointer_is_accepted_by_native_free() {
    let before = native_stats();
    let handle = FooHandle::create().expect("create");
    let ptr: *mut libfoo::handle_t = (&handle).into();
    assert_eq!(ptr, handle.as_ptr());
    assert!(!handle.is_invalid());

    let raw = handle.into_raw();
    assert_eq!(raw, ptr);
    assert_eq!(native_stats().live_handles, before.live_handles + 1);

    unsafe { LibFoo::deallocate(ptr) }.expect("deallocate");
    let after = native_stats();
    assert_eq!(after.live_handles, before.live_handles);
    assert_eq!(after.handle_frees, before.handle_frees + 1);
}

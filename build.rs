//! Purpose: Compile the libfoo native boundary for Rust FFI.
//! Role: Cargo build-script; configures `cc` inputs/includes and rebuild triggers.
//! Invariants: `cargo:rerun-if-changed` covers every C source and header.
//! Invariants: Produces a `foo` static library linked into the Rust crate.
//! Invariants: Uses only Cargo-provided env vars (e.g. `CARGO_MANIFEST_DIR`).
use std::env;
use std::path::PathBuf;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let c_dir = manifest_dir.join("c");

    println!("cargo:rerun-if-changed=c/libfoo.c");
    println!("cargo:rerun-if-changed=c/libfoo.h");

    let mut build = cc::Build::new();
    build.include(&c_dir).file(c_dir.join("libfoo.c"));

    configure_compiler(&mut build, &target);

    build.compile("foo");
}

fn configure_compiler(build: &mut cc::Build, target: &str) {
    if target.contains("windows-msvc") {
        build.flag_if_supported("/std:c11");
    } else {
        build.flag_if_supported("-std=c11");
    }
}

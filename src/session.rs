//! Purpose: Compose a `FooHandle` and `OutString` into one unit of work.
//! Exports: `Session`, `SessionReport`.
//! Role: Application layer used by `foo-demo`.
//! Invariants: A session holds exactly one owning handle for its whole life.
//! Invariants: Strings fetched from native code are freed before `fetch_string` returns.
use serde::Serialize;

use crate::core::error::Error;
use crate::core::handle::FooHandle;
use crate::core::libfoo;
use crate::core::out_string::OutString;
use crate::core::text::MAX_SCAN_LEN;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SessionReport {
    pub handle: String,
    pub input: i32,
    pub output: i32,
    pub text: String,
}

#[derive(Debug)]
pub struct Session {
    handle: FooHandle,
    scan_limit: usize,
}

impl Session {
    pub fn open() -> Result<Self, Error> {
        let handle = FooHandle::create()?;
        Ok(Self {
            handle,
            scan_limit: MAX_SCAN_LEN,
        })
    }

    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn handle(&self) -> &FooHandle {
        &self.handle
    }

    pub fn handle_address(&self) -> u64 {
        self.handle.raw_address()
    }

    pub fn compute(&self, value: i32) -> i32 {
        libfoo::compute(value)
    }

    pub fn fetch_string(&self) -> Result<String, Error> {
        let out = OutString::capture_from(|slot| unsafe { libfoo::return_string(slot) })
            .with_scan_limit(self.scan_limit);
        out.to_text()
    }

    pub fn report(&self, input: i32) -> Result<SessionReport, Error> {
        let output = self.compute(input);
        let text = self.fetch_string()?;
        tracing::debug!(input, output, "session report");
        Ok(SessionReport {
            handle: format!("{:X}", self.handle),
            input,
            output,
            text,
        })
    }

    pub fn close(mut self) {
        self.handle.release();
    }
}

//! C ABI and browser-host bindings for the Pitlane simulator.
//!
//! Two surfaces share one translation from flat `repr(C)` configuration
//! structs into a validated [`SimSetup`](pitlane_core::SimSetup):
//!
//! | Module | Surface |
//! |--------|---------|
//! | [`sim`] | native handle API: `pitlane_create`, `pitlane_step`, ... |
//! | [`wasm`] | browser runtime: `pitlane_wasm_init`, `pitlane_wasm_step`, ... |
//! | [`abi`] | `repr(C)` structs and the stock-default tables |
//! | [`status`] | [`PitlaneStatus`] codes |
//!
//! Objects live in generational handle tables, so a stale or made-up
//! handle is reported instead of dereferenced. Every entry point catches
//! panics; the message of the last one on the calling thread is available
//! from [`pitlane_last_panic_message`]. This is the only crate in the
//! workspace that contains `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::os::raw::c_char;

/// Run `$body` inside `catch_unwind`, returning `$fallback` on panic.
macro_rules! ffi_guard_or {
    ($fallback:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $fallback
            }
        }
    };
}

/// `ffi_guard_or!` for status-returning functions.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::PitlaneStatus::Panicked as i32, $body)
    };
}

/// Lock a mutex or return `InternalError` from the enclosing guard.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::PitlaneStatus::InternalError as i32,
        }
    };
}

pub mod abi;
mod handle;
pub mod sim;
pub mod status;
mod translate;
pub mod wasm;

pub use abi::{
    PitlaneBatchLapResult, PitlaneCarConfig, PitlaneCarSnapshot, PitlaneDeterminismReport,
    PitlaneDriverInput, PitlanePowertrainConfig, PitlaneSimConfig, PitlaneTorquePoint,
    PitlaneTrackConfig, PitlaneTrackNode, PitlaneWasmInitConfig,
};
pub use status::PitlaneStatus;

/// Version of the C ABI described by the generated header.
pub const PITLANE_API_VERSION: u32 = 1;

thread_local! {
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_owned()
    };
    log::error!("panic caught at the FFI boundary: {message}");
    LAST_PANIC.with(|last| *last.borrow_mut() = message);
}

/// Copy the message of the last panic caught on this thread into `buf`.
///
/// Writes at most `cap - 1` bytes followed by a NUL terminator and returns
/// the full message length in bytes, so a return value `>= cap` means the
/// copy was truncated. With a null `buf` or zero `cap` nothing is written
/// and only the length is returned. Returns 0 if no panic has been caught.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_last_panic_message(buf: *mut c_char, cap: usize) -> usize {
    LAST_PANIC.with(|last| {
        let last = last.borrow();
        let bytes = last.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf points to cap writable bytes per caller contract,
            // and n + 1 <= cap.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buf, n);
                *buf.add(n) = 0;
            }
        }
        bytes.len()
    })
}

/// ABI version of the loaded library. Hosts compare it against
/// `PITLANE_API_VERSION` from the header they were built with.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_api_version() -> u32 {
    PITLANE_API_VERSION
}

//! Raw FFI bindings to the C shim in `csrc/mpihello.c`.
//!
//! These are low-level unsafe functions. Use the safe wrappers in the parent module.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int};

// Type alias matching the C header
pub type int32_t = i32;

unsafe extern "C" {
    // ============================================================
    // Initialization and Finalization
    // ============================================================

    pub fn mpihello_init(errhandler_status: *mut int32_t) -> c_int;
    pub fn mpihello_finalize() -> c_int;
    pub fn mpihello_initialized(flag: *mut int32_t) -> c_int;
    pub fn mpihello_finalized(flag: *mut int32_t) -> c_int;

    // ============================================================
    // Communicator Queries
    // ============================================================

    pub fn mpihello_comm_world() -> int32_t;
    pub fn mpihello_comm_size(comm: int32_t, size: *mut int32_t) -> c_int;
    pub fn mpihello_comm_rank(comm: int32_t, rank: *mut int32_t) -> c_int;

    // ============================================================
    // Environment
    // ============================================================

    pub fn mpihello_max_processor_name() -> int32_t;
    pub fn mpihello_get_processor_name(name: *mut c_char, len: *mut int32_t) -> c_int;
    pub fn mpihello_get_version(version: *mut c_char, len: *mut int32_t) -> c_int;

    // ============================================================
    // Error Information
    // ============================================================

    pub fn mpihello_error_string(
        code: c_int,
        message: *mut c_char,
        capacity: int32_t,
        len: *mut int32_t,
    ) -> c_int;
}

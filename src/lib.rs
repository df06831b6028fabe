//! # mpi-hello
//!
//! An MPI "hello world": every process of a launched job initializes MPI,
//! asks for the size of `MPI_COMM_WORLD`, its own rank and its processor
//! name, prints one greeting line and finalizes.
//!
//! ```text
//! $ mpiexec -n 2 mpi-hello
//! [Rank:0/2] Hello World from node01
//! [Rank:1/2] Hello World from node01
//! ```
//!
//! MPI is reached through a thin C shim (`csrc/mpihello.c`) compiled by the
//! build script, so the Rust side never depends on how a particular MPI
//! implementation lays out its handles.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mpi_hello::{Greeting, Mpi};
//!
//! fn main() -> Result<(), mpi_hello::Error> {
//!     let mpi = Mpi::init()?;
//!     let world = mpi.world();
//!
//!     let greeting = Greeting {
//!         rank: world.rank()?,
//!         size: world.size()?,
//!         host: world.processor_name()?,
//!     };
//!     println!("{greeting}");
//!
//!     // MPI is finalized when `mpi` is dropped
//!     Ok(())
//! }
//! ```
//!
//! The `mpi-hello` binary runs the same sequence through [`hello::run`],
//! which reports failed MPI calls on stderr and keeps going instead of
//! bailing out.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `debug` | Default log filter of the binaries becomes `debug` |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod comm;
mod error;
mod ffi;
pub mod greeting;
pub mod hello;
pub mod launcher;

pub use comm::Communicator;
pub use error::{Error, Result};
pub use greeting::{verify_transcript, Greeting, TranscriptError};
pub use launcher::Launcher;

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag tracking whether this process holds a live [`Mpi`] handle
static MPI_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Default `env_logger` filter for the binaries in this crate.
#[cfg(feature = "debug")]
pub const DEFAULT_LOG_FILTER: &str = "debug";
/// Default `env_logger` filter for the binaries in this crate.
#[cfg(not(feature = "debug"))]
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// MPI environment handle.
///
/// There can only be one instance of this type at a time. When dropped, it
/// finalizes MPI.
///
/// # Example
///
/// ```no_run
/// use mpi_hello::Mpi;
///
/// let mpi = Mpi::init().expect("Failed to initialize MPI");
/// let world = mpi.world();
/// println!("Running on {} processes", world.size().unwrap());
/// // MPI is finalized when `mpi` goes out of scope
/// ```
pub struct Mpi {
    /// Status of installing `MPI_ERRORS_RETURN` on the world communicator
    errhandler_status: i32,
    /// Marker to make Mpi !Send and !Sync
    _marker: PhantomData<*const ()>,
}

impl Mpi {
    /// Initialize MPI.
    ///
    /// Failed queries on the world communicator are returned as status codes
    /// rather than aborting the job. If that error handler cannot be
    /// installed, MPI is still initialized and the handle is returned; the
    /// failure is available from [`errors_return`](Self::errors_return).
    ///
    /// # Errors
    ///
    /// Returns an error if MPI is already initialized, was finalized earlier
    /// in this process, or if initialization fails.
    pub fn init() -> Result<Self> {
        if MPI_INITIALIZED.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyInitialized);
        }
        // MPI_Init may be called at most once per process.
        if Self::is_finalized() {
            MPI_INITIALIZED.store(false, Ordering::SeqCst);
            return Err(Error::AlreadyFinalized);
        }

        let mut errhandler_status: i32 = 0;
        let ret = unsafe { ffi::mpihello_init(&mut errhandler_status) };
        match init_outcome(ret, errhandler_status) {
            Ok(errhandler_status) => Ok(Mpi {
                errhandler_status,
                _marker: PhantomData,
            }),
            Err(code) => {
                MPI_INITIALIZED.store(false, Ordering::SeqCst);
                Err(Error::from_code(code))
            }
        }
    }

    /// Whether `MPI_ERRORS_RETURN` was installed on the world communicator.
    ///
    /// An error here means a failing query may abort the job instead of
    /// returning its status code.
    pub fn errors_return(&self) -> Result<()> {
        Error::check(self.errhandler_status)
    }

    /// Get a handle to `MPI_COMM_WORLD`.
    pub fn world(&self) -> Communicator {
        Communicator::world()
    }

    /// Get the first line of the MPI library version string.
    pub fn version() -> Result<String> {
        let mut buf = [0u8; 256];
        let mut len: i32 = 0;
        let ret = unsafe { ffi::mpihello_get_version(buf.as_mut_ptr().cast(), &mut len) };
        Error::check(ret)?;

        let len = (len.max(0) as usize).min(buf.len());
        Ok(String::from_utf8_lossy(&buf[..len]).trim_end().to_string())
    }

    /// Check if MPI has been initialized.
    pub fn is_initialized() -> bool {
        let mut flag: i32 = 0;
        unsafe { ffi::mpihello_initialized(&mut flag) };
        flag != 0
    }

    /// Check if MPI has been finalized.
    pub fn is_finalized() -> bool {
        let mut flag: i32 = 0;
        unsafe { ffi::mpihello_finalized(&mut flag) };
        flag != 0
    }
}

/// Split the shim's init result: only `MPI_Init` itself decides whether a
/// handle exists. The error-handler status travels inside `Ok`.
fn init_outcome(init_status: i32, errhandler_status: i32) -> std::result::Result<i32, i32> {
    if init_status == 0 {
        Ok(errhandler_status)
    } else {
        Err(init_status)
    }
}

impl Drop for Mpi {
    fn drop(&mut self) {
        if MPI_INITIALIZED.load(Ordering::SeqCst) {
            let ret = unsafe { ffi::mpihello_finalize() };
            if ret != 0 {
                log::error!("MPI_Finalize returned an error code : {ret}");
            }
            MPI_INITIALIZED.store(false, Ordering::SeqCst);
        }
    }
}

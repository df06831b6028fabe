//! The world communicator and the queries the greeting needs.

use crate::error::{Error, Result};
use crate::ffi;
use std::marker::PhantomData;

/// A handle to `MPI_COMM_WORLD`.
///
/// Obtained from [`Mpi::world`](crate::Mpi::world). Unlike the raw MPI
/// calls, every query here hands back the status code as an [`Error`]
/// instead of leaving the out-parameter silently untouched.
///
/// # Example
///
/// ```no_run
/// use mpi_hello::Mpi;
///
/// let mpi = Mpi::init().unwrap();
/// let world = mpi.world();
/// let rank = world.rank().unwrap();
/// let size = world.size().unwrap();
/// println!("rank {rank} of {size} on {}", world.processor_name().unwrap());
/// ```
pub struct Communicator {
    handle: i32,
    /// Marker to make Communicator !Send and !Sync
    _marker: PhantomData<*const ()>,
}

impl Communicator {
    pub(crate) fn world() -> Self {
        Communicator {
            handle: unsafe { ffi::mpihello_comm_world() },
            _marker: PhantomData,
        }
    }

    /// Get the raw communicator handle used by the C shim.
    pub fn raw_handle(&self) -> i32 {
        self.handle
    }

    /// Get the number of processes in this communicator.
    pub fn size(&self) -> Result<i32> {
        let mut size: i32 = 0;
        let ret = unsafe { ffi::mpihello_comm_size(self.handle, &mut size) };
        Error::check(ret)?;
        Ok(size)
    }

    /// Get the rank of the calling process in this communicator.
    pub fn rank(&self) -> Result<i32> {
        let mut rank: i32 = 0;
        let ret = unsafe { ffi::mpihello_comm_rank(self.handle, &mut rank) };
        Error::check(ret)?;
        Ok(rank)
    }

    /// Get the name of the processor (usually the host) this process runs on.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn processor_name(&self) -> Result<String> {
        let capacity = unsafe { ffi::mpihello_max_processor_name() }.max(1) as usize;
        let mut buf = vec![0u8; capacity];
        let mut len: i32 = 0;
        let ret = unsafe { ffi::mpihello_get_processor_name(buf.as_mut_ptr().cast(), &mut len) };
        Error::check(ret)?;

        let len = usize::try_from(len)
            .ok()
            .filter(|&n| n <= buf.len())
            .ok_or_else(|| Error::Internal(format!("processor name length {len} out of range")))?;
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }
}

//! Error types for mpi-hello

use crate::ffi;
use thiserror::Error;

/// Result type for MPI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Size of the buffer handed to `MPI_Error_string`.
const ERROR_STRING_CAPACITY: usize = 512;

/// Error types for MPI operations
#[derive(Error, Debug)]
pub enum Error {
    /// MPI has already been initialized
    #[error("MPI has already been initialized")]
    AlreadyInitialized,

    /// MPI was finalized and cannot be initialized again
    #[error("MPI has already been finalized")]
    AlreadyFinalized,

    /// A call into the MPI runtime returned a non-zero status code
    #[error("MPI error (code {code}){}", describe(.message))]
    Mpi {
        /// Raw status code returned by the runtime
        code: i32,
        /// Text from `MPI_Error_string`, empty if unavailable
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

impl Error {
    /// Create an error from an MPI status code, asking the runtime to
    /// describe it.
    ///
    /// # Panics
    ///
    /// Panics if called with the success code (0).
    pub fn from_code(code: i32) -> Self {
        assert_ne!(code, 0, "from_code called with success code");
        Error::Mpi {
            code,
            message: error_string(code).unwrap_or_default(),
        }
    }

    /// Check an MPI return code, returning Ok(()) for success.
    pub fn check(code: i32) -> Result<()> {
        if code == 0 {
            Ok(())
        } else {
            Err(Error::from_code(code))
        }
    }

    /// The raw MPI status code carried by this error, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Mpi { code, .. } => Some(*code),
            _ => None,
        }
    }
}

fn error_string(code: i32) -> Option<String> {
    let mut buf = [0u8; ERROR_STRING_CAPACITY];
    let mut len: i32 = 0;
    let ret = unsafe {
        ffi::mpihello_error_string(
            code,
            buf.as_mut_ptr().cast(),
            ERROR_STRING_CAPACITY as i32,
            &mut len,
        )
    };
    if ret != 0 {
        return None;
    }
    let len = (len.max(0) as usize).min(buf.len());
    Some(String::from_utf8_lossy(&buf[..len]).trim_end().to_string())
}

//! `mpi-hello`: one greeting line per MPI process.
//!
//! Run with: mpiexec -n 4 mpi-hello

use mpi_hello::{hello, DEFAULT_LOG_FILTER};
use std::io;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    // Failures are logged inside `run`; the exit status stays 0 regardless.
    hello::run(&mut io::stdout().lock());
}

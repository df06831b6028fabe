//! The hello-world routine run by the `mpi-hello` binary.
//!
//! Init, size, rank, processor name, print, finalize. A failed call is
//! reported on stderr together with the MPI call that failed, and the
//! routine carries on with a zero/empty value in its place.

use crate::error::{Error, Result};
use crate::greeting::Greeting;
use crate::launcher::{self, Launcher};
use crate::Mpi;
use std::io::Write;

/// Run the greeting sequence for this process and write the line to `out`.
///
/// Always produces a greeting. If `MPI_Init` fails, no further MPI call is
/// made and the greeting carries the fallback values.
pub fn run<W: Write>(out: &mut W) -> Greeting {
    let Some(mpi) = report_status("MPI_Init", Mpi::init()) else {
        let greeting = Greeting::fallback();
        emit(out, &greeting);
        return greeting;
    };
    report_status("MPI_Comm_set_errhandler", mpi.errors_return());
    log_environment();

    let world = mpi.world();
    let size = report_status("MPI_Comm_size", world.size()).unwrap_or(0);
    let rank = report_status("MPI_Comm_rank", world.rank()).unwrap_or(0);
    let host = report_status("MPI_Get_processor_name", world.processor_name()).unwrap_or_default();

    let greeting = Greeting { rank, size, host };
    check_launcher(&greeting);
    emit(out, &greeting);

    // Finalize before handing the greeting back.
    drop(mpi);
    greeting
}

/// Write one greeting line and flush it. A write failure is logged, not
/// propagated.
pub fn emit<W: Write>(out: &mut W, greeting: &Greeting) {
    if let Err(e) = writeln!(out, "{greeting}").and_then(|()| out.flush()) {
        log::error!("rank {}: failed to write greeting: {e}", greeting.rank);
    }
}

/// Log a failed MPI call and turn the result into an `Option`.
pub fn report_status<T>(call: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{}", status_message(call, &e));
            None
        }
    }
}

/// The stderr diagnostic for a failed call.
///
/// MPI status codes come out as `"<call> returned an error code : <code>"`,
/// followed by the runtime's description when it has one.
pub fn status_message(call: &str, err: &Error) -> String {
    match err {
        Error::Mpi { code, message } if message.is_empty() => {
            format!("{call} returned an error code : {code}")
        }
        Error::Mpi { code, message } => {
            format!("{call} returned an error code : {code} ({message})")
        }
        other => format!("{call} failed: {other}"),
    }
}

fn log_environment() {
    match Mpi::version() {
        Ok(version) => log::debug!("MPI library: {version}"),
        Err(e) => log::debug!("MPI library version unavailable: {e}"),
    }
    log::debug!(
        "launcher={} job={} node={}",
        Launcher::detect(),
        launcher::job_id().as_deref().unwrap_or("-"),
        launcher::node_name().as_deref().unwrap_or("-"),
    );
}

/// Warn when MPI and the launcher disagree about this process.
fn check_launcher(greeting: &Greeting) {
    if let Some(rank) = launcher::launcher_rank() {
        if rank != greeting.rank {
            log::warn!(
                "MPI reports rank {} but the {} launcher assigned rank {rank}",
                greeting.rank,
                Launcher::detect(),
            );
        }
    }
    if let Some(size) = launcher::launcher_size() {
        if size != greeting.size {
            log::warn!(
                "MPI reports {} processes but the {} launcher started {size}",
                greeting.size,
                Launcher::detect(),
            );
        }
    }
}

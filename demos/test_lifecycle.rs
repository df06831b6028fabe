//! Integration test for the MPI environment handle.
//!
//! Exercises Mpi::init, version, is_initialized, is_finalized, world and the
//! communicator queries, then checks that MPI cannot be brought back up.
//!
//! Run with: mpiexec -n 2 ./target/debug/examples/test_lifecycle

use mpi_hello::{Error, Mpi};

fn main() {
    let mpi = Mpi::init().expect("MPI init failed");

    assert!(
        Mpi::is_initialized(),
        "is_initialized should be true after init"
    );
    println!("PASS: is_initialized");

    assert!(
        !Mpi::is_finalized(),
        "is_finalized should be false before drop"
    );
    println!("PASS: is_finalized (false before drop)");

    assert!(
        matches!(Mpi::init(), Err(Error::AlreadyInitialized)),
        "second init should be rejected while the handle is alive"
    );
    println!("PASS: double init rejected");

    let version = Mpi::version().expect("version() failed");
    assert!(!version.is_empty(), "version string should not be empty");
    println!("PASS: version = {version}");

    let world = mpi.world();
    let size = world.size().expect("size() failed");
    let rank = world.rank().expect("rank() failed");
    assert!(size >= 1, "size should be >= 1");
    assert!(rank >= 0 && rank < size, "rank should be in [0, size)");
    println!("PASS: world rank={rank} size={size}");

    let name = world.processor_name().expect("processor_name failed");
    assert!(!name.is_empty(), "processor_name should not be empty");
    println!("PASS: processor_name = {name}");

    assert!(world.raw_handle() >= 0, "raw_handle should be non-negative");
    println!("PASS: raw_handle = {}", world.raw_handle());

    // Mpi drops here, which calls MPI_Finalize
    drop(mpi);
    assert!(Mpi::is_finalized(), "is_finalized should be true after drop");
    assert!(
        matches!(Mpi::init(), Err(Error::AlreadyFinalized)),
        "init after finalize should be rejected"
    );
    println!("PASS: init after finalize rejected");

    if rank == 0 {
        println!("\n========================================");
        println!("All lifecycle tests passed!");
        println!("========================================");
    }
}

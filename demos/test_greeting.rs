//! Integration test for the greeting routine.
//!
//! Each rank runs hello::run into a buffer and checks the line it produced.
//! Pipe the real binary through mpi-hello-verify to check the whole job:
//!
//!   mpiexec -n 4 ./target/debug/examples/test_greeting
//!   mpiexec -n 4 ./target/debug/mpi-hello | ./target/debug/mpi-hello-verify -n 4

use mpi_hello::{hello, launcher, Greeting};

fn main() {
    let mut out = Vec::new();
    let greeting = hello::run(&mut out);

    let text = String::from_utf8(out).expect("greeting is not UTF-8");
    assert_eq!(text.lines().count(), 1, "expected one line, got {text:?}");
    assert!(text.ends_with('\n'), "greeting should end with a newline");

    let parsed: Greeting = text.parse().expect("output does not parse as a greeting");
    assert_eq!(parsed, greeting, "printed and returned greeting differ");

    let Greeting { rank, size, host } = greeting;
    assert!(size >= 1, "size should be >= 1, got {size}");
    assert!(rank >= 0 && rank < size, "rank {rank} outside [0, {size})");
    assert!(!host.is_empty(), "processor name should not be empty");

    if let Some(expected) = launcher::launcher_rank() {
        assert_eq!(rank, expected, "launcher assigned a different rank");
    }
    if let Some(expected) = launcher::launcher_size() {
        assert_eq!(size, expected, "launcher started a different number of processes");
    }

    eprintln!("PASS: test_greeting rank={rank} size={size} host={host}");
}

//! `mpi-hello-verify`: check the collected stdout of an `mpi-hello` job.
//!
//! ```text
//! mpiexec -n 4 mpi-hello | mpi-hello-verify -n 4
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mpi_hello::{verify_transcript, DEFAULT_LOG_FILTER};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mpi-hello-verify",
    version,
    about = "Check that a job printed exactly one greeting per rank"
)]
struct Args {
    /// Number of processes the job was launched with
    #[arg(short = 'n', long = "np", value_name = "N")]
    expected: Option<usize>,

    /// Transcript to read instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
    let args = Args::parse();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let lines = read_lines_lossy(reader).context("reading transcript")?;
    log::debug!("read {} transcript lines", lines.len());

    let count = verify_transcript(&lines, args.expected)?;
    println!("OK: {count} processes greeted once each");
    Ok(())
}

/// Split a transcript into lines, replacing invalid UTF-8 instead of failing.
///
/// Launchers and remote shells sometimes interleave binary noise with the
/// job's stdout; such lines just fail to parse as greetings later.
fn read_lines_lossy<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(lines);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
}

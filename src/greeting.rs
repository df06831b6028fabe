//! The greeting line and checks over a job's collected output.
//!
//! Each process prints exactly one line:
//!
//! ```text
//! [Rank:<r>/<n>] Hello World from <host>
//! ```
//!
//! [`verify_transcript`] takes the merged stdout of a whole job and checks
//! that it holds one greeting per rank, all agreeing on the job size.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "[Rank:";
const BODY: &str = "Hello World from";

/// One process's greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Rank of the process in `MPI_COMM_WORLD`.
    pub rank: i32,
    /// Number of processes in `MPI_COMM_WORLD`.
    pub size: i32,
    /// Processor name reported by MPI.
    pub host: String,
}

impl Greeting {
    /// The greeting printed when no MPI query could be made: rank 0 of 0,
    /// no processor name.
    pub fn fallback() -> Self {
        Greeting {
            rank: 0,
            size: 0,
            host: String::new(),
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}/{}] {BODY} {}", self.rank, self.size, self.host)
    }
}

/// A line that is not a greeting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a greeting line: {0:?}")]
pub struct ParseGreetingError(String);

impl FromStr for Greeting {
    type Err = ParseGreetingError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || ParseGreetingError(line.to_string());
        let trimmed = line.trim_end();

        let rest = trimmed.strip_prefix(PREFIX).ok_or_else(err)?;
        let (counts, rest) = rest.split_once("] ").ok_or_else(err)?;
        let (rank, size) = counts.split_once('/').ok_or_else(err)?;
        let rank = rank.parse().map_err(|_| err())?;
        let size = size.parse().map_err(|_| err())?;

        // An empty processor name leaves nothing after the body text.
        let rest = rest.strip_prefix(BODY).ok_or_else(err)?;
        let host = if rest.is_empty() {
            ""
        } else {
            rest.strip_prefix(' ').ok_or_else(err)?
        };

        Ok(Greeting {
            rank,
            size,
            host: host.to_string(),
        })
    }
}

/// Ways a job transcript can fail to match "one greeting per rank".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// No greeting lines at all
    #[error("transcript contains no greeting lines")]
    Empty,

    /// The number of greetings differs from the requested process count
    #[error("expected {expected} greetings, found {found}")]
    CountMismatch {
        /// Process count the job was launched with
        expected: usize,
        /// Greeting lines actually found
        found: usize,
    },

    /// Two processes disagree on the communicator size
    #[error("rank {rank} reports size {reported}, but the job reports size {size}")]
    InconsistentSize {
        /// Rank of the disagreeing line
        rank: i32,
        /// Size that line reports
        reported: i32,
        /// Size reported by the first greeting
        size: i32,
    },

    /// A rank outside `[0, size)`
    #[error("rank {rank} is outside [0, {size})")]
    RankOutOfRange {
        /// Offending rank
        rank: i32,
        /// Communicator size
        size: i32,
    },

    /// The same rank greeted twice
    #[error("rank {0} greeted more than once")]
    DuplicateRank(i32),

    /// A rank never greeted
    #[error("rank {0} never greeted")]
    MissingRank(i32),
}

/// Check the merged stdout of a job.
///
/// Lines that do not parse as a [`Greeting`] (launcher banners, warnings) are
/// skipped. If `expected` is given it must match the number of greetings.
/// Returns the verified process count.
pub fn verify_transcript<I, S>(lines: I, expected: Option<usize>) -> Result<usize, TranscriptError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let greetings: Vec<Greeting> = lines
        .into_iter()
        .filter_map(|line| line.as_ref().parse().ok())
        .collect();

    let Some(first) = greetings.first() else {
        return Err(TranscriptError::Empty);
    };
    if let Some(expected) = expected {
        if greetings.len() != expected {
            return Err(TranscriptError::CountMismatch {
                expected,
                found: greetings.len(),
            });
        }
    }

    let size = first.size;
    let mut seen = BTreeSet::new();
    for greeting in &greetings {
        if greeting.size != size {
            return Err(TranscriptError::InconsistentSize {
                rank: greeting.rank,
                reported: greeting.size,
                size,
            });
        }
        if greeting.rank < 0 || greeting.rank >= size {
            return Err(TranscriptError::RankOutOfRange {
                rank: greeting.rank,
                size,
            });
        }
        if !seen.insert(greeting.rank) {
            return Err(TranscriptError::DuplicateRank(greeting.rank));
        }
    }

    // Ranks are distinct and in range, so fewer lines than `size` means a gap.
    if let Some(missing) = (0..size).find(|rank| !seen.contains(rank)) {
        return Err(TranscriptError::MissingRank(missing));
    }

    Ok(greetings.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting(rank: i32, size: i32, host: &str) -> Greeting {
        Greeting {
            rank,
            size,
            host: host.to_string(),
        }
    }

    #[test]
    fn renders_the_greeting_line() {
        assert_eq!(
            greeting(2, 4, "node07").to_string(),
            "[Rank:2/4] Hello World from node07"
        );
    }

    #[test]
    fn fallback_renders_and_parses_back() {
        let fallback = Greeting::fallback();
        assert_eq!(fallback.to_string(), "[Rank:0/0] Hello World from ");
        assert_eq!(fallback.to_string().parse::<Greeting>().unwrap(), fallback);
    }

    #[test]
    fn parses_with_trailing_whitespace() {
        let parsed: Greeting = "[Rank:0/1] Hello World from login-1 \n".parse().unwrap();
        assert_eq!(parsed, greeting(0, 1, "login-1"));
    }

    #[test]
    fn parses_empty_host() {
        let line = greeting(3, 8, "").to_string();
        assert_eq!(line.parse::<Greeting>().unwrap(), greeting(3, 8, ""));
    }

    #[test]
    fn rejects_other_lines() {
        for line in [
            "",
            "Hello World from node",
            "[Rank:a/2] Hello World from node",
            "[Rank:1/2] Goodbye from node",
            "[Rank:1/2] Hello World fromnode",
        ] {
            assert!(line.parse::<Greeting>().is_err(), "{line:?} parsed");
        }
    }

    #[test]
    fn accepts_any_order_and_noise() {
        let lines = [
            "[Rank:2/3] Hello World from b",
            "Warning: Permanently added 'b' to the list of known hosts.",
            "[Rank:0/3] Hello World from a",
            "[Rank:1/3] Hello World from a",
        ];
        assert_eq!(verify_transcript(lines, Some(3)), Ok(3));
        assert_eq!(verify_transcript(lines, None), Ok(3));
    }

    #[test]
    fn empty_transcript() {
        let lines: [&str; 0] = [];
        assert_eq!(verify_transcript(lines, None), Err(TranscriptError::Empty));
        assert_eq!(
            verify_transcript(["mpiexec: nothing to do"], Some(1)),
            Err(TranscriptError::Empty)
        );
    }

    #[test]
    fn count_mismatch() {
        let lines = ["[Rank:0/1] Hello World from a"];
        assert_eq!(
            verify_transcript(lines, Some(2)),
            Err(TranscriptError::CountMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn inconsistent_size() {
        let lines = [
            "[Rank:0/2] Hello World from a",
            "[Rank:1/3] Hello World from a",
        ];
        assert_eq!(
            verify_transcript(lines, None),
            Err(TranscriptError::InconsistentSize {
                rank: 1,
                reported: 3,
                size: 2
            })
        );
    }

    #[test]
    fn rank_out_of_range() {
        let lines = [
            "[Rank:0/2] Hello World from a",
            "[Rank:2/2] Hello World from a",
        ];
        assert_eq!(
            verify_transcript(lines, None),
            Err(TranscriptError::RankOutOfRange { rank: 2, size: 2 })
        );
    }

    #[test]
    fn duplicate_and_missing_ranks() {
        let dup = [
            "[Rank:1/2] Hello World from a",
            "[Rank:1/2] Hello World from b",
        ];
        assert_eq!(
            verify_transcript(dup, None),
            Err(TranscriptError::DuplicateRank(1))
        );

        let gap = [
            "[Rank:0/3] Hello World from a",
            "[Rank:2/3] Hello World from a",
        ];
        assert_eq!(
            verify_transcript(gap, None),
            Err(TranscriptError::MissingRank(1))
        );
    }
}

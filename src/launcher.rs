//! Process launcher environment helpers.
//!
//! `mpiexec`, `mpirun` and `srun` each export the rank and size they assigned
//! to a process through environment variables. These helpers read them so the
//! greeting can be cross-checked against what MPI itself reports. They return
//! `None` if no known variable is set (e.g., when started without a launcher).
//!
//! # Environment Variables
//!
//! | Launcher | Rank | Size |
//! |----------|------|------|
//! | Open MPI (`mpirun`, `mpiexec`) | `OMPI_COMM_WORLD_RANK` | `OMPI_COMM_WORLD_SIZE` |
//! | PMIx (`prterun`, `srun --mpi=pmix`) | `PMIX_RANK` | — |
//! | SLURM (`srun`) | `SLURM_PROCID` | `SLURM_NTASKS` |
//! | Hydra / PMI-1 (MPICH `mpiexec`) | `PMI_RANK` | `PMI_SIZE` |
//!
//! `node_name()` reads `SLURMD_NODENAME` or `SLURM_NODENAME`; `job_id()`
//! reads `SLURM_JOB_ID`.

use std::env;
use std::fmt;

/// Which launcher started this process, judged from its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    /// Open MPI's `mpirun`/`mpiexec`
    OpenMpi,
    /// A PMIx server such as `prterun`
    Pmix,
    /// SLURM's `srun`
    Slurm,
    /// MPICH's Hydra or another PMI-1 launcher
    Pmi,
    /// No launcher variables found
    Unknown,
}

impl Launcher {
    /// Detect the launcher.
    ///
    /// More specific launchers win: `srun --mpi=pmix` sets both `PMIX_RANK`
    /// and `SLURM_PROCID`, and Open MPI inside a SLURM allocation still
    /// exports `OMPI_COMM_WORLD_RANK`.
    pub fn detect() -> Self {
        if is_set("OMPI_COMM_WORLD_RANK") {
            Launcher::OpenMpi
        } else if is_set("PMIX_RANK") {
            Launcher::Pmix
        } else if is_set("SLURM_PROCID") {
            Launcher::Slurm
        } else if is_set("PMI_RANK") {
            Launcher::Pmi
        } else {
            Launcher::Unknown
        }
    }
}

impl fmt::Display for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Launcher::OpenMpi => "openmpi",
            Launcher::Pmix => "pmix",
            Launcher::Slurm => "slurm",
            Launcher::Pmi => "pmi",
            Launcher::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

fn is_set(var: &str) -> bool {
    env::var_os(var).is_some()
}

fn parse_var(var: &str) -> Option<i32> {
    env::var(var).ok().and_then(|s| s.trim().parse().ok())
}

/// Rank the launcher assigned to this process.
pub fn launcher_rank() -> Option<i32> {
    ["OMPI_COMM_WORLD_RANK", "PMIX_RANK", "SLURM_PROCID", "PMI_RANK"]
        .into_iter()
        .find_map(parse_var)
}

/// Number of processes the launcher started.
pub fn launcher_size() -> Option<i32> {
    ["OMPI_COMM_WORLD_SIZE", "SLURM_NTASKS", "PMI_SIZE"]
        .into_iter()
        .find_map(parse_var)
}

/// Name of the compute node, as the scheduler knows it.
pub fn node_name() -> Option<String> {
    env::var("SLURMD_NODENAME")
        .or_else(|_| env::var("SLURM_NODENAME"))
        .ok()
}

/// Scheduler job ID.
pub fn job_id() -> Option<String> {
    env::var("SLURM_JOB_ID").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 10] = [
        "OMPI_COMM_WORLD_RANK",
        "OMPI_COMM_WORLD_SIZE",
        "PMIX_RANK",
        "SLURM_PROCID",
        "SLURM_NTASKS",
        "PMI_RANK",
        "PMI_SIZE",
        "SLURMD_NODENAME",
        "SLURM_NODENAME",
        "SLURM_JOB_ID",
    ];

    fn clear() {
        for var in VARS {
            unsafe { env::remove_var(var) };
        }
    }

    fn set(var: &str, value: &str) {
        unsafe { env::set_var(var, value) };
    }

    /// Every case mutates the process environment, so they share one test
    /// to avoid races between parallel test threads.
    #[test]
    fn launcher_env_var_parsing() {
        clear();
        assert_eq!(Launcher::detect(), Launcher::Unknown);
        assert_eq!(launcher_rank(), None);
        assert_eq!(launcher_size(), None);
        assert_eq!(node_name(), None);
        assert_eq!(job_id(), None);

        // --- Hydra ---
        set("PMI_RANK", "3");
        set("PMI_SIZE", "4");
        assert_eq!(Launcher::detect(), Launcher::Pmi);
        assert_eq!(launcher_rank(), Some(3));
        assert_eq!(launcher_size(), Some(4));

        // --- srun takes priority over PMI ---
        set("SLURM_PROCID", "1");
        set("SLURM_NTASKS", "8");
        set("SLURM_JOB_ID", "12345");
        set("SLURM_NODENAME", "cn042");
        assert_eq!(Launcher::detect(), Launcher::Slurm);
        assert_eq!(launcher_rank(), Some(1));
        assert_eq!(launcher_size(), Some(8));
        assert_eq!(job_id(), Some("12345".to_string()));
        assert_eq!(node_name(), Some("cn042".to_string()));

        // --- SLURMD_NODENAME wins over SLURM_NODENAME ---
        set("SLURMD_NODENAME", "cn043");
        assert_eq!(node_name(), Some("cn043".to_string()));

        // --- srun --mpi=pmix ---
        set("PMIX_RANK", "5");
        assert_eq!(Launcher::detect(), Launcher::Pmix);
        assert_eq!(launcher_rank(), Some(5));

        // --- Open MPI inside an allocation ---
        set("OMPI_COMM_WORLD_RANK", "6");
        set("OMPI_COMM_WORLD_SIZE", "7");
        assert_eq!(Launcher::detect(), Launcher::OpenMpi);
        assert_eq!(launcher_rank(), Some(6));
        assert_eq!(launcher_size(), Some(7));

        // --- unparsable values fall through to the next source ---
        set("OMPI_COMM_WORLD_RANK", "not-a-number");
        assert_eq!(launcher_rank(), Some(5));

        clear();
    }

    #[test]
    fn display_names() {
        assert_eq!(Launcher::OpenMpi.to_string(), "openmpi");
        assert_eq!(Launcher::Unknown.to_string(), "unknown");
    }
}

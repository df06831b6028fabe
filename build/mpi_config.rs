//! MPI discovery data shared by the build script and its tests.
//!
//! Everything here is pure: the build script feeds it environment lookups and
//! compiler-wrapper output, then prints the cargo directives it returns.

use std::fmt;
use std::path::{Path, PathBuf};

/// pkg-config names tried when `MPI_PKG_CONFIG` does not decide it.
const PKG_CONFIG_NAMES: [&str; 3] = ["mpich", "ompi", "mpi"];

/// Install prefixes searched for `include/mpi.h` as a last resort.
pub const COMMON_PREFIXES: [&str; 4] = ["/usr", "/usr/local", "/opt/mpich", "/opt/openmpi"];

/// Where an MPI installation lives and how to link it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpiConfig {
    pub include_paths: Vec<PathBuf>,
    pub link_paths: Vec<PathBuf>,
    pub libs: Vec<String>,
    pub version: Option<String>,
}

impl MpiConfig {
    /// Layout of a plain `<prefix>/{include,lib}` install linking `libmpi`.
    pub fn from_prefix(prefix: &Path) -> Self {
        MpiConfig {
            include_paths: vec![prefix.join("include")],
            link_paths: vec![prefix.join("lib")],
            libs: vec!["mpi".to_string()],
            version: None,
        }
    }

    /// Read `-I`, `-L` and `-l` flags from `mpicc -show` output.
    pub fn from_compiler_flags(line: &str) -> Self {
        let mut config = MpiConfig {
            include_paths: Vec::new(),
            link_paths: Vec::new(),
            libs: Vec::new(),
            version: None,
        };

        for flag in line.split_whitespace() {
            if let Some(dir) = flag.strip_prefix("-I") {
                config.include_paths.push(PathBuf::from(dir));
            } else if let Some(dir) = flag.strip_prefix("-L") {
                config.link_paths.push(PathBuf::from(dir));
            } else if let Some(lib) = flag.strip_prefix("-l") {
                config.libs.push(lib.to_string());
            }
        }

        // Wrappers that link through an rpath'd driver may list no -l at all.
        if config.libs.is_empty() {
            config.libs.push("mpi".to_string());
        }
        config
    }

    /// The `cargo:` lines that link the shim against this installation.
    ///
    /// Each library directory also goes into the rpath so launched binaries
    /// load the libmpi they were built against.
    pub fn link_directives(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for dir in &self.link_paths {
            lines.push(format!("cargo:rustc-link-search=native={}", dir.display()));
            lines.push(format!("cargo:rustc-link-arg=-Wl,-rpath,{}", dir.display()));
        }
        for lib in &self.libs {
            lines.push(format!("cargo:rustc-link-lib={lib}"));
        }
        if let Some(version) = &self.version {
            lines.push(format!("cargo:rustc-env=MPI_VERSION={version}"));
        }
        lines
    }
}

/// One way of finding MPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Ask pkg-config for this package
    PkgConfig(String),
    /// Run this compiler wrapper with `-show`
    CompilerWrapper(String),
    /// Cray programming environment rooted here
    Cray(String),
    /// Look for `include/mpi.h` under this prefix
    Prefix(&'static str),
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::PkgConfig(name) => write!(f, "pkg-config '{name}'"),
            Strategy::CompilerWrapper(cc) => write!(f, "'{cc} -show'"),
            Strategy::Cray(dir) => write!(f, "Cray MPICH at {dir}"),
            Strategy::Prefix(prefix) => write!(f, "headers under {prefix}"),
        }
    }
}

/// The strategies to try, in order, given an environment lookup.
///
/// An explicit `MPI_PKG_CONFIG` goes first; `MPICC` replaces the default
/// `mpicc`; `CRAY_MPICH_DIR` adds the Cray strategy ahead of the prefix scan.
pub fn search_order(var: impl Fn(&str) -> Option<String>) -> Vec<Strategy> {
    let mut strategies = Vec::new();
    if let Some(name) = var("MPI_PKG_CONFIG") {
        strategies.push(Strategy::PkgConfig(name));
    }
    strategies.extend(PKG_CONFIG_NAMES.into_iter().map(|name| Strategy::PkgConfig(name.to_string())));
    strategies.push(Strategy::CompilerWrapper(
        var("MPICC").unwrap_or_else(|| "mpicc".to_string()),
    ));
    if let Some(dir) = var("CRAY_MPICH_DIR") {
        strategies.push(Strategy::Cray(dir));
    }
    strategies.extend(COMMON_PREFIXES.into_iter().map(Strategy::Prefix));
    strategies
}

//! Build script for mpi-hello
//!
//! Walks the strategies from `build/mpi_config.rs` until one finds MPI, compiles
//! the C shim in `csrc/` against it and emits the link flags.

#[path = "build/mpi_config.rs"]
mod mpi_config;

use mpi_config::{MpiConfig, Strategy, search_order};
use std::env;
use std::path::Path;
use std::process::Command;

const SHIM_SOURCE: &str = "csrc/mpihello.c";
const SHIM_HEADER: &str = "csrc/mpihello.h";

fn main() {
    println!("cargo:rerun-if-changed={SHIM_SOURCE}");
    println!("cargo:rerun-if-changed={SHIM_HEADER}");
    println!("cargo:rerun-if-changed=build/mpi_config.rs");
    for var in ["MPI_PKG_CONFIG", "MPICC", "CRAY_MPICH_DIR"] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let mpi = locate_mpi();

    let mut shim = cc::Build::new();
    shim.file(SHIM_SOURCE)
        .include("csrc")
        .warnings(true)
        .extra_warnings(true);
    for dir in &mpi.include_paths {
        shim.include(dir);
    }
    if env::var("PROFILE").is_ok_and(|p| p == "release") {
        shim.opt_level(3);
    }
    shim.compile("mpihello");

    for line in mpi.link_directives() {
        println!("{line}");
    }
}

fn locate_mpi() -> MpiConfig {
    for strategy in search_order(|var| env::var(var).ok()) {
        if let Some(config) = try_strategy(&strategy) {
            eprintln!("mpi-hello: using MPI from {strategy}");
            return config;
        }
        eprintln!("mpi-hello: no MPI from {strategy}");
    }

    panic!(
        "No MPI installation found. Install MPICH or Open MPI and then either:\n\
         - set MPI_PKG_CONFIG to its pkg-config name (e.g. 'mpich')\n\
         - put 'mpicc' on PATH, or point MPICC at it\n\
         - set CRAY_MPICH_DIR on Cray systems"
    );
}

fn try_strategy(strategy: &Strategy) -> Option<MpiConfig> {
    match strategy {
        Strategy::PkgConfig(name) => search_pkg_config(name),
        Strategy::CompilerWrapper(mpicc) => search_mpicc(mpicc)
            .map_err(|e| eprintln!("mpi-hello: {e}"))
            .ok(),
        Strategy::Cray(dir) => Some(MpiConfig::from_prefix(Path::new(dir))),
        Strategy::Prefix(prefix) => {
            let prefix = Path::new(prefix);
            prefix
                .join("include/mpi.h")
                .exists()
                .then(|| MpiConfig::from_prefix(prefix))
        }
    }
}

fn search_pkg_config(name: &str) -> Option<MpiConfig> {
    // Linking is emitted by hand so the rpath goes along with it.
    let lib = pkg_config::Config::new()
        .cargo_metadata(false)
        .probe(name)
        .ok()?;

    Some(MpiConfig {
        include_paths: lib.include_paths,
        link_paths: lib.link_paths,
        libs: lib.libs,
        version: Some(lib.version),
    })
}

fn search_mpicc(mpicc: &str) -> Result<MpiConfig, String> {
    // MPICH spells it `-show`; Open MPI accepts it as an alias of `--showme`.
    let output = Command::new(mpicc)
        .arg("-show")
        .output()
        .map_err(|e| format!("cannot run '{mpicc}': {e}"))?;
    if !output.status.success() {
        return Err(format!("'{mpicc} -show' exited with {}", output.status));
    }

    Ok(MpiConfig::from_compiler_flags(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

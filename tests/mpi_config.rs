//! MPI discovery logic used by the build script.

#[allow(dead_code)]
#[path = "../build/mpi_config.rs"]
mod mpi_config;

use mpi_config::{COMMON_PREFIXES, MpiConfig, Strategy, search_order};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn default_search_order() {
    let strategies = search_order(lookup(&[]));

    let mut expected = vec![
        Strategy::PkgConfig("mpich".into()),
        Strategy::PkgConfig("ompi".into()),
        Strategy::PkgConfig("mpi".into()),
        Strategy::CompilerWrapper("mpicc".into()),
    ];
    expected.extend(COMMON_PREFIXES.into_iter().map(Strategy::Prefix));
    assert_eq!(strategies, expected);
}

#[test]
fn environment_overrides_shape_the_order() {
    let strategies = search_order(lookup(&[
        ("MPI_PKG_CONFIG", "mpich-4.2"),
        ("MPICC", "/opt/cray/bin/cc"),
        ("CRAY_MPICH_DIR", "/opt/cray/pe/mpich/8.1"),
    ]));

    assert_eq!(strategies[0], Strategy::PkgConfig("mpich-4.2".into()));
    assert_eq!(strategies[4], Strategy::CompilerWrapper("/opt/cray/bin/cc".into()));
    assert_eq!(strategies[5], Strategy::Cray("/opt/cray/pe/mpich/8.1".into()));
    assert_eq!(strategies[6], Strategy::Prefix("/usr"));
}

#[test]
fn parses_mpich_show_output() {
    let config = MpiConfig::from_compiler_flags(
        "gcc -I/usr/include/x86_64-linux-gnu/mpich -L/usr/lib/x86_64-linux-gnu -lmpich",
    );
    assert_eq!(
        config.include_paths,
        [PathBuf::from("/usr/include/x86_64-linux-gnu/mpich")]
    );
    assert_eq!(config.link_paths, [PathBuf::from("/usr/lib/x86_64-linux-gnu")]);
    assert_eq!(config.libs, ["mpich"]);
    assert_eq!(config.version, None);
}

#[test]
fn wrapper_without_libs_links_libmpi() {
    let config = MpiConfig::from_compiler_flags("cc -I/opt/mpi/include -Wl,--enable-new-dtags");
    assert_eq!(config.libs, ["mpi"]);
}

#[test]
fn prefix_layout() {
    let config = MpiConfig::from_prefix(Path::new("/opt/openmpi"));
    assert_eq!(config.include_paths, [PathBuf::from("/opt/openmpi/include")]);
    assert_eq!(config.link_paths, [PathBuf::from("/opt/openmpi/lib")]);
    assert_eq!(config.libs, ["mpi"]);
}

#[test]
fn link_directives_carry_rpath_and_version() {
    let mut config = MpiConfig::from_prefix(Path::new("/opt/mpich"));
    config.version = Some("4.1.2".into());

    assert_eq!(
        config.link_directives(),
        [
            "cargo:rustc-link-search=native=/opt/mpich/lib",
            "cargo:rustc-link-arg=-Wl,-rpath,/opt/mpich/lib",
            "cargo:rustc-link-lib=mpi",
            "cargo:rustc-env=MPI_VERSION=4.1.2",
        ]
    );
}

#[test]
fn strategies_describe_themselves() {
    assert_eq!(Strategy::PkgConfig("ompi".into()).to_string(), "pkg-config 'ompi'");
    assert_eq!(
        Strategy::CompilerWrapper("mpicc".into()).to_string(),
        "'mpicc -show'"
    );
}

//! Version and build metadata.
//!
//! Commit and build date are taken from `INSTAFIG_GIT_COMMIT` and
//! `INSTAFIG_BUILD_DATE` at compile time when the release build sets them.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    let commit = option_env!("INSTAFIG_GIT_COMMIT").unwrap_or("unknown");
    let built = option_env!("INSTAFIG_BUILD_DATE").unwrap_or("unknown");
    format!("instafig {VERSION} (commit {commit}, built {built})")
}

//! Build script for tubeclock-cli
//!
//! Stamps the build time into the crate so `get_build_info` can report it,
//! as `<date> <time>` (`Jan  5 2025 12:34:56`).

fn main() {
    let timestamp = chrono::Local::now().format("%b %e %Y %H:%M:%S");
    println!("cargo:rustc-env=TUBECLOCK_BUILD_TIMESTAMP={}", timestamp);

    // The firmware version is read with option_env!, so rebuild when it changes.
    println!("cargo:rerun-if-env-changed=TUBECLOCK_FIRMWARE_VERSION");
    println!("cargo:rerun-if-changed=build.rs");
}

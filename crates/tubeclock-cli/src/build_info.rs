//! Firmware identity reported by `get_build_info`.

/// Version reported when none was set at build time.
pub const DEV_VERSION: &str = "DEV_BUILD";

/// Build time, stamped by the build script.
pub const BUILD_TIMESTAMP: &str = env!("TUBECLOCK_BUILD_TIMESTAMP");

/// Firmware version from `TUBECLOCK_FIRMWARE_VERSION` at build time.
pub fn firmware_version() -> &'static str {
    match option_env!("TUBECLOCK_FIRMWARE_VERSION") {
        Some(version) if !version.is_empty() => version,
        _ => DEV_VERSION,
    }
}

/// The `get_build_info` summary.
pub fn summary() -> String {
    format!(
        "Firmware Version: {}, Build Date: {}",
        firmware_version(),
        BUILD_TIMESTAMP
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_names_version_and_date() {
        let text = summary();
        assert!(text.starts_with(&format!("Firmware Version: {}", firmware_version())));
        assert!(text.ends_with(BUILD_TIMESTAMP));
        assert!(!BUILD_TIMESTAMP.is_empty());
    }
}

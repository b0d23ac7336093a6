//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line printed by the binaries, e.g. `0.1.0 (2026-01-31 abc1234)`.
/// Debug builds append the profile: `0.1.0 (2026-01-31 abc1234, debug)`.
pub fn version_string() -> String {
    let pkg = env!("CARGO_PKG_VERSION");
    if BUILD_PROFILE == "release" {
        format!("{pkg} ({BUILD_DATE} {BUILD_COMMIT})")
    } else {
        format!("{pkg} ({BUILD_DATE} {BUILD_COMMIT}, {BUILD_PROFILE})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_constants_present() {
        assert!(!BUILD_COMMIT.is_empty());
        assert!(!BUILD_DATE.is_empty());
        assert!(!BUILD_PROFILE.is_empty());
    }

    #[test]
    fn test_version_string_marks_non_release_builds() {
        let version = version_string();
        assert_eq!(version.ends_with(", debug)"), BUILD_PROFILE == "debug");
    }

    #[test]
    fn test_version_string_contains_package_version() {
        let version = version_string();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains(BUILD_COMMIT));
    }
}

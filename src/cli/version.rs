//! Version information for the songstudio CLI.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Line printed by `songstudio --version`.
pub fn version_string() -> String {
    format!("songstudio {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_version_string() {
        assert!(version_string().starts_with("songstudio "));
        assert!(version_string().ends_with(VERSION));
    }
}

//! Test utilities shared by the crates of the workspace.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Write `contents` to `name` inside `dir` and return the full path.
///
/// # Panics
///
/// Panics if the file cannot be written; intended for test fixtures only.
pub fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_fixture_creates_parent_directories() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "en-US/main.ftl", "hello = Hello\n");

        assert!(path.ends_with("en-US/main.ftl"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello = Hello\n");
    }
}

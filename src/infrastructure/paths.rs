//! Platform locations for configuration and trace files.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "SERVICE_FINDER_HOME";

/// Returns the directory holding `config.toml` and trace files.
///
/// `$SERVICE_FINDER_HOME` wins when set and non-empty; otherwise this is
/// `<platform data dir>/service-finder` (for example
/// `~/.local/share/service-finder` on Linux), falling back to
/// `./.service-finder` on platforms without a data directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_dir().map_or_else(|| PathBuf::from(".service-finder"), |dir| dir.join("service-finder"))
}

/// Default configuration file, `<data dir>/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Default span export file, `<data dir>/trace.jsonl`.
#[must_use]
pub fn default_trace_path() -> PathBuf {
    data_dir().join("trace.jsonl")
}

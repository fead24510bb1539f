//! Configuration loading from environment variables.

use crate::constants::DEFAULT_HISTORY_LIMIT;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for viztly hosts.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Outline file opened at startup, if any.
    pub file_path: Option<PathBuf>,
    /// Directory backing keyed snapshot storage.
    pub storage_dir: PathBuf,
    pub history_limit: usize,
    /// Write a storage snapshot after every session.
    pub autosave: bool,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Default directory for keyed snapshot storage.
pub fn default_storage_dir() -> PathBuf {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache").join("viztly").join("storage")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path: None,
            storage_dir: default_storage_dir(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            file_path: env::var("VIZTLY_FILE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(expand_tilde),
            storage_dir: env::var("VIZTLY_STORAGE_DIR")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_storage_dir()),
            history_limit: env::var("VIZTLY_HISTORY_LIMIT")
                .ok()
                .and_then(|value| value.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
            autosave: env_flag_enabled("VIZTLY_AUTOSAVE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{env_lock, EnvGuard};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_reads_overrides() {
        let _lock = env_lock().lock().expect("env lock");
        let _file = EnvGuard::set("VIZTLY_FILE", "/tmp/outline.txt");
        let _dir = EnvGuard::set("VIZTLY_STORAGE_DIR", "/tmp/viztly-store");
        let _limit = EnvGuard::set("VIZTLY_HISTORY_LIMIT", "12");
        let _autosave = EnvGuard::set("VIZTLY_AUTOSAVE", "yes");

        let config = Config::from_env();
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/outline.txt")));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/viztly-store"));
        assert_eq!(config.history_limit, 12);
        assert!(config.autosave);
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _lock = env_lock().lock().expect("env lock");
        let _file = EnvGuard::remove("VIZTLY_FILE");
        let _limit = EnvGuard::set("VIZTLY_HISTORY_LIMIT", "0");
        let _autosave = EnvGuard::remove("VIZTLY_AUTOSAVE");

        let config = Config::from_env();
        assert_eq!(config.file_path, None);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(!config.autosave);
    }

    #[test]
    fn tilde_paths_expand_against_home() {
        let _lock = env_lock().lock().expect("env lock");
        let _home = EnvGuard::set("HOME", "/home/outliner");
        let _dir = EnvGuard::set("VIZTLY_STORAGE_DIR", "~/notes");

        let config = Config::from_env();
        assert_eq!(config.storage_dir, PathBuf::from("/home/outliner/notes"));
    }
}

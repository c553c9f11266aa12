//! Console configuration.
//!
//! Settings come from three layers, later ones winning:
//! 1. built-in defaults
//! 2. `~/.rusty-console/config.json`, if it exists
//! 3. environment variables (`RUSTY_CONSOLE_SHELL`, `RUSTY_CONSOLE_DIR`,
//!    `RUSTY_CONSOLE_TIMEOUT`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::shell::DEFAULT_SHELL;

pub const ENV_SHELL: &str = "RUSTY_CONSOLE_SHELL";
pub const ENV_DIR: &str = "RUSTY_CONSOLE_DIR";
pub const ENV_TIMEOUT: &str = "RUSTY_CONSOLE_TIMEOUT";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Program invoked as `<shell> -c "<command> && pwd"`.
    pub shell: String,
    /// Starting directory. Defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
    /// Kill commands that run longer than this. No limit when unset.
    pub command_timeout_secs: Option<u64>,
    /// Where log files go. Defaults to `logs/` next to the executable.
    pub log_dir: Option<PathBuf>,
    /// Shown in the window border.
    pub title: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            working_dir: None,
            command_timeout_secs: None,
            log_dir: None,
            title: "RustyConsole".to_string(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".rusty-console").join("config.json")
}

impl ConsoleConfig {
    /// Loads defaults, the config file at the default path and env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&default_config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a JSON config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(shell) = lookup(ENV_SHELL).filter(|s| !s.trim().is_empty()) {
            self.shell = shell;
        }
        if let Some(dir) = lookup(ENV_DIR).filter(|s| !s.trim().is_empty()) {
            self.working_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT} must be a whole number of seconds"))?;
            self.command_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// The directory the session starts in, as an absolute path string.
    pub fn initial_directory(&self) -> Result<String> {
        let dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Working directory does not exist: {}", dir.display()))?;
        Ok(dir.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.shell, "sh");
        assert_eq!(config.command_timeout(), None);
        assert!(config.working_dir.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::from_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "shell": "/bin/bash", "command_timeout_secs": 30 }"#).unwrap();

        let config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.shell, "/bin/bash");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.title, "RustyConsole");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ shell: ").unwrap();
        let err = ConsoleConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConsoleConfig::default();
        config
            .apply_env(env(&[
                (ENV_SHELL, "dash"),
                (ENV_DIR, "/tmp"),
                (ENV_TIMEOUT, "5"),
            ]))
            .unwrap();
        assert_eq!(config.shell, "dash");
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.command_timeout_secs, Some(5));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let mut config = ConsoleConfig {
            command_timeout_secs: Some(10),
            ..Default::default()
        };
        config.apply_env(env(&[(ENV_TIMEOUT, "0")])).unwrap();
        assert_eq!(config.command_timeout(), None);
    }

    #[test]
    fn test_bad_timeout_is_error() {
        let mut config = ConsoleConfig::default();
        assert!(config.apply_env(env(&[(ENV_TIMEOUT, "soon")])).is_err());
    }

    #[test]
    fn test_initial_directory_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig {
            working_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let initial = config.initial_directory().unwrap();
        assert!(Path::new(&initial).is_absolute());
    }
}

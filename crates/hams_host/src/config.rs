//! Adapter configuration.

use crate::error::{HostError, HostResult};
use hams_abi::LevelFilter;
use std::path::{Path, PathBuf};

/// Environment variable naming the native library to load.
pub const LIBRARY_ENV: &str = "HAMS_LIBRARY";

/// Environment variable holding the level filter handed to the library.
pub const LOG_ENV: &str = "HAMS_LOG";

/// Configuration for loading the native library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Path of the shared library, if loading from disk.
    pub library: Option<PathBuf>,

    /// Maximum severity forwarded by the library.
    pub level: LevelFilter,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            library: None,
            level: LevelFilter::Info,
        }
    }
}

impl HostConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the library path.
    #[must_use]
    pub fn library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// Sets the level filter.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Reads `HAMS_LIBRARY` and `HAMS_LOG`, keeping defaults for unset ones.
    pub fn from_env() -> HostResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HostResult<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(LIBRARY_ENV).filter(|p| !p.is_empty()) {
            config.library = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup(LOG_ENV) {
            config.level = level
                .parse()
                .map_err(|e| HostError::InvalidConfig(format!("{LOG_ENV}: {e}")))?;
        }
        Ok(config)
    }

    /// The library path, or an error if none is configured.
    pub fn library_path(&self) -> HostResult<&Path> {
        self.library
            .as_deref()
            .ok_or_else(|| HostError::InvalidConfig(format!("{LIBRARY_ENV} is not set")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn config_default() {
        let config = HostConfig::default();
        assert_eq!(config.library, None);
        assert_eq!(config.level, LevelFilter::Info);
        assert!(matches!(
            config.library_path(),
            Err(HostError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_builder() {
        let config = HostConfig::new()
            .library("/opt/hams/libhams_ffi.so")
            .level(LevelFilter::Debug);
        assert_eq!(
            config.library_path().unwrap(),
            Path::new("/opt/hams/libhams_ffi.so")
        );
        assert_eq!(config.level, LevelFilter::Debug);
    }

    #[test]
    fn config_from_lookup() {
        let config = HostConfig::from_lookup(env(&[
            (LIBRARY_ENV, "target/debug/libhams_ffi.so"),
            (LOG_ENV, "Warn"),
        ]))
        .unwrap();
        assert_eq!(
            config.library.as_deref(),
            Some(Path::new("target/debug/libhams_ffi.so"))
        );
        assert_eq!(config.level, LevelFilter::Warn);

        let config = HostConfig::from_lookup(env(&[(LIBRARY_ENV, "")])).unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn config_bad_level() {
        let err = HostConfig::from_lookup(env(&[(LOG_ENV, "loud")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration: HAMS_LOG"));
    }
}

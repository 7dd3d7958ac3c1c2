//! The native HaMS instance behind an opaque handle.

use crate::config::HamsConfig;
use crate::error::{HamsError, HamsResult};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Lifecycle state of a live instance. FREED instances no longer exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HamsState {
    /// Created by `hams_init`, not running.
    Initialized,
    /// Running since the given instant.
    Started(Instant),
}

/// A HaMS instance.
///
/// State changes are serialised by an internal lock so the same handle may
/// be used from several threads.
#[derive(Debug)]
pub struct Hams {
    config: HamsConfig,
    state: Mutex<HamsState>,
}

impl Hams {
    /// Creates an instance in the INITIALIZED state.
    pub fn new(config: HamsConfig) -> Self {
        info!("Registering HaMS: {}", config.name);
        Self {
            config,
            state: Mutex::new(HamsState::Initialized),
        }
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Instance configuration.
    pub fn config(&self) -> &HamsConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> HamsState {
        *self.state.lock()
    }

    /// Returns true if started.
    pub fn is_running(&self) -> bool {
        matches!(self.state(), HamsState::Started(_))
    }

    /// INITIALIZED → STARTED.
    pub fn start(&self) -> HamsResult<()> {
        let mut state = self.state.lock();
        if let HamsState::Started(_) = *state {
            return Err(HamsError::AlreadyRunning(self.config.name.clone()));
        }
        *state = HamsState::Started(Instant::now());
        drop(state);

        info!(
            name = %self.config.name,
            version = %self.config.version,
            "Started HaMS"
        );
        Ok(())
    }

    /// STARTED → INITIALIZED. Returns how long the instance ran.
    pub fn stop(&self) -> HamsResult<Duration> {
        let mut state = self.state.lock();
        let HamsState::Started(since) = *state else {
            return Err(HamsError::NotRunning(self.config.name.clone()));
        };
        *state = HamsState::Initialized;
        drop(state);

        let uptime = since.elapsed();
        info!(name = %self.config.name, ?uptime, "Stopped HaMS");
        Ok(uptime)
    }
}

impl Drop for Hams {
    fn drop(&mut self) {
        info!("Releasing HaMS: {}", self.config.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_stop_cycle() {
        let hams = Hams::new(HamsConfig::new("cycle"));
        assert_eq!(hams.state(), HamsState::Initialized);

        hams.start().unwrap();
        assert!(hams.is_running());

        hams.stop().unwrap();
        assert_eq!(hams.state(), HamsState::Initialized);

        // Restart after stop is allowed.
        hams.start().unwrap();
        assert!(hams.is_running());
    }

    #[test]
    fn double_start_rejected() {
        let hams = Hams::new(HamsConfig::new("twice"));
        hams.start().unwrap();
        assert!(matches!(hams.start(), Err(HamsError::AlreadyRunning(name)) if name == "twice"));
    }

    #[test]
    fn stop_without_start_rejected() {
        let hams = Hams::new(HamsConfig::new("idle"));
        assert!(matches!(hams.stop(), Err(HamsError::NotRunning(_))));
    }
}

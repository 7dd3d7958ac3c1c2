//! Instance configuration.

/// Configuration for a HaMS instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamsConfig {
    /// Name used to distinguish the instance in logs.
    pub name: String,

    /// Version of the application the instance serves.
    pub version: String,
}

impl Default for HamsConfig {
    fn default() -> Self {
        Self {
            name: "NO_NAME".to_string(),
            version: "UNDEFINED".to_string(),
        }
    }
}

impl HamsConfig {
    /// Creates a configuration with the given name and default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the application version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

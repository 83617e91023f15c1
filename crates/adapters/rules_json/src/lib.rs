//! # haven-adapter-rules-json
//!
//! [`RuleStore`] implementation that persists the ordered automation rule
//! set as a pretty-printed JSON file (`automation_rules.json` by default).
//!
//! A missing file reports `Ok(None)` so the engine can seed the defaults;
//! an unreadable or corrupt file is a [`ConfigError`] and the engine falls
//! back to the defaults without overwriting the file.

use std::future::Future;
use std::path::{Path, PathBuf};

use haven_app::ports::RuleStore;
use haven_domain::error::{ConfigError, HavenError};
use haven_domain::rule::AutomationRule;

/// File-backed rule store.
pub struct JsonRuleStore {
    path: PathBuf,
}

impl JsonRuleStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Vec<AutomationRule>>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let rules = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
                Ok(Some(rules))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn write(&self, rules: &[AutomationRule]) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(rules).map_err(ConfigError::Parse)?;
        std::fs::write(&self.path, content).map_err(ConfigError::Io)
    }
}

impl RuleStore for JsonRuleStore {
    fn load(&self) -> impl Future<Output = Result<Option<Vec<AutomationRule>>, HavenError>> + Send {
        let result = self.read().map_err(HavenError::from);
        async move { result }
    }

    fn save(
        &self,
        rules: &[AutomationRule],
    ) -> impl Future<Output = Result<(), HavenError>> + Send {
        let result = self.write(rules).map_err(HavenError::from);
        async move { result }
    }
}

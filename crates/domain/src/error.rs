//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HavenError`]
//! via `#[from]` (no `String` variants at the top level).

/// Top-level error for the haven workspace.
#[derive(Debug, thiserror::Error)]
pub enum HavenError {
    /// A rule failed domain validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A lookup by identifier found nothing.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A sensor read or actuator write failed.
    #[error("driver error")]
    Driver(#[from] DriverError),

    /// Persisted configuration (rule file) was unreadable or corrupt.
    #[error("config error")]
    Config(#[from] ConfigError),
}

/// Domain-invariant violations detected before a rule enters the system.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The rule name is empty.
    #[error("rule name must not be empty")]
    EmptyName,
    /// The rule has no condition.
    #[error("rule must have a condition")]
    MissingCondition,
    /// The rule has no action.
    #[error("rule must have an action")]
    MissingAction,
    /// A rule with this id is already registered.
    #[error("rule id {0} is already in use")]
    DuplicateId(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Rule"`).
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

/// Sensor/actuator I/O failures. Never fatal: the tick continues with the
/// last known value and failed writes are not reflected in state.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A sensor read failed.
    #[error("sensor read failed: {0}")]
    Sensor(String),
    /// An actuator write failed.
    #[error("actuator write failed: {0}")]
    Actuator(String),
    /// A driver call exceeded the configured deadline.
    #[error("driver call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Rule-file persistence failures. The engine falls back to the default
/// rule set rather than crashing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The rule file exists but could not be read.
    #[error("failed to read rule file")]
    Io(#[from] std::io::Error),
    /// The rule file contents are not valid rules.
    #[error("failed to parse rule file")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_haven_error() {
        let err: HavenError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            HavenError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_convert_not_found_error_into_haven_error() {
        let err: HavenError = NotFoundError {
            entity: "Rule",
            id: "rule9".to_string(),
        }
        .into();
        assert!(matches!(err, HavenError::NotFound(_)));
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Rule",
            id: "rule9".to_string(),
        };
        assert_eq!(err.to_string(), "Rule not found: rule9");
    }

    #[test]
    fn should_convert_io_error_into_config_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from(io);
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

//! Automation rules — condition → action pairs evaluated every tick.
//!
//! Rules are stored and evaluated in insertion order. A later rule may
//! overwrite an earlier rule's effect within the same tick; the net result
//! for a device is whichever rule executed last (last-write-wins).

mod action;
mod condition;

pub use action::{
    Action, AlertCommand, DoorCommand, FanCommand, GarageCommand, LightCommand, LightTarget,
};
pub use condition::{Condition, MotionLocation, Op};

use serde::{Deserialize, Serialize};

use crate::error::{HavenError, ValidationError};
use crate::id::RuleId;

/// A declarative automation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub name: String,
    pub condition: Condition,
    pub action: Action,
    pub active: bool,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::Validation`] when `name` is empty
    /// ([`ValidationError::EmptyName`]).
    pub fn validate(&self) -> Result<(), HavenError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// The built-in default rule set, used when no rule file exists or the
    /// stored rules cannot be read.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                id: RuleId::new("rule1"),
                name: "Temperature Fan Control".to_string(),
                condition: Condition::Temperature {
                    operator: Op::Gt,
                    value: 25.0,
                },
                action: Action::Fan {
                    command: FanCommand::On,
                },
                active: true,
            },
            Self {
                id: RuleId::new("rule2"),
                name: "Motion Light Control".to_string(),
                condition: Condition::Motion {
                    location: MotionLocation::Any,
                    operator: Op::Eq,
                    value: true,
                },
                action: Action::Light {
                    command: LightCommand::On,
                    location: LightTarget::Same,
                },
                active: true,
            },
            Self {
                id: RuleId::new("rule3"),
                name: "Gas Emergency".to_string(),
                condition: Condition::Gas {
                    operator: Op::Eq,
                    value: true,
                },
                action: Action::Alert {
                    command: AlertCommand::Emergency,
                    alert_type: None,
                },
                active: true,
            },
            Self {
                id: RuleId::new("rule4"),
                name: "Garage Door Auto-Close".to_string(),
                condition: Condition::Time {
                    operator: Op::Eq,
                    value: "22:00".to_string(),
                },
                action: Action::Garage {
                    command: GarageCommand::Close,
                },
                active: true,
            },
        ]
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    condition: Option<Condition>,
    action: Option<Action>,
    active: Option<bool>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// Generates a fresh id when none was provided.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::Validation`] if required fields are missing or
    /// the name is empty.
    pub fn build(self) -> Result<AutomationRule, HavenError> {
        let condition = self.condition.ok_or(ValidationError::MissingCondition)?;
        let action = self.action.ok_or(ValidationError::MissingAction)?;
        let rule = AutomationRule {
            id: self.id.unwrap_or_else(RuleId::generate),
            name: self.name.unwrap_or_default(),
            condition,
            action,
            active: self.active.unwrap_or(true),
        };
        rule.validate()?;
        Ok(rule)
    }
}

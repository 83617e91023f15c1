//! Rule CRUD — manage the ordered automation rule set.
//!
//! Rules are held in memory in insertion order (which is also evaluation
//! order) and rewritten to the rule store on every successful mutation.
//! Startup loads the stored rules; a missing store is seeded with the
//! defaults, a corrupt one falls back to them without overwriting the file.

use haven_domain::error::{HavenError, NotFoundError, ValidationError};
use haven_domain::id::RuleId;
use haven_domain::rule::AutomationRule;

use crate::controller::Controller;
use crate::ports::{ActuatorDriver, RuleStore, SensorDriver};

impl<S, A, R> Controller<S, A, R>
where
    S: SensorDriver,
    A: ActuatorDriver,
    R: RuleStore,
{
    /// Replace the built-in rules with the persisted rule set.
    ///
    /// Never fails: a missing store is seeded with the defaults, and an
    /// unreadable or corrupt one is logged and falls back to the defaults
    /// for this run.
    pub async fn load_rules(&self) {
        let mut guard = self.inner.lock().await;
        match self.rule_store.load().await {
            Ok(Some(rules)) => {
                tracing::info!(count = rules.len(), "loaded automation rules");
                guard.rules = rules;
            }
            Ok(None) => {
                tracing::info!("no stored rules; seeding defaults");
                guard.rules = AutomationRule::defaults();
                self.persist(&guard.rules).await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load rules; using defaults");
                guard.rules = AutomationRule::defaults();
            }
        }
    }

    /// All rules, in evaluation order.
    pub async fn list_rules(&self) -> Vec<AutomationRule> {
        self.inner.lock().await.rules.clone()
    }

    /// Look up a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::NotFound`] when no rule with `id` exists.
    pub async fn get_rule(&self, id: &RuleId) -> Result<AutomationRule, HavenError> {
        self.inner
            .lock()
            .await
            .rules
            .iter()
            .find(|rule| &rule.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Append a new rule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::Validation`] when the rule is invalid or its
    /// id collides with an existing rule.
    #[tracing::instrument(skip(self, rule), fields(rule_name = %rule.name))]
    pub async fn add_rule(&self, rule: AutomationRule) -> Result<RuleId, HavenError> {
        rule.validate()?;
        let mut guard = self.inner.lock().await;
        if guard.rules.iter().any(|existing| existing.id == rule.id) {
            return Err(ValidationError::DuplicateId(rule.id.to_string()).into());
        }
        let id = rule.id.clone();
        guard.rules.push(rule);
        self.persist(&guard.rules).await;
        Ok(id)
    }

    /// Replace an existing rule wholesale, preserving its id.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::Validation`] when the replacement is invalid,
    /// or [`HavenError::NotFound`] when no rule with `id` exists.
    #[tracing::instrument(skip(self, rule))]
    pub async fn update_rule(
        &self,
        id: &RuleId,
        mut rule: AutomationRule,
    ) -> Result<(), HavenError> {
        rule.id = id.clone();
        rule.validate()?;
        let mut guard = self.inner.lock().await;
        let slot = guard
            .rules
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = rule;
        self.persist(&guard.rules).await;
        Ok(())
    }

    /// Delete a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::NotFound`] when no rule with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: &RuleId) -> Result<(), HavenError> {
        let mut guard = self.inner.lock().await;
        let position = guard
            .rules
            .iter()
            .position(|rule| &rule.id == id)
            .ok_or_else(|| not_found(id))?;
        guard.rules.remove(position);
        self.persist(&guard.rules).await;
        Ok(())
    }

    /// Enable or disable a rule. With `active = None` the current state is
    /// flipped. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`HavenError::NotFound`] when no rule with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_rule(
        &self,
        id: &RuleId,
        active: Option<bool>,
    ) -> Result<bool, HavenError> {
        let mut guard = self.inner.lock().await;
        let rule = guard
            .rules
            .iter_mut()
            .find(|rule| &rule.id == id)
            .ok_or_else(|| not_found(id))?;
        rule.active = active.unwrap_or(!rule.active);
        let new_state = rule.active;
        self.persist(&guard.rules).await;
        Ok(new_state)
    }

    /// Rewrite the stored rule set. A failed save keeps the in-memory
    /// mutation and is only logged: the running rule set did change.
    async fn persist(&self, rules: &[AutomationRule]) {
        if let Err(err) = self.rule_store.save(rules).await {
            tracing::warn!(error = %err, "failed to persist automation rules");
        }
    }
}

fn not_found(id: &RuleId) -> HavenError {
    NotFoundError {
        entity: "Rule",
        id: id.to_string(),
    }
    .into()
}

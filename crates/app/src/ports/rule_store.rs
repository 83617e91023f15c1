//! Rule store port — persistence for the ordered automation rule set.

use std::future::Future;

use haven_domain::error::HavenError;
use haven_domain::rule::AutomationRule;

/// Persists the full rule list, preserving order.
pub trait RuleStore: Send + Sync {
    /// Load the stored rules.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet, so the caller
    /// can seed and persist the default rule set. A corrupt or unreadable
    /// store is an error; the caller falls back to defaults without
    /// overwriting the store.
    fn load(&self) -> impl Future<Output = Result<Option<Vec<AutomationRule>>, HavenError>> + Send;

    /// Replace the stored rules with the given list.
    fn save(
        &self,
        rules: &[AutomationRule],
    ) -> impl Future<Output = Result<(), HavenError>> + Send;
}

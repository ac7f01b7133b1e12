//! Named guards and actions used to reattach behavior to loaded tables.

use super::error::SerializationError;
use crate::core::{Action, Event, Guard, State};
use crate::engine::TransitionTable;
use std::collections::HashMap;

/// Lookup of guards and actions by id.
///
/// Serialized tables only carry ids; loading a table resolves each id
/// against a registry. Every id must resolve.
///
/// # Example
///
/// ```rust
/// use domain_fsm::serialization::Registry;
///
/// struct Document {
///     sign_required: bool,
///     sent: bool,
/// }
///
/// let registry = Registry::new()
///     .guard("signRequired", |doc: &Document| doc.sign_required)
///     .action("send", |doc: &mut Document| doc.sent = true);
///
/// assert!(registry.resolve_guard("signRequired").is_ok());
/// assert!(registry.resolve_action("archive").is_err());
/// ```
pub struct Registry<D> {
    guards: HashMap<String, Guard<D>>,
    actions: HashMap<String, Action<D>>,
}

impl<D: 'static> Registry<D> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Collect every named guard and action of an existing table.
    pub fn from_table<S: State, E: Event>(table: &TransitionTable<S, E, D>) -> Self {
        let mut registry = Self::new();
        for transition in table.transitions() {
            let target = &transition.to;
            for guard in &target.conditions {
                if let Some(id) = guard.id() {
                    registry.guards.insert(id.to_string(), guard.clone());
                }
            }
            for action in target.actions.iter().chain(&target.post_actions) {
                if let Some(id) = action.id() {
                    registry.actions.insert(id.to_string(), action.clone());
                }
            }
        }
        registry
    }

    pub fn guard<F>(self, id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.insert_guard(id, Guard::new(predicate))
    }

    pub fn action<F>(self, id: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.insert_action(id, Action::new(procedure))
    }

    /// Register a prebuilt guard under `id`, replacing any previous one.
    pub fn insert_guard(mut self, id: impl Into<String>, guard: Guard<D>) -> Self {
        let id = id.into();
        self.guards.insert(id.clone(), guard.with_id(id));
        self
    }

    /// Register a prebuilt action under `id`, replacing any previous one.
    pub fn insert_action(mut self, id: impl Into<String>, action: Action<D>) -> Self {
        let id = id.into();
        self.actions.insert(id.clone(), action.with_id(id));
        self
    }

    pub fn resolve_guard(&self, id: &str) -> Result<Guard<D>, SerializationError> {
        self.guards
            .get(id)
            .cloned()
            .ok_or_else(|| SerializationError::UnknownGuard(id.to_string()))
    }

    pub fn resolve_action(&self, id: &str) -> Result<Action<D>, SerializationError> {
        self.actions
            .get(id)
            .cloned()
            .ok_or_else(|| SerializationError::UnknownAction(id.to_string()))
    }
}

impl<D: 'static> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}

//! Builder for constructing single transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Event, Guard, State};
use crate::engine::{Target, Transition};

/// Builder for constructing transitions with a fluent API.
///
/// Useful when transitions are assembled programmatically and handed to
/// [`TransitionTableBuilder::add_transition`](crate::builder::TransitionTableBuilder::add_transition).
pub struct TransitionBuilder<S, E, D> {
    from: Option<S>,
    to: Option<S>,
    event: Option<E>,
    conditions: Vec<Guard<D>>,
    actions: Vec<Action<D>>,
    post_actions: Vec<Action<D>>,
}

impl<S: State, E: Event, D: 'static> TransitionBuilder<S, E, D> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            event: None,
            conditions: Vec::new(),
            actions: Vec::new(),
            post_actions: Vec::new(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the triggering event. Leave unset for an auto transition.
    pub fn on_event(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn condition<F>(self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<D>) -> Self {
        self.conditions.push(guard);
        self
    }

    pub fn action<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.perform(Action::new(procedure))
    }

    pub fn perform(mut self, action: Action<D>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn post_action<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.post_perform(Action::new(procedure))
    }

    pub fn post_perform(mut self, action: Action<D>) -> Self {
        self.post_actions.push(action);
        self
    }

    pub fn has_event(&self) -> bool {
        self.event.is_some()
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, E, D>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition::new(
            from,
            self.event,
            Target {
                state: to,
                conditions: self.conditions,
                actions: self.actions,
                post_actions: self.post_actions,
            },
        ))
    }
}

impl<S: State, E: Event, D: 'static> Default for TransitionBuilder<S, E, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
        final: [Complete, Failed]
    }

    struct Task {
        ready: bool,
        touched: u32,
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = TransitionBuilder::<TestState, String, Task>::new()
            .from(TestState::Initial)
            .build();

        assert!(matches!(result, Err(BuildError::MissingToState)));

        let result = TransitionBuilder::<TestState, String, Task>::new()
            .to(TestState::Processing)
            .build();

        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn event_is_optional() {
        let builder = TransitionBuilder::<TestState, String, Task>::new()
            .from(TestState::Processing)
            .to(TestState::Complete);
        assert!(!builder.has_event());

        let transition = builder.build().unwrap();
        assert!(transition.event.is_none());
    }

    #[test]
    fn transition_builder_with_guard() {
        let transition = TransitionBuilder::<TestState, String, Task>::new()
            .from(TestState::Initial)
            .to(TestState::Processing)
            .on_event("START".to_string())
            .condition(|task: &Task| task.ready)
            .build()
            .unwrap();

        assert!(!transition.is_unconditional());
        assert!(transition
            .accepts(&Task {
                ready: true,
                touched: 0
            })
            .unwrap());
        assert!(!transition
            .accepts(&Task {
                ready: false,
                touched: 0
            })
            .unwrap());
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = TransitionBuilder::<TestState, String, Task>::new()
            .from(TestState::Processing)
            .to(TestState::Failed)
            .on_event("FAIL".to_string())
            .action(|task: &mut Task| task.touched += 1)
            .post_action(|task: &mut Task| task.touched += 10)
            .build()
            .unwrap();

        assert_eq!(transition.from, TestState::Processing);
        assert_eq!(transition.to.state, TestState::Failed);
        assert_eq!(transition.event.as_deref(), Some("FAIL"));
        assert_eq!(transition.to.actions.len(), 1);
        assert_eq!(transition.to.post_actions.len(), 1);
    }
}

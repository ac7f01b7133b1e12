//! Transitions and the errors raised while firing them.

use crate::core::{Action, BoxError, Event, Guard, State};
use std::fmt;

/// Errors that can occur while handling events.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// No transition is declared for the pair, or every candidate's guard rejected.
    #[error("No transition from state '{state}' on event '{event}'")]
    NoTransitionFound { state: String, event: String },

    #[error("No transition from state '{from}' to state '{to}'")]
    NoTransitionToState { from: String, to: String },

    #[error("{candidates} transitions from state '{from}' to state '{to}' are eligible")]
    AmbiguousTransition {
        from: String,
        to: String,
        candidates: usize,
    },

    #[error("Guard '{guard}' failed")]
    GuardFailed { guard: String, source: BoxError },

    #[error("Action '{action}' failed")]
    ActionFailed { action: String, source: BoxError },

    #[error("Auto transition limit ({limit}) reached in state '{state}'")]
    AutoTransitionLimit { state: String, limit: usize },
}

impl TransitionError {
    /// True for the expected "event does not apply right now" outcomes.
    pub fn is_no_transition(&self) -> bool {
        matches!(
            self,
            Self::NoTransitionFound { .. } | Self::NoTransitionToState { .. }
        )
    }
}

/// Target side of a transition: the state to enter plus the guards and
/// actions that go with it.
///
/// `Target` doubles as the branch type of switch-style declarations where
/// several targets share one source state and event.
///
/// # Example
///
/// ```rust
/// use domain_fsm::engine::Target;
///
/// struct Document {
///     sign_required: bool,
/// }
///
/// let auto_sent: Target<String, Document> =
///     Target::new("AUTO_SENT".to_string()).condition(|doc: &Document| doc.sign_required);
/// let canceled: Target<String, Document> = Target::new("CANCELED".to_string());
///
/// assert!(auto_sent.is_guarded());
/// assert!(!canceled.is_guarded());
/// ```
pub struct Target<S, D> {
    pub state: S,
    pub conditions: Vec<Guard<D>>,
    pub actions: Vec<Action<D>>,
    pub post_actions: Vec<Action<D>>,
}

impl<S: State, D: 'static> Target<S, D> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            conditions: Vec::new(),
            actions: Vec::new(),
            post_actions: Vec::new(),
        }
    }

    /// Add a guard using a closure.
    pub fn condition<F>(self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    pub fn guard(mut self, guard: Guard<D>) -> Self {
        self.conditions.push(guard);
        self
    }

    /// Add an action using a closure.
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
}

impl<S, D> Target<S, D> {
    pub fn is_guarded(&self) -> bool {
        !self.conditions.is_empty()
    }
}

impl<S: Clone, D> Clone for Target<S, D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            conditions: self.conditions.clone(),
            actions: self.actions.clone(),
            post_actions: self.post_actions.clone(),
        }
    }
}

impl<S: fmt::Debug, D> fmt::Debug for Target<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("state", &self.state)
            .field("conditions", &self.conditions)
            .field("actions", &self.actions)
            .field("post_actions", &self.post_actions)
            .finish()
    }
}

/// An edge of the transition table.
///
/// A transition without an event is an auto transition: it can only fire
/// right after another transition, when auto transitions are enabled.
pub struct Transition<S, E, D> {
    pub from: S,
    pub event: Option<E>,
    pub to: Target<S, D>,
}

impl<S: State, E: Event, D> Transition<S, E, D> {
    pub fn new(from: S, event: Option<E>, to: Target<S, D>) -> Self {
        Self { from, event, to }
    }

    /// A transition with no guards matches every domain object.
    pub fn is_unconditional(&self) -> bool {
        !self.to.is_guarded()
    }

    /// Evaluate all guards in declaration order.
    ///
    /// Stops at the first guard that rejects or fails.
    pub fn accepts(&self, domain: &D) -> Result<bool, TransitionError> {
        for guard in &self.to.conditions {
            let accepted = guard
                .check(domain)
                .map_err(|source| TransitionError::GuardFailed {
                    guard: guard.to_string(),
                    source,
                })?;
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(crate) fn run_actions(&self, domain: &mut D) -> Result<(), TransitionError> {
        run_all(&self.to.actions, domain)
    }

    pub(crate) fn run_post_actions(&self, domain: &mut D) -> Result<(), TransitionError> {
        run_all(&self.to.post_actions, domain)
    }

    pub(crate) fn event_name(&self) -> &str {
        self.event.as_ref().map_or("<auto>", |event| event.name())
    }
}

fn run_all<D>(actions: &[Action<D>], domain: &mut D) -> Result<(), TransitionError> {
    for action in actions {
        action
            .run(domain)
            .map_err(|source| TransitionError::ActionFailed {
                action: action.to_string(),
                source,
            })?;
    }
    Ok(())
}

impl<S: Clone, E: Clone, D> Clone for Transition<S, E, D> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            event: self.event.clone(),
            to: self.to.clone(),
        }
    }
}

impl<S: fmt::Debug, E: fmt::Debug, D> fmt::Debug for Transition<S, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("to", &self.to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Start,
            Middle,
            End,
        }
        final: [End]
    }

    #[derive(Default)]
    struct Doc {
        approved: bool,
        log: Vec<&'static str>,
    }

    fn transition(to: Target<TestState, Doc>) -> Transition<TestState, String, Doc> {
        Transition::new(TestState::Start, Some("GO".to_string()), to)
    }

    #[test]
    fn unguarded_transition_accepts_everything() {
        let t = transition(Target::new(TestState::Middle));

        assert!(t.is_unconditional());
        assert!(t.accepts(&Doc::default()).unwrap());
    }

    #[test]
    fn all_guards_must_accept() {
        let t = transition(
            Target::new(TestState::Middle)
                .condition(|_| true)
                .condition(|doc: &Doc| doc.approved),
        );

        assert!(!t.accepts(&Doc::default()).unwrap());
        assert!(t
            .accepts(&Doc {
                approved: true,
                ..Doc::default()
            })
            .unwrap());
    }

    #[test]
    fn guard_evaluation_short_circuits() {
        let t = transition(
            Target::new(TestState::Middle)
                .condition(|_| false)
                .guard(Guard::fallible(|_: &Doc| Err("must not run".into()))),
        );

        assert!(!t.accepts(&Doc::default()).unwrap());
    }

    #[test]
    fn failing_guard_is_reported_by_name() {
        let t = transition(
            Target::new(TestState::Middle)
                .guard(Guard::fallible(|_: &Doc| Err("db down".into())).with_id("isApproved")),
        );

        let err = t.accepts(&Doc::default()).unwrap_err();
        assert!(matches!(err, TransitionError::GuardFailed { ref guard, .. } if guard == "isApproved"));
        assert!(!err.is_no_transition());
    }

    #[test]
    fn actions_run_in_declaration_order() {
        let t = transition(
            Target::new(TestState::Middle)
                .action(|doc: &mut Doc| doc.log.push("first"))
                .action(|doc: &mut Doc| doc.log.push("second"))
                .post_action(|doc: &mut Doc| doc.log.push("post")),
        );
        let mut doc = Doc::default();

        t.run_actions(&mut doc).unwrap();
        t.run_post_actions(&mut doc).unwrap();

        assert_eq!(doc.log, vec!["first", "second", "post"]);
    }

    #[test]
    fn failing_action_stops_the_chain() {
        let t = transition(
            Target::new(TestState::Middle)
                .perform(Action::fallible(|_: &mut Doc| Err("smtp timeout".into())))
                .action(|doc: &mut Doc| doc.log.push("unreachable")),
        );
        let mut doc = Doc::default();

        let err = t.run_actions(&mut doc).unwrap_err();

        assert!(matches!(err, TransitionError::ActionFailed { .. }));
        assert!(doc.log.is_empty());
    }

    #[test]
    fn auto_transition_has_placeholder_event_name() {
        let t: Transition<TestState, String, Doc> =
            Transition::new(TestState::Middle, None, Target::new(TestState::End));
        assert_eq!(t.event_name(), "<auto>");
    }
}

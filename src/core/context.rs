//! The state-carrying side of a domain object.

use super::state::State;
use serde::{Deserialize, Serialize};

/// Capability a domain object exposes to the engine.
///
/// The engine reads the current state, evaluates guards and actions
/// against the whole object, and writes the target state back. Business
/// fields stay opaque; only guard and action closures look at them.
///
/// # Example
///
/// ```rust
/// use domain_fsm::core::StateContext;
///
/// struct Invoice {
///     state: String,
///     amount: u64,
/// }
///
/// impl StateContext<String> for Invoice {
///     fn state(&self) -> &String {
///         &self.state
///     }
///
///     fn set_state(&mut self, state: String) {
///         self.state = state;
///     }
/// }
/// ```
pub trait StateContext<S: State> {
    /// Current state of the object.
    fn state(&self) -> &S;

    /// Overwrite the current state.
    fn set_state(&mut self, state: S);
}

/// Minimal context holding nothing but a state.
///
/// Used by [`Fsm`](crate::engine::Fsm) when a machine tracks a bare state
/// rather than a domain object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context<S> {
    state: S,
}

impl<S: State> Context<S> {
    pub fn new(state: S) -> Self {
        Self { state }
    }
}

impl<S: State> StateContext<S> for Context<S> {
    fn state(&self) -> &S {
        &self.state
    }

    fn set_state(&mut self, state: S) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_reads_and_writes_state() {
        let mut context = Context::new("NEW".to_string());
        assert_eq!(context.state(), "NEW");

        context.set_state("DONE".to_string());
        assert_eq!(context.state(), "DONE");
    }
}

//! Build errors for transition tables and transitions.

use thiserror::Error;

/// Errors that can occur when building transition tables and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Unexpected call to .{call}() in {scope} scope")]
    UnexpectedCall { call: &'static str, scope: &'static str },

    #[error(".end() called without an open .to() scope")]
    UnmatchedEnd,

    #[error(".end_multiple() called without an open .to_multiple() scope")]
    UnmatchedEndMultiple,

    #[error("Scope {scope} is still open. Close it with .end() or .end_multiple() before .build()")]
    UnclosedScope { scope: &'static str },

    #[error("Event for transitions from '{from}' is already set on the source scope")]
    EventAlreadySet { from: String },

    #[error("Group of transitions from '{from}' declares no targets")]
    EmptyGroup { from: String },

    #[error("Transition from '{from}' to '{to}' has no event. Call .on_event(event) or enable auto transitions")]
    MissingEvent { from: String, to: String },

    #[error("Transition from '{from}' on '{event}' to '{to}' is declared twice")]
    DuplicateTransition {
        from: String,
        event: String,
        to: String,
    },

    #[error("Transition from '{from}' on '{event}' to '{to}' follows an unconditional sibling and can never fire")]
    UnreachableTransition {
        from: String,
        event: String,
        to: String,
    },

    #[error("Transition table is invalid ({} problems)", .0.len())]
    Invalid(Vec<BuildError>),
}

impl BuildError {
    /// All violations carried by this error, flattening `Invalid`.
    pub fn violations(&self) -> Vec<&BuildError> {
        match self {
            Self::Invalid(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

//! Open scopes of the table builder grammar.

use crate::core::{Event, State};
use crate::engine::{Target, Transition};

/// Source state opened with `.from()`, plus the event shared by its
/// transitions when `.on_event()` was called on the source scope.
pub(crate) struct Source<S, E> {
    pub(crate) from: S,
    pub(crate) event: Option<E>,
}

/// Transition under construction between `.to()` and `.end()`.
pub(crate) struct Draft<S, E, D> {
    pub(crate) event: Option<E>,
    pub(crate) target: Target<S, D>,
}

pub(crate) enum Scope<S, E, D> {
    Root,
    From(Source<S, E>),
    Group {
        source: Source<S, E>,
        declared: usize,
    },
    To {
        source: Source<S, E>,
        draft: Draft<S, E, D>,
        /// Number of targets already declared when inside `.to_multiple()`.
        group: Option<usize>,
    },
}

impl<S: State, E: Event, D> Scope<S, E, D> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Root => "table",
            Self::From(_) => "from",
            Self::Group { .. } => "to_multiple",
            Self::To { .. } => "to",
        }
    }
}

impl<S: State, E: Event, D> Draft<S, E, D> {
    /// Close the draft, inheriting the source event when none was set.
    pub(crate) fn finish(self, source: &Source<S, E>) -> Transition<S, E, D> {
        let event = self.event.or_else(|| source.event.clone());
        Transition::new(source.from.clone(), event, self.target)
    }
}

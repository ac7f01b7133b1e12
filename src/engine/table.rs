//! Immutable transition table.

use crate::builder::TransitionTableBuilder;
use crate::core::{Context, Event, State, StateContext};
use crate::engine::fsm::{DomainFsm, Fsm};
use crate::engine::transition::{Transition, TransitionError};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// Mapping from source state and event to ordered candidate transitions.
///
/// Built once through [`TransitionTableBuilder`] and never mutated
/// afterwards. Candidates sharing a source state and event are evaluated
/// in declaration order; the first one whose guards accept wins.
pub struct TransitionTable<S, E, D> {
    transitions: Vec<Transition<S, E, D>>,
    by_state: HashMap<S, Vec<usize>>,
    auto_transitions: bool,
    max_auto_transitions: usize,
}

impl<S: State, E: Event, D: 'static> TransitionTable<S, E, D> {
    pub(crate) fn new(
        transitions: Vec<Transition<S, E, D>>,
        auto_transitions: bool,
        max_auto_transitions: usize,
    ) -> Self {
        let mut by_state: HashMap<S, Vec<usize>> = HashMap::new();
        for (index, transition) in transitions.iter().enumerate() {
            by_state
                .entry(transition.from.clone())
                .or_default()
                .push(index);
        }

        Self {
            transitions,
            by_state,
            auto_transitions,
            max_auto_transitions,
        }
    }

    /// Start declaring a table.
    pub fn builder() -> TransitionTableBuilder<S, E, D> {
        TransitionTableBuilder::new()
    }

    /// All transitions in declaration order.
    pub fn transitions(&self) -> &[Transition<S, E, D>] {
        &self.transitions
    }

    /// Whether event-less transitions fire automatically after a transition.
    pub fn auto_transitions_enabled(&self) -> bool {
        self.auto_transitions
    }

    pub fn max_auto_transitions(&self) -> usize {
        self.max_auto_transitions
    }

    /// Every transition leaving `state`, in declaration order.
    pub fn outgoing<'a>(&'a self, state: &S) -> impl Iterator<Item = &'a Transition<S, E, D>> + 'a {
        self.by_state
            .get(state)
            .into_iter()
            .flatten()
            .map(move |&index| &self.transitions[index])
    }

    /// Ordered candidates for a state and event (`None` selects auto transitions).
    pub fn candidates<'a, Q>(
        &'a self,
        state: &S,
        event: Option<&'a Q>,
    ) -> impl Iterator<Item = &'a Transition<S, E, D>> + 'a
    where
        E: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.outgoing(state)
            .filter(move |t| triggered_by(t, event))
    }

    /// States referenced as source or target, in order of first appearance.
    pub fn states(&self) -> Vec<&S> {
        let mut seen = HashSet::new();
        self.transitions
            .iter()
            .flat_map(|t| [&t.from, &t.to.state])
            .filter(|state| seen.insert(*state))
            .collect()
    }

    /// Events used by the table, in order of first appearance.
    pub fn events(&self) -> Vec<&E> {
        let mut seen = HashSet::new();
        self.transitions
            .iter()
            .filter_map(|t| t.event.as_ref())
            .filter(|event| seen.insert(*event))
            .collect()
    }
}

impl<S: State, E: Event, D: StateContext<S> + 'static> TransitionTable<S, E, D> {
    /// Wrap the table into a reusable engine handle.
    pub fn into_domain_fsm(self) -> DomainFsm<S, E, D> {
        DomainFsm::new(Arc::new(self))
    }

    /// Select the transition `event` triggers for the domain object.
    ///
    /// Fails with [`TransitionError::NoTransitionFound`] when nothing is
    /// declared for the pair or every candidate's guards reject.
    pub fn transition_for_event<Q>(
        &self,
        domain: &D,
        event: &Q,
    ) -> Result<&Transition<S, E, D>, TransitionError>
    where
        E: Borrow<Q>,
        Q: Eq + ToOwned<Owned = E> + ?Sized,
    {
        let state = domain.state();
        let candidates = self
            .outgoing(state)
            .filter(|t| triggered_by(t, Some(event)));
        match first_accepting(domain, candidates)? {
            Some(transition) => Ok(transition),
            None => {
                let event: E = ToOwned::to_owned(event);
                debug!(
                    state = state.name(),
                    event = event.name(),
                    "no transition applies"
                );
                Err(TransitionError::NoTransitionFound {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                })
            }
        }
    }

    /// First event-less transition from the current state whose guards accept.
    pub fn auto_transition(
        &self,
        domain: &D,
    ) -> Result<Option<&Transition<S, E, D>>, TransitionError> {
        first_accepting(domain, self.candidates::<E>(domain.state(), None))
    }

    /// The single transition leading from the current state to `target`.
    ///
    /// Events are ignored; guards still apply. More than one eligible
    /// transition is reported as ambiguous instead of picking one.
    pub fn transition_to_state(
        &self,
        domain: &D,
        target: &S,
    ) -> Result<&Transition<S, E, D>, TransitionError> {
        let state = domain.state();
        let mut eligible = Vec::new();
        for transition in self.outgoing(state).filter(|t| &t.to.state == target) {
            if transition.accepts(domain)? {
                eligible.push(transition);
            }
        }

        match eligible.as_slice() {
            [transition] => Ok(*transition),
            [] => Err(TransitionError::NoTransitionToState {
                from: state.name().to_string(),
                to: target.name().to_string(),
            }),
            _ => Err(TransitionError::AmbiguousTransition {
                from: state.name().to_string(),
                to: target.name().to_string(),
                candidates: eligible.len(),
            }),
        }
    }
}

impl<S: State, E: Event> TransitionTable<S, E, Context<S>> {
    /// Create a self-contained machine starting in `initial`.
    pub fn into_fsm(self, initial: S) -> Fsm<S, E, Context<S>> {
        Fsm::new(Context::new(initial), Arc::new(self))
    }
}

fn triggered_by<S, E, D, Q>(transition: &Transition<S, E, D>, event: Option<&Q>) -> bool
where
    E: Borrow<Q>,
    Q: Eq + ?Sized,
{
    transition.event.as_ref().map(|e| Borrow::<Q>::borrow(e)) == event
}

fn first_accepting<'a, S, E, D>(
    domain: &D,
    candidates: impl Iterator<Item = &'a Transition<S, E, D>>,
) -> Result<Option<&'a Transition<S, E, D>>, TransitionError>
where
    S: State,
    E: Event,
    D: 'a,
{
    for transition in candidates {
        if transition.accepts(domain)? {
            return Ok(Some(transition));
        }
        trace!(
            from = transition.from.name(),
            to = transition.to.state.name(),
            event = transition.event_name(),
            "guard rejected candidate"
        );
    }
    Ok(None)
}

impl<S: Clone, E: Clone, D> Clone for TransitionTable<S, E, D> {
    fn clone(&self) -> Self {
        Self {
            transitions: self.transitions.clone(),
            by_state: self.by_state.clone(),
            auto_transitions: self.auto_transitions,
            max_auto_transitions: self.max_auto_transitions,
        }
    }
}

impl<S: std::fmt::Debug, E: std::fmt::Debug, D> std::fmt::Debug for TransitionTable<S, E, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("transitions", &self.transitions)
            .field("auto_transitions", &self.auto_transitions)
            .field("max_auto_transitions", &self.max_auto_transitions)
            .finish()
    }
}

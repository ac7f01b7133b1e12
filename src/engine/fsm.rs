//! Runtime handles that fire transitions.

use crate::core::{Event, State, StateContext};
use crate::engine::table::TransitionTable;
use crate::engine::transition::{Transition, TransitionError};
use std::borrow::Borrow;
use std::sync::Arc;
use tracing::{debug, trace};

/// Receives a notification after every state write.
///
/// Implemented for closures taking `(domain, old_state, new_state)`.
pub trait StateChangeListener<S, D>: Send + Sync {
    fn on_state_changed(&self, domain: &D, old: &S, new: &S);
}

impl<S, D, F> StateChangeListener<S, D> for F
where
    F: Fn(&D, &S, &S) + Send + Sync,
{
    fn on_state_changed(&self, domain: &D, old: &S, new: &S) {
        self(domain, old, new)
    }
}

/// Handle returned when a listener is attached; used to detach it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listeners<S, D> {
    next_id: u64,
    entries: Vec<(ListenerId, Arc<dyn StateChangeListener<S, D>>)>,
}

impl<S, D> Listeners<S, D> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, listener: Arc<dyn StateChangeListener<S, D>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    fn notify(&self, domain: &D, old: &S, new: &S) {
        for (id, listener) in &self.entries {
            trace!(listener = id.0, "notifying state change listener");
            listener.on_state_changed(domain, old, new);
        }
    }
}

impl<S, D> Clone for Listeners<S, D> {
    fn clone(&self) -> Self {
        Self {
            next_id: self.next_id,
            entries: self.entries.clone(),
        }
    }
}

/// Engine handle binding one transition table to `handle`.
///
/// The handle keeps no per-call state. Domain objects are passed in on
/// every call, so one handle serves any number of objects, from any number
/// of threads. Calls against the *same* object must be serialized by the
/// caller.
///
/// # Example
///
/// ```rust
/// use domain_fsm::builder::TransitionTableBuilder;
/// use domain_fsm::core::StateContext;
/// use domain_fsm::state_enum;
///
/// state_enum! {
///     pub enum DocState {
///         New,
///         Ready,
///         Done,
///     }
///     final: [Done]
/// }
///
/// struct Document {
///     state: DocState,
/// }
///
/// impl StateContext<DocState> for Document {
///     fn state(&self) -> &DocState {
///         &self.state
///     }
///
///     fn set_state(&mut self, state: DocState) {
///         self.state = state;
///     }
/// }
///
/// let fsm = TransitionTableBuilder::<DocState, String, Document>::new()
///     .from(DocState::New).to(DocState::Ready).on_event("TO_READY".to_string()).end()
///     .from(DocState::Ready).to(DocState::Done).on_event("TO_END".to_string()).end()
///     .build()
///     .unwrap()
///     .into_domain_fsm();
///
/// let mut doc = Document { state: DocState::New };
/// fsm.handle(&mut doc, "TO_READY").unwrap();
/// assert_eq!(doc.state, DocState::Ready);
///
/// let err = fsm.handle(&mut doc, "TO_READY").unwrap_err();
/// assert!(err.is_no_transition());
/// assert_eq!(doc.state, DocState::Ready);
/// ```
pub struct DomainFsm<S, E, D> {
    table: Arc<TransitionTable<S, E, D>>,
    auto_transitions: bool,
    listeners: Listeners<S, D>,
}

impl<S: State, E: Event, D: StateContext<S> + 'static> DomainFsm<S, E, D> {
    /// Create a handle over a shared table.
    ///
    /// Auto transitions follow the table's setting unless overridden with
    /// [`with_auto_transitions`](Self::with_auto_transitions).
    pub fn new(table: Arc<TransitionTable<S, E, D>>) -> Self {
        Self {
            auto_transitions: table.auto_transitions_enabled(),
            table,
            listeners: Listeners::new(),
        }
    }

    pub fn with_auto_transitions(mut self, enabled: bool) -> Self {
        self.auto_transitions = enabled;
        self
    }

    pub fn table(&self) -> &Arc<TransitionTable<S, E, D>> {
        &self.table
    }

    pub fn auto_transitions_enabled(&self) -> bool {
        self.auto_transitions
    }

    pub fn add_state_change_listener(
        &mut self,
        listener: Arc<dyn StateChangeListener<S, D>>,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn remove_state_change_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Handle `event` for the domain object.
    ///
    /// Selects the first candidate for the object's current state and
    /// `event` whose guards accept, runs its actions, then writes the target
    /// state. On any error the object keeps its pre-transition state, except
    /// for failures in post-actions and auto transitions, which happen after
    /// a write.
    pub fn handle<Q>(&self, domain: &mut D, event: &Q) -> Result<(), TransitionError>
    where
        E: Borrow<Q>,
        Q: Eq + ToOwned<Owned = E> + ?Sized,
    {
        let transition = self.table.transition_for_event(domain, event)?;
        self.execute(domain, transition)
    }

    /// Move the domain object directly to `target`.
    ///
    /// Uses the single declared transition from the current state to
    /// `target` whose guards accept, whatever its event.
    pub fn change_state(&self, domain: &mut D, target: &S) -> Result<(), TransitionError> {
        let transition = self.table.transition_to_state(domain, target)?;
        self.execute(domain, transition)
    }

    fn execute(
        &self,
        domain: &mut D,
        transition: &Transition<S, E, D>,
    ) -> Result<(), TransitionError> {
        fire(transition, domain, &self.listeners)?;
        if self.auto_transitions {
            self.run_auto_transitions(domain)?;
        }
        Ok(())
    }

    fn run_auto_transitions(&self, domain: &mut D) -> Result<(), TransitionError> {
        let limit = self.table.max_auto_transitions();
        let mut fired = 0;
        while let Some(transition) = self.table.auto_transition(domain)? {
            if fired == limit {
                return Err(TransitionError::AutoTransitionLimit {
                    state: domain.state().name().to_string(),
                    limit,
                });
            }
            fire(transition, domain, &self.listeners)?;
            fired += 1;
        }
        Ok(())
    }
}

impl<S, E, D> Clone for DomainFsm<S, E, D> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            auto_transitions: self.auto_transitions,
            listeners: self.listeners.clone(),
        }
    }
}

/// Run a selected transition: actions, state write, post-actions, listeners.
fn fire<S, E, D>(
    transition: &Transition<S, E, D>,
    domain: &mut D,
    listeners: &Listeners<S, D>,
) -> Result<(), TransitionError>
where
    S: State,
    E: Event,
    D: StateContext<S>,
{
    let old = domain.state().clone();
    let new = transition.to.state.clone();
    trace!(
        from = old.name(),
        to = new.name(),
        event = transition.event_name(),
        "attempting transition"
    );

    transition.run_actions(domain)?;
    domain.set_state(new.clone());
    debug!(
        from = old.name(),
        to = new.name(),
        event = transition.event_name(),
        "changed state"
    );
    transition.run_post_actions(domain)?;

    listeners.notify(domain, &old, &new);
    Ok(())
}

/// State machine that owns its domain object.
///
/// Convenient when one object is driven by one machine for its whole life;
/// [`DomainFsm`] is the better fit when many objects share a table.
pub struct Fsm<S, E, D> {
    domain: D,
    engine: DomainFsm<S, E, D>,
}

impl<S: State, E: Event, D: StateContext<S> + 'static> Fsm<S, E, D> {
    pub fn new(domain: D, table: Arc<TransitionTable<S, E, D>>) -> Self {
        Self {
            domain,
            engine: DomainFsm::new(table),
        }
    }

    pub fn with_auto_transitions(mut self, enabled: bool) -> Self {
        self.engine = self.engine.with_auto_transitions(enabled);
        self
    }

    /// Get current state
    pub fn state(&self) -> &S {
        self.domain.state()
    }

    /// Check if the machine is in a final state
    pub fn is_final(&self) -> bool {
        self.state().is_final()
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn domain_mut(&mut self) -> &mut D {
        &mut self.domain
    }

    pub fn into_inner(self) -> D {
        self.domain
    }

    pub fn on_event<Q>(&mut self, event: &Q) -> Result<(), TransitionError>
    where
        E: Borrow<Q>,
        Q: Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.engine.handle(&mut self.domain, event)
    }

    pub fn change_state(&mut self, target: &S) -> Result<(), TransitionError> {
        self.engine.change_state(&mut self.domain, target)
    }

    pub fn add_state_change_listener(
        &mut self,
        listener: Arc<dyn StateChangeListener<S, D>>,
    ) -> ListenerId {
        self.engine.add_state_change_listener(listener)
    }

    pub fn remove_state_change_listener(&mut self, id: ListenerId) -> bool {
        self.engine.remove_state_change_listener(id)
    }
}

//! Fluent builder for transition tables.

use crate::builder::error::BuildError;
use crate::builder::scope::{Draft, Scope, Source};
use crate::core::{Action, Event, Guard, State};
use crate::engine::{Target, Transition, TransitionTable};
use std::mem;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

/// Default bound on chained auto transitions per handled event.
pub const DEFAULT_MAX_AUTO_TRANSITIONS: usize = 32;

/// Builder for [`TransitionTable`]s.
///
/// Declarations follow a small grammar:
///
/// - `.from(s).to(t).on_event(e).end()` declares one transition,
/// - `.from(s).on_event(e).to_multiple().to(t1)…end().to(t2)…end().end_multiple()`
///   declares an ordered group of candidates sharing a source state,
/// - `.condition(..)`, `.action(..)` and `.post_action(..)` decorate the
///   transition opened by the last `.to()`.
///
/// Misuse of the grammar is recorded and reported by [`build`](Self::build);
/// calls after the first error are ignored.
///
/// # Example
///
/// ```rust
/// use domain_fsm::builder::TransitionTableBuilder;
/// use domain_fsm::core::Context;
///
/// let table = TransitionTableBuilder::<String, String, Context<String>>::new()
///     .from("NEW".to_string())
///     .on_event("TO_READY".to_string())
///     .to("READY".to_string())
///     .end()
///     .build()
///     .unwrap();
///
/// assert_eq!(table.transitions().len(), 1);
/// ```
pub struct TransitionTableBuilder<S, E, D> {
    transitions: Vec<Transition<S, E, D>>,
    scope: Scope<S, E, D>,
    error: Option<BuildError>,
    auto_transitions: bool,
    max_auto_transitions: usize,
}

impl<S: State, E: Event, D: 'static> TransitionTableBuilder<S, E, D> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            scope: Scope::Root,
            error: None,
            auto_transitions: false,
            max_auto_transitions: DEFAULT_MAX_AUTO_TRANSITIONS,
        }
    }

    /// Allow event-less transitions and fire them automatically.
    pub fn auto_transitions(mut self, enabled: bool) -> Self {
        self.auto_transitions = enabled;
        self
    }

    /// Bound the number of auto transitions chained after one event.
    pub fn max_auto_transitions(mut self, limit: usize) -> Self {
        self.max_auto_transitions = limit;
        self
    }

    /// Open a source state scope.
    pub fn from(self, state: S) -> Self {
        self.step("from", |scope, _| match scope {
            Scope::Root => Ok(Scope::From(Source {
                from: state,
                event: None,
            })),
            other => Err(unexpected("from", &other)),
        })
    }

    /// Set the triggering event.
    ///
    /// On a source scope the event is shared by every transition declared
    /// inside it; on a `.to()` scope it applies to that transition only.
    /// An event can be set once per transition.
    pub fn on_event(self, event: E) -> Self {
        self.step("on_event", |scope, _| match scope {
            Scope::From(source) => Ok(Scope::From(with_shared_event(source, event)?)),
            Scope::Group { source, declared } => Ok(Scope::Group {
                source: with_shared_event(source, event)?,
                declared,
            }),
            Scope::To {
                source,
                mut draft,
                group,
            } => {
                if source.event.is_some() || draft.event.is_some() {
                    return Err(BuildError::EventAlreadySet {
                        from: source.from.name().to_string(),
                    });
                }
                draft.event = Some(event);
                Ok(Scope::To {
                    source,
                    draft,
                    group,
                })
            }
            other => Err(unexpected("on_event", &other)),
        })
    }

    /// Open a transition to `state`, closed by `.end()`.
    pub fn to(self, state: S) -> Self {
        self.step("to", |scope, _| {
            let draft = Draft {
                event: None,
                target: Target::new(state),
            };
            match scope {
                Scope::From(source) => Ok(Scope::To {
                    source,
                    draft,
                    group: None,
                }),
                Scope::Group { source, declared } => Ok(Scope::To {
                    source,
                    draft,
                    group: Some(declared),
                }),
                other => Err(unexpected("to", &other)),
            }
        })
    }

    /// Open an ordered group of candidate targets, closed by `.end_multiple()`.
    pub fn to_multiple(self) -> Self {
        self.step("to_multiple", |scope, _| match scope {
            Scope::From(source) => Ok(Scope::Group {
                source,
                declared: 0,
            }),
            other => Err(unexpected("to_multiple", &other)),
        })
    }

    /// Add a guard using a closure.
    pub fn condition<F>(self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    pub fn guard(self, guard: Guard<D>) -> Self {
        self.decorate("condition", |target| target.guard(guard))
    }

    /// Add an action using a closure. Actions run before the state write.
    pub fn action<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.perform(Action::new(procedure))
    }

    pub fn perform(self, action: Action<D>) -> Self {
        self.decorate("action", |target| target.perform(action))
    }

    /// Add an action that runs after the state write.
    pub fn post_action<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.post_perform(Action::new(procedure))
    }

    pub fn post_perform(self, action: Action<D>) -> Self {
        self.decorate("post_action", |target| target.post_perform(action))
    }

    /// Close the transition opened by the last `.to()`.
    pub fn end(self) -> Self {
        self.step("end", |scope, transitions| match scope {
            Scope::To {
                source,
                draft,
                group,
            } => {
                transitions.push(draft.finish(&source));
                Ok(match group {
                    Some(declared) => Scope::Group {
                        source,
                        declared: declared + 1,
                    },
                    None => Scope::Root,
                })
            }
            _ => Err(BuildError::UnmatchedEnd),
        })
    }

    /// Close the group opened by `.to_multiple()`.
    pub fn end_multiple(self) -> Self {
        self.step("end_multiple", |scope, _| match scope {
            Scope::Group {
                source,
                declared: 0,
            } => Err(BuildError::EmptyGroup {
                from: source.from.name().to_string(),
            }),
            Scope::Group { .. } => Ok(Scope::Root),
            _ => Err(BuildError::UnmatchedEndMultiple),
        })
    }

    /// Declare an unconditional transition in one call.
    pub fn add(self, from: S, event: E, to: S) -> Self {
        self.add_transition(Transition::new(from, Some(event), Target::new(to)))
    }

    /// Declare ordered candidates sharing a source state and event.
    ///
    /// Each [`Target`] carries its own guards and actions; candidates are
    /// evaluated in the order given.
    pub fn add_targets<I>(self, from: S, event: E, targets: I) -> Self
    where
        I: IntoIterator<Item = Target<S, D>>,
    {
        self.step("add_targets", |scope, transitions| match scope {
            Scope::Root => {
                let before = transitions.len();
                transitions.extend(
                    targets
                        .into_iter()
                        .map(|target| Transition::new(from.clone(), Some(event.clone()), target)),
                );
                if transitions.len() == before {
                    return Err(BuildError::EmptyGroup {
                        from: from.name().to_string(),
                    });
                }
                Ok(Scope::Root)
            }
            other => Err(unexpected("add_targets", &other)),
        })
    }

    /// Declare a prebuilt transition.
    pub fn add_transition(self, transition: Transition<S, E, D>) -> Self {
        self.step("add_transition", |scope, transitions| match scope {
            Scope::Root => {
                transitions.push(transition);
                Ok(Scope::Root)
            }
            other => Err(unexpected("add_transition", &other)),
        })
    }

    /// Check the declarations without building.
    ///
    /// Accumulates every problem instead of stopping at the first one:
    /// grammar misuse, unclosed scopes, transitions without an event,
    /// duplicates, and transitions shadowed by an earlier unconditional
    /// sibling.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        if let Some(error) = &self.error {
            checks.push(Validation::fail(error.clone()));
        }

        if !matches!(self.scope, Scope::Root) {
            checks.push(Validation::fail(BuildError::UnclosedScope {
                scope: self.scope.name(),
            }));
        }

        for (index, transition) in self.transitions.iter().enumerate() {
            checks.push(self.check_event(transition));
            checks.push(check_reachable(&self.transitions[..index], transition));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Freeze the declarations into an immutable table.
    ///
    /// Returns the single problem found, or [`BuildError::Invalid`] listing
    /// all of them.
    pub fn build(self) -> Result<TransitionTable<S, E, D>, BuildError> {
        match self.validate() {
            Validation::Success(_) => {}
            Validation::Failure(errors) => {
                let mut errors: Vec<BuildError> = errors.iter().cloned().collect();
                return Err(match errors.len() {
                    1 => errors.remove(0),
                    _ => BuildError::Invalid(errors),
                });
            }
        }

        if self.auto_transitions && self.transitions.iter().all(|t| t.event.is_some()) {
            warn!("auto transitions enabled but no event-less transition is declared");
        }

        Ok(TransitionTable::new(
            self.transitions,
            self.auto_transitions,
            self.max_auto_transitions,
        ))
    }

    fn check_event(&self, transition: &Transition<S, E, D>) -> Validation<(), NonEmptyVec<BuildError>> {
        if transition.event.is_none() && !self.auto_transitions {
            Validation::fail(BuildError::MissingEvent {
                from: transition.from.name().to_string(),
                to: transition.to.state.name().to_string(),
            })
        } else {
            Validation::success(())
        }
    }

    /// Apply one grammar step unless an earlier step already failed.
    fn step<F>(mut self, call: &'static str, apply: F) -> Self
    where
        F: FnOnce(Scope<S, E, D>, &mut Vec<Transition<S, E, D>>) -> Result<Scope<S, E, D>, BuildError>,
    {
        if self.error.is_some() {
            return self;
        }
        let scope = mem::replace(&mut self.scope, Scope::Root);
        match apply(scope, &mut self.transitions) {
            Ok(scope) => self.scope = scope,
            Err(error) => {
                warn!(call, %error, "invalid transition table declaration");
                self.error = Some(error);
            }
        }
        self
    }

    /// Modify the target of the open `.to()` scope.
    fn decorate<F>(self, call: &'static str, apply: F) -> Self
    where
        F: FnOnce(Target<S, D>) -> Target<S, D>,
    {
        self.step(call, |scope, _| match scope {
            Scope::To {
                source,
                mut draft,
                group,
            } => {
                draft.target = apply(draft.target);
                Ok(Scope::To {
                    source,
                    draft,
                    group,
                })
            }
            other => Err(unexpected(call, &other)),
        })
    }
}

impl<S: State, E: Event, D: 'static> Default for TransitionTableBuilder<S, E, D> {
    fn default() -> Self {
        Self::new()
    }
}

fn unexpected<S: State, E: Event, D>(call: &'static str, scope: &Scope<S, E, D>) -> BuildError {
    BuildError::UnexpectedCall {
        call,
        scope: scope.name(),
    }
}

fn with_shared_event<S: State, E>(source: Source<S, E>, event: E) -> Result<Source<S, E>, BuildError> {
    if source.event.is_some() {
        return Err(BuildError::EventAlreadySet {
            from: source.from.name().to_string(),
        });
    }
    Ok(Source {
        from: source.from,
        event: Some(event),
    })
}

/// A transition declared after an unconditional sibling never fires.
fn check_reachable<S: State, E: Event, D>(
    earlier: &[Transition<S, E, D>],
    transition: &Transition<S, E, D>,
) -> Validation<(), NonEmptyVec<BuildError>> {
    let shadowing = earlier.iter().find(|sibling| {
        sibling.from == transition.from
            && sibling.event == transition.event
            && sibling.is_unconditional()
    });

    match shadowing {
        None => Validation::success(()),
        Some(sibling) => {
            let from = transition.from.name().to_string();
            let event = transition.event_name().to_string();
            let to = transition.to.state.name().to_string();
            if sibling.to.state == transition.to.state && transition.is_unconditional() {
                Validation::fail(BuildError::DuplicateTransition { from, event, to })
            } else {
                Validation::fail(BuildError::UnreachableTransition { from, event, to })
            }
        }
    }
}

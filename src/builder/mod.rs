//! Builder API for declaring transition tables.
//!
//! This module provides the fluent table builder, a standalone transition
//! builder, and macros for declaring state and event enums with minimal
//! boilerplate.

pub mod error;
pub mod macros;
mod scope;
pub mod table;
pub mod transition;

pub use error::BuildError;
pub use table::{TransitionTableBuilder, DEFAULT_MAX_AUTO_TRANSITIONS};
pub use transition::TransitionBuilder;

use crate::core::{Event, Guard, State};
use crate::engine::{Target, Transition};

/// Create an unconditional transition.
///
/// # Example
///
/// ```
/// use domain_fsm::builder::simple_transition;
/// use domain_fsm::core::Context;
/// use domain_fsm::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
///     final: [End]
/// }
///
/// let transition =
///     simple_transition::<MyState, String, Context<MyState>>(MyState::Start, "GO".to_string(), MyState::End);
/// assert!(transition.is_unconditional());
/// ```
pub fn simple_transition<S, E, D>(from: S, event: E, to: S) -> Transition<S, E, D>
where
    S: State,
    E: Event,
    D: 'static,
{
    Transition::new(from, Some(event), Target::new(to))
}

/// Create a transition guarded by a predicate on the domain object.
///
/// # Example
///
/// ```
/// use domain_fsm::builder::guarded_transition;
/// use domain_fsm::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         Middle,
///     }
/// }
///
/// struct Order {
///     paid: bool,
/// }
///
/// let transition = guarded_transition::<MyState, String, Order, _>(
///     MyState::Start,
///     "PAY".to_string(),
///     MyState::Middle,
///     |order| order.paid,
/// );
/// assert!(transition.accepts(&Order { paid: true }).unwrap());
/// ```
pub fn guarded_transition<S, E, D, F>(from: S, event: E, to: S, guard: F) -> Transition<S, E, D>
where
    S: State,
    E: Event,
    D: 'static,
    F: Fn(&D) -> bool + Send + Sync + 'static,
{
    Transition::new(from, Some(event), Target::new(to).guard(Guard::new(guard)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, StateContext};
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Start,
            Middle,
            End,
        }
        final: [End]
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<TestState, String, Context<TestState>>(
            TestState::Start,
            "NEXT".to_string(),
            TestState::Middle,
        );

        assert_eq!(transition.from, TestState::Start);
        assert_eq!(transition.to.state, TestState::Middle);
        assert!(transition.accepts(&Context::new(TestState::Start)).unwrap());
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition::<TestState, String, Context<TestState>, _>(
            TestState::Middle,
            "NEXT".to_string(),
            TestState::End,
            |ctx| !ctx.state().is_final(),
        );

        assert!(transition.accepts(&Context::new(TestState::Middle)).unwrap());
        assert!(!transition.accepts(&Context::new(TestState::End)).unwrap());
    }

    #[test]
    fn helpers_feed_the_table_builder() {
        let table = TransitionTableBuilder::new()
            .add_transition(simple_transition(
                TestState::Start,
                "NEXT".to_string(),
                TestState::Middle,
            ))
            .add_transition(guarded_transition(
                TestState::Middle,
                "NEXT".to_string(),
                TestState::End,
                |_: &Context<TestState>| true,
            ))
            .build()
            .unwrap();

        let mut fsm = table.into_fsm(TestState::Start);
        fsm.on_event("NEXT").unwrap();
        fsm.on_event("NEXT").unwrap();
        assert!(fsm.is_final());
    }
}

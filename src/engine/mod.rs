//! Transition tables and the engines that execute them.
//!
//! A [`TransitionTable`] is immutable once built. [`DomainFsm`] binds a
//! shared table to `handle(domain, event)`; [`Fsm`] additionally owns the
//! domain object it drives.

mod fsm;
mod table;
mod transition;

pub use fsm::{DomainFsm, Fsm, ListenerId, StateChangeListener};
pub use table::TransitionTable;
pub use transition::{Target, Transition, TransitionError};

//! Core value types of the engine.
//!
//! This module contains the building blocks every transition table is made of:
//! - States and events via the `State` and `Event` traits
//! - The `StateContext` capability of domain objects
//! - Guard predicates and actions evaluated against domain objects

mod action;
mod context;
mod guard;
mod state;

pub use action::Action;
pub use context::{Context, StateContext};
pub use guard::{BoxError, Guard};
pub use state::{Event, State};

//! domain-fsm: a table-driven state machine engine for domain objects
//!
//! A transition table is declared once, frozen, and then shared by engine
//! handles that drive any number of domain objects. The engine owns no
//! domain state: objects only expose their current state through
//! [`StateContext`](core::StateContext), and guards and actions see the whole
//! object.
//!
//! # Core Concepts
//!
//! - **State / Event**: opaque, hashable values (`state_enum!`, `event_enum!`, or `String`)
//! - **Transition**: an edge from one state to a target, triggered by an event,
//!   optionally guarded and carrying actions
//! - **Transition table**: immutable mapping from (state, event) to ordered
//!   candidates; the first candidate whose guards accept wins
//! - **Engine**: [`DomainFsm::handle`](engine::DomainFsm::handle) selects at most
//!   one transition, runs its actions and writes the target state
//!
//! # Example
//!
//! ```rust
//! use domain_fsm::builder::TransitionTableBuilder;
//! use domain_fsm::core::StateContext;
//! use domain_fsm::state_enum;
//!
//! state_enum! {
//!     pub enum DocumentState {
//!         New,
//!         Signed,
//!         AutoSent,
//!         Canceled,
//!     }
//!     final: [AutoSent, Canceled]
//! }
//!
//! struct Document {
//!     state: DocumentState,
//!     sign_required: bool,
//! }
//!
//! impl StateContext<DocumentState> for Document {
//!     fn state(&self) -> &DocumentState {
//!         &self.state
//!     }
//!
//!     fn set_state(&mut self, state: DocumentState) {
//!         self.state = state;
//!     }
//! }
//!
//! let fsm = TransitionTableBuilder::<DocumentState, String, Document>::new()
//!     .from(DocumentState::New)
//!     .to(DocumentState::Signed)
//!     .on_event("USER_SIGN".to_string())
//!     .end()
//!     .from(DocumentState::Signed)
//!     .on_event("TO_END".to_string())
//!     .to_multiple()
//!     .to(DocumentState::AutoSent)
//!     .condition(|doc| doc.sign_required)
//!     .end()
//!     .to(DocumentState::Canceled)
//!     .end()
//!     .end_multiple()
//!     .build()
//!     .unwrap()
//!     .into_domain_fsm();
//!
//! let mut doc = Document {
//!     state: DocumentState::New,
//!     sign_required: true,
//! };
//! fsm.handle(&mut doc, "USER_SIGN").unwrap();
//! fsm.handle(&mut doc, "TO_END").unwrap();
//! assert_eq!(doc.state, DocumentState::AutoSent);
//! ```

pub mod builder;
pub mod core;
pub mod diagram;
pub mod engine;
pub mod serialization;

// Re-export commonly used types
pub use crate::builder::{BuildError, TransitionTableBuilder};
pub use crate::core::{Action, Context, Event, Guard, State, StateContext};
pub use crate::engine::{DomainFsm, Fsm, Target, Transition, TransitionError, TransitionTable};
